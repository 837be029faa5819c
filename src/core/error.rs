use thiserror::Error;

/// Errors that can occur while reading, computing or rendering a fiscal invoice.
///
/// None of these are retried internally: each one means either the
/// authority's document is incomplete or the caller is misconfigured.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum FiskalError {
    /// The input is not well-formed XML.
    #[error("malformed document: {0}")]
    Malformed(String),

    /// Well-formed XML that does not have the expected structure.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(String),

    /// No element matched the search path.
    #[error("can't find element {path}")]
    ElementNotFound { path: String },

    /// The element exists but lacks the named attribute.
    #[error("can't find attribute {attribute} on element {element}")]
    AttributeNotFound { element: String, attribute: String },

    /// A field required for the verification link is missing.
    #[error("verification field {field} not found")]
    FieldNotFound { field: String },

    /// Environment other than `TEST` or `PRODUCTION`.
    #[error("invalid environment: {0:?}")]
    InvalidEnvironment(String),

    /// A parsed request violates a model invariant.
    #[error("invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },

    /// Issuer configuration or client table could not be decoded.
    #[error("configuration error: {0}")]
    Config(String),

    /// QR payload too large or image encoding failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// An input file could not be read.
    #[error("can't read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Layout or output stage failed.
    #[error("render error: {0}")]
    Render(String),
}

impl FiskalError {
    /// Shorthand for an [`FiskalError::InvalidValue`].
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True for the "required field absent" family of errors.
    pub fn is_missing_field(&self) -> bool {
        matches!(
            self,
            Self::ElementNotFound { .. }
                | Self::AttributeNotFound { .. }
                | Self::FieldNotFound { .. }
                | Self::SchemaMismatch(_)
        )
    }
}
