//! Verification-service link embedded in the receipt's QR code.
//!
//! The link carries eight values copied verbatim from the request XML, not
//! from the typed model: `TotPrice="10.50"` stays `10.50`, and the timestamp
//! keeps its offset as written.
//!
//! ```
//! use fiskal::core::Environment;
//! use fiskal::verify::VerificationFields;
//!
//! let fields = VerificationFields {
//!     iic: "ABC123".into(),
//!     tin: "12345678".into(),
//!     issue_date_time: "2023-05-01T10:00:00".into(),
//!     invoice_order_number: "7".into(),
//!     business_unit_code: "BU1".into(),
//!     tcr_code: "TCR1".into(),
//!     software_code: "SC1".into(),
//!     total_price: "123.45".into(),
//! };
//! let url = fields.url(Environment::Test);
//! assert!(url.starts_with("https://efitest.tax.gov.me/"));
//! ```

#[cfg(feature = "qr")]
mod qr;

#[cfg(feature = "qr")]
pub use qr::{QR_ERROR_CORRECTION, QR_MIN_DIMENSION, encode_qr_png};

use crate::core::{Environment, FiskalError};

/// Verification endpoint of the test environment.
pub const TEST_VERIFY_URL: &str = "https://efitest.tax.gov.me/ic/#/verify";

/// Verification endpoint of the production environment.
pub const PRODUCTION_VERIFY_URL: &str = "https://mapr.tax.gov.me/ic/#/verify";

/// Query keys in the order the verification service expects them.
pub const QUERY_KEYS: [&str; 8] = ["iic", "tin", "crtd", "ord", "bu", "cr", "sw", "prc"];

/// Where each verification value lives in the request: (element path, attribute).
pub const FIELD_SOURCES: [(&str, &str); 8] = [
    ("//Invoice", "IIC"),
    ("//Seller", "IDNum"),
    ("//Invoice", "IssueDateTime"),
    ("//Invoice", "InvOrdNum"),
    ("//Invoice", "BusinUnitCode"),
    ("//Invoice", "TCRCode"),
    ("//Invoice", "SoftCode"),
    ("//Invoice", "TotPrice"),
];

/// Base URL of the verification service for `env`.
pub fn verify_base_url(env: Environment) -> &'static str {
    match env {
        Environment::Test => TEST_VERIFY_URL,
        Environment::Production => PRODUCTION_VERIFY_URL,
    }
}

/// The eight raw values, in link order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationFields {
    pub iic: String,
    pub tin: String,
    pub issue_date_time: String,
    pub invoice_order_number: String,
    pub business_unit_code: String,
    pub tcr_code: String,
    pub software_code: String,
    pub total_price: String,
}

impl VerificationFields {
    /// Read the fields from a parsed request document.
    #[cfg(feature = "xml")]
    pub fn from_document(doc: &roxmltree::Document<'_>) -> Result<Self, FiskalError> {
        let read = |i: usize| -> Result<String, FiskalError> {
            let (path, attribute) = FIELD_SOURCES[i];
            crate::xml::attribute_value(path, attribute, doc).map_err(|e| {
                tracing::debug!(error = %e, "verification field lookup failed");
                FiskalError::FieldNotFound {
                    field: attribute.to_string(),
                }
            })
        };
        Ok(Self {
            iic: read(0)?,
            tin: read(1)?,
            issue_date_time: read(2)?,
            invoice_order_number: read(3)?,
            business_unit_code: read(4)?,
            tcr_code: read(5)?,
            software_code: read(6)?,
            total_price: read(7)?,
        })
    }

    /// Values in the fixed substitution order.
    pub fn ordered(&self) -> [&str; 8] {
        [
            &self.iic,
            &self.tin,
            &self.issue_date_time,
            &self.invoice_order_number,
            &self.business_unit_code,
            &self.tcr_code,
            &self.software_code,
            &self.total_price,
        ]
    }

    /// Build the verification link. Values are substituted without escaping.
    pub fn url(&self, env: Environment) -> String {
        let query: Vec<String> = QUERY_KEYS
            .iter()
            .zip(self.ordered())
            .map(|(k, v)| format!("{k}={v}"))
            .collect();
        format!("{}?{}", verify_base_url(env), query.join("&"))
    }
}

/// Build the verification link straight from request XML text.
#[cfg(feature = "xml")]
pub fn build_verification_url(request_xml: &str, env: Environment) -> Result<String, FiskalError> {
    let doc = crate::xml::parse_document(request_xml)?;
    let url = VerificationFields::from_document(&doc)?.url(env);
    tracing::debug!(%env, %url, "built verification link");
    Ok(url)
}

/// Same as [`build_verification_url`] for an environment given as text.
#[cfg(feature = "xml")]
pub fn build_verification_url_str(request_xml: &str, env: &str) -> Result<String, FiskalError> {
    build_verification_url(request_xml, env.parse()?)
}
