//! Fiscal code tables: payment types and VAT exemption articles.
//!
//! Each code maps to exactly one printed string. Unknown exemption codes
//! map to no notice at all rather than falling through to a neighbour.

use serde::{Deserialize, Serialize};

/// `TypeOfInv`: how the invoice is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentType {
    /// Cash or card at the till.
    #[serde(rename = "CASH")]
    Cash,
    /// Bank transfer.
    #[serde(rename = "NONCASH")]
    NonCash,
}

impl PaymentType {
    /// Wire code used by the tax authority.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Cash => "CASH",
            Self::NonCash => "NONCASH",
        }
    }

    /// Label printed next to "Nacin placanja:".
    pub fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Gotovinski",
            Self::NonCash => "Bezgotovinski",
        }
    }
}

/// Legal article under which a line is exempt from VAT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExemptionCode {
    Cl17,
    Cl20,
    Cl26,
    Cl27,
    Cl28,
    Cl29,
    Cl30,
}

/// (code, article) pairs in schema order.
static EXEMPTION_ARTICLES: &[(ExemptionCode, &str)] = &[
    (ExemptionCode::Cl17, "17"),
    (ExemptionCode::Cl20, "20"),
    (ExemptionCode::Cl26, "26"),
    (ExemptionCode::Cl27, "27"),
    (ExemptionCode::Cl28, "28"),
    (ExemptionCode::Cl29, "29"),
    (ExemptionCode::Cl30, "30"),
];

impl ExemptionCode {
    /// Parse the `EX` attribute. Accepts both `VAT_CL17` and the bare `CL17`.
    pub fn from_code(code: &str) -> Option<Self> {
        let bare = code.trim().strip_prefix("VAT_").unwrap_or(code.trim());
        let article = bare.strip_prefix("CL")?;
        EXEMPTION_ARTICLES
            .iter()
            .find(|(_, a)| *a == article)
            .map(|(c, _)| *c)
    }

    /// Schema code, e.g. `VAT_CL17`.
    pub fn code(&self) -> String {
        format!("VAT_CL{}", self.article())
    }

    /// Article number of the VAT law.
    pub fn article(&self) -> &'static str {
        EXEMPTION_ARTICLES
            .iter()
            .find(|(c, _)| c == self)
            .map(|(_, a)| *a)
            .unwrap_or_default()
    }

    /// The legal notice printed under "NAPOMENA:".
    pub fn notice(&self) -> String {
        format!(
            "PDV obracunat po stopi 0% u skladu sa Clanom {}. Zakona o PDV-u",
            self.article()
        )
    }
}

/// Select the single exemption notice for a document.
///
/// Every recognized code overwrites the previous one, so the last
/// recognized code in line order wins. Unrecognized or absent codes are
/// skipped.
pub fn last_exemption<'a, I>(codes: I) -> Option<ExemptionCode>
where
    I: IntoIterator<Item = Option<&'a str>>,
{
    let mut selected = None;
    for code in codes.into_iter().flatten() {
        if let Some(ex) = ExemptionCode::from_code(code) {
            selected = Some(ex);
        }
    }
    selected
}
