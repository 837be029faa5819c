//! Issuer configuration, deployment environment and the client directory.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::error::FiskalError;

/// Deployment environment of the tax authority's services.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Environment {
    Test,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Test => "TEST",
            Self::Production => "PRODUCTION",
        }
    }
}

impl FromStr for Environment {
    type Err = FiskalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEST" => Ok(Self::Test),
            "PRODUCTION" => Ok(Self::Production),
            other => Err(FiskalError::InvalidEnvironment(other.to_string())),
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = FiskalError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Environment> for String {
    fn from(env: Environment) -> Self {
        env.as_str().to_string()
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Static data about the issuing company.
///
/// Phone, fax, VAT number and bank account never appear in the fiscal XML,
/// so they come from here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IssuerConfig {
    /// Company name (used by the exemption summary header).
    pub name: String,
    /// Street address.
    pub address: String,
    /// Tax identification number (PIB).
    pub tin: String,
    /// VAT registration number (PDV).
    pub vat: String,
    pub phone: String,
    pub fax: String,
    /// Bank account (Z.R.).
    pub bank_account: String,
    /// Which verification service the QR code points at.
    pub environment: Environment,
    /// TrueType family used by the PDF renderer.
    pub fonts: FontConfig,
}

impl Default for IssuerConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            address: String::new(),
            tin: String::new(),
            vat: String::new(),
            phone: String::new(),
            fax: String::new(),
            bank_account: String::new(),
            environment: Environment::Test,
            fonts: FontConfig::default(),
        }
    }
}

impl IssuerConfig {
    /// Load from a JSON document.
    pub fn from_json(json: &str) -> Result<Self, FiskalError> {
        serde_json::from_str(json).map_err(|e| FiskalError::Config(format!("issuer config: {e}")))
    }
}

/// Where the PDF renderer finds its TrueType font family.
///
/// `family` is the file stem: `DejaVuSans` resolves to `DejaVuSans.ttf` or
/// `DejaVuSans-Regular.ttf`, plus the matching bold and italic faces. The
/// faces must cover Latin Extended-A so that names such as "Čelebić" print
/// as written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontConfig {
    pub dir: PathBuf,
    pub family: String,
}

impl Default for FontConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("/usr/share/fonts/truetype/dejavu"),
            family: "DejaVuSans".to_string(),
        }
    }
}

/// A known buyer and its VAT registration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    /// Tax identification number, matched against the buyer's `IDNum`.
    pub tin: String,
    /// VAT registration number.
    pub vat: String,
    #[serde(default)]
    pub name: String,
}

/// Read-only side table of clients keyed by TIN.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientDirectory {
    clients: Vec<Client>,
}

static PLACEHOLDER_CLIENT: Client = Client {
    tin: String::new(),
    vat: String::new(),
    name: String::new(),
};

impl ClientDirectory {
    pub fn new(clients: Vec<Client>) -> Self {
        Self { clients }
    }

    /// Load from a JSON array of clients.
    pub fn from_json(json: &str) -> Result<Self, FiskalError> {
        serde_json::from_str(json).map_err(|e| FiskalError::Config(format!("client table: {e}")))
    }

    /// First client whose TIN equals `tin`, or an empty placeholder.
    pub fn lookup(&self, tin: &str) -> &Client {
        self.clients
            .iter()
            .find(|c| c.tin == tin)
            .unwrap_or(&PLACEHOLDER_CLIENT)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
