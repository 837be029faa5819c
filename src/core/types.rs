use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Deserializer, Serialize};

use super::codes::{ExemptionCode, PaymentType};
use super::error::FiskalError;

/// Currency printed when the request carries no `Currency` element.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// VAT rate assumed when the request carries no `SameTaxes` group.
pub const DEFAULT_VAT_RATE: Decimal = dec!(21);

/// The `RegisterInvoiceRequest` subtree of a signed request envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceRequest {
    /// Message header (send time, UUID).
    #[serde(rename = "Header", default)]
    pub header: Option<MessageHeader>,
    /// The fiscalized invoice.
    #[serde(rename = "Invoice")]
    pub invoice: Invoice,
}

/// Header shared by request and response messages.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageHeader {
    #[serde(rename = "@UUID", default)]
    pub uuid: Option<String>,
    #[serde(rename = "@RequestUUID", default)]
    pub request_uuid: Option<String>,
    #[serde(rename = "@SendDateTime", default)]
    pub send_date_time: Option<String>,
}

/// The `Invoice` element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Fiscal invoice number, e.g. `ab123ab123/1/2021/cd123cd123`.
    #[serde(rename = "@InvNum")]
    pub number: String,
    /// Sequential order number within the cash register.
    #[serde(rename = "@InvOrdNum")]
    pub order_number: String,
    /// Issue timestamp, stored as local wall-clock time.
    #[serde(rename = "@IssueDateTime", deserialize_with = "deserialize_issue_time")]
    pub issue_date_time: NaiveDateTime,
    /// Payment type.
    #[serde(rename = "@TypeOfInv")]
    pub payment_type: PaymentType,
    /// Invoice Identification Code.
    #[serde(rename = "@IIC")]
    pub iic: String,
    #[serde(rename = "@BusinUnitCode", default)]
    pub business_unit_code: Option<String>,
    #[serde(rename = "@TCRCode", default)]
    pub tcr_code: Option<String>,
    #[serde(rename = "@SoftCode", default)]
    pub software_code: Option<String>,
    /// Declared total price with VAT. This is the payable amount.
    #[serde(rename = "@TotPrice")]
    pub total_price: Decimal,
    /// Declared total price without VAT.
    #[serde(rename = "@TotPriceWoVAT")]
    pub total_price_without_vat: Decimal,
    /// Declared total VAT amount.
    #[serde(rename = "@TotVATAmt")]
    pub total_vat_amount: Decimal,
    #[serde(rename = "Currency", default)]
    pub currency: Option<Currency>,
    #[serde(rename = "Seller")]
    pub seller: Seller,
    #[serde(rename = "Buyer", default)]
    pub buyer: Option<Buyer>,
    #[serde(rename = "Items")]
    pub items: Items,
    #[serde(rename = "SameTaxes", default)]
    pub same_taxes: Option<SameTaxes>,
}

/// Issuer of the invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seller {
    #[serde(rename = "@Name")]
    pub name: String,
    #[serde(rename = "@IDNum")]
    pub id_num: String,
    #[serde(rename = "@IDType", default)]
    pub id_type: Option<String>,
    #[serde(rename = "@Address", default)]
    pub address: Option<String>,
    #[serde(rename = "@Town", default)]
    pub town: Option<String>,
    #[serde(rename = "@Country", default)]
    pub country: Option<String>,
}

/// Recipient of the invoice.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Buyer {
    #[serde(rename = "@Name", default)]
    pub name: String,
    #[serde(rename = "@IDNum", default)]
    pub id_num: String,
    #[serde(rename = "@IDType", default)]
    pub id_type: Option<String>,
    #[serde(rename = "@Address", default)]
    pub address: Option<String>,
    #[serde(rename = "@Town", default)]
    pub town: Option<String>,
    #[serde(rename = "@Country", default)]
    pub country: Option<String>,
}

impl Buyer {
    /// `address, town, country` with empty trailing parts trimmed off.
    pub fn postal_line(&self) -> String {
        let parts = [
            self.address.as_deref().unwrap_or_default(),
            self.town.as_deref().unwrap_or_default(),
            self.country.as_deref().unwrap_or_default(),
        ];
        parts
            .join(", ")
            .trim_end_matches([',', ' '])
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Currency {
    #[serde(rename = "@Code")]
    pub code: String,
    #[serde(rename = "@ExRate", default)]
    pub exchange_rate: Option<Decimal>,
}

/// The `Items` wrapper around the `I` line elements.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Items {
    #[serde(rename = "I", default)]
    pub lines: Vec<LineItem>,
}

/// One `I` element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    /// Item name.
    #[serde(rename = "@N")]
    pub name: String,
    /// Seller's item code.
    #[serde(rename = "@C", default)]
    pub code: Option<String>,
    /// Unit of measure, e.g. `kom`.
    #[serde(rename = "@U", default)]
    pub unit: String,
    /// Quantity.
    #[serde(rename = "@Q")]
    pub quantity: Decimal,
    /// Unit price before VAT, before rebate.
    #[serde(rename = "@UPB")]
    pub unit_price_before_vat: Decimal,
    /// Declared unit price after VAT.
    #[serde(rename = "@UPA", default)]
    pub unit_price_after_vat: Option<Decimal>,
    /// Rebate percentage.
    #[serde(rename = "@R", default)]
    pub rebate_percent: Decimal,
    /// Whether the rebate reduces the VAT base.
    #[serde(rename = "@RR", default)]
    pub rebate_reduces_base: Option<bool>,
    /// Declared line price before VAT.
    #[serde(rename = "@PB", default)]
    pub price_before_vat: Option<Decimal>,
    /// VAT rate percentage.
    #[serde(rename = "@VR", default)]
    pub vat_rate_percent: Decimal,
    /// Declared line VAT amount.
    #[serde(rename = "@VA", default)]
    pub vat_amount: Option<Decimal>,
    /// Declared line price after VAT.
    #[serde(rename = "@PA", default)]
    pub price_after_vat: Option<Decimal>,
    /// Raw exemption code, e.g. `VAT_CL17`.
    #[serde(rename = "@EX", default)]
    pub exemption: Option<String>,
}

impl LineItem {
    /// Recognized exemption code, if any.
    pub fn exemption_code(&self) -> Option<ExemptionCode> {
        self.exemption.as_deref().and_then(ExemptionCode::from_code)
    }
}

/// The `SameTaxes` group.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SameTaxes {
    #[serde(rename = "SameTax", default)]
    pub entries: Vec<SameTax>,
}

/// Items sharing one VAT rate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SameTax {
    #[serde(rename = "@NumOfItems", default)]
    pub num_of_items: Option<u32>,
    #[serde(rename = "@PriceBefVAT", default)]
    pub price_before_vat: Option<Decimal>,
    #[serde(rename = "@VATRate", default)]
    pub vat_rate: Option<Decimal>,
    #[serde(rename = "@ExemptFromVAT", default)]
    pub exempt_from_vat: Option<String>,
    #[serde(rename = "@VATAmt", default)]
    pub vat_amount: Option<Decimal>,
}

impl Invoice {
    /// Currency code, falling back to [`DEFAULT_CURRENCY`].
    pub fn currency_code(&self) -> &str {
        self.currency
            .as_ref()
            .map(|c| c.code.as_str())
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    /// Document-wide VAT rate from the first `SameTax` entry.
    ///
    /// An entry carrying `ExemptFromVAT` is an exempt group and counts as 0%
    /// whether or not it also states a `VATRate`.
    pub fn document_vat_rate(&self) -> Decimal {
        match self.same_taxes.as_ref().and_then(|st| st.entries.first()) {
            Some(t) if t.exempt_from_vat.as_deref().is_some_and(|e| !e.is_empty()) => Decimal::ZERO,
            Some(t) => t.vat_rate.unwrap_or(DEFAULT_VAT_RATE),
            None => DEFAULT_VAT_RATE,
        }
    }

    /// Calendar date of issue.
    pub fn issue_date(&self) -> NaiveDate {
        self.issue_date_time.date()
    }

    pub fn lines(&self) -> &[LineItem] {
        &self.items.lines
    }
}

impl InvoiceRequest {
    /// Enforce the model invariants: non-negative money and quantities,
    /// rates within `[0, 100]`, amounts small enough to compute with.
    pub fn check(&self) -> Result<(), FiskalError> {
        let inv = &self.invoice;
        for (field, value) in [
            ("TotPrice", inv.total_price),
            ("TotPriceWoVAT", inv.total_price_without_vat),
            ("TotVATAmt", inv.total_vat_amount),
        ] {
            non_negative(field, value)?;
        }
        for (i, line) in inv.lines().iter().enumerate() {
            let at = |f: &str| format!("Items/I[{}]/{f}", i + 1);
            non_negative(&at("Q"), line.quantity)?;
            non_negative(&at("UPB"), line.unit_price_before_vat)?;
            percentage(&at("R"), line.rebate_percent)?;
            percentage(&at("VR"), line.vat_rate_percent)?;
        }
        super::tax::check_amounts(inv)
    }
}

/// The `RegisterInvoiceResponse` element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceResponse {
    #[serde(rename = "Header", default)]
    pub header: Option<MessageHeader>,
    /// Fiscal Identification Code (JIKR).
    #[serde(rename = "FIC")]
    pub fic: String,
}

/// SOAP envelope around a response. Prefixes are not significant.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResponseEnvelope {
    #[serde(rename = "Body")]
    pub body: ResponseBody,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ResponseBody {
    #[serde(rename = "RegisterInvoiceResponse")]
    pub response: InvoiceResponse,
}

fn non_negative(field: &str, value: Decimal) -> Result<(), FiskalError> {
    if value < Decimal::ZERO {
        return Err(FiskalError::invalid(field, format!("{value} is negative")));
    }
    Ok(())
}

fn percentage(field: &str, value: Decimal) -> Result<(), FiskalError> {
    if value < Decimal::ZERO || value > dec!(100) {
        return Err(FiskalError::invalid(field, format!("{value} is outside 0..=100")));
    }
    Ok(())
}

/// Parse an `IssueDateTime` value: RFC 3339 with offset, or a naive local
/// timestamp. The local wall-clock time is kept.
pub fn parse_issue_time(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(dt) => Ok(dt.naive_local()),
        Err(_) => NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%dT%H:%M:%S"),
    }
}

fn deserialize_issue_time<'de, D>(deserializer: D) -> Result<NaiveDateTime, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_issue_time(&raw)
        .map_err(|e| serde::de::Error::custom(format!("invalid IssueDateTime '{raw}': {e}")))
}
