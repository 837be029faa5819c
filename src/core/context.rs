use super::config::{Client, ClientDirectory, IssuerConfig};
use super::types::{Buyer, InvoiceRequest, InvoiceResponse};

/// Everything one invoice render needs, assembled once per call.
///
/// Built from the parsed request and response plus the caller's static
/// configuration; read-only for the rest of the pipeline. The target
/// environment is `issuer.environment`.
#[derive(Debug, Clone)]
pub struct RenderContext<'a> {
    pub request: InvoiceRequest,
    pub response: InvoiceResponse,
    pub issuer: &'a IssuerConfig,
    pub clients: &'a ClientDirectory,
    /// Internal invoice number, display only.
    pub internal_number: String,
    /// Payload of the QR code.
    pub verification_url: String,
}

impl RenderContext<'_> {
    /// The buyer, or a blank one for receipts issued without a buyer.
    pub fn buyer(&self) -> Buyer {
        self.request.invoice.buyer.clone().unwrap_or_default()
    }

    /// The client directory entry for the buyer.
    pub fn buyer_client(&self) -> &Client {
        let tin = self
            .request
            .invoice
            .buyer
            .as_ref()
            .map(|b| b.id_num.as_str())
            .unwrap_or_default();
        self.clients.lookup(tin)
    }
}
