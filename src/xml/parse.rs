use quick_xml::DeError;

use super::extract::{find_element, parse_document};
use crate::core::{FiskalError, InvoiceRequest, InvoiceResponse, ResponseEnvelope};

/// Path of the request subtree inside a signed envelope.
pub const REQUEST_PATH: &str = "//RegisterInvoiceRequest";

/// Extract and decode the `RegisterInvoiceRequest` from a signed envelope.
///
/// Siblings of the request (SOAP header, the XML signature) are ignored.
/// The decoded request is checked against the model invariants.
pub fn parse_request(xml: &str) -> Result<InvoiceRequest, FiskalError> {
    let doc = parse_document(xml)?;
    let node = find_element(&doc, REQUEST_PATH).ok_or_else(|| {
        FiskalError::SchemaMismatch("not valid xml: no RegisterInvoiceRequest".into())
    })?;

    let request: InvoiceRequest = quick_xml::de::from_str(&xml[node.range()]).map_err(de_error)?;
    request.check()?;

    tracing::debug!(
        iic = %request.invoice.iic,
        lines = request.invoice.lines().len(),
        "parsed invoice request"
    );
    Ok(request)
}

/// Decode the authority's response envelope.
pub fn parse_response(xml: &str) -> Result<InvoiceResponse, FiskalError> {
    let envelope: ResponseEnvelope = quick_xml::de::from_str(xml).map_err(de_error)?;
    let response = envelope.body.response;
    tracing::debug!(fic = %response.fic, "parsed invoice response");
    Ok(response)
}

fn de_error(e: DeError) -> FiskalError {
    match e {
        DeError::InvalidXml(e) => FiskalError::Malformed(e.to_string()),
        other => FiskalError::SchemaMismatch(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_without_invoice() {
        let err = parse_request("<RegisterInvoiceRequest><Header/></RegisterInvoiceRequest>").unwrap_err();
        assert!(matches!(err, FiskalError::SchemaMismatch(_)), "{err:?}");
    }

    #[test]
    fn unknown_payment_type() {
        let xml = r#"<RegisterInvoiceRequest><Invoice InvNum="1" InvOrdNum="1"
            IssueDateTime="2024-01-01T00:00:00" TypeOfInv="BARTER" IIC="X"
            TotPrice="0" TotPriceWoVAT="0" TotVATAmt="0">
            <Seller Name="S" IDNum="1"/><Items/></Invoice></RegisterInvoiceRequest>"#;
        assert!(matches!(parse_request(xml), Err(FiskalError::SchemaMismatch(_))));
    }
}
