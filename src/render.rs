//! End-to-end pipeline: parse, compute, build the verification link, assemble
//! and write one PDF.
//!
//! Every call is independent. Nothing is cached between invocations, so
//! concurrent renders to different paths need no coordination.

use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::core::{
    ClientDirectory, FiskalError, IssuerConfig, RenderContext, reconcile,
};
use crate::layout::{
    ExemptionSummary, LayoutDocument, TemplateVariant, assemble_exemption_summary,
    assemble_invoice,
};
use crate::pdf::{PdfRenderer, write_document};
use crate::verify::{build_verification_url, encode_qr_png};
use crate::xml::{parse_request, parse_response};

/// Per-invoice settings that do not come from the XML.
#[derive(Debug, Clone, Default)]
pub struct RenderOptions {
    pub variant: TemplateVariant,
    /// Internal invoice number, printed next to the fiscal number.
    pub internal_number: String,
}

/// Parse both envelopes and resolve everything the assembler needs.
///
/// The verification link targets `issuer.environment`.
pub fn build_context<'a>(
    request_xml: &str,
    response_xml: &str,
    issuer: &'a IssuerConfig,
    clients: &'a ClientDirectory,
    options: &RenderOptions,
) -> Result<RenderContext<'a>, FiskalError> {
    let request = parse_request(request_xml)?;
    let response = parse_response(response_xml)?;
    let verification_url = build_verification_url(request_xml, issuer.environment)?;

    let check = reconcile(&request.invoice);
    if !check.agrees() {
        tracing::warn!(
            iic = %request.invoice.iic,
            computed = %check.computed_total,
            declared = %check.declared_total,
            "recomputed total differs from TotPrice"
        );
    }

    Ok(RenderContext {
        request,
        response,
        issuer,
        clients,
        internal_number: options.internal_number.clone(),
        verification_url,
    })
}

/// Encode the QR code for `ctx` and assemble the invoice layout.
pub fn invoice_layout(ctx: &RenderContext<'_>, variant: TemplateVariant) -> Result<LayoutDocument, FiskalError> {
    let png = encode_qr_png(&ctx.verification_url)?;
    Ok(assemble_invoice(ctx, variant, STANDARD.encode(png)))
}

/// Render one fiscal invoice from its request and response XML to `output`.
pub fn render_invoice(
    request_xml: &str,
    response_xml: &str,
    issuer: &IssuerConfig,
    clients: &ClientDirectory,
    options: &RenderOptions,
    output: &Path,
) -> Result<(), FiskalError> {
    let ctx = build_context(request_xml, response_xml, issuer, clients, options)?;
    let document = invoice_layout(&ctx, options.variant)?;
    let renderer = PdfRenderer::from_config(&issuer.fonts)?.with_title(format!("Račun {}", ctx.request.invoice.number));
    write_document(&renderer, &document, output)
}

/// Like [`render_invoice`], reading both envelopes from disk.
pub fn render_invoice_files(
    request_path: &Path,
    response_path: &Path,
    issuer: &IssuerConfig,
    clients: &ClientDirectory,
    options: &RenderOptions,
    output: &Path,
) -> Result<(), FiskalError> {
    let read = |path: &Path| {
        std::fs::read_to_string(path).map_err(|source| FiskalError::Io {
            path: path.display().to_string(),
            source,
        })
    };
    let request_xml = read(request_path)?;
    let response_xml = read(response_path)?;
    render_invoice(&request_xml, &response_xml, issuer, clients, options, output)
}

/// Render a periodic exemption summary to `output`.
pub fn render_exemption_summary(
    issuer: &IssuerConfig,
    summary: &ExemptionSummary,
    output: &Path,
) -> Result<(), FiskalError> {
    let document = assemble_exemption_summary(issuer, summary);
    let renderer = PdfRenderer::from_config(&issuer.fonts)?.with_title("Izvještaj");
    write_document(&renderer, &document, output)
}
