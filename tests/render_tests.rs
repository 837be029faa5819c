#![cfg(all(feature = "xml", feature = "qr", feature = "pdf"))]

mod common;

use std::path::PathBuf;

use chrono::NaiveDate;
use common::{clients, issuer};
use fiskal::core::*;
use fiskal::layout::{ExemptionSummary, TemplateVariant};
use fiskal::render::*;

const REQUEST: &str = include_str!("fixtures/request.xml");
const RESPONSE: &str = include_str!("fixtures/response.xml");
const CASH_REQUEST: &str = include_str!("fixtures/cash_request.xml");

fn out_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("fiskal-{}-{name}.pdf", std::process::id()))
}

fn load(path: &PathBuf) -> lopdf::Document {
    let doc = lopdf::Document::load(path).unwrap();
    std::fs::remove_file(path).unwrap();
    doc
}

#[test]
fn renders_detailed_invoice() {
    let path = out_path("detailed");
    let options = RenderOptions {
        internal_number: "17/2024".into(),
        ..Default::default()
    };
    render_invoice(REQUEST, RESPONSE, &issuer(), &clients(), &options, &path).unwrap();
    let doc = load(&path);
    assert_eq!(doc.get_pages().len(), 1);
}

#[test]
fn renders_simplified_cash_receipt() {
    let path = out_path("simplified");
    let options = RenderOptions {
        variant: TemplateVariant::Simplified,
        internal_number: "7".into(),
    };
    render_invoice(CASH_REQUEST, RESPONSE, &issuer(), &clients(), &options, &path).unwrap();
    assert!(!load(&path).get_pages().is_empty());
}

#[test]
fn renders_from_files() {
    let fixtures = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures");
    let path = out_path("files");
    render_invoice_files(
        &fixtures.join("request.xml"),
        &fixtures.join("response.xml"),
        &issuer(),
        &ClientDirectory::default(),
        &RenderOptions::default(),
        &path,
    )
    .unwrap();
    load(&path);
}

#[test]
fn missing_input_file() {
    let err = render_invoice_files(
        &PathBuf::from("/nonexistent/request.xml"),
        &PathBuf::from("/nonexistent/response.xml"),
        &issuer(),
        &clients(),
        &RenderOptions::default(),
        &out_path("never"),
    )
    .unwrap_err();
    match err {
        FiskalError::Io { path, source } => {
            assert_eq!(path, "/nonexistent/request.xml");
            assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
        }
        other => panic!("expected Io, got {other:?}"),
    }
}

#[test]
fn context_carries_link_for_issuer_environment() {
    let mut issuer = issuer();
    issuer.environment = Environment::Production;
    let clients = clients();
    let ctx = build_context(REQUEST, RESPONSE, &issuer, &clients, &RenderOptions::default()).unwrap();
    assert!(ctx.verification_url.starts_with("https://mapr.tax.gov.me/ic/#/verify?iic="));
    assert_eq!(ctx.issuer.environment, Environment::Production);
    assert_eq!(ctx.response.fic, "b1c2d3e4-f5a6-4b7c-8d9e-0f1a2b3c4d5e");
    assert_eq!(ctx.buyer_client().vat, "30/31-99999-1");

    let layout = invoice_layout(&ctx, TemplateVariant::Detailed).unwrap();
    assert!(!layout.image().unwrap().base64.is_empty());
}

#[test]
fn bad_request_writes_nothing() {
    let path = out_path("bad");
    let err = render_invoice(
        "<not-xml",
        RESPONSE,
        &issuer(),
        &clients(),
        &RenderOptions::default(),
        &path,
    )
    .unwrap_err();
    assert!(matches!(err, FiskalError::Malformed(_)));
    assert!(!path.exists());
}

#[test]
fn oversized_quantity_is_an_error() {
    let request = CASH_REQUEST.replace(r#"Q="3""#, r#"Q="79228162514264337593543950335""#);
    let path = out_path("oversized");
    let err = render_invoice(&request, RESPONSE, &issuer(), &clients(), &RenderOptions::default(), &path)
        .unwrap_err();
    assert!(matches!(err, FiskalError::InvalidValue { .. }), "{err:?}");
    assert!(!path.exists());
}

#[test]
fn unwritable_output_is_render_error() {
    let err = render_invoice(
        REQUEST,
        RESPONSE,
        &issuer(),
        &clients(),
        &RenderOptions::default(),
        &PathBuf::from("/nonexistent-dir/out.pdf"),
    )
    .unwrap_err();
    assert!(matches!(err, FiskalError::Render(_)));
}

#[test]
fn renders_exemption_summary() {
    let request = fiskal::xml::parse_request(REQUEST).unwrap();
    let summary = ExemptionSummary::from_requests(
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 3, 31).unwrap(),
        [&request],
    );
    assert_eq!(summary.invoice_count, 1);

    let path = out_path("summary");
    render_exemption_summary(&issuer(), &summary, &path).unwrap();
    assert_eq!(load(&path).get_pages().len(), 1);
}

#[test]
fn extended_latin_names_reach_the_pdf() {
    let request = REQUEST
        .replace("Primjer DOO", "Čelebić DOO")
        .replace("Kupac DOO", "Đurđević i sinovi");
    let issuer = issuer();
    let clients = clients();
    let ctx = build_context(&request, RESPONSE, &issuer, &clients, &RenderOptions::default()).unwrap();
    let layout = invoice_layout(&ctx, TemplateVariant::Detailed).unwrap();
    let texts = layout.texts();
    assert!(texts.contains(&"Čelebić DOO"));
    assert!(texts.contains(&"Đurđević i sinovi"));

    let path = out_path("latin");
    render_invoice(&request, RESPONSE, &issuer, &clients, &RenderOptions::default(), &path).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.windows(9).any(|w| w == b"FontFile2"));
    assert_eq!(load(&path).get_pages().len(), 1);
}

#[test]
fn missing_fonts_fail_before_writing() {
    let mut issuer = issuer();
    issuer.fonts = FontConfig {
        dir: PathBuf::from("/nonexistent/fonts"),
        family: "DejaVuSans".into(),
    };
    let path = out_path("nofonts");
    let err = render_invoice(REQUEST, RESPONSE, &issuer, &clients(), &RenderOptions::default(), &path)
        .unwrap_err();
    assert!(matches!(err, FiskalError::Render(_)));
    assert!(!path.exists());
}
