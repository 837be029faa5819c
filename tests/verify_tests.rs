#![cfg(all(feature = "xml", feature = "qr"))]

use fiskal::core::*;
use fiskal::verify::{
    PRODUCTION_VERIFY_URL, TEST_VERIFY_URL, VerificationFields, build_verification_url,
    build_verification_url_str, encode_qr_png,
};
use fiskal::xml;

const REQUEST: &str = include_str!("fixtures/request.xml");
const CASH_REQUEST: &str = include_str!("fixtures/cash_request.xml");

#[test]
fn test_environment_link() {
    let url = build_verification_url(REQUEST, Environment::Test).unwrap();
    insta::assert_snapshot!(url, @"https://efitest.tax.gov.me/ic/#/verify?iic=5A1F0C2B9D3E4F5061728394A5B6C7D8&tin=02345678&crtd=2024-03-15T10:20:30+01:00&ord=42&bu=xx123xx123&cr=yy456yy456&sw=ss123ss123&prc=260.00");
}

#[test]
fn production_link_uses_production_host() {
    let url = build_verification_url(REQUEST, Environment::Production).unwrap();
    assert!(url.starts_with(PRODUCTION_VERIFY_URL));
    assert!(!url.starts_with(TEST_VERIFY_URL));
}

#[test]
fn values_are_not_normalized() {
    // "10.50" stays as written, and the naive timestamp keeps its form
    let url = build_verification_url(CASH_REQUEST, Environment::Test).unwrap();
    assert!(url.ends_with("&prc=10.50"));
    assert!(url.contains("&crtd=2024-03-20T08:00:00&"));
}

#[test]
fn environment_given_as_text() {
    let a = build_verification_url_str(REQUEST, "PRODUCTION").unwrap();
    let b = build_verification_url(REQUEST, Environment::Production).unwrap();
    assert_eq!(a, b);

    for bad in ["prod", "test", "STAGING", ""] {
        assert!(matches!(
            build_verification_url_str(REQUEST, bad),
            Err(FiskalError::InvalidEnvironment(_))
        ));
    }
}

#[test]
fn missing_field_is_reported_by_name() {
    let xml = CASH_REQUEST.replace(r#" TCRCode="yy456yy456""#, "");
    match build_verification_url(&xml, Environment::Test) {
        Err(FiskalError::FieldNotFound { field }) => assert_eq!(field, "TCRCode"),
        other => panic!("expected FieldNotFound, got {other:?}"),
    }
}

#[test]
fn link_is_stable_across_calls() {
    let a = build_verification_url(REQUEST, Environment::Test).unwrap();
    let b = build_verification_url(REQUEST, Environment::Test).unwrap();
    assert_eq!(a, b);
}

#[test]
fn fields_follow_link_order() {
    let doc = xml::parse_document(REQUEST).unwrap();
    let fields = VerificationFields::from_document(&doc).unwrap();
    assert_eq!(
        fields.ordered(),
        [
            "5A1F0C2B9D3E4F5061728394A5B6C7D8",
            "02345678",
            "2024-03-15T10:20:30+01:00",
            "42",
            "xx123xx123",
            "yy456yy456",
            "ss123ss123",
            "260.00",
        ]
    );
}

#[test]
fn link_encodes_as_png_qr() {
    let url = build_verification_url(REQUEST, Environment::Test).unwrap();
    let png = encode_qr_png(&url).unwrap();
    assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    // identical payloads give identical images
    assert_eq!(png, encode_qr_png(&url).unwrap());
}
