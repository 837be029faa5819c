//! # fiskal
//!
//! Printable fiscal invoices for Montenegrin e-fiscalization: reads the signed
//! `RegisterInvoiceRequest` and the authority's `RegisterInvoiceResponse`,
//! recomputes the VAT and rebate breakdown, builds the verification link
//! carried by the receipt's QR code, and lays everything out as a PDF.
//!
//! All monetary values use [`rust_decimal::Decimal`]; rounding happens only
//! when a figure is formatted for display.
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::path::Path;
//! use fiskal::core::{ClientDirectory, IssuerConfig};
//! use fiskal::render::{RenderOptions, render_invoice};
//!
//! let request = std::fs::read_to_string("request.xml").unwrap();
//! let response = std::fs::read_to_string("response.xml").unwrap();
//! let issuer = IssuerConfig::from_json(r#"{"name": "Primjer DOO", "environment": "TEST"}"#).unwrap();
//!
//! render_invoice(
//!     &request,
//!     &response,
//!     &issuer,
//!     &ClientDirectory::default(),
//!     &RenderOptions { internal_number: "17/2024".into(), ..Default::default() },
//!     Path::new("racun.pdf"),
//! )
//! .unwrap();
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `xml` (default) | Field extraction and request/response decoding |
//! | `qr` (default) | QR code PNG encoding of the verification link |
//! | `pdf` (default) | PDF renderer for layout trees (genpdf, embedded TrueType fonts) |
//! | `all` | Everything |
//!
//! The tax engine, verification link and layout assembly are always built.

pub mod core;

#[cfg(feature = "xml")]
pub mod xml;

pub mod verify;

pub mod layout;

#[cfg(feature = "pdf")]
pub mod pdf;

#[cfg(all(feature = "xml", feature = "qr", feature = "pdf"))]
pub mod render;

// Re-export core types at crate root for convenience
pub use crate::core::*;
