//! Reading the authority-exchanged XML documents.
//!
//! Two layers:
//!
//! - **Field extraction** (`attribute_value`, `element_text`) reads raw
//!   attribute text by path, exactly as written in the document.
//! - **Decoding** (`parse_request`, `parse_response`) turns the request and
//!   response into the typed model in [`crate::core`].
//!
//! # Example
//!
//! ```no_run
//! use fiskal::xml;
//!
//! let request_xml = std::fs::read_to_string("request.xml").unwrap();
//! let request = xml::parse_request(&request_xml).unwrap();
//! println!("{} lines", request.invoice.lines().len());
//! ```

mod extract;
mod parse;

pub use extract::{attribute_value, element_text, find_element, parse_document};
pub use parse::{REQUEST_PATH, parse_request, parse_response};
