//! Core fiscal invoice types, configuration and tax arithmetic.
//!
//! Nothing in here touches XML, images or files; it is the typed model the
//! rest of the crate reads from and the numbers it prints.

mod codes;
mod config;
mod context;
mod error;
pub mod format;
mod tax;
mod types;

pub use codes::*;
pub use config::*;
pub use context::*;
pub use error::*;
pub use tax::*;
pub use types::*;
