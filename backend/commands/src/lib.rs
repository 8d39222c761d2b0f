//! Cryptic command language: parsing, help and the booking command processor.

pub mod dispatch;
mod handlers;
pub mod locator;
pub mod parser;
pub mod registry;
pub mod render;
pub mod seatmap;
pub mod types;

#[cfg(test)]
mod tests;

pub use dispatch::{CommandProcessor, PricingOptions};
pub use parser::parse;
pub use registry::HelpRegistry;
pub use types::{CommandError, CommandResult, HelpEntry, SYSTEM_ERROR};
