//! Document Composer - order data to finished PDF
//!
//! This crate provides:
//! - The order data model, extracted and validated from request JSON
//! - Monetary string parsing (symbol-prefixed decimal text)
//! - A configurable layout descriptor (block order + column set)
//! - Block rendering onto a paged canvas with automatic pagination
//!
//! # Example
//!
//! ```ignore
//! use composer::{Composer, OrderRecord};
//!
//! let value: serde_json::Value = serde_json::from_slice(&body)?;
//! let order = OrderRecord::from_value(&value)?;
//! let pdf_bytes = Composer::default().compose(&order)?;
//! ```

mod compose;
mod config;
mod layout;
mod money;
mod order;

pub use compose::{Composer, FontSet};
pub use config::BrandingConfig;
pub use layout::{BlockKind, Column, ColumnKind, LayoutVariant};
pub use money::{format_amount, parse_amount, AmountError};
pub use order::{DeliveryDetails, LineItem, OrderRecord};

use thiserror::Error;

/// Errors that can occur while building an order document
#[derive(Debug, Error)]
pub enum ComposeError {
    #[error("invalid order data: {0}")]
    InvalidOrder(String),

    #[error("line item {index}: missing required field '{field}'")]
    MissingItemField { index: usize, field: &'static str },

    #[error("line item {index}: field '{field}' has value '{value}': {source}")]
    BadAmount {
        index: usize,
        field: &'static str,
        value: String,
        #[source]
        source: AmountError,
    },

    #[error("line item {index}: field '{field}' has value '{value}': {reason}")]
    BadItemField {
        index: usize,
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("font asset error: {0}")]
    FontAssets(String),

    #[error("PDF error: {0}")]
    Pdf(#[from] pdf_core::PdfError),
}

impl ComposeError {
    /// Whether this error is the caller's fault (bad order data) rather
    /// than an internal rendering failure.
    pub fn is_data_error(&self) -> bool {
        !matches!(self, ComposeError::Pdf(_) | ComposeError::FontAssets(_))
    }
}

/// Result type for composition operations
pub type Result<T> = std::result::Result<T, ComposeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_error_classification() {
        let missing = ComposeError::MissingItemField {
            index: 2,
            field: "total",
        };
        assert!(missing.is_data_error());
        assert_eq!(
            missing.to_string(),
            "line item 2: missing required field 'total'"
        );

        let pdf = ComposeError::Pdf(pdf_core::PdfError::FontNotFound("x".into()));
        assert!(!pdf.is_data_error());
    }
}
