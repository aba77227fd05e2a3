//! PDF Core - Low-level PDF page composition
//!
//! This crate provides functionality for:
//! - Building a paged PDF document from scratch
//! - Registering built-in Type1 base fonts or embedded TrueType fonts
//! - Inserting text at specific coordinates with alignment
//! - Drawing horizontal rules
//!
//! # Example
//!
//! ```ignore
//! use pdf_core::{Align, BuiltinFont, PdfDocument};
//!
//! let mut doc = PdfDocument::new()?;
//! doc.add_builtin_font("sans", BuiltinFont::Helvetica)?;
//! doc.set_font("sans", 12.0)?;
//! doc.insert_text("Hello, World!", 1, 100.0, 100.0, Align::Left)?;
//! let bytes = doc.to_bytes()?;
//! ```

mod document;
mod font;
mod text;

pub use document::{Color, PdfDocument};
pub use font::{BuiltinFont, FontData, PdfFont};
pub use text::{generate_line_operators, generate_text_operators, TextRenderContext};

use thiserror::Error;

/// Errors that can occur during PDF operations
#[derive(Debug, Error)]
pub enum PdfError {
    #[error("Failed to save PDF: {0}")]
    SaveError(String),

    #[error("Font not found: {0}")]
    FontNotFound(String),

    #[error("Font already exists: {0}")]
    FontAlreadyExists(String),

    #[error("Failed to parse font: {0}")]
    FontParseError(String),

    #[error("Invalid page number: {0} (document has {1} pages)")]
    InvalidPage(usize, usize),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Lopdf error: {0}")]
    LopdfError(#[from] lopdf::Error),
}

/// Result type for PDF operations
pub type Result<T> = std::result::Result<T, PdfError>;

/// Text alignment options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

/// A4 page width in points
pub const PAGE_WIDTH: f64 = 595.28;

/// A4 page height in points
pub const PAGE_HEIGHT: f64 = 841.89;

/// Points per millimetre
pub const MM: f64 = 72.0 / 25.4;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_default() {
        assert_eq!(Align::default(), Align::Left);
    }

    #[test]
    fn test_mm_conversion() {
        assert!((10.0 * MM - 28.346).abs() < 0.01);
    }
}
