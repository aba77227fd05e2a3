//! Layout descriptors
//!
//! A layout variant is data, not code: an ordered list of blocks plus a
//! column set. The renderer walks the descriptor, so adding a variant
//! means adding a table entry rather than a new rendering path.

use pdf_core::Align;
use serde::Deserialize;
use std::str::FromStr;

/// Which blocks appear and which columns the items table uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutVariant {
    /// Header, customer info and the items table only
    Minimal,
    /// Minimal plus delivery info, currency row and closing notes
    #[default]
    Extended,
    /// Extended with the detailed column set
    Full,
}

/// Document blocks, rendered top to bottom
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Header,
    CustomerInfo,
    DeliveryInfo,
    ItemTable,
    ClosingNotes,
}

/// What a table column shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Name,
    Description,
    Quantity,
    UnitPrice,
    Tax,
    Total,
}

/// A column of the items table
#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub kind: ColumnKind,
    pub label: &'static str,
    /// Fraction of the usable page width
    pub width: f64,
    pub align: Align,
}

const MINIMAL_BLOCKS: &[BlockKind] = &[
    BlockKind::Header,
    BlockKind::CustomerInfo,
    BlockKind::ItemTable,
];

const EXTENDED_BLOCKS: &[BlockKind] = &[
    BlockKind::Header,
    BlockKind::CustomerInfo,
    BlockKind::DeliveryInfo,
    BlockKind::ItemTable,
    BlockKind::ClosingNotes,
];

const FULL_BLOCKS: &[BlockKind] = &[
    BlockKind::Header,
    BlockKind::CustomerInfo,
    BlockKind::ItemTable,
    BlockKind::DeliveryInfo,
];

const STANDARD_COLUMNS: &[Column] = &[
    Column {
        kind: ColumnKind::Name,
        label: "Product",
        width: 0.40,
        align: Align::Left,
    },
    Column {
        kind: ColumnKind::Quantity,
        label: "Quantity",
        width: 0.15,
        align: Align::Center,
    },
    Column {
        kind: ColumnKind::UnitPrice,
        label: "Price",
        width: 0.15,
        align: Align::Right,
    },
    Column {
        kind: ColumnKind::Tax,
        label: "Tax",
        width: 0.15,
        align: Align::Right,
    },
    Column {
        kind: ColumnKind::Total,
        label: "Total",
        width: 0.15,
        align: Align::Right,
    },
];

const DETAILED_COLUMNS: &[Column] = &[
    Column {
        kind: ColumnKind::Name,
        label: "Product",
        width: 0.27,
        align: Align::Left,
    },
    Column {
        kind: ColumnKind::Description,
        label: "Description",
        width: 0.25,
        align: Align::Left,
    },
    Column {
        kind: ColumnKind::Quantity,
        label: "Quantity",
        width: 0.12,
        align: Align::Center,
    },
    Column {
        kind: ColumnKind::UnitPrice,
        label: "Price",
        width: 0.12,
        align: Align::Right,
    },
    Column {
        kind: ColumnKind::Tax,
        label: "Tax",
        width: 0.12,
        align: Align::Right,
    },
    Column {
        kind: ColumnKind::Total,
        label: "Total",
        width: 0.12,
        align: Align::Right,
    },
];

impl LayoutVariant {
    /// Ordered blocks for this variant
    pub fn blocks(&self) -> &'static [BlockKind] {
        match self {
            LayoutVariant::Minimal => MINIMAL_BLOCKS,
            LayoutVariant::Extended => EXTENDED_BLOCKS,
            LayoutVariant::Full => FULL_BLOCKS,
        }
    }

    /// Column set for the items table
    pub fn columns(&self) -> &'static [Column] {
        match self {
            LayoutVariant::Minimal | LayoutVariant::Extended => STANDARD_COLUMNS,
            LayoutVariant::Full => DETAILED_COLUMNS,
        }
    }

    /// Whether the order panel includes a currency row
    pub fn shows_currency(&self) -> bool {
        !matches!(self, LayoutVariant::Minimal)
    }
}

impl FromStr for LayoutVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "minimal" => Ok(LayoutVariant::Minimal),
            "extended" => Ok(LayoutVariant::Extended),
            "full" => Ok(LayoutVariant::Full),
            other => Err(format!("unknown layout variant '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_widths_sum_to_one() {
        for variant in [
            LayoutVariant::Minimal,
            LayoutVariant::Extended,
            LayoutVariant::Full,
        ] {
            let sum: f64 = variant.columns().iter().map(|c| c.width).sum();
            assert!((sum - 1.0).abs() < 1e-9, "{variant:?}: widths sum to {sum}");
        }
    }

    #[test]
    fn test_minimal_has_no_delivery_block() {
        assert!(!LayoutVariant::Minimal
            .blocks()
            .contains(&BlockKind::DeliveryInfo));
        assert!(LayoutVariant::Extended
            .blocks()
            .contains(&BlockKind::DeliveryInfo));
    }

    #[test]
    fn test_full_uses_detailed_columns() {
        assert_eq!(LayoutVariant::Full.columns().len(), 6);
        assert_eq!(LayoutVariant::Extended.columns().len(), 5);
        assert_eq!(
            LayoutVariant::Full.columns()[1].kind,
            ColumnKind::Description
        );
    }

    #[test]
    fn test_from_str() {
        assert_eq!("full".parse::<LayoutVariant>().unwrap(), LayoutVariant::Full);
        assert_eq!(
            " Extended ".parse::<LayoutVariant>().unwrap(),
            LayoutVariant::Extended
        );
        assert!("fancy".parse::<LayoutVariant>().is_err());
    }

    #[test]
    fn test_default_is_extended() {
        assert_eq!(LayoutVariant::default(), LayoutVariant::Extended);
    }
}
