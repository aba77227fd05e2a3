//! Block rendering
//!
//! The composer walks a layout descriptor and renders each block onto a
//! paged canvas with a top-origin cursor. Pagination happens per row:
//! any row that would run into the footer zone opens a fresh page, and
//! table breaks repeat the column header.

use crate::config::BrandingConfig;
use crate::layout::{BlockKind, Column, ColumnKind, LayoutVariant};
use crate::money::format_amount;
use crate::order::{DeliveryDetails, LineItem, OrderRecord};
use crate::{ComposeError, Result};
use chrono::Local;
use pdf_core::{Align, BuiltinFont, Color, FontData, PdfDocument, MM, PAGE_HEIGHT, PAGE_WIDTH};
use std::path::Path;

const MARGIN: f64 = 10.0 * MM;
const USABLE_WIDTH: f64 = PAGE_WIDTH - 2.0 * MARGIN;

const ROW_H: f64 = 10.0 * MM;
const KV_ROW_H: f64 = 5.0 * MM;
const META_ROW_H: f64 = 4.0 * MM;
const BLOCK_GAP: f64 = 10.0 * MM;

/// Fraction of a row height from its top edge to the text baseline
const BASELINE: f64 = 0.72;

const FOOTER_LEGAL_Y: f64 = PAGE_HEIGHT - 40.0 * MM;
const FOOTER_LEGAL_LINE_H: f64 = 3.0 * MM;
const FOOTER_META_Y: f64 = PAGE_HEIGHT - 15.0 * MM;
/// Rows must finish above this line or move to a new page
const CONTENT_LIMIT: f64 = PAGE_HEIGHT - 45.0 * MM;

const RULE_COLOR: Color = Color {
    r: 64.0 / 255.0,
    g: 64.0 / 255.0,
    b: 64.0 / 255.0,
};
const HEADER_RULE_WIDTH: f64 = 0.5;
const ROW_RULE_WIDTH: f64 = 0.25;

const FONT_REGULAR: &str = "regular";
const FONT_MEDIUM: &str = "medium";
const FONT_BOLD: &str = "bold";

/// Parsed fonts for the three font roles
///
/// TTF assets are read and parsed once at startup; composing a document
/// clones the parsed data instead of re-parsing per request. A role
/// without data falls back to a built-in base font, so the composer
/// works with no font assets on disk.
#[derive(Debug, Clone, Default)]
pub struct FontSet {
    regular: Option<FontData>,
    medium: Option<FontData>,
    bold: Option<FontData>,
}

impl FontSet {
    /// Use built-in base fonts for every role
    pub fn builtin() -> Self {
        Self::default()
    }

    /// Load `regular.ttf`, `medium.ttf` and `bold.ttf` from a directory
    ///
    /// All three files must be present and parse as TrueType.
    pub fn from_dir<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        let load = |role: &str| -> Result<Option<FontData>> {
            let path = dir.join(format!("{role}.ttf"));
            let data = std::fs::read(&path).map_err(|e| {
                ComposeError::FontAssets(format!("cannot read {}: {e}", path.display()))
            })?;
            let font = FontData::from_ttf(role, &data).map_err(|e| {
                ComposeError::FontAssets(format!("cannot parse {}: {e}", path.display()))
            })?;
            Ok(Some(font))
        };
        Ok(Self {
            regular: load(FONT_REGULAR)?,
            medium: load(FONT_MEDIUM)?,
            bold: load(FONT_BOLD)?,
        })
    }
}

/// Renders validated orders into PDF documents
///
/// A `Composer` is immutable once built and can be shared across
/// requests.
#[derive(Debug, Clone, Default)]
pub struct Composer {
    branding: BrandingConfig,
    layout: LayoutVariant,
    fonts: FontSet,
}

/// Rendering position: current page and distance from the top edge
struct Cursor {
    page: usize,
    y: f64,
}

impl Cursor {
    /// Start a new page if `row_height` would cross into the footer zone
    fn ensure_room(&mut self, doc: &mut PdfDocument, row_height: f64) -> bool {
        if self.y + row_height > CONTENT_LIMIT {
            self.page = doc.add_page();
            self.y = MARGIN;
            true
        } else {
            false
        }
    }
}

impl Composer {
    pub fn new(branding: BrandingConfig, layout: LayoutVariant, fonts: FontSet) -> Self {
        Self {
            branding,
            layout,
            fonts,
        }
    }

    pub fn layout(&self) -> LayoutVariant {
        self.layout
    }

    /// Render an order into a finished PDF
    pub fn compose(&self, order: &OrderRecord) -> Result<Vec<u8>> {
        // Any malformed monetary value fails the request before a single
        // operator is emitted.
        let total = order.total_amount()?;

        let mut doc = PdfDocument::new();
        self.register_fonts(&mut doc)?;

        let mut cursor = Cursor {
            page: 1,
            y: MARGIN,
        };

        for block in self.layout.blocks() {
            match block {
                BlockKind::Header => self.render_header(&mut doc, &mut cursor)?,
                BlockKind::CustomerInfo => self.render_customer_info(&mut doc, &mut cursor, order)?,
                BlockKind::DeliveryInfo => {
                    if let Some(delivery) = &order.delivery {
                        self.render_delivery_info(&mut doc, &mut cursor, delivery)?;
                    }
                }
                BlockKind::ItemTable => self.render_item_table(&mut doc, &mut cursor, order, total)?,
                BlockKind::ClosingNotes => self.render_closing_notes(&mut doc, &mut cursor)?,
            }
        }

        self.render_footers(&mut doc)?;

        Ok(doc.to_bytes()?)
    }

    fn register_fonts(&self, doc: &mut PdfDocument) -> Result<()> {
        let roles: [(&str, &Option<FontData>, BuiltinFont); 3] = [
            (FONT_REGULAR, &self.fonts.regular, BuiltinFont::Helvetica),
            (FONT_MEDIUM, &self.fonts.medium, BuiltinFont::HelveticaBold),
            (FONT_BOLD, &self.fonts.bold, BuiltinFont::HelveticaBold),
        ];
        for (name, font, fallback) in roles {
            match font {
                Some(data) => doc.add_font_data(name, data.clone())?,
                None => doc.add_builtin_font(name, fallback)?,
            }
        }
        Ok(())
    }

    /// Brand name and document title, then generation date and
    /// organization right-aligned beneath
    fn render_header(&self, doc: &mut PdfDocument, cursor: &mut Cursor) -> Result<()> {
        doc.set_font(FONT_MEDIUM, 18.0)?;
        let baseline = cursor.y + ROW_H * BASELINE;
        doc.insert_text(&self.branding.brand_name, cursor.page, MARGIN, baseline, Align::Left)?;
        doc.insert_text(
            &self.branding.document_title,
            cursor.page,
            PAGE_WIDTH - MARGIN,
            baseline,
            Align::Right,
        )?;
        cursor.y += ROW_H;

        doc.set_font(FONT_REGULAR, 8.0)?;
        let generated = format!("Generated On: {}", Local::now().format("%Y-%m-%d"));
        doc.insert_text(
            &generated,
            cursor.page,
            PAGE_WIDTH - MARGIN,
            cursor.y + META_ROW_H * BASELINE,
            Align::Right,
        )?;
        cursor.y += META_ROW_H;
        doc.insert_text(
            &self.branding.organization,
            cursor.page,
            PAGE_WIDTH - MARGIN,
            cursor.y + META_ROW_H * BASELINE,
            Align::Right,
        )?;
        cursor.y += META_ROW_H + BLOCK_GAP;
        Ok(())
    }

    /// Customer name and address, plus the right-hand order panel
    fn render_customer_info(
        &self,
        doc: &mut PdfDocument,
        cursor: &mut Cursor,
        order: &OrderRecord,
    ) -> Result<()> {
        doc.set_font(FONT_MEDIUM, 11.0)?;
        doc.insert_text(
            &order.full_name,
            cursor.page,
            MARGIN,
            cursor.y + ROW_H * BASELINE,
            Align::Left,
        )?;
        cursor.y += ROW_H;

        doc.set_font(FONT_MEDIUM, 9.0)?;
        for line in wrap_to_width(doc, &order.address, USABLE_WIDTH)? {
            doc.insert_text(
                &line,
                cursor.page,
                MARGIN,
                cursor.y + KV_ROW_H * BASELINE,
                Align::Left,
            )?;
            cursor.y += KV_ROW_H;
        }

        let column_width = USABLE_WIDTH / 6.0;
        let panel_x = PAGE_WIDTH - MARGIN - 2.0 * column_width;
        let mut rows: Vec<(&str, &str)> = vec![
            ("Order Number:", order.order_id.as_str()),
            ("Date Of Order:", order.date_of_order.as_str()),
            ("Payment Terms:", order.payment_terms.as_str()),
        ];
        if self.layout.shows_currency() {
            rows.push(("Currency:", order.currency.as_str()));
        }

        for (label, value) in rows {
            let baseline = cursor.y + KV_ROW_H * BASELINE;
            doc.set_font(FONT_MEDIUM, 9.0)?;
            doc.insert_text(label, cursor.page, panel_x, baseline, Align::Left)?;
            doc.set_font(FONT_REGULAR, 9.0)?;
            doc.insert_text(value, cursor.page, panel_x + column_width, baseline, Align::Left)?;
            cursor.y += KV_ROW_H;
        }

        cursor.y += BLOCK_GAP;
        Ok(())
    }

    /// Delivery key/value rows; absent optional fields render no row
    fn render_delivery_info(
        &self,
        doc: &mut PdfDocument,
        cursor: &mut Cursor,
        delivery: &DeliveryDetails,
    ) -> Result<()> {
        cursor.ensure_room(doc, ROW_H + 3.0 * KV_ROW_H);

        doc.set_font(FONT_MEDIUM, 12.0)?;
        doc.insert_text(
            "Delivery Information",
            cursor.page,
            MARGIN,
            cursor.y + ROW_H * BASELINE,
            Align::Left,
        )?;
        cursor.y += ROW_H;

        let label_width = USABLE_WIDTH / 4.0;
        let mut rows: Vec<(&str, &str)> = vec![
            ("Delivery Method:", delivery.method.as_str()),
            ("Estimated Delivery:", delivery.estimated_date.as_str()),
            ("Shipping Address:", delivery.shipping_address.as_str()),
        ];
        if let Some(tracking) = &delivery.tracking_number {
            rows.push(("Tracking Number:", tracking));
        }
        if let Some(instructions) = &delivery.special_instructions {
            rows.push(("Special Instructions:", instructions));
        }

        for (label, value) in rows {
            doc.set_font(FONT_REGULAR, 9.0)?;
            let value_lines = wrap_to_width(doc, value, USABLE_WIDTH - label_width)?;

            cursor.ensure_room(doc, KV_ROW_H * value_lines.len().max(1) as f64);
            let baseline = cursor.y + KV_ROW_H * BASELINE;
            doc.set_font(FONT_MEDIUM, 9.0)?;
            doc.insert_text(label, cursor.page, MARGIN, baseline, Align::Left)?;

            doc.set_font(FONT_REGULAR, 9.0)?;
            if value_lines.is_empty() {
                cursor.y += KV_ROW_H;
            }
            for line in value_lines {
                doc.insert_text(
                    &line,
                    cursor.page,
                    MARGIN + label_width,
                    cursor.y + KV_ROW_H * BASELINE,
                    Align::Left,
                )?;
                cursor.y += KV_ROW_H;
            }
        }

        cursor.y += BLOCK_GAP;
        Ok(())
    }

    /// Items table with per-row pagination and a repeated header on
    /// page breaks
    fn render_item_table(
        &self,
        doc: &mut PdfDocument,
        cursor: &mut Cursor,
        order: &OrderRecord,
        total: f64,
    ) -> Result<()> {
        let columns = self.layout.columns();

        cursor.ensure_room(doc, 3.0 * ROW_H);

        doc.set_font(FONT_MEDIUM, 12.0)?;
        doc.insert_text(
            "Items Ordered",
            cursor.page,
            MARGIN,
            cursor.y + ROW_H * BASELINE,
            Align::Left,
        )?;
        cursor.y += ROW_H;

        self.render_table_header(doc, cursor, columns)?;

        doc.set_font(FONT_REGULAR, 8.0)?;
        for item in &order.items {
            if cursor.ensure_room(doc, ROW_H) {
                self.render_table_header(doc, cursor, columns)?;
                doc.set_font(FONT_REGULAR, 8.0)?;
            }

            let baseline = cursor.y + ROW_H * BASELINE;
            let mut x = MARGIN;
            for column in columns {
                let width = column.width * USABLE_WIDTH;
                let value = cell_value(item, column.kind);
                doc.insert_text(&value, cursor.page, anchor_x(x, width, column.align), baseline, column.align)?;
                x += width;
            }
            cursor.y += ROW_H;
            doc.draw_line(
                cursor.page,
                MARGIN,
                cursor.y,
                MARGIN + USABLE_WIDTH,
                cursor.y,
                ROW_RULE_WIDTH,
                RULE_COLOR,
            )?;
        }

        // Totals row
        if cursor.ensure_room(doc, ROW_H) {
            self.render_table_header(doc, cursor, columns)?;
        }
        doc.set_font(FONT_REGULAR, 8.0)?;
        let baseline = cursor.y + ROW_H * BASELINE;
        doc.insert_text("Total Amount", cursor.page, MARGIN, baseline, Align::Left)?;
        doc.insert_text(
            &format_amount(total, &order.currency_symbol),
            cursor.page,
            MARGIN + USABLE_WIDTH,
            baseline,
            Align::Right,
        )?;
        cursor.y += ROW_H;
        doc.draw_line(
            cursor.page,
            MARGIN,
            cursor.y,
            MARGIN + USABLE_WIDTH,
            cursor.y,
            ROW_RULE_WIDTH,
            RULE_COLOR,
        )?;

        cursor.y += KV_ROW_H;
        Ok(())
    }

    fn render_table_header(
        &self,
        doc: &mut PdfDocument,
        cursor: &mut Cursor,
        columns: &[Column],
    ) -> Result<()> {
        doc.set_font(FONT_MEDIUM, 10.0)?;
        let baseline = cursor.y + ROW_H * BASELINE;
        let mut x = MARGIN;
        for column in columns {
            let width = column.width * USABLE_WIDTH;
            doc.insert_text(
                column.label,
                cursor.page,
                anchor_x(x, width, column.align),
                baseline,
                column.align,
            )?;
            x += width;
        }
        cursor.y += ROW_H;
        doc.draw_line(
            cursor.page,
            MARGIN,
            cursor.y,
            MARGIN + USABLE_WIDTH,
            cursor.y,
            HEADER_RULE_WIDTH,
            RULE_COLOR,
        )?;
        Ok(())
    }

    fn render_closing_notes(&self, doc: &mut PdfDocument, cursor: &mut Cursor) -> Result<()> {
        doc.set_font(FONT_REGULAR, 9.0)?;
        let lines = wrap_to_width(doc, &self.branding.closing_notes, USABLE_WIDTH)?;
        for line in lines {
            cursor.ensure_room(doc, KV_ROW_H);
            doc.insert_text(
                &line,
                cursor.page,
                MARGIN,
                cursor.y + KV_ROW_H * BASELINE,
                Align::Left,
            )?;
            cursor.y += KV_ROW_H;
        }
        Ok(())
    }

    /// Legal boilerplate, copyright line and page number on every page
    fn render_footers(&self, doc: &mut PdfDocument) -> Result<()> {
        doc.set_font(FONT_REGULAR, 6.0)?;
        let legal_lines = wrap_to_width(doc, &self.branding.legal_text, USABLE_WIDTH)?;

        let year = Local::now().format("%Y");
        let copyright = format!("{year} {}. All rights reserved.", self.branding.organization_short);

        for page in 1..=doc.page_count() {
            doc.set_font(FONT_REGULAR, 6.0)?;
            let mut y = FOOTER_LEGAL_Y;
            for line in &legal_lines {
                doc.insert_text(line, page, MARGIN, y, Align::Left)?;
                y += FOOTER_LEGAL_LINE_H;
            }

            doc.set_font(FONT_MEDIUM, 8.0)?;
            doc.insert_text(&copyright, page, MARGIN, FOOTER_META_Y, Align::Left)?;
            doc.insert_text(
                &format!("Page {page}"),
                page,
                PAGE_WIDTH - MARGIN,
                FOOTER_META_Y,
                Align::Right,
            )?;
        }
        Ok(())
    }
}

/// Horizontal anchor for a cell: its left edge, center or right edge
fn anchor_x(cell_x: f64, cell_width: f64, align: Align) -> f64 {
    match align {
        Align::Left => cell_x,
        Align::Center => cell_x + cell_width / 2.0,
        Align::Right => cell_x + cell_width,
    }
}

fn cell_value(item: &LineItem, kind: ColumnKind) -> String {
    match kind {
        ColumnKind::Name => item.name.clone(),
        ColumnKind::Description => item.description(),
        ColumnKind::Quantity => item.quantity.to_string(),
        ColumnKind::UnitPrice => item.unit_price.clone(),
        ColumnKind::Tax => item.tax.clone(),
        ColumnKind::Total => item.total.clone(),
    }
}

/// Greedy word wrap using measured widths in the current font
///
/// Explicit newlines force breaks; a single word wider than the limit
/// gets a line of its own.
fn wrap_to_width(doc: &PdfDocument, text: &str, max_width: f64) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for paragraph in text.split('\n') {
        let paragraph = paragraph.trim_end();
        if paragraph.is_empty() {
            continue;
        }
        let mut current = String::new();
        for word in paragraph.split_whitespace() {
            let candidate = if current.is_empty() {
                word.to_string()
            } else {
                format!("{current} {word}")
            };
            if doc.text_width(&candidate)? <= max_width || current.is_empty() {
                current = candidate;
            } else {
                lines.push(current);
                current = word.to_string();
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measuring_doc() -> PdfDocument {
        let mut doc = PdfDocument::new();
        doc.add_builtin_font(FONT_REGULAR, BuiltinFont::Helvetica)
            .unwrap();
        doc.set_font(FONT_REGULAR, 9.0).unwrap();
        doc
    }

    #[test]
    fn test_wrap_respects_width() {
        let doc = measuring_doc();
        let text = "one two three four five six seven eight nine ten";
        let lines = wrap_to_width(&doc, text, 60.0).unwrap();
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(doc.text_width(line).unwrap() <= 60.0, "line too wide: {line}");
        }
    }

    #[test]
    fn test_wrap_keeps_oversized_word() {
        let doc = measuring_doc();
        let lines = wrap_to_width(&doc, "supercalifragilisticexpialidocious", 10.0).unwrap();
        assert_eq!(lines, vec!["supercalifragilisticexpialidocious".to_string()]);
    }

    #[test]
    fn test_wrap_honors_newlines() {
        let doc = measuring_doc();
        let lines = wrap_to_width(&doc, "first\nsecond", 500.0).unwrap();
        assert_eq!(lines, vec!["first".to_string(), "second".to_string()]);
    }

    #[test]
    fn test_anchor_positions() {
        assert_eq!(anchor_x(100.0, 50.0, Align::Left), 100.0);
        assert_eq!(anchor_x(100.0, 50.0, Align::Center), 125.0);
        assert_eq!(anchor_x(100.0, 50.0, Align::Right), 150.0);
    }

    #[test]
    fn test_from_dir_requires_all_roles() {
        let dir = std::env::temp_dir().join("ordersmith-fonts-missing");
        std::fs::create_dir_all(&dir).unwrap();
        let err = FontSet::from_dir(&dir).unwrap_err();
        assert!(matches!(err, ComposeError::FontAssets(_)));
    }

    #[test]
    fn test_from_dir_rejects_bad_ttf_at_startup() {
        // Font problems surface when the set is built, not per request
        let dir = std::env::temp_dir().join("ordersmith-fonts-bad");
        std::fs::create_dir_all(&dir).unwrap();
        for role in [FONT_REGULAR, FONT_MEDIUM, FONT_BOLD] {
            std::fs::write(dir.join(format!("{role}.ttf")), [0u8; 32]).unwrap();
        }
        let err = FontSet::from_dir(&dir).unwrap_err();
        assert!(matches!(err, ComposeError::FontAssets(_)));
    }

    #[test]
    fn test_compose_is_repeatable() {
        let composer = Composer::default();
        let order = OrderRecord::default();
        let first = composer.compose(&order).unwrap();
        let second = composer.compose(&order).unwrap();
        assert!(first.starts_with(b"%PDF"));
        assert!(second.starts_with(b"%PDF"));
    }

    #[test]
    fn test_compose_empty_order() {
        let composer = Composer::default();
        let bytes = composer.compose(&OrderRecord::default()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_content_limit_leaves_footer_room() {
        assert!(CONTENT_LIMIT < FOOTER_LEGAL_Y);
    }
}
