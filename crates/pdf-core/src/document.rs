//! PDF document builder

use crate::font::{BuiltinFont, FontData, PdfFont};
use crate::text::{generate_line_operators, generate_text_operators, TextRenderContext};
use crate::{Align, PdfError, Result, PAGE_HEIGHT, PAGE_WIDTH};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use std::collections::HashMap;
use std::path::Path;

/// RGB Color (values 0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    /// Create a new RGB color (values 0.0 - 1.0)
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create color from RGB values (0-255)
    pub fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self {
            r: r as f32 / 255.0,
            g: g as f32 / 255.0,
            b: b as f32 / 255.0,
        }
    }

    /// Black color
    pub fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }

    /// White color
    pub fn white() -> Self {
        Self::rgb(1.0, 1.0, 1.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// PDF document builder providing high-level operations
///
/// Pages use a top-origin coordinate system: y grows downward from the top
/// edge, matching how layout code walks a page. Conversion to the PDF
/// bottom-origin convention happens internally.
pub struct PdfDocument {
    /// The underlying lopdf document
    inner: Document,
    /// Reserved object id for the page tree root
    pages_id: ObjectId,
    /// Page object ids in page order
    page_ids: Vec<ObjectId>,
    /// Registered fonts by name
    fonts: HashMap<String, PdfFont>,
    /// Current font name
    current_font: Option<String>,
    /// Current font size
    current_font_size: f32,
    /// Current text color
    current_text_color: Color,
    /// Font resource names (font name -> "F1")
    font_resources: HashMap<String, String>,
    /// Next font resource number
    next_font_resource: u32,
    /// Buffered content operators per page (page number -> operators)
    page_content: HashMap<usize, Vec<u8>>,
}

impl PdfDocument {
    /// Create a new document with a single blank A4 page
    pub fn new() -> Self {
        let mut inner = Document::with_version("1.5");
        let pages_id = inner.new_object_id();
        let catalog_id = inner.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        inner.trailer.set("Root", catalog_id);

        let mut doc = Self {
            inner,
            pages_id,
            page_ids: Vec::new(),
            fonts: HashMap::new(),
            current_font: None,
            current_font_size: 12.0,
            current_text_color: Color::default(),
            font_resources: HashMap::new(),
            next_font_resource: 1,
            page_content: HashMap::new(),
        };
        doc.add_page();
        doc
    }

    /// Append a blank A4 page, returning its 1-indexed page number
    pub fn add_page(&mut self) -> usize {
        let contents_id = self
            .inner
            .add_object(Object::Stream(Stream::new(Dictionary::new(), vec![])));

        let page_id = self.inner.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Real(0.0),
                Object::Real(0.0),
                Object::Real(PAGE_WIDTH as f32),
                Object::Real(PAGE_HEIGHT as f32),
            ],
            "Contents" => contents_id,
        });

        self.page_ids.push(page_id);
        self.page_ids.len()
    }

    /// Get the number of pages in the document
    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Register a built-in Type1 base font
    ///
    /// # Arguments
    /// * `name` - Font identifier (used in set_font)
    /// * `font` - The base font
    pub fn add_builtin_font(&mut self, name: &str, font: BuiltinFont) -> Result<()> {
        if self.fonts.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }
        self.fonts.insert(name.to_string(), PdfFont::Builtin(font));
        Ok(())
    }

    /// Register an already-parsed TrueType font for embedding
    ///
    /// Fonts are parsed once via [`FontData::from_ttf`] and cloned into
    /// each document that uses them.
    ///
    /// # Arguments
    /// * `name` - Font identifier (used in set_font)
    /// * `font_data` - Parsed font data
    pub fn add_font_data(&mut self, name: &str, font_data: FontData) -> Result<()> {
        if self.fonts.contains_key(name) {
            return Err(PdfError::FontAlreadyExists(name.to_string()));
        }
        self.fonts
            .insert(name.to_string(), PdfFont::Embedded(font_data));
        Ok(())
    }

    /// Set the current font and size
    pub fn set_font(&mut self, name: &str, size: f32) -> Result<()> {
        if !self.fonts.contains_key(name) {
            return Err(PdfError::FontNotFound(name.to_string()));
        }
        self.current_font = Some(name.to_string());
        self.current_font_size = size;
        Ok(())
    }

    /// Set the text color
    pub fn set_text_color(&mut self, color: Color) {
        self.current_text_color = color;
    }

    /// Width of `text` in points using the current font and size
    pub fn text_width(&self, text: &str) -> Result<f64> {
        let font = self.current_font_data()?;
        Ok(font.text_width_points(text, self.current_font_size) as f64)
    }

    /// Insert text at a specific position
    ///
    /// # Arguments
    /// * `text` - Text to insert
    /// * `page` - Page number (1-indexed)
    /// * `x` - X coordinate in points
    /// * `y` - Y coordinate in points (from top)
    /// * `align` - Text alignment relative to `x`
    pub fn insert_text(
        &mut self,
        text: &str,
        page: usize,
        x: f64,
        y: f64,
        align: Align,
    ) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }

        if text.is_empty() {
            return Ok(());
        }

        let font_name = self
            .current_font
            .clone()
            .ok_or_else(|| PdfError::FontNotFound("no font set".to_string()))?;
        let font_size = self.current_font_size;
        let color = self.current_text_color;

        let resource_name = self.get_or_create_font_ref(&font_name);

        let font = self
            .fonts
            .get_mut(&font_name)
            .ok_or_else(|| PdfError::FontNotFound(font_name.clone()))?;
        font.record_usage(text);

        let text_width = font.text_width_points(text, font_size) as f64;
        let encoded = font.encode(text);

        let ctx = TextRenderContext {
            font_name: resource_name,
            font_size,
            text_width,
            color,
        };

        let pdf_y = PAGE_HEIGHT - y;
        let operators = generate_text_operators(&encoded, x, pdf_y, align, &ctx);
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Draw a straight line between two points
    ///
    /// Coordinates are top-origin, like `insert_text`.
    pub fn draw_line(
        &mut self,
        page: usize,
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        line_width: f64,
        color: Color,
    ) -> Result<()> {
        let page_count = self.page_count();
        if page == 0 || page > page_count {
            return Err(PdfError::InvalidPage(page, page_count));
        }

        let operators = generate_line_operators(
            x1,
            PAGE_HEIGHT - y1,
            x2,
            PAGE_HEIGHT - y2,
            line_width,
            color,
        );
        self.buffer_content(page, &operators);

        Ok(())
    }

    /// Save the document to a file
    pub fn save<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        self.finalize()?;
        self.inner
            .save(path)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(())
    }

    /// Serialize the document to bytes
    pub fn to_bytes(&mut self) -> Result<Vec<u8>> {
        self.finalize()?;
        let mut buffer = Vec::new();
        self.inner
            .save_to(&mut buffer)
            .map_err(|e| PdfError::SaveError(e.to_string()))?;
        Ok(buffer)
    }

    /// Get a reference to the underlying lopdf document
    pub fn inner(&self) -> &Document {
        &self.inner
    }

    fn current_font_data(&self) -> Result<&PdfFont> {
        let name = self
            .current_font
            .as_ref()
            .ok_or_else(|| PdfError::FontNotFound("no font set".to_string()))?;
        self.fonts
            .get(name)
            .ok_or_else(|| PdfError::FontNotFound(name.clone()))
    }

    /// Get or create a font resource name (e.g., "F1")
    ///
    /// Resources are installed on the page tree root, so one name serves
    /// every page.
    fn get_or_create_font_ref(&mut self, font_name: &str) -> String {
        if let Some(resource_name) = self.font_resources.get(font_name) {
            return resource_name.clone();
        }
        let resource_name = format!("F{}", self.next_font_resource);
        self.next_font_resource += 1;
        self.font_resources
            .insert(font_name.to_string(), resource_name.clone());
        resource_name
    }

    /// Buffer content operators for a page (written at save time)
    fn buffer_content(&mut self, page: usize, content: &[u8]) {
        let buffer = self.page_content.entry(page).or_default();
        buffer.extend_from_slice(content);
        buffer.push(b'\n');
    }

    /// Write fonts, resources, the page tree and content streams
    fn finalize(&mut self) -> Result<()> {
        let font_dict = self.embed_fonts()?;

        // Resources live on the Pages node and are inherited by every page
        let count = self.page_ids.len() as i64;
        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        self.inner.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Count" => count,
                "Kids" => kids,
                "Resources" => dictionary! { "Font" => font_dict },
            }),
        );

        self.flush_content_buffers()?;
        Ok(())
    }

    /// Embed every referenced font and build the /Font resource dictionary
    fn embed_fonts(&mut self) -> Result<Dictionary> {
        // Sorted for deterministic object order
        let mut entries: Vec<(String, String)> = self
            .font_resources
            .iter()
            .map(|(name, res)| (name.clone(), res.clone()))
            .collect();
        entries.sort_by(|a, b| a.1.cmp(&b.1));

        let mut font_dict = Dictionary::new();
        for (font_name, resource_name) in entries {
            let font = self
                .fonts
                .get(&font_name)
                .ok_or_else(|| PdfError::FontNotFound(font_name.clone()))?;

            let font_id = match font {
                PdfFont::Builtin(builtin) => {
                    self.inner.add_object(builtin.to_pdf_dictionary())
                }
                PdfFont::Embedded(data) => {
                    let objects = data.to_pdf_objects()?;

                    let font_file_id = self.inner.add_object(objects.font_file_stream);

                    let mut font_descriptor = objects.font_descriptor;
                    font_descriptor.set("FontFile2", Object::Reference(font_file_id));
                    let font_descriptor_id = self.inner.add_object(font_descriptor);

                    let mut cid_font = objects.cid_font;
                    cid_font.set("FontDescriptor", Object::Reference(font_descriptor_id));
                    let cid_font_id = self.inner.add_object(cid_font);

                    let tounicode_id = self.inner.add_object(objects.tounicode_stream);

                    let mut type0_font = objects.type0_font;
                    type0_font.set(
                        "DescendantFonts",
                        Object::Array(vec![Object::Reference(cid_font_id)]),
                    );
                    type0_font.set("ToUnicode", Object::Reference(tounicode_id));
                    self.inner.add_object(type0_font)
                }
            };

            font_dict.set(resource_name.as_bytes(), Object::Reference(font_id));
        }

        Ok(font_dict)
    }

    /// Flush buffered operators into each page's content stream
    fn flush_content_buffers(&mut self) -> Result<()> {
        let buffers: Vec<(usize, Vec<u8>)> = self.page_content.drain().collect();

        for (page, content) in buffers {
            if content.is_empty() {
                continue;
            }
            let page_id = *self
                .page_ids
                .get(page - 1)
                .ok_or(PdfError::InvalidPage(page, self.page_ids.len()))?;

            let stream_id = self
                .inner
                .add_object(Stream::new(Dictionary::new(), content));

            let page_obj = self.inner.get_object(page_id)?;
            let mut page_dict = page_obj
                .as_dict()
                .map_err(|_| PdfError::SaveError("page object is not a dictionary".to_string()))?
                .clone();
            page_dict.set(b"Contents", Object::Reference(stream_id));
            self.inner.objects.insert(page_id, page_dict.into());
        }

        Ok(())
    }
}

impl Default for PdfDocument {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_document_has_one_page() {
        let doc = PdfDocument::new();
        assert_eq!(doc.page_count(), 1);
    }

    #[test]
    fn test_add_page() {
        let mut doc = PdfDocument::new();
        assert_eq!(doc.add_page(), 2);
        assert_eq!(doc.add_page(), 3);
        assert_eq!(doc.page_count(), 3);
    }

    #[test]
    fn test_insert_text_requires_font() {
        let mut doc = PdfDocument::new();
        let result = doc.insert_text("hello", 1, 10.0, 10.0, Align::Left);
        assert!(matches!(result, Err(PdfError::FontNotFound(_))));
    }

    #[test]
    fn test_insert_text_invalid_page() {
        let mut doc = PdfDocument::new();
        doc.add_builtin_font("sans", BuiltinFont::Helvetica).unwrap();
        doc.set_font("sans", 12.0).unwrap();
        let result = doc.insert_text("hello", 2, 10.0, 10.0, Align::Left);
        assert!(matches!(result, Err(PdfError::InvalidPage(2, 1))));
    }

    #[test]
    fn test_duplicate_font_rejected() {
        let mut doc = PdfDocument::new();
        doc.add_builtin_font("sans", BuiltinFont::Helvetica).unwrap();
        let result = doc.add_builtin_font("sans", BuiltinFont::HelveticaBold);
        assert!(matches!(result, Err(PdfError::FontAlreadyExists(_))));
    }

    #[test]
    fn test_text_width_uses_current_size() {
        let mut doc = PdfDocument::new();
        doc.add_builtin_font("sans", BuiltinFont::Helvetica).unwrap();
        doc.set_font("sans", 10.0).unwrap();
        let narrow = doc.text_width("iii").unwrap();
        let wide = doc.text_width("WWW").unwrap();
        assert!(wide > narrow);
    }

    #[test]
    fn test_to_bytes_roundtrip() {
        let mut doc = PdfDocument::new();
        doc.add_builtin_font("sans", BuiltinFont::Helvetica).unwrap();
        doc.set_font("sans", 12.0).unwrap();
        doc.insert_text("Hello, World!", 1, 50.0, 50.0, Align::Left)
            .unwrap();

        let bytes = doc.to_bytes().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));

        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
        let text = reloaded.extract_text(&[1]).unwrap();
        assert!(text.contains("Hello, World!"));
    }

    #[test]
    fn test_multi_page_text_lands_on_right_page() {
        let mut doc = PdfDocument::new();
        doc.add_builtin_font("sans", BuiltinFont::Helvetica).unwrap();
        doc.set_font("sans", 12.0).unwrap();
        doc.insert_text("first", 1, 50.0, 50.0, Align::Left).unwrap();
        let page2 = doc.add_page();
        doc.insert_text("second", page2, 50.0, 50.0, Align::Left)
            .unwrap();

        let bytes = doc.to_bytes().unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 2);
        assert!(reloaded.extract_text(&[1]).unwrap().contains("first"));
        assert!(reloaded.extract_text(&[2]).unwrap().contains("second"));
        assert!(!reloaded.extract_text(&[2]).unwrap().contains("first"));
    }

    #[test]
    fn test_draw_line_emits_stroke() {
        let mut doc = PdfDocument::new();
        doc.draw_line(1, 10.0, 100.0, 585.0, 100.0, 0.5, Color::from_rgb(64, 64, 64))
            .unwrap();
        let bytes = doc.to_bytes().unwrap();
        let reloaded = Document::load_mem(&bytes).unwrap();
        assert_eq!(reloaded.get_pages().len(), 1);
    }
}
