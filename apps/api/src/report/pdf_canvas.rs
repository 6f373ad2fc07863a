//! PDF canvas backed by `lopdf`.
//!
//! A4 portrait with millimetre coordinates measured from the top-left corner, the
//! three core Helvetica faces, and an automatic page break 15 mm above the bottom
//! edge. Pages are kept as operation lists until `persist`, which builds the
//! document graph and writes it via a temp file renamed into place.

use std::io::Write;
use std::path::Path;

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream, StringFormat};
use tracing::debug;

use crate::report::canvas::{Align, Canvas, CanvasError, FontStyle, Rgb};
use crate::report::font_metrics::get_metrics;

pub const PAGE_WIDTH_MM: f32 = 210.0;
pub const PAGE_HEIGHT_MM: f32 = 297.0;
pub const MARGIN_MM: f32 = 10.0;
/// Distance from the bottom edge that triggers an automatic page break.
pub const BREAK_MARGIN_MM: f32 = 15.0;

const PT_PER_MM: f32 = 72.0 / 25.4;

fn font_resource(style: FontStyle) -> &'static str {
    match style {
        FontStyle::Regular => "F1",
        FontStyle::Bold => "F2",
        FontStyle::Italic => "F3",
    }
}

pub struct PdfCanvas {
    pages: Vec<Vec<Operation>>,
    left_margin: f32,
    /// Cursor position from the top edge, in mm.
    y: f32,
    font: FontStyle,
    font_size: f32,
    color: Rgb,
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCanvas {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            left_margin: MARGIN_MM,
            y: MARGIN_MM,
            font: FontStyle::Regular,
            font_size: 12.0,
            color: Rgb::default(),
        }
    }

    fn text_width_mm(&self) -> f32 {
        PAGE_WIDTH_MM - MARGIN_MM - self.left_margin
    }

    fn measure_mm(&self, text: &str) -> f32 {
        get_metrics(self.font).measure_str(text) * self.font_size / PT_PER_MM
    }

    fn ensure_room(&mut self, height: f32) {
        if self.pages.is_empty() || self.y + height > PAGE_HEIGHT_MM - BREAK_MARGIN_MM {
            self.new_page();
        }
    }

    fn draw_text(&mut self, x: f32, baseline: f32, text: &str) {
        let ops = vec![
            Operation::new("BT", vec![]),
            Operation::new(
                "Tf",
                vec![
                    Object::Name(font_resource(self.font).as_bytes().to_vec()),
                    self.font_size.into(),
                ],
            ),
            Operation::new(
                "rg",
                vec![
                    (self.color.r as f32 / 255.0).into(),
                    (self.color.g as f32 / 255.0).into(),
                    (self.color.b as f32 / 255.0).into(),
                ],
            ),
            Operation::new(
                "Td",
                vec![
                    (x * PT_PER_MM).into(),
                    ((PAGE_HEIGHT_MM - baseline) * PT_PER_MM).into(),
                ],
            ),
            Operation::new(
                "Tj",
                vec![Object::String(to_win_ansi(text), StringFormat::Literal)],
            ),
            Operation::new("ET", vec![]),
        ];
        if let Some(page) = self.pages.last_mut() {
            page.extend(ops);
        }
    }

    fn build_document(&self) -> Result<Document, CanvasError> {
        let mut document = Document::with_version("1.5");
        let pages_id = document.new_object_id();

        let mut fonts = lopdf::Dictionary::new();
        for (name, base_font) in [
            ("F1", "Helvetica"),
            ("F2", "Helvetica-Bold"),
            ("F3", "Helvetica-Oblique"),
        ] {
            let font_id = document.add_object(dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => base_font,
                "Encoding" => "WinAnsiEncoding",
            });
            fonts.set(name, font_id);
        }
        let resources_id = document.add_object(dictionary! { "Font" => fonts });

        let blank = [Vec::new()];
        let pages: &[Vec<Operation>] = if self.pages.is_empty() {
            &blank
        } else {
            &self.pages
        };

        let mut kids = Vec::with_capacity(pages.len());
        for operations in pages {
            let content = Content {
                operations: operations.clone(),
            };
            let encoded = content
                .encode()
                .map_err(|e| CanvasError::Pdf(e.to_string()))?;
            let content_id = document.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = document.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![
                    0.into(),
                    0.into(),
                    (PAGE_WIDTH_MM * PT_PER_MM).into(),
                    (PAGE_HEIGHT_MM * PT_PER_MM).into(),
                ],
                "Contents" => content_id,
                "Resources" => resources_id,
            });
            kids.push(Object::from(page_id));
        }

        let count = kids.len() as i64;
        document.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );
        let catalog_id = document.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        document.trailer.set("Root", catalog_id);

        Ok(document)
    }
}

impl Canvas for PdfCanvas {
    fn new_page(&mut self) {
        self.pages.push(Vec::new());
        self.y = MARGIN_MM;
    }

    fn set_font(&mut self, style: FontStyle, size_pt: f32) {
        self.font = style;
        self.font_size = size_pt;
    }

    fn set_text_color(&mut self, color: Rgb) {
        self.color = color;
    }

    fn set_left_margin(&mut self, margin_mm: f32) {
        self.left_margin = margin_mm;
    }

    fn write_cell(&mut self, height: f32, text: &str, align: Align) {
        self.ensure_room(height);

        if !text.trim().is_empty() {
            let width = self.measure_mm(text);
            let x = match align {
                Align::Left => self.left_margin,
                Align::Center => self.left_margin + (self.text_width_mm() - width) / 2.0,
                Align::Right => PAGE_WIDTH_MM - MARGIN_MM - width,
            };
            // vertically centred in the cell
            let font_size_mm = self.font_size / PT_PER_MM;
            let baseline = self.y + 0.5 * height + 0.3 * font_size_mm;
            self.draw_text(x, baseline, text);
        }

        self.y += height;
    }

    fn write_wrapped(&mut self, line_height: f32, text: &str, align: Align) {
        let max_width_em = self.text_width_mm() * PT_PER_MM / self.font_size;
        for line in get_metrics(self.font).wrap_lines(text, max_width_em) {
            self.write_cell(line_height, &line, align);
        }
    }

    fn line_break(&mut self, height: f32) {
        self.y += height;
    }

    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn persist(&mut self, path: &Path) -> Result<(), CanvasError> {
        let mut document = self.build_document()?;
        let mut buffer = Vec::new();
        document
            .save_to(&mut buffer)
            .map_err(|e| CanvasError::Pdf(e.to_string()))?;

        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&buffer)?;
        tmp.as_file().sync_all()?;
        tmp.persist(path).map_err(|e| e.error)?;

        debug!(
            "Wrote {} bytes ({} pages) to {}",
            buffer.len(),
            self.page_count(),
            path.display()
        );
        Ok(())
    }
}

/// Encodes text for the WinAnsi-encoded core fonts.
///
/// Check and cross marks have no glyph in Helvetica and are transliterated; any
/// other character outside the encoding becomes `?`.
fn to_win_ansi(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\u{20}'..='\u{7E}' | '\u{A0}'..='\u{FF}' => c as u8,
            '€' => 0x80,
            '…' => 0x85,
            '‘' => 0x91,
            '’' => 0x92,
            '“' => 0x93,
            '”' => 0x94,
            '•' => 0x95,
            '–' => 0x96,
            '—' => 0x97,
            '™' => 0x99,
            '✓' | '✔' => b'+',
            '✗' | '✘' => b'x',
            _ => b'?',
        })
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text_ops(canvas: &PdfCanvas, page: usize) -> usize {
        canvas.pages[page]
            .iter()
            .filter(|op| op.operator == "Tj")
            .count()
    }

    #[test]
    fn test_first_write_opens_a_page() {
        let mut canvas = PdfCanvas::new();
        assert_eq!(canvas.page_count(), 0);
        canvas.write_cell(10.0, "Hello", Align::Left);
        assert_eq!(canvas.page_count(), 1);
        assert_eq!(text_ops(&canvas, 0), 1);
    }

    #[test]
    fn test_new_page_resets_cursor() {
        let mut canvas = PdfCanvas::new();
        canvas.new_page();
        canvas.write_cell(20.0, "Title", Align::Center);
        assert!((canvas.y - 30.0).abs() < 1e-4);
        canvas.new_page();
        assert!((canvas.y - MARGIN_MM).abs() < 1e-4);
        assert_eq!(canvas.page_count(), 2);
    }

    #[test]
    fn test_blank_cell_advances_without_text() {
        let mut canvas = PdfCanvas::new();
        canvas.new_page();
        canvas.write_cell(8.0, "   ", Align::Left);
        assert_eq!(text_ops(&canvas, 0), 0);
        assert!((canvas.y - 18.0).abs() < 1e-4);
    }

    #[test]
    fn test_overflow_breaks_page_automatically() {
        let mut canvas = PdfCanvas::new();
        canvas.new_page();
        // 272 mm usable height / 6 mm lines = 45 lines per page
        for i in 0..60 {
            canvas.write_cell(6.0, &format!("Line {i}"), Align::Left);
        }
        assert_eq!(canvas.page_count(), 2);
        assert_eq!(text_ops(&canvas, 0), 45);
        assert_eq!(text_ops(&canvas, 1), 15);
    }

    #[test]
    fn test_wrapped_text_uses_multiple_lines() {
        let mut canvas = PdfCanvas::new();
        canvas.new_page();
        canvas.set_font(FontStyle::Regular, 10.0);
        let long = "A scenic walk through the historic quarter ".repeat(10);
        canvas.write_wrapped(5.0, &long, Align::Left);
        assert!(text_ops(&canvas, 0) > 1);
    }

    #[test]
    fn test_indent_narrows_wrap_width() {
        let text = "Cobbled lanes and hidden courtyards ".repeat(8);

        let mut wide = PdfCanvas::new();
        wide.new_page();
        wide.set_font(FontStyle::Regular, 10.0);
        wide.write_wrapped(5.0, &text, Align::Left);

        let mut narrow = PdfCanvas::new();
        narrow.new_page();
        narrow.set_font(FontStyle::Regular, 10.0);
        narrow.set_left_margin(100.0);
        narrow.write_wrapped(5.0, &text, Align::Left);

        assert!(text_ops(&narrow, 0) > text_ops(&wide, 0));
    }

    #[test]
    fn test_win_ansi_encoding() {
        assert_eq!(to_win_ansi("Café"), vec![b'C', b'a', b'f', 0xE9]);
        assert_eq!(to_win_ansi("• Tour"), vec![0x95, b' ', b'T', b'o', b'u', b'r']);
        assert_eq!(to_win_ansi("✓✗"), vec![b'+', b'x']);
        assert_eq!(to_win_ansi("東"), vec![b'?']);
    }

    #[test]
    fn test_persist_writes_loadable_pdf() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");

        let mut canvas = PdfCanvas::new();
        canvas.new_page();
        canvas.set_font(FontStyle::Bold, 16.0);
        canvas.write_cell(10.0, "Trip Overview", Align::Left);
        canvas.new_page();
        canvas.set_font(FontStyle::Italic, 9.0);
        canvas.write_wrapped(5.0, "Location: Old Town", Align::Left);
        canvas.persist(&path).unwrap();

        let document = Document::load(&path).unwrap();
        assert_eq!(document.get_pages().len(), 2);

        // only the final file remains; the temp file was renamed into place
        let entries = std::fs::read_dir(dir.path()).unwrap().count();
        assert_eq!(entries, 1);
    }

    #[test]
    fn test_persist_without_pages_writes_single_blank_page() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.pdf");
        PdfCanvas::new().persist(&path).unwrap();
        let document = Document::load(&path).unwrap();
        assert_eq!(document.get_pages().len(), 1);
    }

    #[test]
    fn test_persist_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("report.pdf");
        let mut canvas = PdfCanvas::new();
        canvas.new_page();
        assert!(matches!(canvas.persist(&path), Err(CanvasError::Io(_))));
    }
}
