//! Paginated PDF layout on printpdf. `PdfReport` keeps a cursor from the top
//! of a US-letter page and breaks to a fresh page when a block will not fit.

use crate::config::theme::Theme;
use crate::utils::error::Result;
use printpdf::path::{PaintMode, WindingOrder};
use printpdf::{
    BuiltinFont, Color, ImageTransform, IndirectFontRef, Line, Mm, PdfDocument,
    PdfDocumentReference, PdfLayerReference, Point, Polygon, Rgb,
};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

const PAGE_W: f32 = 215.9;
const PAGE_H: f32 = 279.4;
const MARGIN: f32 = 19.0;
const DPI: f32 = 150.0;

/// Millimetres a character of body text roughly occupies. Helvetica averages
/// about half the point size in width.
fn char_width_mm(font_size: f32) -> f32 {
    font_size * 0.5 * 0.3528
}

fn line_height_mm(font_size: f32) -> f32 {
    font_size * 0.3528 * 1.45
}

pub struct PdfReport {
    doc: PdfDocumentReference,
    layer: PdfLayerReference,
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    theme: Theme,
    /// distance from the top edge to the next free line, in mm
    cursor: f32,
    pages: usize,
}

impl PdfReport {
    pub fn new(title: &str, theme: &Theme) -> Result<Self> {
        let (doc, page, layer) = PdfDocument::new(title, Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        let regular = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;
        let layer = doc.get_page(page).get_layer(layer);
        Ok(Self {
            doc,
            layer,
            regular,
            bold,
            theme: theme.clone(),
            cursor: MARGIN,
            pages: 1,
        })
    }

    pub fn pages(&self) -> usize {
        self.pages
    }

    fn content_width() -> f32 {
        PAGE_W - 2.0 * MARGIN
    }

    /// Baseline y in PDF coordinates (origin bottom-left) for the cursor.
    fn baseline(&self) -> Mm {
        Mm(PAGE_H - self.cursor)
    }

    pub fn page_break(&mut self) {
        let (page, layer) = self.doc.add_page(Mm(PAGE_W), Mm(PAGE_H), "Layer 1");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.cursor = MARGIN;
        self.pages += 1;
    }

    /// Start a new page unless `needed` mm still fit above the bottom margin.
    pub fn ensure_space(&mut self, needed: f32) {
        if self.cursor + needed > PAGE_H - MARGIN {
            self.page_break();
        }
    }

    pub fn spacer(&mut self, mm: f32) {
        self.cursor += mm;
    }

    fn set_fill(&self, color: &crate::render::palette::Rgb) {
        self.layer.set_fill_color(color.pdf());
    }

    /// Full-bleed branded cover: colored band with the company name, the
    /// report title beneath it, and the generation date at the foot.
    pub fn title_page(&mut self, generated: &str) {
        let primary = self.theme.palette.primary;
        let band = Polygon {
            rings: vec![vec![
                (Point::new(Mm(0.0), Mm(PAGE_H - 90.0)), false),
                (Point::new(Mm(PAGE_W), Mm(PAGE_H - 90.0)), false),
                (Point::new(Mm(PAGE_W), Mm(PAGE_H - 150.0)), false),
                (Point::new(Mm(0.0), Mm(PAGE_H - 150.0)), false),
            ]],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::NonZero,
        };
        self.set_fill(&primary);
        self.layer.add_polygon(band);

        self.layer
            .set_fill_color(Color::Rgb(Rgb::new(1.0, 1.0, 1.0, None)));
        let company = self.theme.branding.company.clone();
        let title_size = 28.0;
        let x = (PAGE_W - company.len() as f32 * char_width_mm(title_size)) / 2.0;
        self.layer
            .use_text(company, title_size, Mm(x.max(MARGIN)), Mm(PAGE_H - 115.0), &self.bold);

        let secondary = self.theme.palette.secondary;
        let title = self.theme.branding.report_title.clone();
        let sub_size = 16.0;
        let x = (PAGE_W - title.len() as f32 * char_width_mm(sub_size)) / 2.0;
        self.set_fill(&secondary);
        self.layer
            .use_text(title, sub_size, Mm(x.max(MARGIN)), Mm(PAGE_H - 165.0), &self.regular);

        let footer = format!("Generated {}", generated);
        let x = (PAGE_W - footer.len() as f32 * char_width_mm(10.0)) / 2.0;
        self.layer
            .use_text(footer, 10.0, Mm(x.max(MARGIN)), Mm(30.0), &self.regular);

        self.page_break();
    }

    /// Section heading with an underline rule in the primary color.
    pub fn heading(&mut self, text: &str) {
        self.ensure_space(line_height_mm(18.0) + 4.0);
        self.cursor += line_height_mm(18.0);
        let primary = self.theme.palette.primary;
        self.set_fill(&primary);
        self.layer
            .use_text(text, 18.0, Mm(MARGIN), self.baseline(), &self.bold);

        let rule_y = PAGE_H - self.cursor - 2.0;
        let rule = Line {
            points: vec![
                (Point::new(Mm(MARGIN), Mm(rule_y)), false),
                (Point::new(Mm(PAGE_W - MARGIN), Mm(rule_y)), false),
            ],
            is_closed: false,
        };
        self.layer
            .set_outline_color(self.theme.palette.primary.pdf());
        self.layer.set_outline_thickness(1.2);
        self.layer.add_line(rule);
        self.cursor += 6.0;
    }

    /// Word-wrapped body text.
    pub fn paragraph(&mut self, text: &str) {
        let size = 11.0;
        let max_chars = (Self::content_width() / char_width_mm(size)).floor() as usize;
        let body = self.theme.palette.dark;
        for line in wrap(text, max_chars.max(20)) {
            self.ensure_space(line_height_mm(size));
            self.cursor += line_height_mm(size);
            self.set_fill(&body);
            self.layer
                .use_text(line, size, Mm(MARGIN), self.baseline(), &self.regular);
        }
        self.cursor += 2.0;
    }

    /// Two-column label/value table with a colored header band and banded rows.
    pub fn table(&mut self, header: (&str, &str), rows: &[(String, String)]) {
        let size = 11.0;
        let row_h = line_height_mm(size) + 2.5;
        self.ensure_space(row_h * (rows.len() + 1) as f32 + 4.0);

        let width = Self::content_width();
        let col_split = MARGIN + width * 0.55;

        let mut draw_row = |this: &mut Self,
                            left: &str,
                            right: &str,
                            fill: Option<crate::render::palette::Rgb>,
                            bold: bool| {
            let top = PAGE_H - this.cursor;
            if let Some(color) = fill {
                let band = Polygon {
                    rings: vec![vec![
                        (Point::new(Mm(MARGIN), Mm(top)), false),
                        (Point::new(Mm(MARGIN + width), Mm(top)), false),
                        (Point::new(Mm(MARGIN + width), Mm(top - row_h)), false),
                        (Point::new(Mm(MARGIN), Mm(top - row_h)), false),
                    ]],
                    mode: PaintMode::Fill,
                    winding_order: WindingOrder::NonZero,
                };
                this.set_fill(&color);
                this.layer.add_polygon(band);
            }
            this.cursor += row_h;
            let text_color = if bold {
                crate::render::palette::Rgb::new(0xFF, 0xFF, 0xFF)
            } else {
                this.theme.palette.dark
            };
            this.set_fill(&text_color);
            let font = if bold { this.bold.clone() } else { this.regular.clone() };
            let y = Mm(PAGE_H - this.cursor + 2.0);
            this.layer.use_text(left, size, Mm(MARGIN + 2.0), y, &font);
            this.layer.use_text(right, size, Mm(col_split), y, &font);
        };

        let header_fill = self.theme.palette.primary;
        let band_fill = self.theme.palette.light;
        draw_row(self, header.0, header.1, Some(header_fill), true);
        for (i, (label, value)) in rows.iter().enumerate() {
            let fill = if i % 2 == 0 { Some(band_fill) } else { None };
            draw_row(self, label, value, fill, false);
        }
        self.cursor += 4.0;
    }

    /// Embed a PNG rendered at 150 dpi, scaled to the content width.
    pub fn image(&mut self, path: &Path) -> Result<()> {
        let file = File::open(path)?;
        let decoder =
            printpdf::image_crate::codecs::png::PngDecoder::new(std::io::BufReader::new(file))?;
        let image = printpdf::Image::try_from(decoder)?;

        let px_w = image.image.width.0 as f32;
        let px_h = image.image.height.0 as f32;
        let natural_w = px_w / DPI * 25.4;
        let natural_h = px_h / DPI * 25.4;
        let scale = (Self::content_width() / natural_w).min(1.0);
        let draw_w = natural_w * scale;
        let draw_h = natural_h * scale;

        self.ensure_space(draw_h + 4.0);
        self.cursor += draw_h;
        let x = MARGIN + (Self::content_width() - draw_w) / 2.0;
        image.add_to_layer(
            self.layer.clone(),
            ImageTransform {
                translate_x: Some(Mm(x)),
                translate_y: Some(Mm(PAGE_H - self.cursor)),
                scale_x: Some(scale),
                scale_y: Some(scale),
                dpi: Some(DPI),
                ..Default::default()
            },
        );
        self.cursor += 4.0;
        Ok(())
    }

    pub fn save(self, path: &Path) -> Result<()> {
        self.doc.save(&mut BufWriter::new(File::create(path)?))?;
        Ok(())
    }
}

/// Greedy word wrap by estimated character budget.
fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + 1 + word.len() > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_respects_budget() {
        let lines = wrap("the quick brown fox jumps over the lazy dog", 15);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.len() <= 15));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn test_wrap_keeps_long_word() {
        let lines = wrap("supercalifragilistic", 5);
        assert_eq!(lines, vec!["supercalifragilistic".to_string()]);
    }

    #[test]
    fn test_report_saves_pdf() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.pdf");
        let theme = Theme::default();
        let mut report = PdfReport::new("Test Report", &theme).unwrap();
        report.title_page("December 1, 2025");
        report.heading("Section");
        report.paragraph("A short body paragraph for layout.");
        report.table(
            ("Metric", "Value"),
            &[("Orders".to_string(), "1,234".to_string())],
        );
        assert!(report.pages() >= 2);
        report.save(&path).unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
