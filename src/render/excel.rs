//! Shared styling helpers for the xlsx recipes: a `StyleKit` built once from
//! the theme's Excel scheme, plus sheet-level helpers and chart builders.

use crate::config::theme::Theme;
use crate::utils::error::Result;
use rust_xlsxwriter::{
    Chart, ChartFormat, ChartLine, ChartSolidFill, ChartType, Color, Format, FormatAlign,
    FormatBorder, Worksheet,
};

const CURRENCY_FMT: &str = r#"_($* #,##0.00_);_($* (#,##0.00);_($* "-"??_);_(@_)"#;
const PERCENT_FMT: &str = "0.0%";
const INT_FMT: &str = "#,##0";
const DECIMAL_FMT: &str = "#,##0.00";

/// Number treatment for a data cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumFmt {
    Text,
    Int,
    Decimal,
    Money,
    Percent,
}

impl NumFmt {
    fn code(self) -> Option<&'static str> {
        match self {
            NumFmt::Text => None,
            NumFmt::Int => Some(INT_FMT),
            NumFmt::Decimal => Some(DECIMAL_FMT),
            NumFmt::Money => Some(CURRENCY_FMT),
            NumFmt::Percent => Some(PERCENT_FMT),
        }
    }
}

/// Pre-built formats for the house workbook look. Built once per recipe from
/// the theme so every sheet stays consistent.
pub struct StyleKit {
    pub title: Format,
    pub subtitle: Format,
    pub header: Format,
    pub commentary: Format,
    pub kpi_label: Format,
    dark: Color,
    beige: Color,
    comment_bg: Color,
    maroon: Color,
    light_maroon: Color,
}

impl StyleKit {
    pub fn new(theme: &Theme) -> Self {
        let maroon = theme.excel.background.xlsx();
        let beige = theme.excel.text.xlsx();
        let light_maroon = theme.excel.alt_row.xlsx();
        let dark_maroon = theme.excel.header.xlsx();
        let dark_beige = theme.excel.accent.xlsx();
        let comment_bg = theme.excel.commentary.xlsx();

        let title = Format::new()
            .set_bold()
            .set_font_size(16)
            .set_font_color(beige)
            .set_background_color(dark_maroon)
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::VerticalCenter);

        let subtitle = Format::new()
            .set_italic()
            .set_font_size(11)
            .set_font_color(dark_maroon)
            .set_background_color(dark_beige)
            .set_align(FormatAlign::Left);

        let header = Format::new()
            .set_bold()
            .set_font_color(beige)
            .set_background_color(maroon)
            .set_align(FormatAlign::Center)
            .set_align(FormatAlign::VerticalCenter)
            .set_border(FormatBorder::Thin)
            .set_border_color(dark_maroon);

        let commentary = Format::new()
            .set_italic()
            .set_font_size(10)
            .set_font_color(beige)
            .set_background_color(comment_bg)
            .set_align(FormatAlign::Left)
            .set_align(FormatAlign::VerticalCenter)
            .set_text_wrap();

        let kpi_label = Format::new()
            .set_bold()
            .set_font_color(maroon)
            .set_background_color(dark_beige)
            .set_border(FormatBorder::Thin);

        Self {
            title,
            subtitle,
            header,
            commentary,
            kpi_label,
            dark: dark_maroon,
            beige,
            comment_bg,
            maroon,
            light_maroon,
        }
    }

    /// Data cell in the house look: beige text on a maroon fill, alternating
    /// rows lightened, with an optional number format.
    pub fn cell(&self, alt_row: bool, fmt: NumFmt) -> Format {
        let fill = if alt_row { self.light_maroon } else { self.maroon };
        let mut format = Format::new()
            .set_font_color(self.beige)
            .set_background_color(fill)
            .set_border(FormatBorder::Thin)
            .set_border_color(self.dark);
        if let Some(code) = fmt.code() {
            format = format.set_num_format(code);
        }
        format
    }

    pub fn maroon(&self) -> Color {
        self.maroon
    }

    pub fn comment_bg(&self) -> Color {
        self.comment_bg
    }
}

/// Merge a title row across `span` columns at `row`. Returns the next row.
pub fn add_title(
    sheet: &mut Worksheet,
    row: u32,
    span: u16,
    text: &str,
    kit: &StyleKit,
) -> Result<u32> {
    sheet.set_row_height(row, 26)?;
    sheet.merge_range(row, 0, row, span.saturating_sub(1), text, &kit.title)?;
    Ok(row + 1)
}

/// Merged italic commentary block under a table. Returns the next row.
pub fn add_commentary(
    sheet: &mut Worksheet,
    row: u32,
    span: u16,
    text: &str,
    kit: &StyleKit,
) -> Result<u32> {
    sheet.set_row_height(row, 34)?;
    sheet.merge_range(row, 0, row, span.saturating_sub(1), text, &kit.commentary)?;
    Ok(row + 1)
}

/// Write a header row and return the row below it.
pub fn write_headers(
    sheet: &mut Worksheet,
    row: u32,
    headers: &[&str],
    kit: &StyleKit,
) -> Result<u32> {
    for (col, header) in headers.iter().enumerate() {
        sheet.write_with_format(row, col as u16, *header, &kit.header)?;
    }
    Ok(row + 1)
}

/// Column chart in the house colors, bound to an already-written data block.
#[allow(clippy::too_many_arguments)]
pub fn bar_chart(
    sheet_name: &str,
    title: &str,
    cat_col: u16,
    val_col: u16,
    first_row: u32,
    last_row: u32,
    kit: &StyleKit,
) -> Chart {
    let mut chart = Chart::new(ChartType::Column);
    chart
        .add_series()
        .set_categories((sheet_name, first_row, cat_col, last_row, cat_col))
        .set_values((sheet_name, first_row, val_col, last_row, val_col))
        .set_name(title)
        .set_format(
            ChartFormat::new().set_solid_fill(ChartSolidFill::new().set_color(kit.maroon())),
        );
    chart.title().set_name(title);
    chart.legend().set_hidden();
    chart.set_width(560).set_height(320);
    chart
}

/// Line chart variant of [`bar_chart`].
#[allow(clippy::too_many_arguments)]
pub fn line_chart(
    sheet_name: &str,
    title: &str,
    cat_col: u16,
    val_col: u16,
    first_row: u32,
    last_row: u32,
    kit: &StyleKit,
) -> Chart {
    let mut chart = Chart::new(ChartType::Line);
    chart
        .add_series()
        .set_categories((sheet_name, first_row, cat_col, last_row, cat_col))
        .set_values((sheet_name, first_row, val_col, last_row, val_col))
        .set_name(title)
        .set_format(
            ChartFormat::new()
                .set_line(ChartLine::new().set_color(kit.maroon()).set_width(2.5)),
        );
    chart.title().set_name(title);
    chart.legend().set_hidden();
    chart.set_width(560).set_height(320);
    chart
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_num_fmt_codes() {
        assert_eq!(NumFmt::Text.code(), None);
        assert_eq!(NumFmt::Percent.code(), Some("0.0%"));
        assert!(NumFmt::Money.code().unwrap().contains("$*"));
    }

    #[test]
    fn test_title_and_headers_advance_rows() {
        let theme = Theme::default();
        let kit = StyleKit::new(&theme);
        let mut sheet = Worksheet::new();
        let row = add_title(&mut sheet, 0, 4, "Sales Report", &kit).unwrap();
        assert_eq!(row, 1);
        let row = write_headers(&mut sheet, row, &["Day", "Orders"], &kit).unwrap();
        assert_eq!(row, 2);
    }
}
