//! Branded four-sheet workbook: KPI summary, styled daily table with a
//! color-scale on margin, segment analysis, and an embedded-charts sheet.

use crate::core::aggregate;
use crate::core::load::load_sales_rows;
use crate::domain::model::{DailySummary, SegmentSummary};
use crate::domain::ports::{Recipe, RecipeContext};
use crate::utils::error::Result;
use chrono::Utc;
use rust_xlsxwriter::{
    Chart, ChartFormat, ChartLine, ChartSolidFill, ChartType, Color,
    ConditionalFormat3ColorScale, Format, FormatAlign, FormatBorder, Workbook, Worksheet,
};
use std::path::PathBuf;

const CURRENCY_FMT: &str = r#"_($* #,##0.00_);_($* (#,##0.00);_($* "-"??_);_(@_)"#;
const PERCENT_FMT: &str = "0.0%";
const NUMBER_FMT: &str = "#,##0";

pub struct ExcelReportRecipe;

struct BrandStyles {
    title: Format,
    generated: Format,
    section: Format,
    header: Format,
    kpi_label: Format,
    light: Color,
}

impl BrandStyles {
    fn new(ctx: &RecipeContext) -> Self {
        let primary = ctx.theme.palette.primary.xlsx();
        let light = ctx.theme.palette.light.xlsx();
        Self {
            title: Format::new().set_bold().set_font_size(18).set_font_color(primary),
            generated: Format::new()
                .set_italic()
                .set_font_color(Color::RGB(0x6B7280)),
            section: Format::new().set_bold().set_font_size(14).set_font_color(primary),
            header: Format::new()
                .set_bold()
                .set_font_color(Color::White)
                .set_background_color(primary)
                .set_align(FormatAlign::Center)
                .set_border(FormatBorder::Thin),
            kpi_label: Format::new().set_bold(),
            light,
        }
    }

    /// Bordered data cell; every other row is tinted with the light brand
    /// color, the way the original banded its tables.
    fn cell(&self, row: usize, num_format: &str) -> Format {
        let mut format = Format::new()
            .set_border(FormatBorder::Thin)
            .set_num_format(num_format);
        if row % 2 == 1 {
            format = format.set_background_color(self.light);
        }
        format
    }

    fn value(&self, num_format: &str) -> Format {
        Format::new()
            .set_num_format(num_format)
            .set_align(FormatAlign::Right)
    }
}

impl Recipe for ExcelReportRecipe {
    fn name(&self) -> &'static str {
        "excel"
    }

    fn description(&self) -> &'static str {
        "Build the branded november_2025_report.xlsx workbook"
    }

    fn run(&self, ctx: &RecipeContext) -> Result<Vec<PathBuf>> {
        let rows = load_sales_rows(&ctx.input)?;
        let daily = aggregate::daily_summary(&rows);
        let segments = aggregate::segment_summary(&rows);
        let kpis = aggregate::kpis(&daily);

        let styles = BrandStyles::new(ctx);
        let mut workbook = Workbook::new();

        let title = format!(
            "{} - {}",
            ctx.theme.branding.company, ctx.theme.branding.report_title
        );
        summary_sheet(
            workbook.add_worksheet().set_name("Executive Summary")?,
            &title,
            &kpis,
            &styles,
        )?;
        daily_sheet(workbook.add_worksheet().set_name("Daily Data")?, &daily, &styles)?;
        customer_sheet(workbook.add_worksheet().set_name("Customer Analysis")?, &segments, &styles)?;
        charts_sheet(workbook.add_worksheet().set_name("Charts")?, &daily, ctx)?;

        let path = ctx.artifact_path("november_2025_report.xlsx");
        workbook.save(&path)?;
        Ok(vec![path])
    }
}

fn summary_sheet(
    sheet: &mut Worksheet,
    title: &str,
    kpis: &crate::domain::model::Kpis,
    styles: &BrandStyles,
) -> Result<()> {
    sheet.merge_range(0, 0, 0, 4, title, &styles.title)?;
    sheet.write_with_format(
        1,
        0,
        format!("Generated: {}", Utc::now().format("%B %d, %Y")),
        &styles.generated,
    )?;
    sheet.write_with_format(3, 0, "Key Performance Indicators", &styles.section)?;

    let rows: [(&str, f64, &str); 7] = [
        ("Total Orders", kpis.total_orders as f64, NUMBER_FMT),
        ("Gross Sales", kpis.gross_sales, CURRENCY_FMT),
        ("Net Sales", kpis.net_sales, CURRENCY_FMT),
        ("Gross Profit", kpis.gross_profit, CURRENCY_FMT),
        ("Average Order Value", kpis.aov(), CURRENCY_FMT),
        ("Gross Margin", kpis.gross_margin(), PERCENT_FMT),
        ("Total Items Sold", kpis.items_sold as f64, NUMBER_FMT),
    ];
    for (i, (label, value, fmt)) in rows.iter().enumerate() {
        let row = 4 + i as u32;
        sheet.write_with_format(row, 0, *label, &styles.kpi_label)?;
        sheet.write_with_format(row, 1, *value, &styles.value(fmt))?;
    }

    sheet.set_column_width(0, 25)?;
    sheet.set_column_width(1, 18)?;
    Ok(())
}

fn daily_sheet(sheet: &mut Worksheet, daily: &[DailySummary], styles: &BrandStyles) -> Result<()> {
    let headers = [
        "Day",
        "Orders",
        "Gross Sales",
        "Discounts",
        "Net Sales",
        "Gross Profit",
        "Items",
        "AOV",
        "Gross Margin",
        "Discount Rate",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_with_format(0, col as u16, *header, &styles.header)?;
    }

    for (i, day) in daily.iter().enumerate() {
        let row = 1 + i as u32;
        sheet.write_with_format(row, 0, day.day.format("%Y-%m-%d").to_string(), &styles.cell(i, "@"))?;
        sheet.write_with_format(row, 1, day.orders as f64, &styles.cell(i, NUMBER_FMT))?;
        sheet.write_with_format(row, 2, day.gross_sales, &styles.cell(i, CURRENCY_FMT))?;
        sheet.write_with_format(row, 3, day.discounts, &styles.cell(i, CURRENCY_FMT))?;
        sheet.write_with_format(row, 4, day.net_sales, &styles.cell(i, CURRENCY_FMT))?;
        sheet.write_with_format(row, 5, day.gross_profit, &styles.cell(i, CURRENCY_FMT))?;
        sheet.write_with_format(row, 6, day.quantity_ordered as f64, &styles.cell(i, NUMBER_FMT))?;
        sheet.write_with_format(row, 7, day.aov(), &styles.cell(i, CURRENCY_FMT))?;
        sheet.write_with_format(row, 8, day.gross_margin(), &styles.cell(i, PERCENT_FMT))?;
        sheet.write_with_format(row, 9, day.discount_rate(), &styles.cell(i, PERCENT_FMT))?;
    }

    sheet.set_freeze_panes(1, 0)?;

    // red -> amber -> green scale over the margin column
    let color_scale = ConditionalFormat3ColorScale::new()
        .set_minimum_color(Color::RGB(0xF8D7DA))
        .set_midpoint_color(Color::RGB(0xFFF3CD))
        .set_maximum_color(Color::RGB(0xD4EDDA));
    sheet.add_conditional_format(1, 8, daily.len() as u32, 8, &color_scale)?;

    let widths = [12, 10, 14, 12, 14, 14, 10, 12, 13, 13];
    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width as f64)?;
    }
    Ok(())
}

fn customer_sheet(
    sheet: &mut Worksheet,
    segments: &[SegmentSummary],
    styles: &BrandStyles,
) -> Result<()> {
    sheet.write_with_format(0, 0, "Customer Segment Analysis", &styles.section)?;

    let headers = [
        "Customer Type",
        "Orders",
        "Gross Sales",
        "Net Sales",
        "Gross Profit",
        "AOV",
        "% of Orders",
        "% of Revenue",
    ];
    for (col, header) in headers.iter().enumerate() {
        sheet.write_with_format(2, col as u16, *header, &styles.header)?;
    }

    for (i, segment) in segments.iter().enumerate() {
        let row = 3 + i as u32;
        sheet.write_with_format(row, 0, segment.segment.as_str(), &styles.cell(i, "@"))?;
        sheet.write_with_format(row, 1, segment.orders as f64, &styles.cell(i, NUMBER_FMT))?;
        sheet.write_with_format(row, 2, segment.gross_sales, &styles.cell(i, CURRENCY_FMT))?;
        sheet.write_with_format(row, 3, segment.net_sales, &styles.cell(i, CURRENCY_FMT))?;
        sheet.write_with_format(row, 4, segment.gross_profit, &styles.cell(i, CURRENCY_FMT))?;
        sheet.write_with_format(row, 5, segment.aov(), &styles.cell(i, CURRENCY_FMT))?;
        sheet.write_with_format(row, 6, segment.pct_of_orders, &styles.cell(i, PERCENT_FMT))?;
        sheet.write_with_format(row, 7, segment.pct_of_revenue, &styles.cell(i, PERCENT_FMT))?;
    }

    let widths = [18, 12, 14, 14, 14, 12, 12, 12];
    for (col, width) in widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width as f64)?;
    }
    Ok(())
}

fn charts_sheet(sheet: &mut Worksheet, daily: &[DailySummary], ctx: &RecipeContext) -> Result<()> {
    for (i, day) in daily.iter().enumerate() {
        let row = i as u32;
        sheet.write(row, 0, day.day.format("%b %d").to_string())?;
        sheet.write(row, 1, day.orders as f64)?;
        sheet.write(row, 2, day.gross_sales)?;
    }

    let last_row = daily.len().saturating_sub(1) as u32;
    let primary = ctx.theme.palette.primary.xlsx();

    let mut orders_chart = Chart::new(ChartType::Column);
    orders_chart
        .add_series()
        .set_categories(("Charts", 0, 0, last_row, 0))
        .set_values(("Charts", 0, 1, last_row, 1))
        .set_format(ChartFormat::new().set_solid_fill(ChartSolidFill::new().set_color(primary)));
    orders_chart.title().set_name("Daily Orders");
    orders_chart.x_axis().set_name("Date");
    orders_chart.y_axis().set_name("Orders");
    orders_chart.legend().set_hidden();
    orders_chart.set_width(640).set_height(360);
    sheet.insert_chart(0, 4, &orders_chart)?;

    let mut sales_chart = Chart::new(ChartType::Line);
    sales_chart
        .add_series()
        .set_categories(("Charts", 0, 0, last_row, 0))
        .set_values(("Charts", 0, 2, last_row, 2))
        .set_format(ChartFormat::new().set_line(ChartLine::new().set_color(primary).set_width(2.5)));
    sales_chart.title().set_name("Daily Gross Sales");
    sales_chart.x_axis().set_name("Date");
    sales_chart.y_axis().set_name("Sales ($)");
    sales_chart.legend().set_hidden();
    sales_chart.set_width(640).set_height(360);
    sheet.insert_chart(21, 4, &sales_chart)?;

    // feeder columns stay out of sight
    for col in 0..3 {
        sheet.set_column_hidden(col)?;
    }
    Ok(())
}
