//! SKU rolling-window report: summary, one sheet per window, and a period
//! comparison with velocity commentary.

use crate::core::aggregate::{self, PeriodTotals};
use crate::core::load::load_sku_rows;
use crate::domain::model::{Period, SkuRow};
use crate::domain::ports::{Recipe, RecipeContext};
use crate::render::excel::{
    add_commentary, add_title, bar_chart, line_chart, write_headers, NumFmt, StyleKit,
};
use crate::utils::error::Result;
use chrono::Utc;
use rust_xlsxwriter::{
    Chart, ChartFormat, ChartLine, ChartSolidFill, ChartType, Color, Workbook, Worksheet,
};
use std::path::PathBuf;
use tracing::debug;

pub struct SalesExcelRecipe;

impl Recipe for SalesExcelRecipe {
    fn name(&self) -> &'static str {
        "sales-excel"
    }

    fn description(&self) -> &'static str {
        "Build sales_analysis_report.xlsx from the SKU period table"
    }

    fn run(&self, ctx: &RecipeContext) -> Result<Vec<PathBuf>> {
        let rows = load_sku_rows(&ctx.input)?;
        debug!(skus = rows.len(), "loaded SKU table");

        let totals: Vec<PeriodTotals> = Period::ALL
            .iter()
            .map(|&p| aggregate::period_totals(&rows, p))
            .collect();

        let kit = StyleKit::new(&ctx.theme);
        let mut workbook = Workbook::new();

        summary_sheet(workbook.add_worksheet().set_name("Summary")?, &rows, &totals, &kit)?;
        for period in Period::ALL {
            let sheet_name = format!("{} Performance", period.short().replace('D', "-Day"));
            let sheet = workbook.add_worksheet().set_name(sheet_name.as_str())?;
            period_sheet(sheet, &sheet_name, &rows, period, &kit)?;
        }
        comparison_sheet(workbook.add_worksheet().set_name("Period Comparison")?, &rows, &totals, &kit)?;

        let path = ctx.artifact_path("sales_analysis_report.xlsx");
        workbook.save(&path)?;
        Ok(vec![path])
    }
}

fn product_line(rows: &[SkuRow]) -> String {
    match rows.first() {
        Some(first) => format!("{} - {}", first.category, first.color),
        None => String::new(),
    }
}

fn summary_sheet(
    sheet: &mut Worksheet,
    rows: &[SkuRow],
    totals: &[PeriodTotals],
    kit: &StyleKit,
) -> Result<()> {
    let mut row = add_title(sheet, 0, 8, "SALES ANALYSIS SUMMARY", kit)?;
    sheet.write_with_format(
        row,
        0,
        format!("Generated: {}", Utc::now().format("%B %d, %Y")),
        &kit.subtitle,
    )?;
    row += 2;
    sheet.write_with_format(row, 0, product_line(rows), &kit.subtitle)?;
    row += 2;

    sheet.write_with_format(row, 0, "KEY METRICS", &kit.kpi_label)?;
    row = write_headers(
        sheet,
        row + 1,
        &["Period", "Units Sold", "Gross Sales", "Net Sales", "Avg Price", "Top Size"],
        kit,
    )?;
    for (i, t) in totals.iter().enumerate() {
        let alt = i % 2 == 0;
        sheet.write_with_format(row, 0, t.period.label(), &kit.cell(alt, NumFmt::Text))?;
        sheet.write_with_format(row, 1, t.units, &kit.cell(alt, NumFmt::Int))?;
        sheet.write_with_format(row, 2, t.sales, &kit.cell(alt, NumFmt::Money))?;
        sheet.write_with_format(row, 3, t.net_sales, &kit.cell(alt, NumFmt::Money))?;
        sheet.write_with_format(row, 4, t.avg_price, &kit.cell(alt, NumFmt::Money))?;
        sheet.write_with_format(
            row,
            5,
            t.top_size.as_deref().unwrap_or("N/A"),
            &kit.cell(alt, NumFmt::Text),
        )?;
        row += 1;
    }

    // period feeders in hidden columns J..M
    let feed_start = row + 3;
    for (i, t) in totals.iter().enumerate() {
        let r = feed_start + i as u32;
        sheet.write(r, 9, t.period.label())?;
        sheet.write(r, 10, t.units)?;
        sheet.write(r, 11, t.sales)?;
        sheet.write(r, 12, t.net_sales)?;
    }
    let feed_end = feed_start + totals.len() as u32 - 1;

    let units_bar = bar_chart("Summary", "Total Units by Period", 9, 10, feed_start, feed_end, kit);
    sheet.insert_chart(row + 2, 0, &units_bar)?;

    let sales_line = gross_net_line("Summary", "Sales Trend by Period", 9, 11, 12, feed_start, feed_end, kit);
    sheet.insert_chart(row + 20, 0, &sales_line)?;

    for col in 9..=12 {
        sheet.set_column_hidden(col)?;
    }

    let quarter = &totals[2];
    let week = &totals[0];
    let month = &totals[1];
    let momentum = if week.units > month.units / 4.0 {
        "strong momentum"
    } else {
        "steady performance"
    };
    add_commentary(
        sheet,
        row + 38,
        8,
        &format!(
            "EXECUTIVE SUMMARY: This report analyzes {} SKUs for {}. Over the past 90 days, \
             total sales reached ${:.2} from {:.0} units. Size {} is the best performer. \
             The 7-day run rate suggests {}. See individual period sheets for detailed breakdowns.",
            rows.len(),
            product_line(rows),
            quarter.sales,
            quarter.units,
            quarter.top_size.as_deref().unwrap_or("N/A"),
            momentum
        ),
        kit,
    )?;

    sheet.autofit();
    Ok(())
}

fn period_sheet(
    sheet: &mut Worksheet,
    sheet_name: &str,
    rows: &[SkuRow],
    period: Period,
    kit: &StyleKit,
) -> Result<()> {
    let title = format!("{} PERFORMANCE ANALYSIS", period.label().to_uppercase());
    let mut row = add_title(sheet, 0, 7, &title, kit)?;
    row += 1;

    let ranked = aggregate::rank_by_units(rows, period);
    let totals = aggregate::period_totals(rows, period);

    row = write_headers(
        sheet,
        row,
        &["Size", "Units", "Gross Sales", "Net Sales", "Avg Price"],
        kit,
    )?;
    for (i, sku) in ranked.iter().enumerate() {
        let figures = sku.period(period);
        let alt = i % 2 == 0;
        sheet.write_with_format(row, 0, sku.size(), &kit.cell(alt, NumFmt::Text))?;
        sheet.write_with_format(row, 1, figures.units, &kit.cell(alt, NumFmt::Int))?;
        sheet.write_with_format(row, 2, figures.sales, &kit.cell(alt, NumFmt::Money))?;
        sheet.write_with_format(row, 3, figures.net_sales, &kit.cell(alt, NumFmt::Money))?;
        sheet.write_with_format(row, 4, figures.avg_price, &kit.cell(alt, NumFmt::Money))?;
        row += 1;
    }

    // top-10 feeders in hidden columns I..L
    let top = ranked.len().min(10);
    let feed_start = 2u32;
    for (i, sku) in ranked.iter().take(top).enumerate() {
        let r = feed_start + i as u32;
        let figures = sku.period(period);
        sheet.write(r, 8, sku.size())?;
        sheet.write(r, 9, figures.units)?;
        sheet.write(r, 10, figures.sales)?;
        sheet.write(r, 11, figures.net_sales)?;
    }
    if top > 0 {
        let feed_end = feed_start + top as u32 - 1;
        let bar = bar_chart(sheet_name, "Units Sold by Size (Top 10)", 8, 9, feed_start, feed_end, kit);
        sheet.insert_chart(row + 1, 0, &bar)?;
        let line = gross_net_line(
            sheet_name,
            "Gross vs Net Sales by Size",
            8,
            10,
            11,
            feed_start,
            feed_end,
            kit,
        );
        sheet.insert_chart(row + 19, 0, &line)?;
    }
    for col in 8..=11 {
        sheet.set_column_hidden(col)?;
    }

    let best_size = ranked.first().map(|s| s.size()).unwrap_or_else(|| "N/A".to_string());
    let best_units = ranked.first().map(|s| s.period(period).units).unwrap_or(0.0);
    let commentary = match period {
        Period::Week => format!(
            "7-DAY INSIGHTS: Size {} leads with {:.0} units sold this week. Total weekly \
             revenue is ${:.2} with net sales of ${:.2}. The bar chart shows the distribution \
             of sales across sizes, while the line chart highlights the margin between gross \
             and net sales. Monitor sizes with low movement for potential markdown opportunities.",
            best_size, best_units, totals.sales, totals.net_sales
        ),
        Period::Month => format!(
            "30-DAY INSIGHTS: Size {} is the monthly leader with {:.0} units. Monthly revenue \
             reached ${:.2}. Average selling price is ${:.2}. Compare the sales distribution \
             to identify consistent performers vs. one-time spikes. Sizes appearing in both \
             7D and 30D top performers indicate sustained demand.",
            best_size, best_units, totals.sales, totals.avg_price
        ),
        Period::Quarter => {
            let margin_pct = if totals.sales > 0.0 {
                totals.net_sales / totals.sales * 100.0
            } else {
                0.0
            };
            format!(
                "90-DAY INSIGHTS: Quarterly analysis shows size {} as the top seller with {:.0} \
                 units. Total quarterly revenue is ${:.2} with a net margin of {:.1}%. This \
                 long-term view reveals true demand patterns and should guide inventory planning. \
                 Consider increasing stock for top performers and reviewing slow movers.",
                best_size, best_units, totals.sales, margin_pct
            )
        }
    };
    add_commentary(sheet, row + 37, 7, &commentary, kit)?;

    sheet.autofit();
    Ok(())
}

/// Two-series line chart (gross and net) in the house colors.
#[allow(clippy::too_many_arguments)]
fn gross_net_line(
    sheet_name: &str,
    title: &str,
    cat_col: u16,
    gross_col: u16,
    net_col: u16,
    first_row: u32,
    last_row: u32,
    kit: &StyleKit,
) -> Chart {
    let mut chart = Chart::new(ChartType::Line);
    chart
        .add_series()
        .set_categories((sheet_name, first_row, cat_col, last_row, cat_col))
        .set_values((sheet_name, first_row, gross_col, last_row, gross_col))
        .set_name("Gross Sales")
        .set_format(ChartFormat::new().set_line(ChartLine::new().set_color(kit.maroon()).set_width(2.5)));
    chart
        .add_series()
        .set_categories((sheet_name, first_row, cat_col, last_row, cat_col))
        .set_values((sheet_name, first_row, net_col, last_row, net_col))
        .set_name("Net Sales")
        .set_format(ChartFormat::new().set_line(ChartLine::new().set_color(kit.comment_bg()).set_width(2.5)));
    chart.title().set_name(title);
    chart.set_width(560).set_height(320);
    chart
}

fn comparison_sheet(
    sheet: &mut Worksheet,
    rows: &[SkuRow],
    totals: &[PeriodTotals],
    kit: &StyleKit,
) -> Result<()> {
    let mut row = add_title(sheet, 0, 10, "PERIOD COMPARISON ANALYSIS", kit)?;
    row += 1;

    let ranked = aggregate::rank_by_units(rows, Period::Quarter);

    row = write_headers(
        sheet,
        row,
        &["Size", "7D Units", "7D Sales", "30D Units", "30D Sales", "90D Units", "90D Sales"],
        kit,
    )?;
    for (i, sku) in ranked.iter().enumerate() {
        let alt = i % 2 == 0;
        sheet.write_with_format(row, 0, sku.size(), &kit.cell(alt, NumFmt::Text))?;
        sheet.write_with_format(row, 1, sku.d7_units, &kit.cell(alt, NumFmt::Int))?;
        sheet.write_with_format(row, 2, sku.d7_sales, &kit.cell(alt, NumFmt::Money))?;
        sheet.write_with_format(row, 3, sku.d30_units, &kit.cell(alt, NumFmt::Int))?;
        sheet.write_with_format(row, 4, sku.d30_sales, &kit.cell(alt, NumFmt::Money))?;
        sheet.write_with_format(row, 5, sku.d90_units, &kit.cell(alt, NumFmt::Int))?;
        sheet.write_with_format(row, 6, sku.d90_sales, &kit.cell(alt, NumFmt::Money))?;
        row += 1;
    }

    // per-size units across periods, hidden feeders in K..N
    let top = ranked.len().min(8);
    let feed_start = 2u32;
    for (i, sku) in ranked.iter().take(top).enumerate() {
        let r = feed_start + i as u32;
        sheet.write(r, 10, sku.size())?;
        sheet.write(r, 11, sku.d7_units)?;
        sheet.write(r, 12, sku.d30_units)?;
        sheet.write(r, 13, sku.d90_units)?;
    }
    if top > 0 {
        let feed_end = feed_start + top as u32 - 1;
        let series_fills = [kit.maroon(), Color::RGB(0xFFD700), Color::RGB(0xCD853F)];
        let mut chart = Chart::new(ChartType::Column);
        for (offset, period) in Period::ALL.iter().enumerate() {
            let col = 11 + offset as u16;
            chart
                .add_series()
                .set_categories(("Period Comparison", feed_start, 10, feed_end, 10))
                .set_values(("Period Comparison", feed_start, col, feed_end, col))
                .set_name(period.short())
                .set_format(
                    ChartFormat::new()
                        .set_solid_fill(ChartSolidFill::new().set_color(series_fills[offset])),
                );
        }
        chart.title().set_name("Units by Size Across Periods");
        chart.y_axis().set_name("Units");
        chart.set_width(560).set_height(320);
        sheet.insert_chart(row + 1, 0, &chart)?;
    }

    // overall trajectory over the three windows
    let trend_start = feed_start + 12;
    for (i, t) in totals.iter().enumerate() {
        let r = trend_start + i as u32;
        sheet.write(r, 10, t.period.label())?;
        sheet.write(r, 11, t.sales)?;
    }
    let trend = line_chart(
        "Period Comparison",
        "Sales Trend Across Periods",
        10,
        11,
        trend_start,
        trend_start + totals.len() as u32 - 1,
        kit,
    );
    sheet.insert_chart(row + 19, 0, &trend)?;

    for col in 10..=13 {
        sheet.set_column_hidden(col)?;
    }

    let quarter_sales: f64 = rows.iter().map(|r| r.d90_sales).sum();
    let weekly_rate = quarter_sales / 13.0;
    let recent_rate: f64 = rows.iter().map(|r| r.d7_sales).sum();
    add_commentary(
        sheet,
        row + 37,
        10,
        &format!(
            "TREND ANALYSIS: This view compares performance across all three time periods. \
             Weekly sales rate from 90D average: ${:.2}. Recent 7D rate: ${:.2}. This \
             represents a {:+.1}% velocity change. The bar chart shows how individual sizes \
             perform over time, while the line chart shows overall sales trajectory. \
             Consistent performers across all periods are your core sellers.",
            weekly_rate,
            recent_rate,
            aggregate::velocity_change(rows)
        ),
        kit,
    )?;

    sheet.autofit();
    Ok(())
}
