//! Chart builders on top of plotters. Every function renders one PNG with
//! the house styling: white background, brand palette, 150-dpi geometry.

use crate::config::theme::Theme;
use crate::core::aggregate::{PeriodAverages, WeekdayPivot, WEEKDAY_LABELS};
use crate::domain::model::{DailySummary, SegmentSummary};
use crate::render::palette::heat_ramp;
use crate::utils::error::{ReportError, Result};
use chrono::NaiveDate;
use plotters::element::Pie;
use plotters::prelude::*;
use plotters::series::DashedLineSeries;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::path::Path;

const WIDE: (u32, u32) = (1800, 750);
const BANNER: (u32, u32) = (1500, 600);
const SQUARE: (u32, u32) = (1500, 900);

fn ensure_data(daily: &[DailySummary]) -> Result<()> {
    if daily.is_empty() {
        Err(ReportError::EmptyTableError)
    } else {
        Ok(())
    }
}

fn x_range(n: usize) -> std::ops::Range<f64> {
    -0.5..(n as f64 - 0.5)
}

fn date_label(daily: &[DailySummary], x: &f64) -> String {
    let idx = x.round();
    if idx < 0.0 {
        return String::new();
    }
    daily
        .get(idx as usize)
        .map(|d| d.day.format("%b %d").to_string())
        .unwrap_or_default()
}

fn max_of(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(0.0f64, f64::max).max(1.0)
}

/// Gross-sales time series: filled area under a marked line, with a dashed
/// average line labelled on the right.
pub fn daily_sales_line(
    daily: &[DailySummary],
    theme: &Theme,
    path: &Path,
    title: &str,
    size: Option<(u32, u32)>,
) -> Result<()> {
    ensure_data(daily)?;

    let primary = theme.palette.primary.plotters();
    let secondary = theme.palette.secondary.plotters();
    let accent = theme.palette.accent.plotters();

    let y_max = max_of(daily.iter().map(|d| d.gross_sales)) * 1.1;
    let avg = daily.iter().map(|d| d.gross_sales).sum::<f64>() / daily.len() as f64;

    let root = BitMapBackend::new(path, size.unwrap_or(WIDE)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30).into_font().color(&primary))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range(daily.len()), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Date")
        .y_desc("Gross Sales ($)")
        .x_label_formatter(&|x| date_label(daily, x))
        .y_label_formatter(&|y| format!("${:.0}K", y / 1000.0))
        .x_labels(daily.len().min(10))
        .draw()?;

    let points: Vec<(f64, f64)> = daily
        .iter()
        .enumerate()
        .map(|(i, d)| (i as f64, d.gross_sales))
        .collect();

    chart.draw_series(AreaSeries::new(points.clone(), 0.0, secondary.mix(0.3)))?;
    chart.draw_series(LineSeries::new(points.clone(), primary.stroke_width(3)))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, primary.filled())),
    )?;

    // average reference line
    chart.draw_series(DashedLineSeries::new(
        vec![(-0.5, avg), (daily.len() as f64 - 0.5, avg)],
        8,
        5,
        accent.stroke_width(2),
    ))?;
    chart.draw_series(std::iter::once(Text::new(
        format!("Avg: ${:.0}K", avg / 1000.0),
        (daily.len() as f64 - 0.6, avg + y_max * 0.02),
        ("sans-serif", 20)
            .into_font()
            .color(&accent)
            .pos(Pos::new(HPos::Right, VPos::Bottom)),
    )))?;

    root.present()?;
    Ok(())
}

/// Daily order bars. Days on or after `highlight_from` use the primary brand
/// color; the peak day gets an annotation.
pub fn daily_orders_bar(
    daily: &[DailySummary],
    theme: &Theme,
    path: &Path,
    title: &str,
    highlight_from: Option<NaiveDate>,
    size: Option<(u32, u32)>,
) -> Result<()> {
    ensure_data(daily)?;

    let primary = theme.palette.primary.plotters();
    let secondary = theme.palette.secondary.plotters();

    let y_max = max_of(daily.iter().map(|d| d.orders as f64)) * 1.15;

    let root = BitMapBackend::new(path, size.unwrap_or(WIDE)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30).into_font().color(&primary))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range(daily.len()), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Date")
        .y_desc("Orders")
        .x_label_formatter(&|x| date_label(daily, x))
        .x_labels(daily.len().min(10))
        .draw()?;

    chart.draw_series(daily.iter().enumerate().map(|(i, d)| {
        let highlighted = highlight_from.map(|b| d.day >= b).unwrap_or(false);
        let color = if highlighted { primary } else { secondary };
        Rectangle::new(
            [(i as f64 - 0.4, 0.0), (i as f64 + 0.4, d.orders as f64)],
            color.filled(),
        )
    }))?;

    if let Some((peak_idx, peak)) = daily
        .iter()
        .enumerate()
        .max_by_key(|(_, d)| d.orders)
        .filter(|(_, d)| d.orders > 0)
    {
        chart.draw_series(std::iter::once(Text::new(
            format!("Peak: {}", peak.orders),
            (peak_idx as f64, peak.orders as f64 + y_max * 0.03),
            ("sans-serif", 22)
                .into_font()
                .color(&primary)
                .pos(Pos::new(HPos::Center, VPos::Bottom)),
        )))?;
    }

    root.present()?;
    Ok(())
}

/// Order bars against a gross-sales line on a secondary axis ($K).
pub fn orders_vs_revenue(daily: &[DailySummary], theme: &Theme, path: &Path) -> Result<()> {
    ensure_data(daily)?;

    let primary = theme.palette.primary.plotters();
    let secondary = theme.palette.secondary.plotters();

    let orders_max = max_of(daily.iter().map(|d| d.orders as f64)) * 1.15;
    let sales_k_max = max_of(daily.iter().map(|d| d.gross_sales / 1000.0)) * 1.15;

    let root = BitMapBackend::new(path, WIDE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Orders vs Revenue",
            ("sans-serif", 30).into_font().color(&primary),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .right_y_label_area_size(70)
        .build_cartesian_2d(x_range(daily.len()), 0f64..orders_max)?
        .set_secondary_coord(x_range(daily.len()), 0f64..sales_k_max);

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Date")
        .y_desc("Orders")
        .x_label_formatter(&|x| date_label(daily, x))
        .x_labels(daily.len().min(10))
        .draw()?;

    chart
        .configure_secondary_axes()
        .y_desc("Gross Sales ($K)")
        .draw()?;

    chart
        .draw_series(daily.iter().enumerate().map(|(i, d)| {
            Rectangle::new(
                [(i as f64 - 0.4, 0.0), (i as f64 + 0.4, d.orders as f64)],
                secondary.mix(0.7).filled(),
            )
        }))?
        .label("Orders")
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], secondary.filled()));

    let sales: Vec<(f64, f64)> = daily
        .iter()
        .enumerate()
        .map(|(i, d)| (i as f64, d.gross_sales / 1000.0))
        .collect();

    chart
        .draw_secondary_series(LineSeries::new(sales.clone(), primary.stroke_width(3)))?
        .label("Sales ($K)")
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], primary.stroke_width(3)));
    chart.draw_secondary_series(
        sales
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, primary.filled())),
    )?;

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Two side-by-side pies: share of orders and share of revenue by customer
/// segment, with percentage labels.
pub fn segment_pies(segments: &[SegmentSummary], theme: &Theme, path: &Path) -> Result<()> {
    if segments.is_empty() {
        return Err(ReportError::EmptyTableError);
    }

    let primary = theme.palette.primary.plotters();

    let root = BitMapBackend::new(path, WIDE).into_drawing_area();
    root.fill(&WHITE)?;
    let halves = root.split_evenly((1, 2));

    let labels: Vec<String> = segments.iter().map(|s| s.segment.clone()).collect();
    let colors: Vec<RGBColor> = segments
        .iter()
        .enumerate()
        .map(|(i, _)| theme.series_color(i + 1).plotters())
        .collect();

    let panels: [(&str, Vec<f64>); 2] = [
        (
            "Orders by Customer Type",
            segments.iter().map(|s| s.orders as f64).collect(),
        ),
        (
            "Revenue by Customer Type",
            segments.iter().map(|s| s.gross_sales).collect(),
        ),
    ];

    for (area, (title, sizes)) in halves.iter().zip(panels.iter()) {
        let area = area.titled(title, ("sans-serif", 26).into_font().color(&primary))?;
        let (w, h) = area.dim_in_pixel();
        let center = (w as i32 / 2, h as i32 / 2);
        let radius = (w.min(h) as f64) * 0.32;

        let mut pie = Pie::new(&center, &radius, sizes, &colors, &labels);
        pie.start_angle(-90.0);
        pie.label_style(("sans-serif", 22).into_font().color(&theme.palette.dark.plotters()));
        pie.percentages(("sans-serif", 20).into_font().color(&WHITE));
        area.draw(&pie)?;
    }

    root.present()?;
    Ok(())
}

/// Pre-period vs post-period grouped bars over the three headline metrics,
/// with value labels above each bar.
pub fn period_comparison(
    pre: &PeriodAverages,
    post: &PeriodAverages,
    pre_label: &str,
    post_label: &str,
    title: &str,
    theme: &Theme,
    path: &Path,
) -> Result<()> {
    let primary = theme.palette.primary.plotters();
    let accent = theme.palette.accent.plotters();

    let metrics = ["Avg Daily Orders", "Avg Daily Sales ($K)", "Avg AOV ($)"];
    let pre_vals = [pre.avg_orders, pre.avg_sales / 1000.0, pre.avg_aov];
    let post_vals = [post.avg_orders, post.avg_sales / 1000.0, post.avg_aov];

    let y_max = max_of(pre_vals.iter().chain(post_vals.iter()).copied()) * 1.2;

    let root = BitMapBackend::new(path, SQUARE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30).into_font().color(&primary))
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(-0.5f64..2.5f64, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .y_desc("Value")
        .x_label_formatter(&|x| {
            let idx = x.round();
            if !(0.0..=2.0).contains(&idx) {
                return String::new();
            }
            metrics[idx as usize].to_string()
        })
        .x_labels(3)
        .draw()?;

    let width = 0.35;
    let groups: [(&str, &[f64; 3], RGBColor, f64); 2] = [
        (pre_label, &pre_vals, accent, -width / 2.0),
        (post_label, &post_vals, primary, width / 2.0),
    ];

    for (label, values, color, offset) in groups {
        chart
            .draw_series(values.iter().enumerate().map(|(i, &v)| {
                let x = i as f64 + offset;
                Rectangle::new([(x - width / 2.0, 0.0), (x + width / 2.0, v)], color.filled())
            }))?
            .label(label)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 12, y + 5)], color.filled()));

        chart.draw_series(values.iter().enumerate().map(|(i, &v)| {
            Text::new(
                format!("{:.0}", v),
                (i as f64 + offset, v + y_max * 0.015),
                ("sans-serif", 20)
                    .into_font()
                    .color(&theme.palette.dark.plotters())
                    .pos(Pos::new(HPos::Center, VPos::Bottom)),
            )
        }))?;
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Weekday name for a heatmap tick at `y`, where rows are centered on
/// integer coordinates and Monday renders in the top row.
fn weekday_at(y: f64) -> Option<&'static str> {
    let idx = 6.0 - y.round();
    if (0.0..=6.0).contains(&idx) {
        Some(WEEKDAY_LABELS[idx as usize])
    } else {
        None
    }
}

/// Day-of-week by ISO-week heatmap of order counts. Cell labels flip to
/// white once the fill gets dark enough to swallow black text.
pub fn weekday_heatmap(pivot: &WeekdayPivot, theme: &Theme, path: &Path) -> Result<()> {
    if pivot.weeks.is_empty() {
        return Err(ReportError::EmptyTableError);
    }

    let primary = theme.palette.primary.plotters();
    let cols = pivot.weeks.len();

    let max_orders = pivot
        .values
        .iter()
        .flatten()
        .filter_map(|v| *v)
        .max()
        .unwrap_or(1)
        .max(1) as f64;

    let root = BitMapBackend::new(path, SQUARE).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Orders by Day of Week & Week Number",
            ("sans-serif", 30).into_font().color(&primary),
        )
        .margin(15)
        .x_label_area_size(45)
        .y_label_area_size(110)
        .build_cartesian_2d(x_range(cols), x_range(7))?;

    // Cells sit centered on integer coordinates so the axis ticks label
    // row and column centers rather than cell edges.
    chart
        .configure_mesh()
        .disable_mesh()
        .x_label_formatter(&|x| {
            let idx = x.round();
            if idx < 0.0 {
                return String::new();
            }
            pivot
                .weeks
                .get(idx as usize)
                .map(|w| format!("Week {}", w))
                .unwrap_or_default()
        })
        .y_label_formatter(&|y| weekday_at(*y).unwrap_or_default().to_string())
        .x_labels(cols)
        .y_labels(7)
        .draw()?;

    for (weekday, row) in pivot.values.iter().enumerate() {
        let y = 6.0 - weekday as f64;
        for (col, cell) in row.iter().enumerate() {
            let x = col as f64;
            match cell {
                Some(orders) => {
                    let fill = heat_ramp(*orders as f64 / max_orders);
                    chart.draw_series(std::iter::once(Rectangle::new(
                        [(x - 0.48, y - 0.48), (x + 0.48, y + 0.48)],
                        fill.plotters().filled(),
                    )))?;

                    let text_color = if fill.luminance() < 0.55 { WHITE } else { BLACK };
                    chart.draw_series(std::iter::once(Text::new(
                        orders.to_string(),
                        (x, y),
                        ("sans-serif", 22)
                            .into_font()
                            .color(&text_color)
                            .pos(Pos::new(HPos::Center, VPos::Center)),
                    )))?;
                }
                None => {
                    chart.draw_series(std::iter::once(Rectangle::new(
                        [(x - 0.48, y - 0.48), (x + 0.48, y + 0.48)],
                        RGBColor(0xF3, 0xF4, 0xF6).filled(),
                    )))?;
                }
            }
        }
    }

    root.present()?;
    Ok(())
}

/// AOV per day with a dashed average reference line and legend entry.
pub fn aov_trend(daily: &[DailySummary], theme: &Theme, path: &Path) -> Result<()> {
    ensure_data(daily)?;

    let primary = theme.palette.primary.plotters();
    let accent = theme.palette.accent.plotters();

    let aov: Vec<f64> = daily.iter().map(|d| d.aov()).collect();
    let avg = aov.iter().sum::<f64>() / aov.len() as f64;
    let y_max = max_of(aov.iter().copied()) * 1.15;

    let root = BitMapBackend::new(path, BANNER).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            "Average Order Value Trend",
            ("sans-serif", 28).into_font().color(&primary),
        )
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range(daily.len()), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc("Date")
        .y_desc("Average Order Value ($)")
        .x_label_formatter(&|x| date_label(daily, x))
        .y_label_formatter(&|y| format!("${:.0}", y))
        .x_labels(daily.len().min(10))
        .draw()?;

    let points: Vec<(f64, f64)> = aov.iter().enumerate().map(|(i, &v)| (i as f64, v)).collect();
    chart.draw_series(LineSeries::new(points.clone(), primary.stroke_width(3)))?;
    chart.draw_series(
        points
            .iter()
            .map(|&(x, y)| Circle::new((x, y), 4, primary.filled())),
    )?;

    chart
        .draw_series(DashedLineSeries::new(
            vec![(-0.5, avg), (daily.len() as f64 - 0.5, avg)],
            8,
            5,
            accent.stroke_width(2),
        ))?
        .label(format!("Avg: ${:.2}", avg))
        .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 16, y)], accent.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::aggregate;
    use crate::domain::model::SalesRow;

    fn sample_daily() -> Vec<DailySummary> {
        let rows: Vec<SalesRow> = (1..=10)
            .map(|day| SalesRow {
                day: NaiveDate::from_ymd_opt(2025, 11, day).unwrap(),
                customer_type: "New".to_string(),
                orders: 100 + day as u64 * 7,
                gross_sales: 5_000.0 + day as f64 * 250.0,
                discounts: -200.0,
                net_sales: 4_800.0 + day as f64 * 240.0,
                gross_profit: 2_400.0,
                quantity_ordered: 180,
            })
            .collect();
        aggregate::daily_summary(&rows)
    }

    fn png_signature_ok(path: &Path) -> bool {
        let bytes = std::fs::read(path).unwrap();
        bytes.starts_with(&[0x89, b'P', b'N', b'G'])
    }

    #[test]
    fn test_daily_sales_line_writes_png() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("line.png");
        daily_sales_line(&sample_daily(), &Theme::default(), &path, "Daily Gross Sales", None)
            .unwrap();
        assert!(png_signature_ok(&path));
    }

    #[test]
    fn test_heatmap_writes_png() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("heat.png");
        let pivot = aggregate::weekday_pivot(&sample_daily());
        weekday_heatmap(&pivot, &Theme::default(), &path).unwrap();
        assert!(png_signature_ok(&path));
    }

    #[test]
    fn test_heatmap_ticks_label_row_centers() {
        // Rows are centered on integers 0..=6, Monday on top.
        assert_eq!(weekday_at(6.0), Some("Monday"));
        assert_eq!(weekday_at(0.0), Some("Sunday"));
        assert_eq!(weekday_at(4.0), Some("Wednesday"));
        assert_eq!(weekday_at(7.0), None);
        assert_eq!(weekday_at(-1.0), None);
    }

    #[test]
    fn test_empty_series_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("line.png");
        let result = daily_sales_line(&[], &Theme::default(), &path, "t", None);
        assert!(matches!(result, Err(ReportError::EmptyTableError)));
    }
}
