use crate::core::stats;
use crate::domain::model::{
    ratio, DailySummary, Kpis, Period, SalesRow, SegmentSummary, SkuRow,
};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeMap;

/// Group the raw rows by day and sum every measure. Output is sorted by day.
pub fn daily_summary(rows: &[SalesRow]) -> Vec<DailySummary> {
    let mut by_day: BTreeMap<NaiveDate, DailySummary> = BTreeMap::new();

    for row in rows {
        let entry = by_day.entry(row.day).or_insert_with(|| DailySummary {
            day: row.day,
            orders: 0,
            gross_sales: 0.0,
            discounts: 0.0,
            net_sales: 0.0,
            gross_profit: 0.0,
            quantity_ordered: 0,
        });
        entry.orders += row.orders;
        entry.gross_sales += row.gross_sales;
        entry.discounts += row.discounts;
        entry.net_sales += row.net_sales;
        entry.gross_profit += row.gross_profit;
        entry.quantity_ordered += row.quantity_ordered;
    }

    by_day.into_values().collect()
}

/// Group by customer segment, with each segment's share of total orders and
/// revenue.
pub fn segment_summary(rows: &[SalesRow]) -> Vec<SegmentSummary> {
    let mut by_segment: BTreeMap<String, SegmentSummary> = BTreeMap::new();

    for row in rows {
        let entry = by_segment
            .entry(row.customer_type.clone())
            .or_insert_with(|| SegmentSummary {
                segment: row.customer_type.clone(),
                orders: 0,
                gross_sales: 0.0,
                net_sales: 0.0,
                gross_profit: 0.0,
                pct_of_orders: 0.0,
                pct_of_revenue: 0.0,
            });
        entry.orders += row.orders;
        entry.gross_sales += row.gross_sales;
        entry.net_sales += row.net_sales;
        entry.gross_profit += row.gross_profit;
    }

    let total_orders: u64 = by_segment.values().map(|s| s.orders).sum();
    let total_revenue: f64 = by_segment.values().map(|s| s.gross_sales).sum();

    let mut segments: Vec<SegmentSummary> = by_segment.into_values().collect();
    for segment in &mut segments {
        segment.pct_of_orders = ratio(segment.orders as f64, total_orders as f64);
        segment.pct_of_revenue = ratio(segment.gross_sales, total_revenue);
    }
    segments
}

pub fn kpis(daily: &[DailySummary]) -> Kpis {
    Kpis {
        total_orders: daily.iter().map(|d| d.orders).sum(),
        gross_sales: daily.iter().map(|d| d.gross_sales).sum(),
        net_sales: daily.iter().map(|d| d.net_sales).sum(),
        gross_profit: daily.iter().map(|d| d.gross_profit).sum(),
        items_sold: daily.iter().map(|d| d.quantity_ordered).sum(),
    }
}

/// Split the (sorted) daily series at `boundary`: days before it vs days on
/// or after it. Used for the pre-promo / promo-period comparison.
pub fn split_daily(
    daily: &[DailySummary],
    boundary: NaiveDate,
) -> (Vec<DailySummary>, Vec<DailySummary>) {
    let (pre, post): (Vec<_>, Vec<_>) = daily.iter().cloned().partition(|d| d.day < boundary);
    (pre, post)
}

/// Per-day means over a slice of the daily series.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodAverages {
    pub avg_orders: f64,
    pub avg_sales: f64,
    pub avg_aov: f64,
}

pub fn period_averages(daily: &[DailySummary]) -> PeriodAverages {
    let orders: Vec<f64> = daily.iter().map(|d| d.orders as f64).collect();
    let sales: Vec<f64> = daily.iter().map(|d| d.gross_sales).collect();
    let aov: Vec<f64> = daily.iter().map(|d| d.aov()).collect();
    PeriodAverages {
        avg_orders: stats::mean(&orders),
        avg_sales: stats::mean(&sales),
        avg_aov: stats::mean(&aov),
    }
}

/// Orders pivoted by day-of-week (rows, Monday first) and ISO week number
/// (columns). Cells without a matching day stay `None`.
#[derive(Debug, Clone)]
pub struct WeekdayPivot {
    pub weeks: Vec<u32>,
    /// `values[weekday][week_index]`
    pub values: [Vec<Option<u64>>; 7],
}

pub const WEEKDAY_LABELS: [&str; 7] = [
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];

fn weekday_index(weekday: Weekday) -> usize {
    weekday.num_days_from_monday() as usize
}

pub fn weekday_pivot(daily: &[DailySummary]) -> WeekdayPivot {
    let mut weeks: Vec<u32> = daily.iter().map(|d| d.day.iso_week().week()).collect();
    weeks.sort_unstable();
    weeks.dedup();

    let mut values: [Vec<Option<u64>>; 7] = Default::default();
    for row in &mut values {
        row.resize(weeks.len(), None);
    }

    for day in daily {
        let week = day.day.iso_week().week();
        if let Ok(col) = weeks.binary_search(&week) {
            let cell = &mut values[weekday_index(day.day.weekday())][col];
            *cell = Some(cell.unwrap_or(0) + day.orders);
        }
    }

    WeekdayPivot { weeks, values }
}

/// Totals for one rolling window of the SKU table.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodTotals {
    pub period: Period,
    pub units: f64,
    pub sales: f64,
    pub net_sales: f64,
    pub avg_price: f64,
    pub top_size: Option<String>,
}

pub fn period_totals(rows: &[SkuRow], period: Period) -> PeriodTotals {
    let prices: Vec<f64> = rows.iter().map(|r| r.period(period).avg_price).collect();

    let top_size = rows
        .iter()
        .max_by(|a, b| {
            a.period(period)
                .units
                .partial_cmp(&b.period(period).units)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .filter(|r| r.period(period).units > 0.0)
        .map(|r| r.size());

    PeriodTotals {
        period,
        units: rows.iter().map(|r| r.period(period).units).sum(),
        sales: rows.iter().map(|r| r.period(period).sales).sum(),
        net_sales: rows.iter().map(|r| r.period(period).net_sales).sum(),
        avg_price: stats::mean(&prices),
        top_size,
    }
}

/// Sort SKU rows descending by units sold in the given window.
pub fn rank_by_units(rows: &[SkuRow], period: Period) -> Vec<SkuRow> {
    let mut ranked = rows.to_vec();
    ranked.sort_by(|a, b| {
        b.period(period)
            .units
            .partial_cmp(&a.period(period).units)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    ranked
}

/// Recent weekly sales rate vs the 13-week average, as a signed percentage.
pub fn velocity_change(rows: &[SkuRow]) -> f64 {
    let quarter_sales: f64 = rows.iter().map(|r| r.d90_sales).sum();
    let weekly_rate = quarter_sales / 13.0;
    let recent_rate: f64 = rows.iter().map(|r| r.d7_sales).sum();
    if weekly_rate == 0.0 {
        0.0
    } else {
        (recent_rate / weekly_rate - 1.0) * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 11, day).unwrap()
    }

    fn sales_row(day: u32, segment: &str, orders: u64, gross: f64) -> SalesRow {
        SalesRow {
            day: date(day),
            customer_type: segment.to_string(),
            orders,
            gross_sales: gross,
            discounts: -gross * 0.1,
            net_sales: gross * 0.9,
            gross_profit: gross * 0.45,
            quantity_ordered: orders * 2,
        }
    }

    #[test]
    fn test_daily_summary_merges_segments() {
        let rows = vec![
            sales_row(1, "New", 10, 500.0),
            sales_row(1, "Returning", 30, 1500.0),
            sales_row(2, "New", 20, 900.0),
        ];
        let daily = daily_summary(&rows);
        assert_eq!(daily.len(), 2);
        assert_eq!(daily[0].day, date(1));
        assert_eq!(daily[0].orders, 40);
        assert_eq!(daily[0].gross_sales, 2000.0);
        assert_eq!(daily[1].orders, 20);
    }

    #[test]
    fn test_segment_shares_sum_to_one() {
        let rows = vec![
            sales_row(1, "New", 25, 1000.0),
            sales_row(2, "New", 25, 1000.0),
            sales_row(1, "Returning", 50, 2000.0),
        ];
        let segments = segment_summary(&rows);
        assert_eq!(segments.len(), 2);
        let order_share: f64 = segments.iter().map(|s| s.pct_of_orders).sum();
        let revenue_share: f64 = segments.iter().map(|s| s.pct_of_revenue).sum();
        assert!((order_share - 1.0).abs() < 1e-9);
        assert!((revenue_share - 1.0).abs() < 1e-9);
        // BTreeMap ordering keeps segments alphabetical
        assert_eq!(segments[0].segment, "New");
        assert_eq!(segments[0].pct_of_orders, 0.5);
    }

    #[test]
    fn test_kpis_roll_up() {
        let daily = daily_summary(&[sales_row(1, "New", 10, 500.0), sales_row(2, "New", 30, 700.0)]);
        let k = kpis(&daily);
        assert_eq!(k.total_orders, 40);
        assert_eq!(k.gross_sales, 1200.0);
        assert_eq!(k.items_sold, 80);
        assert_eq!(k.aov(), 30.0);
    }

    #[test]
    fn test_split_daily_boundary_in_post() {
        let daily = daily_summary(&[
            sales_row(26, "New", 10, 100.0),
            sales_row(28, "New", 20, 200.0),
            sales_row(29, "New", 30, 300.0),
        ]);
        let (pre, post) = split_daily(&daily, date(28));
        assert_eq!(pre.len(), 1);
        assert_eq!(post.len(), 2);
        assert_eq!(post[0].day, date(28));
    }

    #[test]
    fn test_weekday_pivot_places_orders() {
        // 2025-11-03 is a Monday in ISO week 45
        let daily = daily_summary(&[
            sales_row(3, "New", 11, 100.0),
            sales_row(4, "New", 22, 100.0),
            sales_row(10, "New", 33, 100.0),
        ]);
        let pivot = weekday_pivot(&daily);
        assert_eq!(pivot.weeks, vec![45, 46]);
        assert_eq!(pivot.values[0][0], Some(11)); // Monday week 45
        assert_eq!(pivot.values[1][0], Some(22)); // Tuesday week 45
        assert_eq!(pivot.values[0][1], Some(33)); // Monday week 46
        assert_eq!(pivot.values[2][0], None);
    }

    fn sku(sku: &str, d7: f64, d90: f64) -> SkuRow {
        SkuRow {
            sku: sku.to_string(),
            product_name: "Tee".to_string(),
            category: "Tops".to_string(),
            color: "Maroon".to_string(),
            d7_units: d7,
            d7_sales: d7 * 30.0,
            d7_net_sales: d7 * 28.0,
            d7_avg_price: 30.0,
            d30_units: d7 * 4.0,
            d30_sales: d7 * 120.0,
            d30_net_sales: d7 * 112.0,
            d30_avg_price: 30.0,
            d90_units: d90,
            d90_sales: d90 * 30.0,
            d90_net_sales: d90 * 28.0,
            d90_avg_price: 30.0,
        }
    }

    #[test]
    fn test_period_totals_and_top_size() {
        let rows = vec![sku("BD-TEE-32R", 5.0, 60.0), sku("BD-TEE-34R", 9.0, 40.0)];
        let totals = period_totals(&rows, Period::Week);
        assert_eq!(totals.units, 14.0);
        assert_eq!(totals.top_size.as_deref(), Some("34R"));

        let quarterly = period_totals(&rows, Period::Quarter);
        assert_eq!(quarterly.top_size.as_deref(), Some("32R"));
    }

    #[test]
    fn test_rank_by_units_descending() {
        let rows = vec![sku("BD-TEE-32R", 5.0, 60.0), sku("BD-TEE-34R", 9.0, 40.0)];
        let ranked = rank_by_units(&rows, Period::Week);
        assert_eq!(ranked[0].sku, "BD-TEE-34R");
    }

    #[test]
    fn test_velocity_change() {
        // 90D sales = 1300 => weekly rate 100; 7D sales = 150 => +50%
        let rows = vec![SkuRow {
            d7_sales: 150.0,
            d90_sales: 1300.0,
            ..sku("BD-TEE-32R", 0.0, 0.0)
        }];
        assert!((velocity_change(&rows) - 50.0).abs() < 1e-9);
        assert_eq!(velocity_change(&[]), 0.0);
    }
}
