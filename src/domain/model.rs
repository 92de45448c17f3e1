use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

/// One row of the daily sales export. Several rows may share a `day`, one per
/// customer segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalesRow {
    #[serde(rename = "Day")]
    pub day: NaiveDate,
    #[serde(rename = "New or returning customer")]
    pub customer_type: String,
    #[serde(rename = "Orders")]
    pub orders: u64,
    #[serde(rename = "Gross sales")]
    pub gross_sales: f64,
    #[serde(rename = "Discounts")]
    pub discounts: f64,
    #[serde(rename = "Net sales")]
    pub net_sales: f64,
    #[serde(rename = "Gross profit")]
    pub gross_profit: f64,
    #[serde(rename = "Quantity ordered")]
    pub quantity_ordered: u64,
}

/// Per-day sums of the sales measures plus the derived ratios the reports
/// display.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub day: NaiveDate,
    pub orders: u64,
    pub gross_sales: f64,
    pub discounts: f64,
    pub net_sales: f64,
    pub gross_profit: f64,
    pub quantity_ordered: u64,
}

impl DailySummary {
    /// Average order value: gross sales per order.
    pub fn aov(&self) -> f64 {
        ratio(self.gross_sales, self.orders as f64)
    }

    pub fn gross_margin(&self) -> f64 {
        ratio(self.gross_profit, self.net_sales)
    }

    pub fn discount_rate(&self) -> f64 {
        ratio(self.discounts.abs(), self.gross_sales)
    }
}

/// Per-customer-segment sums with share-of-total ratios.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentSummary {
    pub segment: String,
    pub orders: u64,
    pub gross_sales: f64,
    pub net_sales: f64,
    pub gross_profit: f64,
    pub pct_of_orders: f64,
    pub pct_of_revenue: f64,
}

impl SegmentSummary {
    pub fn aov(&self) -> f64 {
        ratio(self.gross_sales, self.orders as f64)
    }
}

/// Headline metrics shown at the top of every report.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    pub total_orders: u64,
    pub gross_sales: f64,
    pub net_sales: f64,
    pub gross_profit: f64,
    pub items_sold: u64,
}

impl Kpis {
    pub fn aov(&self) -> f64 {
        ratio(self.gross_sales, self.total_orders as f64)
    }

    pub fn gross_margin(&self) -> f64 {
        ratio(self.gross_profit, self.net_sales)
    }
}

/// Division with an empty-denominator guard. The reports render 0 rather than
/// NaN for a day with no orders or no net sales.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// One row of the per-SKU sales export with rolling-window figures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkuRow {
    #[serde(rename = "SKU")]
    pub sku: String,
    #[serde(rename = "Product Name")]
    pub product_name: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Color")]
    pub color: String,
    #[serde(rename = "7D Units")]
    pub d7_units: f64,
    #[serde(rename = "7D Sales")]
    pub d7_sales: f64,
    #[serde(rename = "7D Net Sales")]
    pub d7_net_sales: f64,
    #[serde(rename = "7D Avg Price")]
    pub d7_avg_price: f64,
    #[serde(rename = "30D Units")]
    pub d30_units: f64,
    #[serde(rename = "30D Sales")]
    pub d30_sales: f64,
    #[serde(rename = "30D Net Sales")]
    pub d30_net_sales: f64,
    #[serde(rename = "30D Avg Price")]
    pub d30_avg_price: f64,
    #[serde(rename = "90D Units")]
    pub d90_units: f64,
    #[serde(rename = "90D Sales")]
    pub d90_sales: f64,
    #[serde(rename = "90D Net Sales")]
    pub d90_net_sales: f64,
    #[serde(rename = "90D Avg Price")]
    pub d90_avg_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PeriodFigures {
    pub units: f64,
    pub sales: f64,
    pub net_sales: f64,
    pub avg_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Week,
    Month,
    Quarter,
}

impl Period {
    pub const ALL: [Period; 3] = [Period::Week, Period::Month, Period::Quarter];

    pub fn label(&self) -> &'static str {
        match self {
            Period::Week => "7 Days",
            Period::Month => "30 Days",
            Period::Quarter => "90 Days",
        }
    }

    pub fn short(&self) -> &'static str {
        match self {
            Period::Week => "7D",
            Period::Month => "30D",
            Period::Quarter => "90D",
        }
    }
}

impl SkuRow {
    pub fn period(&self, period: Period) -> PeriodFigures {
        match period {
            Period::Week => PeriodFigures {
                units: self.d7_units,
                sales: self.d7_sales,
                net_sales: self.d7_net_sales,
                avg_price: self.d7_avg_price,
            },
            Period::Month => PeriodFigures {
                units: self.d30_units,
                sales: self.d30_sales,
                net_sales: self.d30_net_sales,
                avg_price: self.d30_avg_price,
            },
            Period::Quarter => PeriodFigures {
                units: self.d90_units,
                sales: self.d90_sales,
                net_sales: self.d90_net_sales,
                avg_price: self.d90_avg_price,
            },
        }
    }

    /// Size suffix from the SKU, e.g. `BD-TEE-32R` -> `32R`. Falls back to
    /// the last three characters when the suffix does not match.
    pub fn size(&self) -> String {
        static SIZE_RE: OnceLock<Regex> = OnceLock::new();
        let re = SIZE_RE.get_or_init(|| Regex::new(r"-(\d+[RSL]?)$").unwrap());

        match re.captures(&self.sku).and_then(|c| c.get(1)) {
            Some(m) => m.as_str().to_string(),
            None => {
                let chars: Vec<char> = self.sku.chars().collect();
                let start = chars.len().saturating_sub(3);
                chars[start..].iter().collect()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sku_row(sku: &str) -> SkuRow {
        SkuRow {
            sku: sku.to_string(),
            product_name: "Classic Tee".to_string(),
            category: "Tops".to_string(),
            color: "Maroon".to_string(),
            d7_units: 10.0,
            d7_sales: 300.0,
            d7_net_sales: 280.0,
            d7_avg_price: 30.0,
            d30_units: 40.0,
            d30_sales: 1200.0,
            d30_net_sales: 1100.0,
            d30_avg_price: 30.0,
            d90_units: 120.0,
            d90_sales: 3600.0,
            d90_net_sales: 3300.0,
            d90_avg_price: 30.0,
        }
    }

    #[test]
    fn test_size_extraction_from_suffix() {
        assert_eq!(sku_row("BD-TEE-32R").size(), "32R");
        assert_eq!(sku_row("BD-TEE-32").size(), "32");
        assert_eq!(sku_row("BD-TEE-8L").size(), "8L");
    }

    #[test]
    fn test_size_extraction_fallback() {
        assert_eq!(sku_row("ODDSKU").size(), "SKU");
        assert_eq!(sku_row("XS").size(), "XS");
    }

    #[test]
    fn test_ratio_guards_zero_denominator() {
        assert_eq!(ratio(10.0, 0.0), 0.0);
        assert_eq!(ratio(10.0, 4.0), 2.5);
    }

    #[test]
    fn test_daily_summary_derived_metrics() {
        let day = DailySummary {
            day: NaiveDate::from_ymd_opt(2025, 11, 28).unwrap(),
            orders: 200,
            gross_sales: 10_000.0,
            discounts: -500.0,
            net_sales: 9_500.0,
            gross_profit: 4_750.0,
            quantity_ordered: 320,
        };
        assert_eq!(day.aov(), 50.0);
        assert_eq!(day.gross_margin(), 0.5);
        assert_eq!(day.discount_rate(), 0.05);
    }

    #[test]
    fn test_period_figures_selection() {
        let row = sku_row("BD-TEE-32R");
        assert_eq!(row.period(Period::Week).units, 10.0);
        assert_eq!(row.period(Period::Quarter).sales, 3600.0);
        assert_eq!(Period::Month.label(), "30 Days");
    }
}
