//! PNG chart pack: six standalone charts from the daily sales table.

use crate::core::aggregate;
use crate::core::load::load_sales_rows;
use crate::domain::ports::{Recipe, RecipeContext};
use crate::utils::error::Result;
use chrono::NaiveDate;
use std::path::PathBuf;
use tracing::debug;

/// First day of the Black Friday weekend, the boundary for all pre/post
/// promo comparisons.
pub const PROMO_BOUNDARY: NaiveDate = match NaiveDate::from_ymd_opt(2025, 11, 28) {
    Some(d) => d,
    None => panic!("invalid boundary date"),
};

pub struct ChartsRecipe;

impl Recipe for ChartsRecipe {
    fn name(&self) -> &'static str {
        "charts"
    }

    fn description(&self) -> &'static str {
        "Render the six-chart PNG pack from the daily sales table"
    }

    fn run(&self, ctx: &RecipeContext) -> Result<Vec<PathBuf>> {
        let rows = load_sales_rows(&ctx.input)?;
        let daily = aggregate::daily_summary(&rows);
        let segments = aggregate::segment_summary(&rows);
        debug!(days = daily.len(), segments = segments.len(), "aggregated sales table");

        let theme = &ctx.theme;
        let mut artifacts = Vec::new();

        let path = ctx.artifact_path("chart_line_sales.png");
        crate::render::charts::daily_sales_line(
            &daily,
            theme,
            &path,
            "Daily Gross Sales - November 2025",
            None,
        )?;
        artifacts.push(path);

        let path = ctx.artifact_path("chart_bar_orders.png");
        crate::render::charts::daily_orders_bar(
            &daily,
            theme,
            &path,
            "Daily Order Volume",
            Some(PROMO_BOUNDARY),
            None,
        )?;
        artifacts.push(path);

        let path = ctx.artifact_path("chart_dual_axis.png");
        crate::render::charts::orders_vs_revenue(&daily, theme, &path)?;
        artifacts.push(path);

        let path = ctx.artifact_path("chart_pie_customers.png");
        crate::render::charts::segment_pies(&segments, theme, &path)?;
        artifacts.push(path);

        let (pre, post) = aggregate::split_daily(&daily, PROMO_BOUNDARY);
        let path = ctx.artifact_path("chart_comparison.png");
        crate::render::charts::period_comparison(
            &aggregate::period_averages(&pre),
            &aggregate::period_averages(&post),
            "Pre-Black Friday",
            "Black Friday Weekend",
            "Pre-Black Friday vs Black Friday Performance",
            theme,
            &path,
        )?;
        artifacts.push(path);

        let path = ctx.artifact_path("chart_heatmap.png");
        crate::render::charts::weekday_heatmap(&aggregate::weekday_pivot(&daily), theme, &path)?;
        artifacts.push(path);

        Ok(artifacts)
    }
}
