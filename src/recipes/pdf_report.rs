//! Narrative KPI report: three chart PNGs plus a paginated PDF that embeds
//! them between computed commentary sections.

use crate::core::aggregate;
use crate::core::load::load_sales_rows;
use crate::domain::ports::{Recipe, RecipeContext};
use crate::render::charts;
use crate::render::pdf::PdfReport;
use crate::utils::error::Result;
use chrono::Utc;
use std::path::PathBuf;

use super::charts::PROMO_BOUNDARY;

const CHART_SIZE: (u32, u32) = (1500, 600);

pub struct PdfReportRecipe;

impl Recipe for PdfReportRecipe {
    fn name(&self) -> &'static str {
        "pdf"
    }

    fn description(&self) -> &'static str {
        "Build november_kpi_report.pdf with embedded charts"
    }

    fn run(&self, ctx: &RecipeContext) -> Result<Vec<PathBuf>> {
        let rows = load_sales_rows(&ctx.input)?;
        let daily = aggregate::daily_summary(&rows);
        let kpis = aggregate::kpis(&daily);
        let theme = &ctx.theme;

        let sales_png = ctx.artifact_path("chart_daily_sales.png");
        charts::daily_sales_line(&daily, theme, &sales_png, "Daily Gross Sales", Some(CHART_SIZE))?;

        let orders_png = ctx.artifact_path("chart_daily_orders.png");
        charts::daily_orders_bar(
            &daily,
            theme,
            &orders_png,
            "Daily Orders",
            Some(PROMO_BOUNDARY),
            Some(CHART_SIZE),
        )?;

        let aov_png = ctx.artifact_path("chart_aov_trend.png");
        charts::aov_trend(&daily, theme, &aov_png)?;

        let gross_margin_pct = kpis.gross_margin() * 100.0;

        let mut report = PdfReport::new(&theme.branding.report_title, theme)?;
        report.title_page(&Utc::now().format("%B %d, %Y").to_string());

        report.heading("Executive Summary");
        report.paragraph(&format!(
            "November 2025 was a record-breaking month for {}. We processed {} orders \
             generating ${:.2} in gross sales and ${:.2} in gross profit.",
            theme.branding.company, kpis.total_orders, kpis.gross_sales, kpis.gross_profit
        ));
        report.paragraph(&format!(
            "Our average order value of ${:.2} and gross margin of {:.1}% demonstrate strong \
             unit economics. The Black Friday period drove exceptional performance, with order \
             volumes significantly exceeding daily averages.",
            kpis.aov(),
            gross_margin_pct
        ));
        report.spacer(4.0);

        report.heading("Key Performance Indicators");
        report.table(
            ("Metric", "Value"),
            &[
                ("Total Orders".to_string(), format_thousands(kpis.total_orders)),
                ("Gross Sales".to_string(), format!("${:.2}", kpis.gross_sales)),
                ("Net Sales".to_string(), format!("${:.2}", kpis.net_sales)),
                ("Gross Profit".to_string(), format!("${:.2}", kpis.gross_profit)),
                ("Gross Margin".to_string(), format!("{:.1}%", gross_margin_pct)),
                ("Average Order Value".to_string(), format!("${:.2}", kpis.aov())),
            ],
        );
        report.page_break();

        report.heading("Sales Performance");
        report.paragraph(
            "The chart below shows daily gross sales throughout November. Notice the \
             significant spike during the Black Friday period (Nov 25-30), demonstrating \
             strong promotional execution.",
        );
        report.image(&sales_png)?;
        report.spacer(4.0);

        report.heading("Order Volume");
        report.paragraph(
            "Daily order counts show clear patterns with weekend peaks and a massive surge \
             during Black Friday. The darker bars highlight the Black Friday promotional period.",
        );
        report.image(&orders_png)?;
        report.page_break();

        report.heading("Average Order Value");
        report.paragraph(
            "AOV remained relatively stable throughout the month, with slight increases \
             during promotional periods as customers took advantage of bundle deals.",
        );
        report.image(&aov_png)?;
        report.spacer(6.0);

        report.heading("Key Takeaways & Recommendations");
        report.paragraph(
            "1. Black Friday Success: The surge in orders demonstrates strong brand demand. \
             Consider extending promotional windows in future years.",
        );
        report.paragraph(
            "2. Inventory Planning: With order volumes reaching 2,000+ per day during peak \
             periods, ensure fulfillment capacity is scaled accordingly for next year.",
        );
        report.paragraph(&format!(
            "3. Margin Protection: Despite heavy promotional activity, gross margins remained \
             healthy at {:.1}%, indicating effective discount strategy.",
            gross_margin_pct
        ));

        let pdf_path = ctx.artifact_path("november_kpi_report.pdf");
        report.save(&pdf_path)?;

        Ok(vec![sales_png, orders_png, aov_png, pdf_path])
    }
}

fn format_thousands(n: u64) -> String {
    let raw = n.to_string();
    let mut out = String::with_capacity(raw.len() + raw.len() / 3);
    for (i, c) in raw.chars().enumerate() {
        if i > 0 && (raw.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }
}
