//! The report recipes, one per artifact family.

pub mod charts;
pub mod excel_report;
pub mod pdf_report;
pub mod sales_excel;
pub mod styled_excel;

pub use charts::ChartsRecipe;
pub use excel_report::ExcelReportRecipe;
pub use pdf_report::PdfReportRecipe;
pub use sales_excel::SalesExcelRecipe;
pub use styled_excel::StyledExcelRecipe;

use crate::domain::ports::Recipe;

/// Every recipe, in the order `all` runs them.
pub fn all_recipes() -> Vec<Box<dyn Recipe>> {
    vec![
        Box::new(ChartsRecipe),
        Box::new(ExcelReportRecipe),
        Box::new(StyledExcelRecipe),
        Box::new(SalesExcelRecipe),
        Box::new(PdfReportRecipe),
    ]
}
