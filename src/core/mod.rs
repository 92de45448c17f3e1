pub mod aggregate;
pub mod load;
pub mod runner;
pub mod stats;
pub mod table;

pub use crate::domain::model::{DailySummary, Kpis, SalesRow, SegmentSummary, SkuRow};
pub use crate::domain::ports::{Recipe, RecipeContext};
pub use crate::utils::error::Result;
pub use runner::{RecipeRunner, RunReport};
