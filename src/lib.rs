pub mod config;
pub mod core;
pub mod domain;
pub mod recipes;
pub mod render;
pub mod utils;

pub use config::{theme::Theme, CliConfig, RecipeCommand};
pub use core::runner::{RecipeRunner, RunReport};
pub use domain::ports::{Recipe, RecipeContext};
pub use utils::error::{ReportError, Result};
