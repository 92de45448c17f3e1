pub mod theme;

use crate::domain::ports::RecipeContext;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use theme::Theme;

#[derive(Debug, Clone, Parser)]
#[command(name = "report-recipes")]
#[command(about = "Turn a tabular dataset into charts, spreadsheets and PDF reports")]
pub struct CliConfig {
    #[command(subcommand)]
    pub recipe: RecipeCommand,

    /// Path to the input CSV table
    #[arg(long, global = true, default_value = "data.csv")]
    pub input: String,

    /// Directory the artifacts are written to
    #[arg(long, global = true, default_value = "./output")]
    pub output_dir: String,

    /// Optional TOML theme file overriding the built-in branding
    #[arg(long, global = true)]
    pub theme: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, Subcommand)]
pub enum RecipeCommand {
    /// Render the six-chart PNG pack from a daily sales table
    Charts,
    /// Build the branded multi-sheet workbook from a daily sales table
    Excel,
    /// Build the maroon/beige styled workbook from any tabular CSV
    StyledExcel,
    /// Build the per-SKU period workbook from a SKU sales table
    SalesExcel,
    /// Render the narrative PDF report from a daily sales table
    Pdf,
    /// Run every recipe against the same input
    All,
}

impl CliConfig {
    pub fn load_theme(&self) -> Result<Theme> {
        match &self.theme {
            Some(path) => Theme::from_file(path),
            None => Ok(Theme::default()),
        }
    }

    pub fn context(&self) -> Result<RecipeContext> {
        Ok(RecipeContext {
            input: PathBuf::from(&self.input),
            output_dir: PathBuf::from(&self.output_dir),
            theme: self.load_theme()?,
        })
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_file_extension("input", &self.input, &["csv", "tsv"])?;
        validation::validate_path("output_dir", &self.output_dir)?;
        if let Some(theme) = &self.theme {
            validation::validate_path("theme", theme)?;
            validation::validate_file_extension("theme", theme, &["toml"])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(input: &str, theme: Option<&str>) -> CliConfig {
        CliConfig {
            recipe: RecipeCommand::Charts,
            input: input.to_string(),
            output_dir: "./output".to_string(),
            theme: theme.map(|t| t.to_string()),
            verbose: false,
        }
    }

    #[test]
    fn test_validate_accepts_csv_input() {
        assert!(config("sales.csv", None).validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_wrong_extensions() {
        assert!(config("sales.xlsx", None).validate().is_err());
        assert!(config("sales.csv", Some("theme.yaml")).validate().is_err());
    }
}
