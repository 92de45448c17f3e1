use crate::config::theme::Theme;
use crate::utils::error::Result;
use std::path::PathBuf;

/// Everything a recipe needs to run: where the table lives, where artifacts
/// go, and which colors to paint them with.
#[derive(Debug, Clone)]
pub struct RecipeContext {
    pub input: PathBuf,
    pub output_dir: PathBuf,
    pub theme: Theme,
}

impl RecipeContext {
    pub fn artifact_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

/// A self-contained report recipe: load the table, compute its aggregates,
/// write one artifact (or a fixed set of them). Output file names are
/// hard-coded per recipe.
pub trait Recipe {
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Runs the recipe and returns the paths of the artifacts it wrote.
    fn run(&self, ctx: &RecipeContext) -> Result<Vec<PathBuf>>;
}
