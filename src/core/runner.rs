use crate::domain::ports::{Recipe, RecipeContext};
use crate::utils::error::Result;
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

/// What one recipe produced, recorded in the run manifest.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub recipe: String,
    pub artifacts: Vec<PathBuf>,
    pub elapsed_ms: u128,
}

#[derive(Debug, Serialize)]
struct Manifest<'a> {
    generated_at: String,
    input: &'a PathBuf,
    recipes: &'a [RunReport],
}

/// Drives recipes against one context and writes the artifact manifest.
/// The runner owns nothing recipe-specific; every recipe stays a
/// self-contained load -> aggregate -> render unit.
pub struct RecipeRunner {
    ctx: RecipeContext,
}

impl RecipeRunner {
    pub fn new(ctx: RecipeContext) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &RecipeContext {
        &self.ctx
    }

    pub fn run(&self, recipe: &dyn Recipe) -> Result<RunReport> {
        std::fs::create_dir_all(&self.ctx.output_dir)?;

        tracing::info!("Running recipe '{}': {}", recipe.name(), recipe.description());
        let started = Instant::now();
        let artifacts = recipe.run(&self.ctx)?;
        let elapsed_ms = started.elapsed().as_millis();

        for artifact in &artifacts {
            tracing::info!("✓ Saved: {}", artifact.display());
        }
        tracing::info!(
            "Recipe '{}' finished in {} ms ({} artifacts)",
            recipe.name(),
            elapsed_ms,
            artifacts.len()
        );

        Ok(RunReport {
            recipe: recipe.name().to_string(),
            artifacts,
            elapsed_ms,
        })
    }

    pub fn run_all(&self, recipes: &[&dyn Recipe]) -> Result<Vec<RunReport>> {
        let mut reports = Vec::with_capacity(recipes.len());
        for recipe in recipes {
            reports.push(self.run(*recipe)?);
        }
        Ok(reports)
    }

    /// Writes `report_manifest.json` next to the artifacts so a caller can
    /// discover what a run produced without scraping the log.
    pub fn write_manifest(&self, reports: &[RunReport]) -> Result<PathBuf> {
        let manifest = Manifest {
            generated_at: chrono::Utc::now().to_rfc3339(),
            input: &self.ctx.input,
            recipes: reports,
        };

        let path = self.ctx.output_dir.join("report_manifest.json");
        let json = serde_json::to_string_pretty(&manifest)?;
        std::fs::write(&path, json)?;
        tracing::debug!("Manifest written to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::theme::Theme;

    struct NoopRecipe;

    impl Recipe for NoopRecipe {
        fn name(&self) -> &'static str {
            "noop"
        }

        fn description(&self) -> &'static str {
            "writes a single marker file"
        }

        fn run(&self, ctx: &RecipeContext) -> Result<Vec<PathBuf>> {
            let path = ctx.artifact_path("marker.txt");
            std::fs::write(&path, "ok")?;
            Ok(vec![path])
        }
    }

    #[test]
    fn test_runner_creates_output_dir_and_manifest() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let out = temp_dir.path().join("nested").join("out");
        let ctx = RecipeContext {
            input: PathBuf::from("data.csv"),
            output_dir: out.clone(),
            theme: Theme::default(),
        };

        let runner = RecipeRunner::new(ctx);
        let report = runner.run(&NoopRecipe).unwrap();
        assert_eq!(report.recipe, "noop");
        assert!(out.join("marker.txt").exists());

        let manifest_path = runner.write_manifest(&[report]).unwrap();
        let manifest: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(manifest_path).unwrap()).unwrap();
        assert_eq!(manifest["recipes"][0]["recipe"], "noop");
    }
}
