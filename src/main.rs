use clap::Parser;
use report_recipes::recipes;
use report_recipes::utils::{error::ErrorSeverity, logger, validation::Validate};
use report_recipes::{CliConfig, Recipe, RecipeCommand, RecipeRunner};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting report-recipes CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let ctx = match config.context() {
        Ok(ctx) => ctx,
        Err(e) => {
            tracing::error!("❌ Theme loading failed: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());
            std::process::exit(1);
        }
    };
    let runner = RecipeRunner::new(ctx);

    let result = match config.recipe {
        RecipeCommand::Charts => runner.run(&recipes::ChartsRecipe).map(|r| vec![r]),
        RecipeCommand::Excel => runner.run(&recipes::ExcelReportRecipe).map(|r| vec![r]),
        RecipeCommand::StyledExcel => runner.run(&recipes::StyledExcelRecipe).map(|r| vec![r]),
        RecipeCommand::SalesExcel => runner.run(&recipes::SalesExcelRecipe).map(|r| vec![r]),
        RecipeCommand::Pdf => runner.run(&recipes::PdfReportRecipe).map(|r| vec![r]),
        RecipeCommand::All => {
            let boxed = recipes::all_recipes();
            let refs: Vec<&dyn Recipe> = boxed.iter().map(|r| r.as_ref()).collect();
            runner.run_all(&refs)
        }
    };

    match result {
        Ok(reports) => {
            let manifest = runner.write_manifest(&reports)?;
            let artifacts: usize = reports.iter().map(|r| r.artifacts.len()).sum();
            tracing::info!("✅ Report generation completed successfully!");
            tracing::info!("📁 Wrote {} artifacts to {}", artifacts, config.output_dir);
            println!("✅ Report generation completed successfully!");
            println!("📁 {} artifacts in {}", artifacts, config.output_dir);
            println!("📁 Manifest: {}", manifest.display());
        }
        Err(e) => {
            tracing::error!(
                "❌ Report generation failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}
