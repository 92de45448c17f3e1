use report_recipes::recipes::{
    ChartsRecipe, ExcelReportRecipe, PdfReportRecipe, SalesExcelRecipe, StyledExcelRecipe,
};
use report_recipes::{Recipe, RecipeContext, RecipeRunner, Theme};
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;

fn write_sales_csv(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("sales.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "Day,New or returning customer,Orders,Gross sales,Discounts,Net sales,Gross profit,Quantity ordered"
    )
    .unwrap();
    // two segments per day, spanning the Black Friday boundary
    for day in 20..=30 {
        let surge = if day >= 28 { 5 } else { 1 };
        writeln!(
            file,
            "2025-11-{day},New,{orders},{gross:.2},-120.50,{net:.2},{profit:.2},{qty}",
            day = day,
            orders = 180 * surge,
            gross = 9_200.0 * surge as f64,
            net = 8_900.0 * surge as f64,
            profit = 4_100.0 * surge as f64,
            qty = 310 * surge,
        )
        .unwrap();
        writeln!(
            file,
            "2025-11-{day},Returning,{orders},{gross:.2},-80.25,{net:.2},{profit:.2},{qty}",
            day = day,
            orders = 95 * surge,
            gross = 6_400.0 * surge as f64,
            net = 6_100.0 * surge as f64,
            profit = 2_900.0 * surge as f64,
            qty = 150 * surge,
        )
        .unwrap();
    }
    path
}

fn write_sku_csv(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("sku_sales.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "SKU,Product Name,Category,Color,7D Units,7D Sales,7D Net Sales,7D Avg Price,\
         30D Units,30D Sales,30D Net Sales,30D Avg Price,90D Units,90D Sales,90D Net Sales,90D Avg Price"
    )
    .unwrap();
    for (i, size) in ["30R", "32R", "34L", "36S"].iter().enumerate() {
        let scale = (i + 1) as f64;
        writeln!(
            file,
            "BD-CHINO-{size},Classic Chino,Pants,Khaki,\
             {u7},{s7:.2},{n7:.2},98.00,{u30},{s30:.2},{n30:.2},96.50,{u90},{s90:.2},{n90:.2},95.00",
            size = size,
            u7 = 10.0 * scale,
            s7 = 980.0 * scale,
            n7 = 900.0 * scale,
            u30 = 38.0 * scale,
            s30 = 3_650.0 * scale,
            n30 = 3_400.0 * scale,
            u90 = 120.0 * scale,
            s90 = 11_400.0 * scale,
            n90 = 10_700.0 * scale,
        )
        .unwrap();
    }
    path
}

fn write_generic_csv(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("table.csv");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "Region,Revenue,Units,Manager").unwrap();
    for i in 1..=25 {
        writeln!(
            file,
            "Region {i},{rev:.2},{units},Manager {i}",
            i = i,
            rev = 1_000.0 + 250.0 * i as f64,
            units = 40 + i * 3,
        )
        .unwrap();
    }
    path
}

fn context(input: std::path::PathBuf, output_dir: &Path) -> RecipeContext {
    RecipeContext {
        input,
        output_dir: output_dir.to_path_buf(),
        theme: Theme::default(),
    }
}

fn assert_png(path: &Path) {
    let bytes = std::fs::read(path).unwrap();
    assert!(
        bytes.starts_with(&[0x89, b'P', b'N', b'G']),
        "not a PNG: {}",
        path.display()
    );
}

fn xlsx_text(path: &Path) -> String {
    use std::io::Read;
    let data = std::fs::read(path).unwrap();
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor).unwrap();
    let mut text = String::new();
    for i in 0..archive.len() {
        let mut entry = archive.by_index(i).unwrap();
        if entry.name().ends_with(".xml") {
            entry.read_to_string(&mut text).unwrap();
        }
    }
    text
}

fn xlsx_sheet_names(path: &Path) -> Vec<String> {
    let data = std::fs::read(path).unwrap();
    let cursor = std::io::Cursor::new(data);
    let mut archive = zip::ZipArchive::new(cursor).unwrap();
    (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect()
}

#[test]
fn test_charts_recipe_renders_six_pngs() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_sales_csv(temp_dir.path());
    let out = temp_dir.path().join("out");

    let runner = RecipeRunner::new(context(input, &out));
    let report = runner.run(&ChartsRecipe).unwrap();

    assert_eq!(report.recipe, "charts");
    assert_eq!(report.artifacts.len(), 6);
    let names: Vec<&str> = report
        .artifacts
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap())
        .collect();
    assert!(names.contains(&"chart_line_sales.png"));
    assert!(names.contains(&"chart_heatmap.png"));
    for artifact in &report.artifacts {
        assert_png(artifact);
    }
}

#[test]
fn test_excel_recipe_builds_four_sheet_workbook() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_sales_csv(temp_dir.path());
    let out = temp_dir.path().join("out");

    let runner = RecipeRunner::new(context(input, &out));
    let report = runner.run(&ExcelReportRecipe).unwrap();

    assert_eq!(report.artifacts.len(), 1);
    let workbook = &report.artifacts[0];
    assert_eq!(workbook.file_name().unwrap(), "november_2025_report.xlsx");

    let names = xlsx_sheet_names(workbook);
    assert!(names.contains(&"[Content_Types].xml".to_string()));
    for sheet in 1..=4 {
        assert!(
            names.contains(&format!("xl/worksheets/sheet{}.xml", sheet)),
            "missing sheet{} in {:?}",
            sheet,
            names
        );
    }
    // the Charts sheet embeds two charts
    assert!(names.iter().any(|n| n.starts_with("xl/charts/")));
}

#[test]
fn test_styled_excel_recipe_handles_generic_table() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_generic_csv(temp_dir.path());
    let out = temp_dir.path().join("out");

    let runner = RecipeRunner::new(context(input, &out));
    let report = runner.run(&StyledExcelRecipe).unwrap();

    let workbook = &report.artifacts[0];
    assert_eq!(workbook.file_name().unwrap(), "styled_analysis_report.xlsx");
    let names = xlsx_sheet_names(workbook);
    for sheet in 1..=4 {
        assert!(names.contains(&format!("xl/worksheets/sheet{}.xml", sheet)));
    }

    // the statistics sheet carries the full describe layout, quartiles included
    let text = xlsx_text(workbook);
    for header in ["Std Dev", "25%", "Median", "75%"] {
        assert!(text.contains(header), "missing stats header {:?}", header);
    }
}

#[test]
fn test_excel_title_follows_theme_branding() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_sales_csv(temp_dir.path());
    let out = temp_dir.path().join("out");

    let mut ctx = context(input, &out);
    ctx.theme.branding.company = "ACME OUTFITTERS".to_string();
    ctx.theme.branding.report_title = "December Recap".to_string();

    let runner = RecipeRunner::new(ctx);
    let report = runner.run(&ExcelReportRecipe).unwrap();
    let text = xlsx_text(&report.artifacts[0]);
    assert!(text.contains("ACME OUTFITTERS - December Recap"));
}

#[test]
fn test_sales_excel_recipe_builds_five_sheets() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_sku_csv(temp_dir.path());
    let out = temp_dir.path().join("out");

    let runner = RecipeRunner::new(context(input, &out));
    let report = runner.run(&SalesExcelRecipe).unwrap();

    let workbook = &report.artifacts[0];
    assert_eq!(workbook.file_name().unwrap(), "sales_analysis_report.xlsx");
    let names = xlsx_sheet_names(workbook);
    for sheet in 1..=5 {
        assert!(
            names.contains(&format!("xl/worksheets/sheet{}.xml", sheet)),
            "missing sheet{} in {:?}",
            sheet,
            names
        );
    }
}

#[test]
fn test_pdf_recipe_writes_charts_and_report() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_sales_csv(temp_dir.path());
    let out = temp_dir.path().join("out");

    let runner = RecipeRunner::new(context(input, &out));
    let report = runner.run(&PdfReportRecipe).unwrap();

    assert_eq!(report.artifacts.len(), 4);
    for artifact in &report.artifacts {
        match artifact.extension().and_then(|e| e.to_str()) {
            Some("png") => assert_png(artifact),
            Some("pdf") => {
                let bytes = std::fs::read(artifact).unwrap();
                assert!(bytes.starts_with(b"%PDF"));
            }
            other => panic!("unexpected artifact type: {:?}", other),
        }
    }
}

#[test]
fn test_runner_writes_manifest() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_sales_csv(temp_dir.path());
    let out = temp_dir.path().join("out");

    let runner = RecipeRunner::new(context(input, &out));
    let recipes: Vec<Box<dyn Recipe>> = vec![Box::new(ChartsRecipe), Box::new(ExcelReportRecipe)];
    let refs: Vec<&dyn Recipe> = recipes.iter().map(|r| r.as_ref()).collect();
    let reports = runner.run_all(&refs).unwrap();
    let manifest_path = runner.write_manifest(&reports).unwrap();

    assert_eq!(manifest_path.file_name().unwrap(), "report_manifest.json");
    assert!(manifest_path.starts_with(&runner.context().output_dir));
    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&manifest_path).unwrap()).unwrap();
    let recipe_names: Vec<&str> = manifest["recipes"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["recipe"].as_str().unwrap())
        .collect();
    assert_eq!(recipe_names, vec!["charts", "excel"]);
}

#[test]
fn test_missing_column_is_a_structured_error() {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("bad.csv");
    std::fs::write(&input, "Day,Orders\n2025-11-01,10\n").unwrap();
    let out = temp_dir.path().join("out");

    let runner = RecipeRunner::new(context(input, &out));
    let err = runner.run(&ChartsRecipe).unwrap_err();
    assert!(err.to_string().contains("column"));
}
