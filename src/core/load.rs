use crate::domain::model::{SalesRow, SkuRow};
use crate::utils::error::{ReportError, Result};
use std::path::Path;

const SALES_COLUMNS: [&str; 8] = [
    "Day",
    "New or returning customer",
    "Orders",
    "Gross sales",
    "Discounts",
    "Net sales",
    "Gross profit",
    "Quantity ordered",
];

const SKU_COLUMNS: [&str; 16] = [
    "SKU",
    "Product Name",
    "Category",
    "Color",
    "7D Units",
    "7D Sales",
    "7D Net Sales",
    "7D Avg Price",
    "30D Units",
    "30D Sales",
    "30D Net Sales",
    "30D Avg Price",
    "90D Units",
    "90D Sales",
    "90D Net Sales",
    "90D Avg Price",
];

/// Column presence is checked up front so a mislabeled export fails with the
/// offending column name instead of a serde field error.
fn check_columns(headers: &csv::StringRecord, required: &[&str]) -> Result<()> {
    for column in required {
        if !headers.iter().any(|h| h == *column) {
            return Err(ReportError::MissingColumnError {
                column: column.to_string(),
            });
        }
    }
    Ok(())
}

pub fn load_sales_rows<P: AsRef<Path>>(path: P) -> Result<Vec<SalesRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    check_columns(reader.headers()?, &SALES_COLUMNS)?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }

    if rows.is_empty() {
        return Err(ReportError::EmptyTableError);
    }

    tracing::debug!("Loaded {} sales rows", rows.len());
    Ok(rows)
}

pub fn load_sku_rows<P: AsRef<Path>>(path: P) -> Result<Vec<SkuRow>> {
    let mut reader = csv::Reader::from_path(path)?;
    check_columns(reader.headers()?, &SKU_COLUMNS)?;

    let mut rows = Vec::new();
    for record in reader.deserialize() {
        rows.push(record?);
    }

    if rows.is_empty() {
        return Err(ReportError::EmptyTableError);
    }

    tracing::debug!("Loaded {} SKU rows", rows.len());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_sales_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Day,New or returning customer,Orders,Gross sales,Discounts,Net sales,Gross profit,Quantity ordered"
        )
        .unwrap();
        writeln!(file, "2025-11-01,New,12,600.50,-30.00,570.50,280.00,20").unwrap();
        writeln!(file, "2025-11-01,Returning,30,1500.00,-75.00,1425.00,700.00,48").unwrap();

        let rows = load_sales_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].orders, 12);
        assert_eq!(rows[1].customer_type, "Returning");
    }

    #[test]
    fn test_missing_column_is_named() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Day,Orders").unwrap();
        writeln!(file, "2025-11-01,12").unwrap();

        match load_sales_rows(file.path()) {
            Err(ReportError::MissingColumnError { column }) => {
                assert_eq!(column, "New or returning customer");
            }
            other => panic!("expected MissingColumnError, got {:?}", other),
        }
    }

    #[test]
    fn test_header_only_file_is_empty() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "Day,New or returning customer,Orders,Gross sales,Discounts,Net sales,Gross profit,Quantity ordered"
        )
        .unwrap();

        assert!(matches!(
            load_sales_rows(file.path()),
            Err(ReportError::EmptyTableError)
        ));
    }

    #[test]
    fn test_load_sku_rows() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "SKU,Product Name,Category,Color,7D Units,7D Sales,7D Net Sales,7D Avg Price,30D Units,30D Sales,30D Net Sales,30D Avg Price,90D Units,90D Sales,90D Net Sales,90D Avg Price"
        )
        .unwrap();
        writeln!(
            file,
            "BD-TEE-32R,Classic Tee,Tops,Maroon,10,300,280,30,40,1200,1100,30,120,3600,3300,30"
        )
        .unwrap();

        let rows = load_sku_rows(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].size(), "32R");
        assert_eq!(rows[0].d30_sales, 1200.0);
    }
}
