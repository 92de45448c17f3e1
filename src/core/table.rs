use crate::utils::error::{ReportError, Result};
use std::path::Path;

/// A parsed cell of an arbitrary CSV. Numbers are detected by parsing; a
/// column where every non-empty cell parses is treated as numeric.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Number(f64),
    Text(String),
    Empty,
}

impl Value {
    fn parse(raw: &str) -> Value {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Value::Empty;
        }
        match trimmed.parse::<f64>() {
            Ok(n) => Value::Number(n),
            Err(_) => Value::Text(trimmed.to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn display(&self) -> String {
        match self {
            Value::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{}", *n as i64)
                } else {
                    format!("{:.2}", n)
                }
            }
            Value::Text(s) => s.clone(),
            Value::Empty => String::new(),
        }
    }
}

/// Rectangular table with named columns, the input for the generic styled
/// analysis workbook.
#[derive(Debug, Clone)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Table> {
        let mut reader = csv::Reader::from_path(path)?;
        let columns: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(Value::parse).collect());
        }

        if rows.is_empty() {
            return Err(ReportError::EmptyTableError);
        }

        Ok(Table { columns, rows })
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Indices of columns where every non-empty cell is a number and at
    /// least one number is present.
    pub fn numeric_columns(&self) -> Vec<usize> {
        (0..self.columns.len())
            .filter(|&col| {
                let mut saw_number = false;
                for row in &self.rows {
                    match row.get(col) {
                        Some(Value::Number(_)) => saw_number = true,
                        Some(Value::Text(_)) => return false,
                        _ => {}
                    }
                }
                saw_number
            })
            .collect()
    }

    pub fn categorical_columns(&self) -> Vec<usize> {
        let numeric: Vec<usize> = self.numeric_columns();
        (0..self.columns.len())
            .filter(|col| !numeric.contains(col))
            .collect()
    }

    /// All numeric values in a column, skipping empty cells.
    pub fn numeric_values(&self, col: usize) -> Vec<f64> {
        self.rows
            .iter()
            .filter_map(|row| row.get(col).and_then(Value::as_number))
            .collect()
    }

    /// Row indices sorted descending by the numeric value in `col`.
    pub fn top_n_by(&self, col: usize, n: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..self.rows.len()).collect();
        indices.sort_by(|&a, &b| {
            let va = self.rows[a].get(col).and_then(Value::as_number);
            let vb = self.rows[b].get(col).and_then(Value::as_number);
            vb.partial_cmp(&va).unwrap_or(std::cmp::Ordering::Equal)
        });
        indices.truncate(n);
        indices
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn sample_table() -> Table {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Region,Revenue,Units,Note").unwrap();
        writeln!(file, "North,1200.5,30,solid").unwrap();
        writeln!(file, "South,800,20,").unwrap();
        writeln!(file, "East,2400,55,spike").unwrap();
        Table::from_csv_path(file.path()).unwrap()
    }

    #[test]
    fn test_numeric_detection() {
        let table = sample_table();
        assert_eq!(table.numeric_columns(), vec![1, 2]);
        assert_eq!(table.categorical_columns(), vec![0, 3]);
    }

    #[test]
    fn test_numeric_values_skip_empties() {
        let table = sample_table();
        assert_eq!(table.numeric_values(1), vec![1200.5, 800.0, 2400.0]);
    }

    #[test]
    fn test_top_n_by() {
        let table = sample_table();
        let top = table.top_n_by(1, 2);
        assert_eq!(top, vec![2, 0]);
    }

    #[test]
    fn test_empty_csv_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Region,Revenue").unwrap();
        let result = Table::from_csv_path(file.path());
        assert!(matches!(result, Err(ReportError::EmptyTableError)));
    }

    #[test]
    fn test_value_display() {
        assert_eq!(Value::Number(42.0).display(), "42");
        assert_eq!(Value::Number(42.5).display(), "42.50");
        assert_eq!(Value::Text("abc".to_string()).display(), "abc");
        assert_eq!(Value::Empty.display(), "");
    }
}
