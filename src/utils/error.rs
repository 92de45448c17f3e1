use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Spreadsheet error: {0}")]
    XlsxError(#[from] rust_xlsxwriter::XlsxError),

    #[error("PDF error: {0}")]
    PdfError(#[from] printpdf::Error),

    #[error("Image decode error: {0}")]
    ImageError(#[from] printpdf::image_crate::ImageError),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Chart rendering error: {message}")]
    ChartError { message: String },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration field: {field}")]
    MissingConfigError { field: String },

    #[error("Data processing error: {message}")]
    DataError { message: String },

    #[error("Missing column '{column}' in input table")]
    MissingColumnError { column: String },

    #[error("Input table contains no data rows")]
    EmptyTableError,
}

pub type Result<T> = std::result::Result<T, ReportError>;

/// Plotters surfaces drawing failures through a generic error kind; collapse
/// it to a message so recipe code can use `?` on every draw call.
impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for ReportError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        ReportError::ChartError {
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Data,
    Rendering,
    System,
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ReportError::CsvError(_)
            | ReportError::DataError { .. }
            | ReportError::MissingColumnError { .. }
            | ReportError::EmptyTableError => ErrorCategory::Data,
            ReportError::XlsxError(_)
            | ReportError::PdfError(_)
            | ReportError::ImageError(_)
            | ReportError::ChartError { .. } => ErrorCategory::Rendering,
            ReportError::IoError(_) | ReportError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ReportError::EmptyTableError => ErrorSeverity::Medium,
            ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. } => ErrorSeverity::High,
            ReportError::CsvError(_)
            | ReportError::DataError { .. }
            | ReportError::MissingColumnError { .. } => ErrorSeverity::High,
            ReportError::XlsxError(_)
            | ReportError::PdfError(_)
            | ReportError::ImageError(_)
            | ReportError::ChartError { .. } => ErrorSeverity::High,
            ReportError::IoError(_) | ReportError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            ReportError::CsvError(e) => format!("The input CSV could not be parsed: {}", e),
            ReportError::MissingColumnError { column } => {
                format!("The input table is missing the '{}' column", column)
            }
            ReportError::EmptyTableError => "The input table has no data rows".to_string(),
            ReportError::ChartError { message } => {
                format!("A chart could not be rendered: {}", message)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => {
                "Check the command line flags and the theme TOML file".to_string()
            }
            ErrorCategory::Data => {
                "Verify the CSV has the expected header row and at least one data row".to_string()
            }
            ErrorCategory::Rendering => {
                "Make sure the output directory is writable and try again".to_string()
            }
            ErrorCategory::System => {
                "Check disk space and file permissions for the output directory".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let err = ReportError::MissingColumnError {
            column: "Orders".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Data);
        assert_eq!(err.severity(), ErrorSeverity::High);

        let err = ReportError::MissingConfigError {
            field: "input".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_user_friendly_message_names_column() {
        let err = ReportError::MissingColumnError {
            column: "Gross sales".to_string(),
        };
        assert!(err.user_friendly_message().contains("Gross sales"));
    }
}
