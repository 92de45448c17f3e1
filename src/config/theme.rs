use crate::render::palette::Rgb;
use crate::utils::error::{ReportError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Visual identity for every artifact: narrative branding, the chart palette,
/// and the workbook color scheme. Defaults match the house style; any part
/// can be overridden from a TOML theme file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub branding: Branding,
    pub palette: Palette,
    pub excel: ExcelScheme,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Branding {
    pub company: String,
    pub report_title: String,
}

/// Chart and PDF colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub primary: Rgb,
    pub secondary: Rgb,
    pub accent: Rgb,
    pub light: Rgb,
    pub dark: Rgb,
    /// Cycle used when a chart needs more series than named colors.
    pub series: Vec<Rgb>,
}

/// Maroon-and-beige scheme for the styled workbooks.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExcelScheme {
    pub background: Rgb,
    pub text: Rgb,
    pub alt_row: Rgb,
    pub header: Rgb,
    pub accent: Rgb,
    pub commentary: Rgb,
}

impl Default for Branding {
    fn default() -> Self {
        Self {
            company: "BUILT DIFFERENT".to_string(),
            report_title: "November 2025 KPI Report".to_string(),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            primary: Rgb::new(0x82, 0x2F, 0x23),
            secondary: Rgb::new(0xD6, 0x7D, 0x63),
            accent: Rgb::new(0xA1, 0x94, 0x5F),
            light: Rgb::new(0xF6, 0xEF, 0xDB),
            dark: Rgb::new(0x1F, 0x29, 0x37),
            series: vec![
                Rgb::new(0x82, 0x2F, 0x23),
                Rgb::new(0xD6, 0x7D, 0x63),
                Rgb::new(0xA1, 0x94, 0x5F),
                Rgb::new(0xF1, 0xA1, 0x9D),
                Rgb::new(0x6B, 0x72, 0x80),
            ],
        }
    }
}

impl Default for ExcelScheme {
    fn default() -> Self {
        Self {
            background: Rgb::new(0x80, 0x00, 0x00),
            text: Rgb::new(0xF5, 0xF5, 0xDC),
            alt_row: Rgb::new(0xA5, 0x2A, 0x2A),
            header: Rgb::new(0x4A, 0x00, 0x00),
            accent: Rgb::new(0xD4, 0xC4, 0xA8),
            commentary: Rgb::new(0x2F, 0x15, 0x15),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            branding: Branding::default(),
            palette: Palette::default(),
            excel: ExcelScheme::default(),
        }
    }
}

impl Theme {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ReportError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let theme: Theme =
            toml::from_str(&processed_content).map_err(|e| ReportError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;

        theme.validate()?;
        Ok(theme)
    }

    /// Expands `${VAR_NAME}` references against the process environment so a
    /// shared theme file can pick up per-deployment branding.
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Series color by index, wrapping around the configured cycle.
    pub fn series_color(&self, index: usize) -> Rgb {
        if self.palette.series.is_empty() {
            self.palette.primary
        } else {
            self.palette.series[index % self.palette.series.len()]
        }
    }
}

impl Validate for Theme {
    fn validate(&self) -> Result<()> {
        if self.palette.series.is_empty() {
            return Err(ReportError::InvalidConfigValueError {
                field: "palette.series".to_string(),
                value: "[]".to_string(),
                reason: "At least one series color is required".to_string(),
            });
        }
        crate::utils::validation::validate_non_empty_string(
            "branding.company",
            &self.branding.company,
        )?;
        crate::utils::validation::validate_non_empty_string(
            "branding.report_title",
            &self.branding.report_title,
        )?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_theme_is_valid() {
        assert!(Theme::default().validate().is_ok());
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let theme = Theme::from_toml_str(
            r##"
            [branding]
            company = "Acme Apparel"

            [palette]
            primary = "#112233"
            "##,
        )
        .unwrap();

        assert_eq!(theme.branding.company, "Acme Apparel");
        assert_eq!(theme.palette.primary, Rgb::new(0x11, 0x22, 0x33));
        // untouched sections keep their defaults
        assert_eq!(theme.excel.background, Rgb::new(0x80, 0x00, 0x00));
        assert_eq!(theme.branding.report_title, "November 2025 KPI Report");
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let result = Theme::from_toml_str(
            r#"
            [palette]
            primary = "not-a-color"
            "#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("REPORT_RECIPES_TEST_COMPANY", "Env Brand");
        let theme = Theme::from_toml_str(
            r#"
            [branding]
            company = "${REPORT_RECIPES_TEST_COMPANY}"
            "#,
        )
        .unwrap();
        assert_eq!(theme.branding.company, "Env Brand");
    }

    #[test]
    fn test_series_color_wraps() {
        let theme = Theme::default();
        let n = theme.palette.series.len();
        assert_eq!(theme.series_color(0), theme.series_color(n));
    }
}
