use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;
use validator::{Validate, ValidationError};

use crate::workbook::SheetLayout;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct AppConfig {
    #[validate]
    pub input: InputConfig,
    #[validate]
    pub layout: SheetLayout,
    #[validate]
    pub output: OutputConfig,
    #[validate]
    pub catalog: CatalogConfig,
    #[validate]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct InputConfig {
    pub directory: PathBuf,
    /// Spreadsheet extension, without the dot. Matched case-insensitively.
    #[validate(custom = "validate_extension")]
    pub extension: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Xls,
    Csv,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Target workbook for the `xls` format.
    pub path: PathBuf,
    /// File prefix for the `csv` format; files are `<prefix>-<sheet>.csv`.
    pub csv_prefix: String,
    #[validate(range(min = 1, max = 65536, message = "Row limit must be between 1 and 65536"))]
    pub max_rows_per_sheet: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CatalogConfig {
    #[validate(url(message = "Catalog page must be an absolute URL"))]
    pub page_url: String,
    #[validate(custom = "validate_not_blank")]
    pub select_id: String,
    pub download_dir: PathBuf,
    #[validate(range(min = 1, message = "Timeout must be at least one second"))]
    pub timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    #[validate(custom = "validate_log_format")]
    pub format: String,
    pub file_path: Option<String>,
}

fn validate_extension(extension: &str) -> Result<(), ValidationError> {
    validate_not_blank(extension.trim_start_matches('.'))
}

fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

fn validate_log_format(format: &str) -> Result<(), ValidationError> {
    match format {
        "json" | "pretty" => Ok(()),
        _ => Err(ValidationError::new("unknown_log_format")),
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        let config = Config::builder()
            // Start with default values
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific config
            .add_source(
                File::with_name(&format!(
                    "config/{}",
                    env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into())
                ))
                .required(false),
            )
            // Add local config (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with FDI prefix
            .add_source(Environment::with_prefix("FDI").separator("__"));

        config.build()?.try_deserialize()
    }
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("fdi-workbooks"),
            extension: "xls".to_string(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Xls,
            path: PathBuf::from("all_data.xls"),
            csv_prefix: "all_data".to_string(),
            max_rows_per_sheet: crate::output::XLS_MAX_ROWS,
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            page_url: "http://unctad.org/en/Pages/DIAE/FDI%20Statistics/FDI-Statistics-Bilateral.aspx"
                .to_string(),
            select_id: "FDIcountriesxls".to_string(),
            download_dir: PathBuf::from("fdi-workbooks"),
            timeout_seconds: 60,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}
