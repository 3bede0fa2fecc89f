use thiserror::Error;

#[derive(Error, Debug)]
pub enum FdiError {
    #[error("Malformed header: sheet '{sheet}' has no numeric year cell on row {row}")]
    MalformedHeader { sheet: String, row: usize },

    #[error("Missing region label: sheet '{sheet}' row {row} column {column}")]
    MissingRegionLabel {
        sheet: String,
        row: usize,
        column: usize,
    },

    #[error("Origin not found: workbook '{file}' yields no usable origin label")]
    OriginNotFound { file: String },

    #[error("Workbook '{file}': {source}")]
    Workbook {
        file: String,
        #[source]
        source: Box<FdiError>,
    },

    #[error("Workbook read error: {file} - {message}")]
    WorkbookRead { file: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Output error: {message}")]
    Output { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("External service error: {service} - {message}")]
    ExternalService { service: String, message: String },
}

impl FdiError {
    pub fn malformed_header(sheet: impl Into<String>, row: usize) -> Self {
        Self::MalformedHeader {
            sheet: sheet.into(),
            row,
        }
    }

    pub fn missing_region_label(sheet: impl Into<String>, row: usize, column: usize) -> Self {
        Self::MissingRegionLabel {
            sheet: sheet.into(),
            row,
            column,
        }
    }

    pub fn origin_not_found(file: impl Into<String>) -> Self {
        Self::OriginNotFound { file: file.into() }
    }

    pub fn workbook_read(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::WorkbookRead {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn output(message: impl Into<String>) -> Self {
        Self::Output {
            message: message.into(),
        }
    }

    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ExternalService {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Attach the workbook file name to an error raised while processing it.
    pub fn in_workbook(self, file: impl Into<String>) -> Self {
        match self {
            err @ Self::Workbook { .. } => err,
            err => Self::Workbook {
                file: file.into(),
                source: Box::new(err),
            },
        }
    }

    /// The innermost error, skipping workbook context wrappers.
    pub fn root(&self) -> &FdiError {
        match self {
            Self::Workbook { source, .. } => source.root(),
            err => err,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedHeader { .. } => "MALFORMED_HEADER",
            Self::MissingRegionLabel { .. } => "MISSING_REGION_LABEL",
            Self::OriginNotFound { .. } => "ORIGIN_NOT_FOUND",
            Self::Workbook { source, .. } => source.error_code(),
            Self::WorkbookRead { .. } => "WORKBOOK_READ_ERROR",
            Self::Io(_) => "IO_ERROR",
            Self::Output { .. } => "OUTPUT_ERROR",
            Self::Configuration { .. } => "CONFIGURATION_ERROR",
            Self::ExternalService { .. } => "EXTERNAL_SERVICE_ERROR",
        }
    }

    /// Errors caused by the layout of an input sheet rather than the environment.
    pub fn is_layout_violation(&self) -> bool {
        matches!(
            self.root(),
            Self::MalformedHeader { .. } | Self::MissingRegionLabel { .. } | Self::OriginNotFound { .. }
        )
    }
}

pub type FdiResult<T> = Result<T, FdiError>;

// Conversion from common error types
impl From<csv::Error> for FdiError {
    fn from(error: csv::Error) -> Self {
        Self::output(error.to_string())
    }
}

impl From<reqwest::Error> for FdiError {
    fn from(error: reqwest::Error) -> Self {
        Self::external_service("HTTP Client", error.to_string())
    }
}

impl From<config::ConfigError> for FdiError {
    fn from(error: config::ConfigError) -> Self {
        Self::configuration(error.to_string())
    }
}
