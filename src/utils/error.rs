use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Unsupported data format: {name}")]
    UnsupportedDataFormat { name: String },

    #[error("Unsupported file type: '{extension}' (expected csv, xls or xlsx)")]
    UnsupportedFileType { extension: String },

    #[error("Invalid upload: {reason}")]
    UploadInvalid { reason: String },

    #[error("Upload too large: {size} bytes exceeds limit of {limit} bytes")]
    UploadTooLarge { size: usize, limit: usize },

    #[error("Failed to read tabular data: {message}")]
    ReadError { message: String },

    #[error("Unsupported template: {name}")]
    UnsupportedTemplate { name: String },

    #[error("Invalid column layout: {message}")]
    InvalidLayout { message: String },

    #[error("Failed to render report: {message}")]
    RenderError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error in '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Configuration,
    Rendering,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl ErrorSeverity {
    /// 程序結束碼；任何錯誤皆不為 0
    pub fn exit_code(&self) -> i32 {
        match self {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

impl ReportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ReportError::UnsupportedDataFormat { .. }
            | ReportError::UnsupportedFileType { .. }
            | ReportError::UploadInvalid { .. }
            | ReportError::UploadTooLarge { .. }
            | ReportError::ReadError { .. } => ErrorCategory::Input,
            ReportError::UnsupportedTemplate { .. }
            | ReportError::InvalidLayout { .. }
            | ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. } => ErrorCategory::Configuration,
            ReportError::RenderError { .. } | ReportError::SerializationError(_) => {
                ErrorCategory::Rendering
            }
            ReportError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::Rendering => ErrorSeverity::Medium,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ReportError::UnsupportedDataFormat { .. } => {
                "Choose a registered data format such as 'standard'"
            }
            ReportError::UnsupportedFileType { .. } => "Upload a .csv, .xls or .xlsx file",
            ReportError::UploadInvalid { .. } => "Select the file again and retry the upload",
            ReportError::UploadTooLarge { .. } => {
                "Split the file or raise report.max_upload_mb in the configuration"
            }
            ReportError::ReadError { .. } => {
                "Check that the file opens in a spreadsheet program and is not corrupted"
            }
            ReportError::UnsupportedTemplate { .. } => "Use one of: basic, detailed, executive",
            ReportError::InvalidLayout { .. } => {
                "Give every field of the format a distinct column position"
            }
            ReportError::RenderError { .. } | ReportError::SerializationError(_) => {
                "Retry the request; if it keeps failing, report the input file"
            }
            ReportError::IoError(_) => "Check file permissions and free disk space",
            ReportError::ConfigValidationError { .. }
            | ReportError::InvalidConfigValueError { .. }
            | ReportError::MissingConfigError { .. } => "Fix the configuration file or CLI flags",
        }
    }

    /// 對外顯示的訊息，不含內部錯誤細節
    pub fn user_friendly_message(&self) -> String {
        match self {
            ReportError::UnsupportedDataFormat { name } => {
                format!("The data format '{}' is not supported.", name)
            }
            ReportError::UnsupportedFileType { .. } => {
                "Unsupported file type. Please upload a CSV or Excel file.".to_string()
            }
            ReportError::UploadInvalid { .. } => "The file upload did not complete.".to_string(),
            ReportError::UploadTooLarge { limit, .. } => format!(
                "The uploaded file is too large (limit is {}).",
                format_size(*limit)
            ),
            ReportError::ReadError { .. } => "The uploaded file could not be read.".to_string(),
            ReportError::UnsupportedTemplate { name } => {
                format!("The report template '{}' is not available.", name)
            }
            ReportError::ConfigValidationError { field, .. }
            | ReportError::InvalidConfigValueError { field, .. }
            | ReportError::MissingConfigError { field } => {
                format!("Invalid configuration for '{}'.", field)
            }
            ReportError::InvalidLayout { .. } => "A data format is misconfigured.".to_string(),
            ReportError::RenderError { .. }
            | ReportError::SerializationError(_)
            | ReportError::IoError(_) => "The report could not be generated.".to_string(),
        }
    }
}

fn format_size(bytes: usize) -> String {
    const KIB: usize = 1024;
    const MIB: usize = 1024 * KIB;
    if bytes >= MIB {
        format!("{} MB", bytes / MIB)
    } else if bytes >= KIB {
        format!("{} KB", bytes / KIB)
    } else {
        format!("{} bytes", bytes)
    }
}

impl From<csv::Error> for ReportError {
    fn from(err: csv::Error) -> Self {
        ReportError::ReadError {
            message: err.to_string(),
        }
    }
}

impl From<lopdf::Error> for ReportError {
    fn from(err: lopdf::Error) -> Self {
        ReportError::RenderError {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
