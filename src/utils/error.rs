use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Upstream API returned {status}: {message}")]
    UpstreamError { status: u16, message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown color name: {color}")]
    UnknownColor { color: String },

    #[error("List '{name}' not found among saved lists")]
    MissingList { name: String },

    #[error("Render error: {message}")]
    RenderError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Upstream,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// 外部服務失敗，稍後重跑可能成功
    Medium,
    /// 設定或資料錯誤，需要使用者修正
    High,
    /// 本機系統錯誤
    Critical,
}

impl ExportError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ExportError::ApiError(_) | ExportError::UpstreamError { .. } => {
                ErrorCategory::Upstream
            }
            ExportError::ConfigError { .. }
            | ExportError::MissingConfigError { .. }
            | ExportError::InvalidConfigValueError { .. }
            | ExportError::UnknownColor { .. } => ErrorCategory::Configuration,
            ExportError::MissingList { .. } | ExportError::SerializationError(_) => {
                ErrorCategory::Data
            }
            ExportError::CsvError(_) | ExportError::IoError(_) | ExportError::RenderError { .. } => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 依嚴重程度決定行程結束碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            ExportError::ApiError(_) => {
                "Check your network connection and try again".to_string()
            }
            ExportError::UpstreamError { status: 401, .. }
            | ExportError::UpstreamError { status: 403, .. } => {
                "Check that the Foursquare token is valid and has not expired".to_string()
            }
            ExportError::UpstreamError { status: 429, .. } => {
                "Rate limit reached, wait a while before running again".to_string()
            }
            ExportError::UpstreamError { .. } => {
                "The Foursquare API rejected the request, try again later".to_string()
            }
            ExportError::MissingConfigError { field } => {
                format!("Provide a value for '{}' in the config file or on the command line", field)
            }
            ExportError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' in the config file", field)
            }
            ExportError::ConfigError { .. } => {
                "Make sure the config file exists and is valid TOML".to_string()
            }
            ExportError::UnknownColor { .. } => {
                "Use a CSS color name such as 'red', 'blue' or 'darkgreen'".to_string()
            }
            ExportError::MissingList { .. } => {
                "Check the list name against the lists printed at startup".to_string()
            }
            ExportError::SerializationError(_) => {
                "The API response had an unexpected shape, rerun with --verbose".to_string()
            }
            ExportError::CsvError(_) | ExportError::IoError(_) | ExportError::RenderError { .. } => {
                "Check that the output path is writable".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Upstream => format!("Foursquare request failed: {}", self),
            ErrorCategory::Data => format!("Unexpected data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ExportError>;
