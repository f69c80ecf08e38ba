use thiserror::Error;

#[derive(Error, Debug)]
pub enum AcrewityError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("Request failed with status code {status}: {message}")]
    RemoteError { status: u16, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}': {value} ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Unknown resource: {resource}")]
    UnknownResource { resource: String },

    #[error("Operation '{operation}' is not supported by resource '{resource}'")]
    UnsupportedOperation { resource: String, operation: String },

    #[error("Missing required parameter: {field}")]
    MissingParameter { field: String },

    #[error("Invalid value for parameter '{field}': {reason}")]
    InvalidParameter { field: String, reason: String },

    #[error("Item {index}: {source}")]
    ItemFailed {
        index: usize,
        #[source]
        source: Box<AcrewityError>,
    },
}

impl AcrewityError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::ConfigError {
            message: message.into(),
        }
    }

    pub fn invalid_parameter(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// 以項目索引包裝錯誤 (fail-fast 模式)
    pub fn at_item(self, index: usize) -> Self {
        Self::ItemFailed {
            index,
            source: Box::new(self),
        }
    }

    /// 取得原始錯誤 (去除項目索引包裝)
    pub fn root(&self) -> &AcrewityError {
        match self {
            Self::ItemFailed { source, .. } => source.root(),
            other => other,
        }
    }

    /// 寫入 `{error: ...}` 輸出時使用的訊息
    pub fn item_message(&self) -> String {
        self.root().to_string()
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::ItemFailed { index, source } => {
                format!("Item {} failed: {}", index, source.user_friendly_message())
            }
            Self::RemoteError { status: 401, .. } | Self::RemoteError { status: 403, .. } => {
                "The Acrewity API rejected the API key".to_string()
            }
            Self::ApiError(e) if e.is_timeout() => "The Acrewity API did not respond in time".to_string(),
            Self::ApiError(_) => "Could not reach the Acrewity API".to_string(),
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.root() {
            Self::RemoteError { status: 401, .. } | Self::RemoteError { status: 403, .. } => {
                "Check the api_key in [credentials] (keys start with ak_)"
            }
            Self::RemoteError { .. } => "Check the parameters sent for this operation",
            Self::ApiError(_) => "Check network connectivity and the configured base_url",
            Self::IoError(_) => "Check that the input file exists and the output path is writable",
            Self::SerializationError(_) => "Make sure the input file is a valid JSON array",
            Self::ConfigError { .. }
            | Self::InvalidConfigValueError { .. }
            | Self::MissingConfigError { .. } => "Review the node TOML configuration",
            Self::UnknownResource { .. } | Self::UnsupportedOperation { .. } => {
                "Run describe_node to list the supported resources and operations"
            }
            Self::MissingParameter { .. } | Self::InvalidParameter { .. } => {
                "Review the [parameters] table for this resource"
            }
            Self::ItemFailed { .. } => "Re-run with --continue-on-fail to process remaining items",
        }
    }
}

pub type Result<T> = std::result::Result<T, AcrewityError>;
