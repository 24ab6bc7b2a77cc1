use thiserror::Error;

#[derive(Error, Debug)]
pub enum CityInfoError {
    #[error("Notification request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Persistence error: {message}")]
    PersistenceError { message: String },

    #[error("Notification error: {message}")]
    NotificationError { message: String },
}

impl CityInfoError {
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::PersistenceError {
            message: message.into(),
        }
    }

    /// 是否為設定相關錯誤 (啟動時直接退出)
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::ConfigError { .. }
                | Self::InvalidConfigValueError { .. }
                | Self::MissingConfigError { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, CityInfoError>;
