use crate::utils::error::{CityInfoError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;

const DEFAULT_BIND_ADDRESS: &str = "127.0.0.1:5000";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON snapshot written on every commit. In-memory only when unset.
    pub snapshot_path: Option<String>,
    #[serde(default = "default_true")]
    pub seed_sample_data: bool,
    #[serde(default)]
    pub reset_on_startup: bool,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            snapshot_path: None,
            seed_sample_data: true,
            reset_on_startup: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    pub to: String,
    pub from: String,
    pub webhook_url: Option<String>,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            to: "admin@mycompany.com".to_string(),
            from: "noreply@mycompany.com".to_string(),
            webhook_url: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Compact,
        }
    }
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CityInfoError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CityInfoError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${MAIL_WEBHOOK_URL})
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CityInfoError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_socket_addr("server.bind_address", &self.server.bind_address)?;

        if let Some(path) = &self.storage.snapshot_path {
            validation::validate_path("storage.snapshot_path", path)?;
        }

        validation::validate_non_empty_string("mail.to", &self.mail.to)?;
        validation::validate_non_empty_string("mail.from", &self.mail.from)?;
        if let Some(url) = &self.mail.webhook_url {
            validation::validate_url("mail.webhook_url", url)?;
        }

        validation::validate_one_of("logging.level", &self.logging.level, &LOG_LEVELS)?;

        Ok(())
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        validation::validate_socket_addr("server.bind_address", &self.server.bind_address)
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
