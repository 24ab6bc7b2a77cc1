use crate::utils::error::{CityInfoError, Result};
use std::net::SocketAddr;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(CityInfoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(CityInfoError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(CityInfoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(CityInfoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(CityInfoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_socket_addr(field_name: &str, value: &str) -> Result<SocketAddr> {
    value
        .parse::<SocketAddr>()
        .map_err(|e| CityInfoError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Invalid socket address: {}", e),
        })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    // 空白視同未設定
    if value.trim().is_empty() {
        return Err(CityInfoError::MissingConfigError {
            field: field_name.to_string(),
        });
    }
    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(CityInfoError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: format!("Value must be one of: {}", allowed.join(", ")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("mail.webhook_url", "https://example.com/hook").is_ok());
        assert!(validate_url("mail.webhook_url", "http://localhost:9000").is_ok());
        assert!(validate_url("mail.webhook_url", "").is_err());
        assert!(validate_url("mail.webhook_url", "invalid-url").is_err());
        assert!(validate_url("mail.webhook_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_socket_addr() {
        let addr = validate_socket_addr("server.bind_address", "127.0.0.1:5000").unwrap();
        assert_eq!(addr.port(), 5000);
        assert!(validate_socket_addr("server.bind_address", "localhost").is_err());
        assert!(validate_socket_addr("server.bind_address", "").is_err());
    }

    #[test]
    fn test_validate_path() {
        assert!(validate_path("storage.snapshot_path", "./data/cities.json").is_ok());
        assert!(validate_path("storage.snapshot_path", "").is_err());
        assert!(validate_path("storage.snapshot_path", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_one_of() {
        assert!(validate_one_of("logging.level", "info", &["info", "debug"]).is_ok());
        let err = validate_one_of("logging.level", "loud", &["info", "debug"]).unwrap_err();
        assert!(err.is_config_error());
    }
}
