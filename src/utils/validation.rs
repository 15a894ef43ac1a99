use crate::utils::error::{EtlError, Result};
use std::collections::HashSet;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

/// reqwest 未啟用 socks，代理只能是 http(s)
pub fn validate_proxy_url(field_name: &str, url_str: &str) -> Result<()> {
    let url = Url::parse(url_str).map_err(|e| EtlError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: url_str.to_string(),
        reason: format!("Invalid proxy URL: {}", e),
    })?;

    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Unsupported proxy scheme: {}", scheme),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

/// 品牌表不可為空，也不可有空白或重複 (不分大小寫) 的品牌
pub fn validate_brand_labels(field_name: &str, labels: &[String]) -> Result<()> {
    if labels.is_empty() {
        return Err(EtlError::ConfigValidationError {
            field: field_name.to_string(),
            message: "Brand table cannot be empty".to_string(),
        });
    }

    let mut seen = HashSet::new();
    for label in labels {
        validate_non_empty_string(field_name, label)?;
        if !seen.insert(label.to_lowercase()) {
            return Err(EtlError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: label.clone(),
                reason: "Brand appears more than once".to_string(),
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("listing_url", "https://www.sauto.cz/inzerce/osobni/").is_ok());
        assert!(validate_url("listing_url", "http://localhost:8080/").is_ok());
        assert!(validate_url("listing_url", "").is_err());
        assert!(validate_url("listing_url", "invalid-url").is_err());
        assert!(validate_url("listing_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_proxy_url() {
        assert!(validate_proxy_url("proxy_url", "http://127.0.0.1:3128").is_ok());
        assert!(validate_proxy_url("proxy_url", "https://proxy.example.com:8443").is_ok());
        assert!(validate_proxy_url("proxy_url", "socks5://127.0.0.1:1080").is_err());
        assert!(validate_proxy_url("proxy_url", "socks5h://127.0.0.1:1080").is_err());
        assert!(validate_proxy_url("proxy_url", "file:///proxy.pac").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("pages", 1u32, 1, 500).is_ok());
        assert!(validate_range("pages", 500u32, 1, 500).is_ok());
        assert!(validate_range("pages", 0u32, 1, 500).is_err());
        assert!(validate_range("pages", 501u32, 1, 500).is_err());
    }

    #[test]
    fn test_validate_brand_labels() {
        let labels = vec!["Kia".to_string(), "Land Rover".to_string()];
        assert!(validate_brand_labels("brands", &labels).is_ok());

        assert!(validate_brand_labels("brands", &[]).is_err());

        let repeated = vec!["BMW".to_string(), "bmw".to_string()];
        assert!(validate_brand_labels("brands", &repeated).is_err());

        let blank = vec!["Audi".to_string(), "  ".to_string()];
        assert!(validate_brand_labels("brands", &blank).is_err());
    }
}
