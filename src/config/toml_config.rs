use crate::config::{
    validate_provider, DEFAULT_CURRENCY, DEFAULT_LISTING_URL, DEFAULT_PAGE_PARAM,
    DEFAULT_REPORT_FILENAME, DEFAULT_SNAPSHOT_FILENAME, DEFAULT_TIMEOUT_SECONDS, MAX_PAGES,
};
use crate::core::ConfigProvider;
use crate::domain::model::Variant;
use crate::domain::services::BrandTable;
use crate::utils::error::{EtlError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub source: SourceConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
    pub load: LoadConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub name: String,
    pub description: Option<String>,
    pub version: Option<String>,
    #[serde(default)]
    pub variant: Variant,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceConfig {
    pub listing_url: Option<String>,
    pub page_param: Option<String>,
    pub pages: Option<u32>,
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
    pub request_delay_ms: Option<u64>,
    pub proxy_url: Option<String>,
    pub accept_invalid_certs: Option<bool>,
    pub headers: Option<BTreeMap<String, String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractConfig {
    pub max_items_per_page: Option<usize>,
    pub require_info: Option<bool>,
    /// Ordered; the first matching brand wins.
    pub brands: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    pub output_path: String,
    pub snapshot_filename: Option<String>,
    pub report_filename: Option<String>,
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub json_logs: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(EtlError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| EtlError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${PROXY_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| EtlError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn json_logs(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.json_logs)
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn variant(&self) -> Variant {
        self.pipeline.variant
    }

    fn listing_url(&self) -> &str {
        self.source
            .listing_url
            .as_deref()
            .unwrap_or(DEFAULT_LISTING_URL)
    }

    fn page_param(&self) -> &str {
        self.source
            .page_param
            .as_deref()
            .unwrap_or(DEFAULT_PAGE_PARAM)
    }

    fn pages(&self) -> u32 {
        self.source.pages.unwrap_or(MAX_PAGES)
    }

    fn request_delay(&self) -> Duration {
        Duration::from_millis(self.source.request_delay_ms.unwrap_or(0))
    }

    fn retry_attempts(&self) -> u32 {
        self.source.retry_attempts.unwrap_or(0)
    }

    fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.source.retry_delay_seconds.unwrap_or(1))
    }

    fn max_items_per_page(&self) -> usize {
        self.extract
            .max_items_per_page
            .unwrap_or_else(|| self.variant().default_max_items())
    }

    fn requires_info(&self) -> bool {
        self.extract
            .require_info
            .unwrap_or_else(|| self.variant().requires_info())
    }

    fn brand_table(&self) -> BrandTable {
        match &self.extract.brands {
            Some(brands) => BrandTable::new(brands.iter().map(|brand| brand.trim())),
            None => BrandTable::for_variant(self.variant()),
        }
    }

    fn output_path(&self) -> &str {
        &self.load.output_path
    }

    fn snapshot_filename(&self) -> &str {
        self.load
            .snapshot_filename
            .as_deref()
            .unwrap_or(DEFAULT_SNAPSHOT_FILENAME)
    }

    fn report_filename(&self) -> &str {
        self.load
            .report_filename
            .as_deref()
            .unwrap_or(DEFAULT_REPORT_FILENAME)
    }

    fn currency(&self) -> &str {
        self.load.currency.as_deref().unwrap_or(DEFAULT_CURRENCY)
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.source.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS))
    }

    fn proxy_url(&self) -> Option<&str> {
        self.source.proxy_url.as_deref()
    }

    fn accept_invalid_certs(&self) -> bool {
        self.source.accept_invalid_certs.unwrap_or(false)
    }

    fn headers(&self) -> Vec<(String, String)> {
        self.source
            .headers
            .as_ref()
            .map(|headers| {
                headers
                    .iter()
                    .map(|(k, v)| (k.clone(), v.clone()))
                    .collect()
            })
            .unwrap_or_default()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[pipeline]
name = "sauto-nightly"

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.pipeline.name, "sauto-nightly");
        assert_eq!(config.variant(), Variant::Full);
        assert_eq!(config.listing_url(), DEFAULT_LISTING_URL);
        assert_eq!(config.pages(), 500);
        assert_eq!(config.max_items_per_page(), 17);
        assert!(config.requires_info());
        assert_eq!(config.snapshot_filename(), "scraped_cars.json");
        assert_eq!(config.report_filename(), "sorted_cars.txt");
        assert_eq!(config.currency(), "Kč");
        assert!(!config.monitoring_enabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[pipeline]
name = "sauto-slim"
description = "Quick look at the first pages"
version = "1.0"
variant = "slim"

[source]
listing_url = "https://www.sauto.cz/inzerce/osobni/"
pages = 20
request_delay_ms = 1000
retry_attempts = 2
proxy_url = "http://127.0.0.1:3128"
accept_invalid_certs = true
headers = { "X-Debug" = "1" }

[extract]
brands = ["Alfa Romeo", "Land Rover", "Škoda"]

[load]
output_path = "./slim"
report_filename = "slim.txt"

[monitoring]
enabled = true
json_logs = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.variant(), Variant::Slim);
        assert_eq!(config.pages(), 20);
        assert_eq!(config.max_items_per_page(), 6);
        assert!(!config.requires_info());
        assert_eq!(config.request_delay(), Duration::from_secs(1));
        assert_eq!(config.retry_attempts(), 2);
        assert_eq!(config.proxy_url(), Some("http://127.0.0.1:3128"));
        assert!(config.accept_invalid_certs());
        assert_eq!(config.headers(), vec![("X-Debug".to_string(), "1".to_string())]);
        assert_eq!(config.brand_table().detect("škoda fabia"), "Škoda");
        assert_eq!(config.report_filename(), "slim.txt");
        assert!(config.monitoring_enabled());
        assert!(config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SAUTO_TEST_PROXY", "http://10.0.0.1:8080");

        let toml_content = r#"
[pipeline]
name = "test"

[source]
proxy_url = "${SAUTO_TEST_PROXY}"

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.proxy_url(), Some("http://10.0.0.1:8080"));

        std::env::remove_var("SAUTO_TEST_PROXY");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[pipeline]
name = "test"

[source]
listing_url = "invalid-url"

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());

        let toml_content = r#"
[pipeline]
name = "test"

[extract]
brands = ["BMW", "bmw"]

[load]
output_path = "./output"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_variant_is_rejected() {
        let toml_content = r#"
[pipeline]
name = "test"
variant = "huge"

[load]
output_path = "./output"
"#;
        assert!(TomlConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[pipeline]
name = "file-test"

[source]
pages = 3

[load]
output_path = "./output"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.pipeline.name, "file-test");
        assert_eq!(config.pages(), 3);
    }
}
