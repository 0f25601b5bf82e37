use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;
use config::{Config, ConfigError};
use tracing::debug;
use crate::models::Locale;

const DEFAULT_CONFIG: &str = "config/default.yaml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub apps: AppsConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub appstore: AppStoreConfig,
    #[serde(default)]
    pub googleplay: GooglePlayConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Storefront pages of the product being collected.
#[derive(Debug, Deserialize, Clone)]
pub struct AppsConfig {
    pub appstore_url: String,
    pub googleplay_url: String,
}

impl Default for AppsConfig {
    fn default() -> Self {
        Self {
            appstore_url: "https://apps.apple.com/kr/app/vrew-%EB%B8%8C%EB%A3%A8/id1477811799".to_string(),
            googleplay_url: "https://play.google.com/store/apps/details?id=com.voyagerx.vrew.android".to_string(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub user_agents: Vec<String>,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// Random extra delay added on top of every inter-request pause.
    #[serde(default)]
    pub delay_jitter_ms: u64,
}

fn default_timeout_secs() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout_secs(),
            user_agents: Vec::new(),
            headers: HashMap::new(),
            delay_jitter_ms: 0,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppStoreConfig {
    #[serde(default = "default_appstore_base")]
    pub base_url: String,
    #[serde(default = "default_countries")]
    pub countries: Vec<String>,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
}

fn default_appstore_base() -> String {
    "https://itunes.apple.com".to_string()
}

fn default_countries() -> Vec<String> {
    vec!["kr".to_string(), "us".to_string(), "jp".to_string()]
}

fn default_max_pages() -> u32 {
    1000
}

fn default_page_delay_ms() -> u64 {
    1000
}

impl Default for AppStoreConfig {
    fn default() -> Self {
        Self {
            base_url: default_appstore_base(),
            countries: default_countries(),
            max_pages: default_max_pages(),
            page_delay_ms: default_page_delay_ms(),
        }
    }
}

impl AppStoreConfig {
    pub fn locales(&self) -> Vec<Locale> {
        self.countries.iter().map(|c| Locale::country(c)).collect()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct GooglePlayConfig {
    #[serde(default = "default_googleplay_base")]
    pub base_url: String,
    #[serde(default = "default_locales")]
    pub locales: Vec<Locale>,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

fn default_googleplay_base() -> String {
    "https://play.google.com".to_string()
}

fn default_locales() -> Vec<Locale> {
    vec![
        Locale::new("ko", "kr"),
        Locale::new("en", "us"),
        Locale::new("ja", "jp"),
    ]
}

fn default_page_size() -> u32 {
    200
}

fn default_request_delay_ms() -> u64 {
    500
}

impl Default for GooglePlayConfig {
    fn default() -> Self {
        Self {
            base_url: default_googleplay_base(),
            locales: default_locales(),
            page_size: default_page_size(),
            request_delay_ms: default_request_delay_ms(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
    #[serde(default)]
    pub parquet: bool,
}

fn default_output_dir() -> String {
    "data".to_string()
}

fn default_file_prefix() -> String {
    "vrew".to_string()
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
            file_prefix: default_file_prefix(),
            parquet: false,
        }
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_path(DEFAULT_CONFIG)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(config::File::from(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("APP").prefix_separator("_").separator("__"));

        let config = builder.build()?;
        let settings: Settings = config.try_deserialize()?;

        debug!(
            appstore_countries = ?settings.appstore.countries,
            googleplay_locales = ?settings.googleplay.locales,
            output_dir = %settings.output.dir,
            "Loaded settings"
        );

        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "appstore:\n  countries: [kr]\n  page_delay_ms: 0\ngoogleplay:\n  locales:\n    - lang: ko\n      country: kr\n"
        )
        .unwrap();

        let settings = Settings::from_path(file.path()).unwrap();
        assert_eq!(settings.appstore.countries, vec!["kr"]);
        assert_eq!(settings.appstore.page_delay_ms, 0);
        assert_eq!(settings.appstore.max_pages, 1000);
        assert_eq!(settings.googleplay.locales, vec![Locale::new("ko", "kr")]);
        assert_eq!(settings.googleplay.page_size, 200);
        assert_eq!(settings.api.timeout_secs, 10);
        assert_eq!(settings.output.file_prefix, "vrew");
    }
}
