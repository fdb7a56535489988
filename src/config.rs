use crate::enhance::EnhanceMode;
use crate::error::CatalogError;
use crate::paginate::PAGE_SIZE;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use url::Url;

pub const DEFAULT_BASE_URL: &str = "https://fakestoreapi.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: Url,
    pub enhance: EnhanceMode,
    pub timeout: Duration,
    pub page_size: usize,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    defaults: ConfigDefaults,
}

#[derive(Debug, Deserialize, Default)]
struct ConfigDefaults {
    base_url: Option<String>,
    enhance: Option<String>,
    timeout_secs: Option<u64>,
    page_size: Option<usize>,
}

impl AppConfig {
    pub fn load(
        base_url: Option<String>,
        enhance: Option<EnhanceMode>,
        timeout_secs: Option<u64>,
    ) -> Result<Self, CatalogError> {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("catalog-cli");
        let file_config = load_config_file(&config_dir);

        Self::resolve(
            base_url,
            enhance,
            timeout_secs,
            EnvOverrides::from_env(),
            file_config,
        )
    }

    // Priority: CLI flags → env vars → config file → defaults
    fn resolve(
        base_url: Option<String>,
        enhance: Option<EnhanceMode>,
        timeout_secs: Option<u64>,
        env: EnvOverrides,
        file_config: ConfigFile,
    ) -> Result<Self, CatalogError> {
        let defaults = file_config.defaults;

        let base_url = base_url
            .or(env.base_url)
            .or(defaults.base_url)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Self::parse_base_url(&base_url)?;

        let enhance = match enhance {
            Some(mode) => mode,
            None => match env.enhance.or(defaults.enhance) {
                Some(raw) => raw.parse()?,
                None => EnhanceMode::default(),
            },
        };

        let timeout_secs = timeout_secs
            .or(env.timeout_secs)
            .or(defaults.timeout_secs)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        let page_size = defaults.page_size.unwrap_or(PAGE_SIZE);
        if page_size == 0 {
            return Err(CatalogError::Config(
                "page_size must be at least 1".to_string(),
            ));
        }

        Ok(AppConfig {
            base_url,
            enhance,
            timeout: Duration::from_secs(timeout_secs),
            page_size,
        })
    }

    pub fn parse_base_url(raw: &str) -> Result<Url, CatalogError> {
        let url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| CatalogError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(CatalogError::InvalidUrl(format!(
                "{}: catalog base URL must use http or https",
                raw
            )));
        }
        if url.cannot_be_a_base() {
            return Err(CatalogError::InvalidUrl(format!(
                "{}: not usable as a base URL",
                raw
            )));
        }
        Ok(url)
    }
}

#[derive(Debug, Default)]
struct EnvOverrides {
    base_url: Option<String>,
    enhance: Option<String>,
    timeout_secs: Option<u64>,
}

impl EnvOverrides {
    fn from_env() -> Self {
        let timeout_secs = std::env::var("CATALOG_TIMEOUT_SECS")
            .ok()
            .and_then(|v| match v.parse() {
                Ok(secs) => Some(secs),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CATALOG_TIMEOUT_SECS: {}", v);
                    None
                }
            });

        Self {
            base_url: std::env::var("CATALOG_BASE_URL").ok(),
            enhance: std::env::var("CATALOG_ENHANCE").ok(),
            timeout_secs,
        }
    }
}

fn load_config_file(config_dir: &Path) -> ConfigFile {
    let config_path = config_dir.join("config.toml");
    if !config_path.exists() {
        return ConfigFile::default();
    }
    match std::fs::read_to_string(&config_path) {
        Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("Ignoring malformed {}: {}", config_path.display(), e);
            ConfigFile::default()
        }),
        Err(_) => ConfigFile::default(),
    }
}
