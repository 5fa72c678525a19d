use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";
pub const DEFAULT_HEALTH_INTERVAL_SECS: u64 = 30;

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct HealthConfig {
    pub interval_secs: u64,
}

impl HealthConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    /// Location of the identity file. Empty means the per-user data directory.
    #[serde(default)]
    pub path: String,
}

impl StorageConfig {
    pub fn resolved_path(&self) -> PathBuf {
        if self.path.is_empty() {
            default_storage_path()
        } else {
            PathBuf::from(&self.path)
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub health: HealthConfig,
    pub storage: StorageConfig,
}

impl AppConfig {
    pub fn load(path: &str) -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();

        let settings = config::Config::builder()
            .set_default("api.base_url", DEFAULT_BASE_URL)?
            .set_default("health.interval_secs", DEFAULT_HEALTH_INTERVAL_SECS)?
            .set_default("storage.path", "")?
            .add_source(config::File::with_name(path).required(false))
            .add_source(config::Environment::with_prefix("SUPPORTCHAT").separator("__"))
            .build()?;

        let mut app_config: AppConfig = settings.try_deserialize()?;

        // Expand environment variables if present like ${SUPPORTCHAT_STORAGE}
        app_config.api.base_url = expand_env(&app_config.api.base_url);
        app_config.storage.path = expand_env(&app_config.storage.path);

        if app_config.api.base_url.is_empty() {
            app_config.api.base_url = DEFAULT_BASE_URL.to_string();
        }

        Ok(app_config)
    }
}

fn default_storage_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("supportchat")
        .join("storage.json")
}

fn expand_env(val: &str) -> String {
    if val.starts_with("${") && val.ends_with('}') {
        let var_name = &val[2..val.len() - 1];
        std::env::var(var_name).unwrap_or_default()
    } else {
        val.to_string()
    }
}
