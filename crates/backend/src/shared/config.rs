use once_cell::sync::OnceCell;
use serde::Deserialize;

use super::stages::StageCatalog;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub liaison: LiaisonConfig,
    /// Stage colors and success set; defaults cover the current pipeline
    #[serde(default)]
    pub stages: StageCatalog,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LiaisonConfig {
    pub base_url: String,
    /// Opaque bearer token, passed through to the manifest service as-is
    pub token: String,
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_window_days() -> u32 {
    3
}

fn default_page_size() -> i64 {
    100
}

fn default_timeout_secs() -> u64 {
    30
}

/// Default configuration embedded in the binary
const DEFAULT_CONFIG: &str = r#"
[liaison]
base_url = "https://jenni.alzaeemexp.com"
token = ""
window_days = 3
page_size = 100
timeout_secs = 30
"#;

static CONFIG: OnceCell<Config> = OnceCell::new();

/// Load configuration from config.toml file
///
/// Search order:
/// 1. Next to the executable (for production)
/// 2. Falls back to embedded default config
pub fn load_config() -> anyhow::Result<Config> {
    // Try to find config.toml next to the executable
    if let Ok(exe_path) = std::env::current_exe() {
        if let Some(exe_dir) = exe_path.parent() {
            let config_path = exe_dir.join("config.toml");

            if config_path.exists() {
                tracing::info!("Loading config from: {}", config_path.display());
                let contents = std::fs::read_to_string(&config_path)?;
                let config: Config = toml::from_str(&contents)?;
                return Ok(config);
            } else {
                tracing::warn!("config.toml not found at: {}", config_path.display());
            }
        }
    }

    // Fall back to default config
    tracing::info!("Using default embedded configuration");
    let config: Config = toml::from_str(DEFAULT_CONFIG)?;
    Ok(config)
}

/// Load the configuration once at startup
pub fn init_config() -> anyhow::Result<()> {
    let config = load_config()?;
    if config.liaison.token.trim().is_empty() {
        tracing::warn!("Liaison bearer token is empty, manifest requests will be rejected");
    }
    CONFIG
        .set(config)
        .map_err(|_| anyhow::anyhow!("Config has already been initialized"))?;
    Ok(())
}

/// Access the configuration after init_config()
pub fn get_config() -> &'static Config {
    CONFIG.get().expect("Config has not been initialized")
}
