use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// Global configuration loaded from `~/.config/ims/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImsConfig {
    /// Base URL of the REST backend, e.g. `http://localhost:3001/api`.
    pub api_base_url: String,
    /// Customer/vendor portal session: a 401 sends the user back to login instead of refreshing.
    #[serde(default)]
    pub portal_mode: bool,
    /// TCP connect timeout for backend calls.
    pub connect_timeout_secs: u64,
    /// Whole-request timeout for backend calls.
    pub request_timeout_secs: u64,
    /// Organization used when a command doesn't pass `--org`.
    #[serde(default)]
    pub organization_id: Option<String>,
    /// Surface success messages as soon as a mutation is dispatched. Defaults to on.
    #[serde(default)]
    pub optimistic_messages: Option<bool>,
}

impl Default for ImsConfig {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3001/api".to_string(),
            portal_mode: false,
            connect_timeout_secs: 15,
            request_timeout_secs: 30,
            organization_id: None,
            optimistic_messages: None,
        }
    }
}

impl ImsConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn optimistic_messages(&self) -> bool {
        self.optimistic_messages.unwrap_or(true)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("ims")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<ImsConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = ImsConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(&path)?;
    let cfg: ImsConfig = toml::from_str(&data)?;
    Ok(cfg)
}
