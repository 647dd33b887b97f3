use incident_core::DEFAULT_API_BASE_URL;
use std::path::PathBuf;

pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_UI_DIR: &str = "incident-ui/dist";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub api_base_url: String,
    pub ui_dir: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR.into(),
            api_base_url: DEFAULT_API_BASE_URL.into(),
            ui_dir: PathBuf::from(DEFAULT_UI_DIR),
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Self::default();
        Self {
            listen_addr: get("INCIDENT_DASHBOARD_ADDR").unwrap_or(defaults.listen_addr),
            api_base_url: get("INCIDENT_API_URL").unwrap_or(defaults.api_base_url),
            ui_dir: get("INCIDENT_UI_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.ui_dir),
        }
    }
}
