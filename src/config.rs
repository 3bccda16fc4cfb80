use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::report::ReportSettings;

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "DASHBOARD_CONFIG";
/// Overrides `data_path`.
pub const DATA_ENV: &str = "DASHBOARD_DATA";
const DEFAULT_CONFIG_FILE: &str = "dashboard.json";

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DashboardConfig {
    /// Table loaded at startup.
    pub data_path: PathBuf,
    /// How many states the market-expansion ranking shows.
    pub top_states: usize,
    /// Brand substring used as the insurance proxy.
    pub insurance_proxy_brand: String,
    pub window_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("phonepe csv data.csv"),
            top_states: 10,
            insurance_proxy_brand: "others".to_string(),
            window_size: [1280.0, 860.0],
        }
    }
}

impl DashboardConfig {
    /// Read `$DASHBOARD_CONFIG`, else `./dashboard.json` when present, else
    /// defaults. `$DASHBOARD_DATA` replaces the data path in every case.
    pub fn load() -> Result<Self> {
        let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let mut config = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };

        if let Some(data) = std::env::var_os(DATA_ENV) {
            config.data_path = PathBuf::from(data);
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))?;
        log::info!("Using configuration from {}", path.display());
        Ok(config)
    }

    pub fn report_settings(&self) -> ReportSettings {
        ReportSettings {
            top_states: self.top_states,
            insurance_proxy_brand: self.insurance_proxy_brand.clone(),
        }
    }
}
