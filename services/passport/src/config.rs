use std::path::PathBuf;
use std::time::Duration;

use proximity::landmark::default_landmarks;
use proximity::{Landmark, PositionOptions, MINT_RADIUS_METERS};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Env var holding the path of a JSON config file.
pub const CONFIG_ENV: &str = "PASSPORT_CONFIG";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PassportConfig {
    pub rpc_url: String,
    /// Path to the payer keypair (Solana JSON keypair file).
    pub keypair_path: String,
    /// Inclusive mint radius in meters.
    pub radius_meters: f64,
    /// Badge category, minted as the token symbol.
    pub category: String,
    pub metadata_uri: String,
    /// Upper bound on a single position request.
    pub location_timeout_ms: u64,
    /// gpsd endpoint. Without one, the device has no location capability.
    pub gpsd_addr: Option<String>,
    pub confirm_timeout_secs: u64,
    pub landmarks: Vec<Landmark>,
}

impl Default for PassportConfig {
    fn default() -> Self {
        Self {
            rpc_url: "https://api.devnet.solana.com".to_string(),
            keypair_path: "~/.config/solana/id.json".to_string(),
            radius_meters: MINT_RADIUS_METERS,
            category: hike_cpi::DEFAULT_CATEGORY.to_string(),
            metadata_uri: "https://example.com/metadata.json".to_string(),
            location_timeout_ms: 10_000,
            gpsd_addr: None,
            confirm_timeout_secs: 30,
            landmarks: default_landmarks(),
        }
    }
}

impl PassportConfig {
    pub fn position_options(&self) -> PositionOptions {
        PositionOptions {
            timeout: Duration::from_millis(self.location_timeout_ms),
            ..PositionOptions::default()
        }
    }

    pub fn confirm_timeout(&self) -> Duration {
        Duration::from_secs(self.confirm_timeout_secs)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if path == "~" || path.starts_with("~/") {
        if let Some(home) = std::env::var_os("HOME") {
            let mut p = PathBuf::from(home);
            if path.len() > 2 {
                p.push(&path[2..]);
            }
            return p;
        }
    }
    PathBuf::from(path)
}

pub fn load_config() -> PassportConfig {
    let path = std::env::var(CONFIG_ENV).unwrap_or_default();
    if path.is_empty() {
        return PassportConfig::default();
    }
    load_config_from(&path)
}

/// Falls back to defaults, with a warning, when the file is unusable.
pub fn load_config_from(path: &str) -> PassportConfig {
    let expanded = expand_tilde(path);
    let contents = match std::fs::read_to_string(&expanded) {
        Ok(c) => c,
        Err(e) => {
            warn!(
                "Config file not found/readable ({}): {}, using defaults",
                expanded.display(),
                e
            );
            return PassportConfig::default();
        }
    };

    match serde_json::from_str::<PassportConfig>(&contents) {
        Ok(config) => config,
        Err(e) => {
            warn!(
                "Failed to parse config JSON ({}): {}, using defaults",
                expanded.display(),
                e
            );
            PassportConfig::default()
        }
    }
}
