use std::net::IpAddr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub seed_demo: bool,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// `None` leaves the mirror disabled.
    pub graph: Option<GraphConfig>,
    pub pull_interval: Duration,
    pub debounce: Duration,
    pub auto_sync: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            graph: None,
            pull_interval: Duration::from_secs(30),
            debounce: Duration::from_millis(1000),
            auto_sync: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct GraphConfig {
    /// Delegated token from the external sign-in flow.
    pub access_token: String,
    pub base_url: String,
    pub workbook_name: String,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        let host: IpAddr = env_or("CAPACITY_HOST", "0.0.0.0")
            .parse()
            .map_err(|e| format!("Invalid CAPACITY_HOST: {e}"))?;

        let port: u16 = env_or("CAPACITY_PORT", "3000")
            .parse()
            .map_err(|e| format!("Invalid CAPACITY_PORT: {e}"))?;

        let log_level = env_or("CAPACITY_LOG_LEVEL", "info");
        let seed_demo = env_bool("CAPACITY_SEED_DEMO", false)?;

        let graph = std::env::var("CAPACITY_GRAPH_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .map(|access_token| GraphConfig {
                access_token,
                base_url: env_or("CAPACITY_GRAPH_BASE_URL", "https://graph.microsoft.com/v1.0"),
                workbook_name: env_or("CAPACITY_WORKBOOK_NAME", "CapacityManagement.xlsx"),
            });

        let pull_interval: u64 = env_or("CAPACITY_SYNC_INTERVAL_SECS", "30")
            .parse()
            .map_err(|e| format!("Invalid CAPACITY_SYNC_INTERVAL_SECS: {e}"))?;
        if pull_interval == 0 {
            return Err("CAPACITY_SYNC_INTERVAL_SECS must be greater than zero".to_string());
        }

        let debounce_ms: u64 = env_or("CAPACITY_SYNC_DEBOUNCE_MS", "1000")
            .parse()
            .map_err(|e| format!("Invalid CAPACITY_SYNC_DEBOUNCE_MS: {e}"))?;

        Ok(Config {
            host,
            port,
            log_level,
            seed_demo,
            sync: SyncConfig {
                graph,
                pull_interval: Duration::from_secs(pull_interval),
                debounce: Duration::from_millis(debounce_ms),
                auto_sync: env_bool("CAPACITY_AUTO_SYNC", true)?,
            },
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_bool(key: &str, default: bool) -> Result<bool, String> {
    match std::env::var(key) {
        Err(_) => Ok(default),
        Ok(v) => match v.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(format!("Invalid {key}: {other}")),
        },
    }
}
