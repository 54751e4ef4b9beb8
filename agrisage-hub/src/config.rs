use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use agrisage_core::DeviceId;
use serde::Deserialize;

use crate::telemetry::{Drift, Roster};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub telemetry: TelemetryConfig,
    pub generator: GeneratorConfig,
    pub preferences: PreferencesConfig,
    pub contracts: ContractsConfig,
}

#[derive(Debug, Deserialize)]
pub struct ServerConfig {
    /// Address for the HTTP server to listen on
    pub http_addr: SocketAddr,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Artificial delay added to every roster poll
    pub network_delay_ms: u64,
    /// Fixed seed for reproducible simulations
    pub seed: Option<u64>,
    /// Per-device, per-poll chance of a spurious outage
    pub outage_probability: f64,
    /// Devices that never come online, besides the drone camera
    pub always_offline: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum GeneratorConfig {
    #[default]
    Disabled,
    Http {
        /// URL of the structured generation service
        endpoint: String,
        /// Request timeout in seconds
        #[serde(default = "default_generator_timeout")]
        timeout_secs: u64,
    },
}

#[derive(Debug, Default, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PreferencesConfig {
    #[default]
    Memory,
    File { path: PathBuf },
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ContractsConfig {
    /// Simulated confirmation time of a new contract
    pub settle_delay_ms: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("outage probability must be within 0..=1, got {0}")]
    OutageProbability(f64),
    #[error("generator timeout must be at least one second")]
    GeneratorTimeout,
}

fn default_generator_timeout() -> u64 {
    60
}

impl Config {
    pub fn load(path: &Path) -> color_eyre::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let p = self.telemetry.outage_probability;
        if !(0.0..=1.0).contains(&p) {
            return Err(ConfigError::OutageProbability(p));
        }
        if let GeneratorConfig::Http { timeout_secs: 0, .. } = self.generator {
            return Err(ConfigError::GeneratorTimeout);
        }
        Ok(())
    }
}

impl TelemetryConfig {
    pub fn network_delay(&self) -> Duration {
        Duration::from_millis(self.network_delay_ms)
    }

    pub fn drift(&self) -> Drift {
        Drift {
            outage_probability: self.outage_probability,
            ..Drift::default()
        }
    }

    /// The seed roster with this configuration's offline devices pinned on
    /// top of the drone camera.
    pub fn roster(&self) -> Roster {
        Roster::seed().with_always_offline(self.always_offline.iter().map(|id| DeviceId::new(id)))
    }
}

impl ContractsConfig {
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            network_delay_ms: 500,
            seed: None,
            outage_probability: Drift::default().outage_probability,
            always_offline: Vec::new(),
        }
    }
}

impl Default for ContractsConfig {
    fn default() -> Self {
        Self {
            settle_delay_ms: 2000,
        }
    }
}
