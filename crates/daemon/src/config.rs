// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon configuration: fixed paths under the state directory plus
//! optional tuning from `mcbd.toml`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mcb_adapters::SimulationConfig;
use mcb_core::{Backoff, RetryPolicy, DEFAULT_RECONNECT_DELAY_MS};
use mcb_engine::{ManagerConfig, DEFAULT_CONNECT_TIMEOUT};
use serde::Deserialize;
use thiserror::Error;

use crate::lifecycle::LifecycleError;

/// Default timer resolution for the engine loop
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Errors from reading `mcbd.toml`
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid setting {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Root state directory (e.g. ~/.local/state/mcb)
    pub state_dir: PathBuf,
    /// Path to Unix socket
    pub socket_path: PathBuf,
    /// Path to lock/PID file
    pub lock_path: PathBuf,
    /// Path to daemon log file
    pub log_path: PathBuf,
    /// Path to the bot record store
    pub store_path: PathBuf,
    /// Path to the optional settings file
    pub settings_path: PathBuf,
    /// How often the engine loop fires due timers
    pub tick_interval: Duration,
    pub manager: ManagerConfig,
    pub simulation: SimulationConfig,
}

impl Config {
    /// Load configuration for the user-level daemon.
    ///
    /// Paths live under `$MCB_STATE_DIR`, `$XDG_STATE_HOME/mcb/` or
    /// `~/.local/state/mcb/`, in that order.
    pub fn load() -> Result<Self, LifecycleError> {
        let state_dir = crate::env::state_dir()?;
        let mut config = Self::for_state_dir(state_dir)?;
        if let Some(tick) = crate::env::tick_interval() {
            config.tick_interval = tick;
        }
        Ok(config)
    }

    /// Paths rooted at `state_dir`, with settings read from its `mcbd.toml`
    pub fn for_state_dir(state_dir: PathBuf) -> Result<Self, LifecycleError> {
        let settings_path = state_dir.join("mcbd.toml");
        let settings = Settings::load(&settings_path)?;

        Ok(Self {
            socket_path: state_dir.join("mcbd.sock"),
            lock_path: state_dir.join("mcbd.pid"),
            log_path: state_dir.join("mcbd.log"),
            store_path: state_dir.join("bots.json"),
            tick_interval: settings.tick_interval(),
            manager: settings.manager_config()?,
            simulation: settings.simulation_config()?,
            settings_path,
            state_dir,
        })
    }
}

/// Contents of `mcbd.toml`; every field is optional
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub tick_ms: Option<u64>,
    pub connect_timeout_ms: Option<u64>,
    pub retry: RetrySettings,
    pub simulation: SimulationSettings,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackoffKind {
    #[default]
    Constant,
    Exponential,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RetrySettings {
    pub backoff: BackoffKind,
    pub delay_ms: Option<u64>,
    pub max_delay_ms: Option<u64>,
    pub factor: Option<u32>,
    pub max_attempts: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationSettings {
    pub handshake_ms: Option<u64>,
    pub connect_failure_rate: Option<f64>,
    pub drop_rate: Option<f64>,
    pub activity_interval_ms: Option<u64>,
    pub anti_afk_interval_ms: Option<u64>,
}

impl Settings {
    /// Read settings from `path`; a missing file yields defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        Self::parse(&text).map_err(|e| match e {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: path.to_owned(),
                source,
            },
            other => other,
        })
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        toml::from_str(text).map_err(|source| ConfigError::Parse {
            path: PathBuf::new(),
            source,
        })
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_TICK_INTERVAL)
    }

    pub fn manager_config(&self) -> Result<ManagerConfig, ConfigError> {
        let connect_timeout = match self.connect_timeout_ms {
            Some(0) => {
                return Err(ConfigError::Invalid {
                    field: "connect_timeout_ms",
                    reason: "must be greater than zero".to_string(),
                })
            }
            Some(ms) => Duration::from_millis(ms),
            None => DEFAULT_CONNECT_TIMEOUT,
        };
        Ok(ManagerConfig {
            retry: self.retry.policy()?,
            connect_timeout,
        })
    }

    pub fn simulation_config(&self) -> Result<SimulationConfig, ConfigError> {
        let sim = &self.simulation;
        let defaults = SimulationConfig::default();
        Ok(SimulationConfig {
            handshake: sim
                .handshake_ms
                .map(Duration::from_millis)
                .unwrap_or(defaults.handshake),
            connect_failure_rate: rate(
                "simulation.connect_failure_rate",
                sim.connect_failure_rate,
                defaults.connect_failure_rate,
            )?,
            drop_rate: rate("simulation.drop_rate", sim.drop_rate, defaults.drop_rate)?,
            activity_interval: interval(
                "simulation.activity_interval_ms",
                sim.activity_interval_ms,
                defaults.activity_interval,
            )?,
            anti_afk_interval: interval(
                "simulation.anti_afk_interval_ms",
                sim.anti_afk_interval_ms,
                defaults.anti_afk_interval,
            )?,
        })
    }
}

impl RetrySettings {
    fn policy(&self) -> Result<RetryPolicy, ConfigError> {
        let delay = Duration::from_millis(self.delay_ms.unwrap_or(DEFAULT_RECONNECT_DELAY_MS));
        let backoff = match self.backoff {
            BackoffKind::Constant => Backoff::Constant { delay },
            BackoffKind::Exponential => {
                let factor = self.factor.unwrap_or(2);
                if factor < 1 {
                    return Err(ConfigError::Invalid {
                        field: "retry.factor",
                        reason: "must be at least 1".to_string(),
                    });
                }
                let max = self
                    .max_delay_ms
                    .map(Duration::from_millis)
                    .unwrap_or(delay * 60);
                if max < delay {
                    return Err(ConfigError::Invalid {
                        field: "retry.max_delay_ms",
                        reason: "must not be below retry.delay_ms".to_string(),
                    });
                }
                Backoff::Exponential {
                    base: delay,
                    factor,
                    max,
                }
            }
        };
        Ok(RetryPolicy {
            backoff,
            max_attempts: self.max_attempts,
        })
    }
}

fn rate(field: &'static str, value: Option<f64>, default: f64) -> Result<f64, ConfigError> {
    let value = value.unwrap_or(default);
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("{value} is outside 0.0..=1.0"),
        });
    }
    Ok(value)
}

fn interval(
    field: &'static str,
    value: Option<u64>,
    default: Duration,
) -> Result<Duration, ConfigError> {
    match value {
        Some(0) => Err(ConfigError::Invalid {
            field,
            reason: "must be greater than zero".to_string(),
        }),
        Some(ms) => Ok(Duration::from_millis(ms)),
        None => Ok(default),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
