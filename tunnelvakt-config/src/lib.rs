//! # Tunnelvakt Configuration System
//!
//! Hierarchical configuration for the tunnelvakt enforcement engine and its
//! simulation harness.
//!
//! ## Features
//! - **Unified Configuration**: Single source of truth across all components
//! - **Validation**: Hard load-time validation of policy parameters — the
//!   engine refuses to start with an undefined policy
//! - **Environment Awareness**: `TUNNELVAKT_*` variables override file values

#![warn(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use std::path::{Path, PathBuf};

use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

mod enforcement;
mod error;
mod simulator;
mod traffic;
mod validation;

pub use enforcement::EnforcementConfig;
pub use error::ConfigError;
pub use simulator::SimulatorConfig;
pub use traffic::{TrafficConfig, TunnelProfile};

/// Top-level configuration container for all tunnelvakt components.
#[derive(Debug, Serialize, Deserialize, Validate, Default)]
pub struct TunnelvaktConfig {
    /// Enforcement policy (rule toggles, threshold, audit log).
    #[validate(nested)]
    pub enforcement: EnforcementConfig,

    /// Synthetic traffic source parameters.
    #[validate(nested)]
    pub traffic: TrafficConfig,

    /// Simulation driver parameters.
    #[validate(nested)]
    pub simulator: SimulatorConfig,
}

impl TunnelvaktConfig {
    /// Load configuration from default files and environment.
    ///
    /// Hierarchy:
    /// 1. Default values
    /// 2. `config/tunnelvakt.yaml` - if missing, defaults are used.
    /// 3. `TUNNELVAKT_*` environment variables.
    pub fn load() -> Result<Self, ConfigError> {
        let mut figment = Figment::from(Serialized::defaults(TunnelvaktConfig::default()));

        if Path::new("config/tunnelvakt.yaml").exists() {
            figment = figment.merge(Yaml::file("config/tunnelvakt.yaml"));
        }

        figment
            .merge(Env::prefixed("TUNNELVAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }

    /// Re-checks an already-loaded configuration.
    ///
    /// Load-time validation only covers file and environment values; callers
    /// that apply overrides afterwards (CLI flags) run this before using the
    /// result.
    pub fn ensure_valid(&self) -> Result<(), ConfigError> {
        self.validate()?;
        Ok(())
    }

    /// Load configuration from a specific path.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::FileNotFound(PathBuf::from(path)));
        }

        Figment::from(Serialized::defaults(TunnelvaktConfig::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("TUNNELVAKT_").split("__"))
            .extract()
            .map_err(ConfigError::from)
            .and_then(|config: Self| {
                config.validate()?;
                Ok(config)
            })
    }
}
