//! Configuration parsing and validation
//!
//! This module handles loading the `tether.yaml` project file that tells a
//! host process which integrations to expose and how its step runner treats
//! failures.
//!
//! # Example
//!
//! ```yaml
//! name: my-connectors
//! runtime:
//!   max_retries: 2
//!   retry_backoff_ms: 250
//!   step_timeout_secs: 30
//! integrations:
//!   - csv
//!   - script
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::{Error, Result};

/// File name looked up when a directory is given
pub const CONFIG_FILE_NAME: &str = "tether.yaml";

const MAX_RETRIES_LIMIT: u32 = 10;

/// Root project configuration from `tether.yaml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Project name
    pub name: String,

    /// Project version
    #[serde(default = "default_version")]
    pub version: String,

    /// Step runner configuration
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Allow-list of integration identifiers; empty exposes all
    #[serde(default)]
    pub integrations: Vec<String>,
}

fn default_version() -> String {
    "0.1.0".to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            name: "tether".to_string(),
            version: default_version(),
            runtime: RuntimeConfig::default(),
            integrations: Vec::new(),
        }
    }
}

/// Step runner configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Extra attempts for steps whose policy allows retries
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Fixed delay between attempts, in milliseconds
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Upper bound on a single attempt, in seconds
    #[serde(default)]
    pub step_timeout_secs: Option<u64>,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            retry_backoff_ms: default_retry_backoff_ms(),
            step_timeout_secs: None,
        }
    }
}

fn default_max_retries() -> u32 {
    2
}

fn default_retry_backoff_ms() -> u64 {
    250
}

impl RuntimeConfig {
    /// Delay between attempts
    pub fn retry_backoff(&self) -> Duration {
        Duration::from_millis(self.retry_backoff_ms)
    }

    /// Upper bound on a single attempt, if configured
    pub fn step_timeout(&self) -> Option<Duration> {
        self.step_timeout_secs.map(Duration::from_secs)
    }
}

/// Main configuration container
#[derive(Debug, Clone)]
pub struct Config {
    /// Project configuration
    pub project: ProjectConfig,

    /// Base path of the project
    pub base_path: std::path::PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            project: ProjectConfig::default(),
            base_path: std::path::PathBuf::from("."),
        }
    }
}

impl Config {
    /// Load configuration from a directory or a `tether.yaml` file
    ///
    /// ```rust,ignore
    /// let config = Config::load("./my-project")?;
    /// println!("Project: {}", config.project.name);
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        let (config_path, base_path) = if path.is_dir() {
            (path.join(CONFIG_FILE_NAME), path.to_path_buf())
        } else {
            (
                path.to_path_buf(),
                path.parent().unwrap_or(Path::new(".")).to_path_buf(),
            )
        };

        if !config_path.exists() {
            return Err(Error::ConfigNotFound {
                path: config_path.display().to_string(),
            });
        }

        let contents = std::fs::read_to_string(&config_path)?;
        let project: ProjectConfig = serde_yaml::from_str(&contents)?;

        let config = Self { project, base_path };
        config.validate()?;
        tracing::debug!(path = %config_path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        match Self::load(path) {
            Err(Error::ConfigNotFound { path }) => {
                tracing::debug!(%path, "no configuration file, using defaults");
                Ok(Self::default())
            }
            other => other,
        }
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.project.runtime.max_retries > MAX_RETRIES_LIMIT {
            return Err(Error::ConfigInvalid {
                message: format!(
                    "runtime.max_retries must be at most {}, got {}",
                    MAX_RETRIES_LIMIT, self.project.runtime.max_retries
                ),
            });
        }
        if self.project.runtime.step_timeout_secs == Some(0) {
            return Err(Error::ConfigInvalid {
                message: "runtime.step_timeout_secs must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
