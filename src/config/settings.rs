//! Configuration file support for xpk

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::queues::{AggregateOptions, MissingStatusPolicy, QueueKind, StatusFields};
use crate::utils::OutputFormat;

/// Main configuration structure
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub defaults: Defaults,

    #[serde(default)]
    pub colors: Colors,

    #[serde(default)]
    pub behavior: Behavior,

    #[serde(default)]
    pub queues: QueueFields,

    #[serde(default)]
    pub kueuectl: KueuectlSettings,
}

/// Default values for the `info` command; CLI flags take precedence
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<String>,

    #[serde(default)]
    pub output: OutputFormat,
}

/// Color and theme settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Colors {
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// Behavior settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Behavior {
    #[serde(default = "default_true")]
    pub show_progress: bool,

    /// Report queues without status fields as empty instead of failing
    #[serde(default)]
    pub missing_status_as_empty: bool,
}

/// Status field names read for each queue kind
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct QueueFields {
    #[serde(default)]
    pub cluster: ClusterQueueFields,

    #[serde(default)]
    pub local: LocalQueueFields,
}

/// `[queues.cluster]`; each key may be set on its own
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ClusterQueueFields {
    #[serde(default = "default_reservation_field")]
    pub reservation: String,

    #[serde(default = "default_cluster_usage_field")]
    pub usage: String,
}

/// `[queues.local]`; each key may be set on its own
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LocalQueueFields {
    #[serde(default = "default_reservation_field")]
    pub reservation: String,

    #[serde(default = "default_local_usage_field")]
    pub usage: String,
}

/// kubectl-kueue plugin settings
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct KueuectlSettings {
    /// Kueue release to download the plugin from
    #[serde(default = "default_kueuectl_version")]
    pub version: String,

    /// Install without asking when the plugin is missing
    #[serde(default)]
    pub auto_install: bool,

    /// Directory the plugin is installed into (defaults to ~/.local/bin)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_dir: Option<String>,
}

// Default value functions
fn default_true() -> bool {
    true
}

fn default_reservation_field() -> String {
    StatusFields::for_kind(QueueKind::Cluster).reservation
}

fn default_cluster_usage_field() -> String {
    StatusFields::for_kind(QueueKind::Cluster).usage
}

fn default_local_usage_field() -> String {
    StatusFields::for_kind(QueueKind::Local).usage
}

fn default_kueuectl_version() -> String {
    "v0.9.1".to_string()
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            enabled: default_true(),
        }
    }
}

impl Default for Behavior {
    fn default() -> Self {
        Self {
            show_progress: default_true(),
            missing_status_as_empty: false,
        }
    }
}

impl Default for ClusterQueueFields {
    fn default() -> Self {
        Self {
            reservation: default_reservation_field(),
            usage: default_cluster_usage_field(),
        }
    }
}

impl Default for LocalQueueFields {
    fn default() -> Self {
        Self {
            reservation: default_reservation_field(),
            usage: default_local_usage_field(),
        }
    }
}

impl ClusterQueueFields {
    pub fn status_fields(&self) -> StatusFields {
        StatusFields::new(self.reservation.clone(), self.usage.clone())
    }
}

impl LocalQueueFields {
    pub fn status_fields(&self) -> StatusFields {
        StatusFields::new(self.reservation.clone(), self.usage.clone())
    }
}

impl Default for KueuectlSettings {
    fn default() -> Self {
        Self {
            version: default_kueuectl_version(),
            auto_install: false,
            install_dir: None,
        }
    }
}

impl KueuectlSettings {
    /// Resolve the plugin install directory
    pub fn install_dir(&self) -> Result<PathBuf> {
        if let Some(dir) = &self.install_dir {
            return Ok(PathBuf::from(dir));
        }

        dirs::home_dir()
            .map(|home| home.join(".local").join("bin"))
            .ok_or_else(|| anyhow!("Cannot determine home directory; set install_dir under [kueuectl]"))
    }
}

impl Settings {
    /// Load settings from file or return defaults
    pub fn load() -> Self {
        let Some(path) = Self::find_config_file() else {
            return Self::default();
        };

        match Self::load_from_file(&path) {
            Ok(settings) => {
                crate::log_debug!("Loaded config from {}", path.display());
                settings
            }
            Err(e) => {
                crate::log_warn!("{:#}; using defaults", e);
                Self::default()
            }
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let settings: Settings = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(settings)
    }

    /// Find config file in standard locations
    /// Priority:
    /// 1. .xpk.toml in current directory
    /// 2. ~/.config/xpk/config.toml (XDG config directory)
    pub fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(".xpk.toml");
        if local_config.exists() {
            return Some(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("xpk").join("config.toml");
            if xdg_config.exists() {
                return Some(xdg_config);
            }
        }

        None
    }

    /// Serialize the effective settings
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize settings")
    }

    /// Aggregation options derived from the queue and behavior sections
    pub fn aggregate_options(&self) -> AggregateOptions {
        AggregateOptions {
            cluster_fields: self.queues.cluster.status_fields(),
            local_fields: self.queues.local.status_fields(),
            missing_status: if self.behavior.missing_status_as_empty {
                MissingStatusPolicy::Empty
            } else {
                MissingStatusPolicy::Fail
            },
        }
    }

    /// Generate example config file content
    pub fn example_config() -> String {
        r#"# xpk configuration file
# Place this file at ~/.config/xpk/config.toml or .xpk.toml in your project

[defaults]
# project = "my-gcp-project"
# zone = "us-central2-b"
# cluster = "my-cluster"
output = "table"  # Options: table, json, yaml

[colors]
enabled = true

[behavior]
show_progress = true
# Report queues that have no status fields yet as empty instead of failing
missing_status_as_empty = false

# Status field names read from `kubectl kueue list ... -o json`
[queues.cluster]
reservation = "flavorsReservation"
usage = "flavorsUsage"

[queues.local]
reservation = "flavorsReservation"
usage = "flavorUsage"

[kueuectl]
# Kueue release the plugin is downloaded from
version = "v0.9.1"
auto_install = false
# install_dir = "/usr/local/bin"  # Defaults to ~/.local/bin
"#
        .to_string()
    }
}
