// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for the identifier worker

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::IdentifierError;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Coordinator connection settings
    #[serde(default)]
    pub coordinator: CoordinatorConfig,

    /// Poll loop settings
    #[serde(default)]
    pub poll: PollConfig,

    /// Identification settings
    #[serde(default)]
    pub identify: IdentifyConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CoordinatorConfig {
    #[serde(default = "default_coordinator_url")]
    pub url: String,
    /// Skip TLS certificate verification (coordinator lives on a private network)
    #[serde(default = "default_true")]
    pub accept_invalid_certs: bool,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

/// What the poll loop does when talking to the coordinator fails
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop the worker and leave the restart to the supervisor
    #[default]
    Fatal,
    /// Retry the cycle with exponential backoff, then stop
    Retry,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PollConfig {
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_max_backoff")]
    pub max_backoff_secs: u64,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct IdentifyConfig {
    /// Time budget shared by every tool run for one file
    #[serde(default = "default_deadline")]
    pub deadline_secs: u64,
    #[serde(default = "default_temp_dir")]
    pub temp_dir: PathBuf,
    #[serde(default)]
    pub render_markdown: bool,
    #[serde(default)]
    pub tools: ToolsConfig,
}

/// Program names (or paths) of the external identification tools
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ToolsConfig {
    #[serde(default = "default_file_tool")]
    pub file: String,
    #[serde(default = "default_ssdeep_tool")]
    pub ssdeep: String,
    #[serde(default = "default_trid_tool")]
    pub trid: String,
    #[serde(default = "default_exiftool_tool")]
    pub exiftool: String,
}

// Default value functions
fn default_coordinator_url() -> String { "http://coordinator:5000".to_string() }
fn default_true() -> bool { true }
fn default_request_timeout() -> u64 { 300 }
fn default_interval() -> u64 { 10 }
fn default_max_retries() -> u32 { 5 }
fn default_max_backoff() -> u64 { 60 }
fn default_deadline() -> u64 { 60 }
fn default_temp_dir() -> PathBuf { PathBuf::from("/tmp") }
fn default_file_tool() -> String { "file".to_string() }
fn default_ssdeep_tool() -> String { "ssdeep".to_string() }
fn default_trid_tool() -> String { "trid".to_string() }
fn default_exiftool_tool() -> String { "exiftool".to_string() }

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            url: default_coordinator_url(),
            accept_invalid_certs: true,
            request_timeout_secs: default_request_timeout(),
        }
    }
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_interval(),
            failure_policy: FailurePolicy::Fatal,
            max_retries: default_max_retries(),
            max_backoff_secs: default_max_backoff(),
        }
    }
}

impl Default for IdentifyConfig {
    fn default() -> Self {
        Self {
            deadline_secs: default_deadline(),
            temp_dir: default_temp_dir(),
            render_markdown: false,
            tools: ToolsConfig::default(),
        }
    }
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            file: default_file_tool(),
            ssdeep: default_ssdeep_tool(),
            trid: default_trid_tool(),
            exiftool: default_exiftool_tool(),
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }
}

impl IdentifyConfig {
    pub fn deadline(&self) -> Duration {
        Duration::from_secs(self.deadline_secs)
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| IdentifierError::Config(format!("Failed to parse config: {}", e)))?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject settings the worker cannot run with
    pub fn validate(&self) -> crate::Result<()> {
        if self.coordinator.url.trim().is_empty() {
            return Err(IdentifierError::Config("coordinator.url must not be empty".to_string()));
        }
        if self.poll.interval_secs == 0 {
            return Err(IdentifierError::Config("poll.interval_secs must be at least 1".to_string()));
        }
        if self.identify.deadline_secs == 0 {
            return Err(IdentifierError::Config("identify.deadline_secs must be at least 1".to_string()));
        }
        Ok(())
    }
}
