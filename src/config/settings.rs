//! TOML-based configuration.
//!
//! Supports a config file (netprofiler.toml) with environment variable expansion.
//!
//! Example configuration:
//! ```toml
//! [appliance]
//! host = "${PROFILER_HOST}"
//!
//! [polling]
//! interval = "1s"
//! timeout = "10m"
//!
//! [reports]
//! template_id = 184
//! host_group_type = "ByLocation"
//! default_span = "5 min"
//!
//! [wan]
//! groupby = "ifc"
//! resolution = "15min"
//! default_span = "1 h"
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::model::{parse_duration, Resolution};

/// Error type for settings.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("Config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Missing environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid duration format: {0}")]
    InvalidDuration(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    /// Appliance connection details.
    pub appliance: ApplianceSettings,

    /// Status polling for synchronous runs.
    pub polling: PollingSettings,

    /// Defaults applied to every report.
    pub reports: ReportSettings,

    /// Defaults for WAN summary reports.
    pub wan: WanSettings,
}

/// Appliance connection details, consumed by the transport.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ApplianceSettings {
    /// Hostname or URL (supports ${ENV_VAR} expansion).
    pub host: Option<String>,
}

/// Polling configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingSettings {
    /// Delay between status polls (e.g., "1s", "0.5s").
    pub interval: String,

    /// Give up waiting after this long (e.g., "10m").
    pub timeout: String,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval: "1s".to_string(),
            timeout: "10m".to_string(),
        }
    }
}

/// Report defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ReportSettings {
    /// Appliance report template used for single-query reports.
    pub template_id: u32,

    /// Host group type sent with group-style groupbys.
    pub host_group_type: String,

    /// Length of the time window when none is given (e.g., "5 min").
    pub default_span: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            template_id: 184,
            host_group_type: "ByLocation".to_string(),
            default_span: "5 min".to_string(),
        }
    }
}

/// WAN summary defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct WanSettings {
    /// Groupby for the interface reports.
    pub groupby: String,

    /// Resolution name for the interface reports.
    pub resolution: String,

    /// Length of the time window when none is given (e.g., "1 h").
    pub default_span: String,
}

impl Default for WanSettings {
    fn default() -> Self {
        Self {
            groupby: "ifc".to_string(),
            resolution: "15min".to_string(),
            default_span: "1 h".to_string(),
        }
    }
}

/// Resolved polling policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(1),
            timeout: Duration::from_secs(600),
        }
    }
}

/// Resolved report defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDefaults {
    pub template_id: u32,
    pub host_group_type: String,
    pub default_span: Duration,
    pub wan_groupby: String,
    pub wan_resolution: Resolution,
    pub wan_span: Duration,
}

impl Default for ReportDefaults {
    fn default() -> Self {
        Self {
            template_id: 184,
            host_group_type: "ByLocation".to_string(),
            default_span: Duration::from_secs(5 * 60),
            wan_groupby: "ifc".to_string(),
            wan_resolution: Resolution::FifteenMinutes,
            wan_span: Duration::from_secs(60 * 60),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(SettingsError::FileNotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&content)?;
        Ok(settings)
    }

    /// Load settings from the default config file locations.
    ///
    /// Searches in order:
    /// 1. Environment variable `NETPROFILER_CONFIG`
    /// 2. `./netprofiler.toml`
    /// 3. `~/.config/netprofiler/config.toml`
    pub fn load() -> Result<Self, SettingsError> {
        if let Ok(path) = env::var("NETPROFILER_CONFIG") {
            return Self::from_file(&path);
        }

        let local_config = PathBuf::from("netprofiler.toml");
        if local_config.exists() {
            return Self::from_file(&local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("netprofiler").join("config.toml");
            if user_config.exists() {
                return Self::from_file(&user_config);
            }
        }

        // Return defaults if no config file found
        Ok(Settings::default())
    }

    /// The appliance host with environment variables expanded.
    pub fn appliance_host(&self) -> Result<Option<String>, SettingsError> {
        self.appliance
            .host
            .as_deref()
            .map(expand_env_vars)
            .transpose()
    }

    /// Resolve the polling section.
    pub fn poll_policy(&self) -> Result<PollPolicy, SettingsError> {
        Ok(PollPolicy {
            interval: duration_setting(&self.polling.interval)?,
            timeout: duration_setting(&self.polling.timeout)?,
        })
    }

    /// Resolve the report and WAN sections.
    pub fn report_defaults(&self) -> Result<ReportDefaults, SettingsError> {
        let wan_resolution: Resolution = self
            .wan
            .resolution
            .parse()
            .map_err(|e: crate::error::ReportError| SettingsError::InvalidConfig(e.to_string()))?;

        if self.wan.groupby.is_empty() {
            return Err(SettingsError::InvalidConfig(
                "wan.groupby must not be empty".to_string(),
            ));
        }

        Ok(ReportDefaults {
            template_id: self.reports.template_id,
            host_group_type: self.reports.host_group_type.clone(),
            default_span: duration_setting(&self.reports.default_span)?,
            wan_groupby: self.wan.groupby.clone(),
            wan_resolution,
            wan_span: duration_setting(&self.wan.default_span)?,
        })
    }
}

fn duration_setting(value: &str) -> Result<Duration, SettingsError> {
    parse_duration(value).map_err(|_| SettingsError::InvalidDuration(value.to_string()))
}

/// Expand environment variables in a string.
///
/// Supports `${VAR}` and `$VAR` syntax.
pub fn expand_env_vars(s: &str) -> Result<String, SettingsError> {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '$' {
            result.push(c);
            continue;
        }

        let mut var_name = String::new();
        if chars.peek() == Some(&'{') {
            chars.next(); // consume '{'
            for ch in chars.by_ref() {
                if ch == '}' {
                    break;
                }
                var_name.push(ch);
            }
        } else {
            // $VAR ends at the first non-alphanumeric/underscore
            while let Some(&ch) = chars.peek() {
                if !(ch.is_alphanumeric() || ch == '_') {
                    break;
                }
                var_name.push(ch);
                chars.next();
            }
            if var_name.is_empty() {
                // Just a lone $, keep it
                result.push('$');
                continue;
            }
        }

        let value =
            env::var(&var_name).map_err(|_| SettingsError::MissingEnvVar(var_name.clone()))?;
        result.push_str(&value);
    }

    Ok(result)
}
