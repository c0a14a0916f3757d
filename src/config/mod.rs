//! Configuration module.
//!
//! Handles the TOML settings file, environment variable expansion and the
//! resolved polling/report defaults the engine runs with.

mod settings;

pub use settings::{
    expand_env_vars, ApplianceSettings, PollPolicy, PollingSettings, ReportDefaults,
    ReportSettings, Settings, SettingsError, WanSettings,
};
