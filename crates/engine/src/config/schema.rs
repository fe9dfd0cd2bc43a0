use std::time::Duration;

use serde::Deserialize;

use crate::identity::UserIdentity;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineConfig {
    #[serde(default = "default_server")]
    pub server: String,
    #[serde(default)]
    pub app_check: AppCheckConfig,
    #[serde(default)]
    pub submit: SubmitConfig,
    #[serde(default)]
    pub identity: Option<UserIdentity>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            app_check: AppCheckConfig::default(),
            submit: SubmitConfig::default(),
            identity: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AppCheckConfig {
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_check_timeout_ms")]
    pub timeout_ms: u64,
}

impl AppCheckConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for AppCheckConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            timeout_ms: default_check_timeout_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SubmitConfig {
    #[serde(default = "default_submit_timeout_ms")]
    pub timeout_ms: u64,
}

impl SubmitConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            timeout_ms: default_submit_timeout_ms(),
        }
    }
}

fn default_server() -> String {
    "http://127.0.0.1:8080".to_string()
}

fn default_debounce_ms() -> u64 {
    400
}

fn default_check_timeout_ms() -> u64 {
    5_000
}

fn default_submit_timeout_ms() -> u64 {
    10_000
}
