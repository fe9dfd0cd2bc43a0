use std::path::PathBuf;
use std::sync::Arc;

use alertdesk_common::wire::{Environment, MetricDraft};
use alertdesk_engine::config::{self, EngineConfig};
use alertdesk_engine::gateway::{AppIdGateway, HttpDirectory};
use alertdesk_engine::notify::{NotificationSurface, TracingSurface};
use alertdesk_engine::submission::{HttpBackend, RuleTarget, SubmissionController};
use alertdesk_engine::validation::validate_draft;
use anyhow::{bail, Context, Result};

use crate::output::{OutputMode, TerminalSurface};

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .map(|d| d.join("alertdesk").join("config.yml"))
        .unwrap_or_else(|| PathBuf::from("/etc/alertdesk/config.yml"))
}

/// An explicit path must load; a missing default file means built-in defaults.
pub fn load_config(path: Option<&str>) -> Result<EngineConfig> {
    match path {
        Some(p) => config::load_from_file(std::path::Path::new(p))
            .with_context(|| format!("failed to load config from {p}")),
        None => {
            let p = default_config_path();
            if !p.exists() {
                return Ok(EngineConfig::default());
            }
            config::load_from_file(&p).with_context(|| format!("failed to load config from {}", p.display()))
        }
    }
}

pub fn resolve_config(path: Option<&str>, server: Option<&str>) -> Result<EngineConfig> {
    let mut cfg = load_config(path)?;
    if let Some(server) = server {
        if server.trim().is_empty() {
            bail!("--server must not be empty");
        }
        cfg.server = server.to_string();
    }
    Ok(cfg)
}

pub fn build_gateway(cfg: &EngineConfig) -> Result<AppIdGateway> {
    let directory = HttpDirectory::new(&cfg.server).context("invalid server URL")?;
    Ok(AppIdGateway::new(Arc::new(directory), &cfg.app_check))
}

pub fn build_controller(cfg: &EngineConfig, mode: OutputMode) -> Result<SubmissionController> {
    let backend = HttpBackend::new(&cfg.server).context("invalid server URL")?;
    let surface: Arc<dyn NotificationSurface> = match mode {
        OutputMode::Human => Arc::new(TerminalSurface),
        OutputMode::Json => Arc::new(TracingSurface),
    };
    Ok(SubmissionController::new(Arc::new(backend), surface, cfg.submit.timeout()))
}

pub fn parse_target(app_id: &str, environment: &str) -> Result<RuleTarget> {
    let app_id = app_id.trim();
    if app_id.is_empty() {
        bail!("--app-id must not be empty");
    }
    let environment: Environment = environment.trim().parse().context("invalid --environment")?;
    Ok(RuleTarget::new(app_id, environment))
}

/// Parses an inline JSON metric, or `@path` to read one from a file, and
/// checks it against the same rules the form applies.
pub fn parse_json_data(data: &str) -> Result<MetricDraft> {
    let raw = match data.strip_prefix('@') {
        Some(path) => std::fs::read_to_string(path).with_context(|| format!("failed to read {path}"))?,
        None => data.to_string(),
    };
    let draft: MetricDraft = serde_json::from_str(&raw).context("invalid metric JSON")?;
    let violations = validate_draft(&draft);
    if !violations.is_empty() {
        let lines: Vec<String> = violations
            .iter()
            .map(|(field, msg)| format!("Field '{field}': {msg}"))
            .collect();
        bail!("invalid metric: {}", lines.join("; "));
    }
    Ok(draft)
}
