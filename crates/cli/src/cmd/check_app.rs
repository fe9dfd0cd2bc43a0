use alertdesk_engine::config::EngineConfig;
use alertdesk_engine::gateway::AppIdStatus;
use anyhow::{bail, Result};
use clap::Args;
use serde_json::json;

use super::helpers;
use crate::output::{print_json, spinner, theme, OutputMode};

#[derive(Args)]
pub struct CheckAppArgs {
    /// Application id to verify
    pub app_id: String,
}

pub async fn execute(args: CheckAppArgs, cfg: &EngineConfig, mode: OutputMode) -> Result<()> {
    let gateway = helpers::build_gateway(cfg)?;
    let sp = spinner::start(mode, &format!("Checking app id '{}'...", args.app_id));
    gateway.validate(&args.app_id);
    let verdict = gateway.settled().await;

    let (valid, message) = match &verdict.status {
        AppIdStatus::Valid => (true, "valid".to_string()),
        AppIdStatus::Invalid { reason } => (false, reason.clone()),
        AppIdStatus::Unvalidated => (false, "is required".to_string()),
        AppIdStatus::Checking => (false, "still checking".to_string()),
    };

    match mode {
        OutputMode::Json => {
            spinner::finish_clear(sp);
            print_json(&json!({ "appId": verdict.value, "valid": valid, "message": message }))?;
        }
        OutputMode::Human => {
            if valid {
                spinner::finish_ok(sp, "Check complete");
            } else {
                spinner::finish_err(sp, "Check complete");
            }
            theme::print_header("App ID");
            theme::print_kv("App ID", &verdict.value);
            theme::print_kv_colored("Verdict", &message, valid);
            println!();
        }
    }

    if !valid {
        bail!("app id '{}' rejected: {message}", args.app_id);
    }
    Ok(())
}
