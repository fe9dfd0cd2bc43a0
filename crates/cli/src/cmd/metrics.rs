use alertdesk_engine::config::EngineConfig;
use alertdesk_engine::submission::SubmissionController;
use anyhow::{Context, Result};
use clap::Subcommand;
use serde_json::json;

use super::helpers;
use crate::output::{confirm::confirm_action, metric_table, print_json, print_success, spinner, theme, OutputMode};

#[derive(Subcommand)]
pub enum MetricsCmd {
    /// List stored metrics for an app and environment
    List {
        #[arg(long)]
        app_id: String,
        #[arg(long)]
        environment: String,
    },
    /// Replace a stored metric
    Update {
        uuid: String,
        #[arg(long)]
        app_id: String,
        #[arg(long)]
        environment: String,
        #[arg(long, help = "Metric JSON, or @path to read it from a file")]
        data: String,
    },
    /// Delete a stored metric
    Delete {
        uuid: String,
        #[arg(long)]
        app_id: String,
        #[arg(long)]
        environment: String,
        #[arg(long, short, help = "Skip confirmation")]
        yes: bool,
    },
}

pub async fn execute(cmd: MetricsCmd, cfg: &EngineConfig, mode: OutputMode) -> Result<()> {
    let controller = helpers::build_controller(cfg, mode)?;
    match cmd {
        MetricsCmd::List { app_id, environment } => list(&controller, &app_id, &environment, mode).await,
        MetricsCmd::Update {
            uuid,
            app_id,
            environment,
            data,
        } => {
            let draft = helpers::parse_json_data(&data)?;
            load(&controller, &app_id, &environment, mode).await?;
            let sp = spinner::start(mode, &format!("Updating metric {uuid}..."));
            match controller.update(&uuid, draft).await {
                Ok(stored) => {
                    spinner::finish_ok(sp, "Metric updated");
                    match mode {
                        OutputMode::Json => print_json(&stored),
                        OutputMode::Human => {
                            println!(
                                "{}",
                                metric_table(std::iter::once((Some(stored.uuid.as_str()), &stored.metric)))
                            );
                            Ok(())
                        }
                    }
                }
                Err(e) => {
                    spinner::finish_err(sp, "Update failed");
                    Err(e.into())
                }
            }
        }
        MetricsCmd::Delete {
            uuid,
            app_id,
            environment,
            yes,
        } => {
            if !yes && mode == OutputMode::Human && !confirm_action(&format!("Delete metric {uuid}?")) {
                theme::print_dim("Cancelled.");
                return Ok(());
            }
            load(&controller, &app_id, &environment, mode).await?;
            let sp = spinner::start(mode, &format!("Deleting metric {uuid}..."));
            match controller.delete(&uuid).await {
                Ok(()) => {
                    spinner::finish_ok(sp, "Metric deleted");
                    match mode {
                        OutputMode::Json => print_json(&json!({ "deleted": uuid })),
                        OutputMode::Human => {
                            print_success(&format!("Deleted metric {uuid}"));
                            Ok(())
                        }
                    }
                }
                Err(e) => {
                    spinner::finish_err(sp, "Delete failed");
                    Err(e.into())
                }
            }
        }
    }
}

async fn load(controller: &SubmissionController, app_id: &str, environment: &str, mode: OutputMode) -> Result<usize> {
    let target = helpers::parse_target(app_id, environment)?;
    let sp = spinner::start(mode, &format!("Loading metrics for {target}..."));
    match controller.refresh(target.clone()).await {
        Ok(n) => {
            spinner::finish_clear(sp);
            Ok(n)
        }
        Err(e) => {
            spinner::finish_err(sp, "Failed to load metrics");
            Err(e).with_context(|| format!("loading {target}"))
        }
    }
}

async fn list(controller: &SubmissionController, app_id: &str, environment: &str, mode: OutputMode) -> Result<()> {
    let n = load(controller, app_id, environment, mode).await?;
    let records = controller.records().await;
    match mode {
        OutputMode::Json => {
            let body: Vec<_> = records
                .iter()
                .map(|r| {
                    json!({
                        "uuid": r.uuid,
                        "updatedAtMs": r.updated_at_ms,
                        "metric": r.metric,
                    })
                })
                .collect();
            print_json(&body)
        }
        OutputMode::Human => {
            theme::print_header(&format!("Metrics ({n})"));
            if records.is_empty() {
                theme::print_dim("No metrics stored.");
            } else {
                println!(
                    "{}",
                    metric_table(records.iter().map(|r| (r.uuid.as_deref(), &r.metric)))
                );
            }
            Ok(())
        }
    }
}
