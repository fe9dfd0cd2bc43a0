use std::path::PathBuf;

use alertdesk_engine::config::EngineConfig;
use alertdesk_engine::identity::StaticIdentity;
use alertdesk_engine::{EngineError, FieldError, FormSession};
use anyhow::{bail, Result};
use clap::Args;
use colored::Colorize;
use serde_json::json;

use super::form::FormFile;
use super::helpers;
use crate::output::{metric_table, print_error, print_json, print_success, spinner, theme, OutputMode};

#[derive(Args)]
pub struct SubmitArgs {
    /// YAML form with appId, environment and metrics
    #[arg(long, short)]
    pub file: PathBuf,
}

pub async fn execute(args: SubmitArgs, cfg: &EngineConfig, mode: OutputMode) -> Result<()> {
    let form = FormFile::load(&args.file)?;
    tracing::debug!(file = %args.file.display(), metrics = form.metrics.len(), server = %cfg.server, "form loaded");
    let identity = StaticIdentity::new(cfg.identity.clone());
    let mut session = FormSession::new(helpers::build_gateway(cfg)?, &identity);
    let controller = helpers::build_controller(cfg, mode)?;

    form.apply_to(&mut session)?;

    let sp = spinner::start(mode, "Verifying app id...");
    session.wait_for_app_id().await;
    spinner::finish_clear(sp);

    let errors = session.errors();
    if !errors.is_empty() {
        report_local_errors(&errors, mode)?;
        bail!("form has {} error(s)", errors.len());
    }

    let sp = spinner::start(mode, "Submitting rule set...");
    match session.submit(&controller).await {
        Ok(stored) => {
            spinner::finish_ok(sp, &format!("Created {} metric(s)", stored.len()));
            match mode {
                OutputMode::Json => print_json(&stored)?,
                OutputMode::Human => {
                    println!(
                        "{}",
                        metric_table(stored.iter().map(|m| (Some(m.uuid.as_str()), &m.metric)))
                    );
                    print_success("Rule set submitted");
                }
            }
            Ok(())
        }
        Err(EngineError::Validation(errors)) => {
            spinner::finish_clear(sp);
            report_local_errors(&errors, mode)?;
            bail!("form has {} error(s)", errors.len());
        }
        Err(e) => {
            spinner::finish_err(sp, "Submission failed");
            // the notification surface already showed backend failures
            if mode == OutputMode::Json {
                let body = match e.notification() {
                    Some(n) => json!({ "error": n.summary, "details": n.details }),
                    None => json!({ "error": e.to_string() }),
                };
                print_json(&body)?;
            } else if e.notification().is_none() {
                print_error(&e.to_string());
            }
            Err(e.into())
        }
    }
}

fn report_local_errors(errors: &[FieldError], mode: OutputMode) -> Result<()> {
    match mode {
        OutputMode::Json => {
            let lines: Vec<String> = errors.iter().map(ToString::to_string).collect();
            print_json(&json!({ "error": "Please correct the following errors:", "details": lines }))
        }
        OutputMode::Human => {
            theme::print_header("Please correct the following errors:");
            for e in errors {
                println!("    {} {}", "•".red(), e);
            }
            println!();
            Ok(())
        }
    }
}
