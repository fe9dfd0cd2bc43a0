mod check_app;
pub(crate) mod form;
pub(crate) mod helpers;
mod metrics;
mod submit;
mod version;

use anyhow::Result;
use clap::Subcommand;

use crate::Opts;

#[derive(Subcommand)]
pub enum Commands {
    /// Fill a rule form from a YAML file and submit it
    Submit(submit::SubmitArgs),
    /// Verify an application id against the rules server
    CheckApp(check_app::CheckAppArgs),
    /// Manage stored metrics
    #[command(subcommand)]
    Metrics(metrics::MetricsCmd),
    /// Show version information
    Version,
}

pub async fn run(opts: Opts) -> Result<()> {
    let mode = opts.output_mode();
    let cfg = helpers::resolve_config(opts.config.as_deref(), opts.server.as_deref())?;

    match opts.cmd {
        Commands::Submit(args) => submit::execute(args, &cfg, mode).await,
        Commands::CheckApp(args) => check_app::execute(args, &cfg, mode).await,
        Commands::Metrics(sub) => metrics::execute(sub, &cfg, mode).await,
        Commands::Version => version::execute(mode),
    }
}
