mod cmd;
mod output;
#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use cmd::Commands;
use output::OutputMode;
use tracing_subscriber::EnvFilter;

/// Fill, check and manage metric alert rules from the terminal.
#[derive(Parser)]
#[command(name = "alertdesk", version)]
pub struct Opts {
    #[command(subcommand)]
    cmd: Commands,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    json: bool,

    /// Rules server base URL; wins over the config file
    #[arg(long, global = true, env = "ALERTDESK_SERVER")]
    server: Option<String>,

    /// Engine config file (default: the user config dir)
    #[arg(long, short = 'c', global = true)]
    config: Option<String>,
}

impl Opts {
    pub fn output_mode(&self) -> OutputMode {
        match self.json {
            true => OutputMode::Json,
            false => OutputMode::Human,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    cmd::run(Opts::parse()).await
}
