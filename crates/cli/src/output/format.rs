use std::io::Write;

use colored::Colorize;
use serde::Serialize;

/// `--json` switches every command to machine-readable stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

pub fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

pub fn print_success(msg: &str) {
    println!("  {} {}", "✔".bright_green(), msg.green());
}

pub fn print_error(msg: &str) {
    eprintln!("  {} {}", "✘".bright_red().bold(), msg.red());
}
