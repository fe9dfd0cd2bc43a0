use std::time::Duration;

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use super::OutputMode;

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", " "];

/// A spinner in human mode, nothing in JSON mode.
pub fn start(mode: OutputMode, msg: &str) -> Option<ProgressBar> {
    if mode == OutputMode::Json {
        return None;
    }
    let sp = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.cyan.bold} {msg}")
        .map(|s| s.tick_strings(TICKS))
        .unwrap_or_else(|_| ProgressStyle::default_spinner());
    sp.set_style(style);
    sp.set_message(msg.to_string());
    sp.enable_steady_tick(Duration::from_millis(80));
    Some(sp)
}

fn finish_with(sp: Option<ProgressBar>, line: String) {
    if let Some(sp) = sp {
        if let Ok(style) = ProgressStyle::with_template("{msg}") {
            sp.set_style(style);
        }
        sp.finish_with_message(line);
    }
}

pub fn finish_ok(sp: Option<ProgressBar>, msg: &str) {
    finish_with(sp, format!("{} {}", "✓".green().bold(), msg));
}

pub fn finish_err(sp: Option<ProgressBar>, msg: &str) {
    finish_with(sp, format!("{} {}", "✗".red().bold(), msg));
}

pub fn finish_clear(sp: Option<ProgressBar>) {
    if let Some(sp) = sp {
        sp.finish_and_clear();
    }
}
