use anyhow::Result;
use serde_json::json;

use crate::output::{print_json, theme, OutputMode};

pub fn execute(mode: OutputMode) -> Result<()> {
    let version = env!("CARGO_PKG_VERSION");
    match mode {
        OutputMode::Json => print_json(&json!({ "name": "alertdesk", "version": version })),
        OutputMode::Human => {
            theme::print_header("alertdesk");
            theme::print_kv("Version", version);
            theme::print_dim("metric alert rule forms");
            println!();
            Ok(())
        }
    }
}
