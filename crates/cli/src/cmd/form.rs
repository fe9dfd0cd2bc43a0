use std::collections::BTreeMap;
use std::path::Path;

use alertdesk_engine::model::Field;
use alertdesk_engine::FormSession;
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use serde_yaml::Value;

/// A rule form as written by hand: top-level fields plus one map per metric,
/// keyed by wire field names.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormFile {
    #[serde(default)]
    pub app_id: String,
    #[serde(default)]
    pub environment: String,
    #[serde(default)]
    pub metrics: Vec<BTreeMap<String, Value>>,
}

impl FormFile {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("invalid form file {}", path.display()))
    }

    pub fn parse(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Replays the file as edits on the session, the way a user filling the
    /// form would; unknown keys are rejected before anything is applied.
    pub fn apply_to(&self, session: &mut FormSession) -> Result<()> {
        let mut entries = Vec::with_capacity(self.metrics.len());
        for (i, metric) in self.metrics.iter().enumerate() {
            let mut edits = Vec::with_capacity(metric.len());
            for (key, value) in metric {
                let field: Field = key.parse().with_context(|| format!("metric {}", i + 1))?;
                let value = scalar(value).with_context(|| format!("metric {}, field '{key}'", i + 1))?;
                edits.push((field, value));
            }
            entries.push(edits);
        }

        session.set_environment(&self.environment);
        for edits in entries {
            let index = session.add_entry();
            for (field, value) in edits {
                session.update_field(index, field, &value)?;
            }
        }
        session.set_app_id(&self.app_id);
        Ok(())
    }
}

fn scalar(value: &Value) -> Result<String> {
    match value {
        Value::Null => Ok(String::new()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        _ => bail!("expected a scalar value"),
    }
}
