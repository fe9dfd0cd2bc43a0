use std::path::Path;

use super::schema::EngineConfig;

/// Why an engine config file could not be used.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(serde_yaml::Error),
    Validation(String),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "cannot read config: {e}"),
            LoadError::Parse(e) => write!(f, "malformed config: {e}"),
            LoadError::Validation(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            LoadError::Parse(e) => Some(e),
            LoadError::Validation(_) => None,
        }
    }
}

impl From<std::io::Error> for LoadError {
    fn from(e: std::io::Error) -> Self {
        LoadError::Io(e)
    }
}

impl From<serde_yaml::Error> for LoadError {
    fn from(e: serde_yaml::Error) -> Self {
        LoadError::Parse(e)
    }
}

pub fn load_from_file(path: &Path) -> Result<EngineConfig, LoadError> {
    load_from_str(&std::fs::read_to_string(path)?)
}

/// Parses YAML; absent sections take their defaults.
pub fn load_from_str(yaml: &str) -> Result<EngineConfig, LoadError> {
    let cfg = serde_yaml::from_str::<EngineConfig>(yaml)?;
    check(&cfg).map_err(LoadError::Validation)?;
    Ok(cfg)
}

fn check(cfg: &EngineConfig) -> Result<(), String> {
    if cfg.server.trim().is_empty() {
        return Err("server URL must not be empty".to_string());
    }
    let durations = [
        ("app_check.debounce_ms", cfg.app_check.debounce_ms),
        ("app_check.timeout_ms", cfg.app_check.timeout_ms),
        ("submit.timeout_ms", cfg.submit.timeout_ms),
    ];
    match durations.iter().find(|(_, ms)| *ms == 0) {
        Some((name, _)) => Err(format!("{name} must be > 0")),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_only_keeps_section_defaults() {
        let cfg = load_from_str("server: http://127.0.0.1:9000\n").unwrap();
        assert_eq!(cfg.server, "http://127.0.0.1:9000");
        assert_eq!(cfg.app_check.timeout_ms, 5000);
        assert!(cfg.identity.is_none());
    }

    #[test]
    fn identity_section_parsed() {
        let yaml = "identity:\n  name: Jane Doe\n  email_or_username: jane\n  id: \"7\"\n";
        let cfg = load_from_str(yaml).unwrap();
        assert_eq!(cfg.identity.map(|u| u.email_or_username), Some("jane".to_string()));
    }

    #[test]
    fn empty_server_rejected() {
        let err = load_from_str("server: \"\"\n").unwrap_err();
        assert!(err.to_string().contains("server URL"));
    }

    #[test]
    fn zero_debounce_rejected() {
        let yaml = "server: http://x\napp_check:\n  debounce_ms: 0\n";
        let err = load_from_str(yaml).unwrap_err();
        assert_eq!(err.to_string(), "invalid config: app_check.debounce_ms must be > 0");
    }

    #[test]
    fn zero_submit_timeout_rejected() {
        let yaml = "server: http://x\nsubmit:\n  timeout_ms: 0\n";
        let err = load_from_str(yaml).unwrap_err();
        assert!(matches!(err, LoadError::Validation(_)));
    }

    #[test]
    fn malformed_yaml_is_parse_error() {
        let err = load_from_str("server: [unclosed").unwrap_err();
        assert!(matches!(err, LoadError::Parse(_)));
    }

    #[test]
    fn load_from_file_works() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "server: http://s\nsubmit:\n  timeout_ms: 500\n").unwrap();
        let cfg = load_from_file(&path).unwrap();
        assert_eq!(cfg.submit.timeout_ms, 500);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_from_file(Path::new("/nonexistent/alertdesk.yml")).unwrap_err();
        assert!(matches!(err, LoadError::Io(_)));
    }
}
