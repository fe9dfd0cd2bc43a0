use std::net::SocketAddr;

pub const REST_ADDR_ENV: &str = "ALERTDESK_REST_ADDR";
pub const APP_IDS_ENV: &str = "ALERTDESK_APP_IDS";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub rest_addr: SocketAddr,
    /// App ids the service knows about at startup.
    pub app_ids: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rest_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            app_ids: vec!["billing".into(), "payroll".into(), "inventory".into()],
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Applies overrides from `lookup`; unparseable values keep the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(REST_ADDR_ENV) {
            match raw.parse() {
                Ok(addr) => cfg.rest_addr = addr,
                Err(e) => tracing::warn!(value = %raw, error = %e, "ignoring invalid {REST_ADDR_ENV}"),
            }
        }
        if let Some(raw) = lookup(APP_IDS_ENV) {
            cfg.app_ids = parse_app_ids(&raw);
        }
        cfg
    }
}

fn parse_app_ids(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
