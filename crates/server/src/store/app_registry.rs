use std::sync::Arc;

use alertdesk_common::wire::AppValidation;
use alertdesk_engine::gateway::APP_NOT_FOUND;
use dashmap::DashSet;

#[derive(Clone, Default)]
pub struct AppRegistry {
    ids: Arc<DashSet<String>>,
}

impl AppRegistry {
    pub fn new(ids: impl IntoIterator<Item = String>) -> Self {
        let set = DashSet::new();
        for id in ids {
            set.insert(id);
        }
        Self { ids: Arc::new(set) }
    }

    pub fn contains(&self, app_id: &str) -> bool {
        self.ids.contains(app_id)
    }

    pub fn validate(&self, app_id: &str) -> AppValidation {
        if self.contains(app_id) {
            AppValidation {
                valid: true,
                message: String::new(),
            }
        } else {
            AppValidation {
                valid: false,
                message: APP_NOT_FOUND.to_string(),
            }
        }
    }

    pub fn count(&self) -> usize {
        self.ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_known_and_unknown() {
        let apps = AppRegistry::new(["billing".to_string()]);
        assert!(apps.validate("billing").valid);
        let miss = apps.validate("payroll");
        assert!(!miss.valid);
        assert_eq!(miss.message, APP_NOT_FOUND);
    }

    #[test]
    fn duplicate_seed_ids_count_once() {
        let apps = AppRegistry::new(["billing", "billing", "payroll"].map(String::from));
        assert_eq!(apps.count(), 2);
        assert!(apps.contains("payroll"));
        assert!(!AppRegistry::default().contains("billing"));
    }
}
