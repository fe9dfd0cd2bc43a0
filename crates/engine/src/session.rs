use alertdesk_common::wire::{Environment, StoredMetric};

use crate::entry::{EntryCollection, EntryRecord};
use crate::error::{EngineError, FieldError};
use crate::gateway::{AppIdGateway, AppIdStatus, AppIdVerdict};
use crate::identity::{IdentityProvider, UserIdentity};
use crate::model::Field;
use crate::submission::{RuleTarget, SubmissionController};

pub const APP_ID_FIELD: &str = "appId";
pub const ENVIRONMENT_FIELD: &str = "environment";
pub const METRICS_FIELD: &str = "metrics";

/// One rule form being edited: the app id, its environment and the metric
/// entries. Every write revalidates synchronously except the app id, whose
/// verdict arrives from the gateway.
pub struct FormSession {
    app_id: String,
    environment: String,
    entries: EntryCollection,
    gateway: AppIdGateway,
    user: Option<UserIdentity>,
}

impl FormSession {
    pub fn new(gateway: AppIdGateway, identity: &dyn IdentityProvider) -> Self {
        Self {
            app_id: String::new(),
            environment: String::new(),
            entries: EntryCollection::new(),
            gateway,
            user: identity.current_user(),
        }
    }

    pub fn user(&self) -> Option<&UserIdentity> {
        self.user.as_ref()
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Stores the value and re-arms the remote check; any earlier verdict no
    /// longer applies.
    pub fn set_app_id(&mut self, value: &str) {
        self.app_id = value.to_string();
        self.gateway.validate(value);
    }

    pub fn app_id_status(&self) -> AppIdStatus {
        self.gateway.status()
    }

    pub async fn wait_for_app_id(&self) -> AppIdVerdict {
        self.gateway.settled().await
    }

    pub fn set_environment(&mut self, value: &str) {
        self.environment = value.to_string();
    }

    pub fn environment(&self) -> Option<Environment> {
        self.environment.trim().parse().ok()
    }

    pub fn entries(&self) -> &EntryCollection {
        &self.entries
    }

    pub fn add_entry(&mut self) -> usize {
        self.entries.add_entry()
    }

    pub fn remove_entry(&mut self, index: usize) -> Result<EntryRecord, EngineError> {
        self.entries.remove_entry(index)
    }

    pub fn update_field(&mut self, index: usize, field: Field, value: &str) -> Result<(), EngineError> {
        self.entries.update_field(index, field, value)
    }

    /// Every local problem, top-level fields first, then entries in order.
    pub fn errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();

        match self.app_id_status() {
            AppIdStatus::Valid => {}
            AppIdStatus::Unvalidated => errors.push(FieldError::top_level(APP_ID_FIELD, "is required")),
            AppIdStatus::Checking => errors.push(FieldError::top_level(APP_ID_FIELD, "is being verified")),
            AppIdStatus::Invalid { reason } => errors.push(FieldError::top_level(APP_ID_FIELD, reason)),
        }

        if self.environment.trim().is_empty() {
            errors.push(FieldError::top_level(ENVIRONMENT_FIELD, "is required"));
        } else if self.environment().is_none() {
            errors.push(FieldError::top_level(ENVIRONMENT_FIELD, "must be one of dev, test, prod"));
        }

        if self.entries.is_empty() {
            errors.push(FieldError::top_level(METRICS_FIELD, "at least one metric is required"));
        }
        errors.extend(self.entries.errors());
        errors
    }

    pub fn is_valid(&self) -> bool {
        self.app_id_status().is_valid()
            && self.environment().is_some()
            && !self.entries.is_empty()
            && self.entries.is_valid()
    }

    /// Submits the form as a new rule set. Nothing is sent while any local
    /// error remains. On success the form resets; on failure the entries are
    /// left exactly as they were before the attempt.
    pub async fn submit(&mut self, controller: &SubmissionController) -> Result<Vec<StoredMetric>, EngineError> {
        if let AppIdStatus::Invalid { reason } = self.app_id_status() {
            tracing::info!(app_id = %self.app_id.trim(), %reason, "submission blocked by app id check");
            return Err(EngineError::RemoteValidation(reason));
        }
        let errors = self.errors();
        if !errors.is_empty() {
            tracing::info!(errors = errors.len(), "submission blocked by local validation");
            return Err(EngineError::Validation(errors));
        }
        let Some(environment) = self.environment() else {
            return Err(EngineError::Validation(vec![FieldError::top_level(
                ENVIRONMENT_FIELD,
                "is required",
            )]));
        };

        let mut drafts = Vec::with_capacity(self.entries.len());
        let mut conversion = Vec::new();
        for (index, snapshot) in self.entries.snapshot().iter().enumerate() {
            match snapshot.to_draft(index) {
                Ok(draft) => drafts.push(draft),
                Err(errs) => conversion.extend(errs),
            }
        }
        if !conversion.is_empty() {
            return Err(EngineError::Validation(conversion));
        }

        let target = RuleTarget::new(self.app_id.trim(), environment);
        let before = self.entries.clone();
        tracing::info!(
            %target,
            entries = drafts.len(),
            submitted_by = self.user.as_ref().map(|u| u.email_or_username.as_str()).unwrap_or("anonymous"),
            "submitting form"
        );

        match controller.create(&target, drafts).await {
            Ok(stored) => {
                self.reset();
                Ok(stored)
            }
            Err(e) => {
                self.entries = before;
                Err(e)
            }
        }
    }

    /// Clears every field, including the app id verdict.
    pub fn reset(&mut self) {
        self.app_id.clear();
        self.environment.clear();
        self.entries.clear();
        self.gateway.validate("");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use crate::config::AppCheckConfig;
    use crate::gateway::StaticDirectory;
    use crate::identity::StaticIdentity;
    use crate::notify::RecordingSurface;
    use crate::submission::SimulatedBackend;

    fn session() -> FormSession {
        let gateway = AppIdGateway::new(Arc::new(StaticDirectory::new(["billing"])), &AppCheckConfig::default());
        FormSession::new(gateway, &StaticIdentity::anonymous())
    }

    fn fill_email_entry(s: &mut FormSession) -> usize {
        let i = s.add_entry();
        for (field, value) in [
            (Field::FileSystemKind, "xfs"),
            (Field::AlertChannel, "email"),
            (Field::Condition, "<"),
            (Field::Threshold, "15"),
            (Field::MountPath, "/data"),
            (Field::Email, "ops@example.com"),
        ] {
            s.update_field(i, field, value).unwrap();
        }
        i
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_session_reports_missing_fields() {
        let s = session();
        let errors: Vec<String> = s.errors().iter().map(ToString::to_string).collect();
        assert_eq!(
            errors,
            [
                "Field 'appId': is required",
                "Field 'environment': is required",
                "Field 'metrics': at least one metric is required",
            ]
        );
        assert!(!s.is_valid());
    }

    #[tokio::test(start_paused = true)]
    async fn becomes_valid_once_app_id_verified() {
        let mut s = session();
        s.set_environment("test");
        fill_email_entry(&mut s);
        s.set_app_id("billing");
        assert!(!s.is_valid());
        assert_eq!(s.app_id_status(), AppIdStatus::Checking);

        s.wait_for_app_id().await;
        assert!(s.is_valid());
        assert!(s.errors().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_environment_reported() {
        let mut s = session();
        s.set_environment("staging");
        assert!(s
            .errors()
            .iter()
            .any(|e| e.field == ENVIRONMENT_FIELD && e.message.contains("dev, test, prod")));
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_app_id_blocks_submit_without_backend_call() {
        let backend = Arc::new(SimulatedBackend::default());
        let controller = SubmissionController::new(backend.clone(), Arc::new(RecordingSurface::new()), Duration::from_secs(5));
        let mut s = session();
        s.set_environment("dev");
        fill_email_entry(&mut s);
        s.set_app_id("payroll");
        s.wait_for_app_id().await;

        let err = s.submit(&controller).await.unwrap_err();
        assert_eq!(err, EngineError::RemoteValidation("App ID not found.".into()));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn local_errors_block_submit() {
        let backend = Arc::new(SimulatedBackend::default());
        let controller = SubmissionController::new(backend.clone(), Arc::new(RecordingSurface::new()), Duration::from_secs(5));
        let mut s = session();
        s.set_environment("dev");
        s.set_app_id("billing");
        s.wait_for_app_id().await;
        s.add_entry();

        assert!(matches!(s.submit(&controller).await, Err(EngineError::Validation(_))));
        assert_eq!(backend.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn successful_submit_resets_form() {
        let backend = Arc::new(SimulatedBackend::default());
        let controller = SubmissionController::new(backend.clone(), Arc::new(RecordingSurface::new()), Duration::from_secs(5));
        let mut s = session();
        s.set_environment("prod");
        fill_email_entry(&mut s);
        s.set_app_id("billing");
        s.wait_for_app_id().await;

        let stored = s.submit(&controller).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].metric.email.as_deref(), Some("ops@example.com"));
        assert!(s.entries().is_empty());
        assert_eq!(s.app_id(), "");
        assert_eq!(s.app_id_status(), AppIdStatus::Unvalidated);
        assert_eq!(backend.count(), 1);
    }

    #[test]
    fn identity_read_once_at_construction() {
        let user = UserIdentity {
            name: "Jane Doe".into(),
            email_or_username: "jane".into(),
            id: "1".into(),
        };
        let gateway = AppIdGateway::new(Arc::new(StaticDirectory::new(["billing"])), &AppCheckConfig::default());
        let s = FormSession::new(gateway, &StaticIdentity::new(Some(user.clone())));
        assert_eq!(s.user(), Some(&user));
    }
}
