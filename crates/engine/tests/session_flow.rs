use std::sync::Arc;
use std::time::Duration;

use alertdesk_engine::config::AppCheckConfig;
use alertdesk_engine::decode::STRUCTURED_HEADER;
use alertdesk_engine::entry::FieldState;
use alertdesk_engine::gateway::{AppIdGateway, AppIdStatus, StaticDirectory};
use alertdesk_engine::identity::StaticIdentity;
use alertdesk_engine::model::Field;
use alertdesk_engine::notify::RecordingSurface;
use alertdesk_engine::submission::{BackendErrorPayload, SimulatedBackend, SubmissionController};
use alertdesk_engine::{EngineError, FormSession};
use serde_json::json;

struct Harness {
    session: FormSession,
    controller: SubmissionController,
    backend: Arc<SimulatedBackend>,
    surface: Arc<RecordingSurface>,
}

fn harness(directory: StaticDirectory) -> Harness {
    let gateway = AppIdGateway::new(Arc::new(directory), &AppCheckConfig::default());
    let backend = Arc::new(SimulatedBackend::new(Duration::from_millis(1000)));
    let surface = Arc::new(RecordingSurface::new());
    let controller = SubmissionController::new(backend.clone(), surface.clone(), Duration::from_secs(10));
    Harness {
        session: FormSession::new(gateway, &StaticIdentity::anonymous()),
        controller,
        backend,
        surface,
    }
}

fn fill(session: &mut FormSession, index: usize, channel: &str, threshold: &str) {
    for (field, value) in [
        (Field::FileSystemKind, "ext4"),
        (Field::AlertChannel, channel),
        (Field::Condition, ">"),
        (Field::Threshold, threshold),
        (Field::MountPath, "/var/log"),
        (Field::Email, "ops@example.com"),
        (Field::SlackWebhook, "https://hooks.slack.com/services/T000/B000/XXXX"),
    ] {
        session.update_field(index, field, value).unwrap();
    }
}

#[tokio::test(start_paused = true)]
async fn structured_rejection_decodes_and_rolls_back() {
    let mut h = harness(StaticDirectory::new(["validAppId"]));
    h.session.set_app_id("validAppId");
    h.session.set_environment("prod");
    let first = h.session.add_entry();
    let second = h.session.add_entry();
    fill(&mut h.session, first, "email", "80");
    fill(&mut h.session, second, "both", "90");
    h.session.wait_for_app_id().await;
    assert!(h.session.is_valid());

    let before = h.session.entries().clone();
    h.backend
        .fail_next(BackendErrorPayload(json!({"error": {"0": {"threshold": ["must be <= 99"]}}})))
        .await;

    let err = h.session.submit(&h.controller).await.unwrap_err();
    let notification = match err {
        EngineError::BackendRejection(n) => n,
        other => panic!("expected rejection, got {other:?}"),
    };
    assert_eq!(notification.summary, STRUCTURED_HEADER);
    assert_eq!(notification.details, ["Metric 1, Field 'threshold': must be <= 99"]);
    assert_eq!(h.surface.take(), vec![notification]);

    assert_eq!(h.session.entries(), &before);
    assert_eq!(h.session.app_id(), "validAppId");
    assert!(h.controller.records().await.is_empty());
}

#[tokio::test(start_paused = true)]
async fn flat_failure_becomes_single_summary() {
    let mut h = harness(StaticDirectory::new(["billing"]));
    h.session.set_app_id("billing");
    h.session.set_environment("dev");
    let i = h.session.add_entry();
    fill(&mut h.session, i, "slack", "10");
    h.session.wait_for_app_id().await;

    h.backend
        .fail_next(BackendErrorPayload::unavailable("Service temporarily unavailable."))
        .await;
    let err = h.session.submit(&h.controller).await.unwrap_err();
    let n = err.notification().unwrap();
    assert_eq!(n.summary, "Service temporarily unavailable.");
    assert!(n.details.is_empty());
    assert_eq!(h.session.entries().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn snapshot_omits_webhook_after_switch_to_email() {
    let mut h = harness(StaticDirectory::new(["billing"]));
    let i = h.session.add_entry();
    fill(&mut h.session, i, "slack", "50");
    h.session.update_field(i, Field::AlertChannel, "email").unwrap();

    let snap = &h.session.entries().snapshot()[0];
    assert_eq!(snap.get(Field::Email), Some("ops@example.com"));
    assert_eq!(snap.get(Field::SlackWebhook), None);
}

#[tokio::test(start_paused = true)]
async fn channel_toggle_moves_requirement() {
    let mut h = harness(StaticDirectory::new(["billing"]));
    let i = h.session.add_entry();
    h.session.update_field(i, Field::AlertChannel, "email").unwrap();
    h.session.update_field(i, Field::Email, "broken").unwrap();

    let record = h.session.entries().get(i).unwrap();
    assert!(matches!(record.state(Field::Email), FieldState::Invalid(_)));
    assert_eq!(record.state(Field::SlackWebhook), FieldState::Unconstrained);

    h.session.update_field(i, Field::AlertChannel, "slack").unwrap();
    let record = h.session.entries().get(i).unwrap();
    assert_eq!(record.state(Field::Email), FieldState::Unconstrained);
    assert!(matches!(record.state(Field::SlackWebhook), FieldState::Invalid(_)));

    h.session.update_field(i, Field::AlertChannel, "both").unwrap();
    let record = h.session.entries().get(i).unwrap();
    assert!(matches!(record.state(Field::Email), FieldState::Invalid(_)));
    assert!(matches!(record.state(Field::SlackWebhook), FieldState::Invalid(_)));
}

#[tokio::test(start_paused = true)]
async fn stale_app_id_verdict_never_applies() {
    let directory = StaticDirectory::new(["validAppId"]).with_latency("validAppId", Duration::from_secs(2));
    let mut h = harness(directory);

    h.session.set_app_id("validAppId");
    tokio::time::sleep(Duration::from_millis(450)).await;
    h.session.set_app_id("v");

    let verdict = h.session.wait_for_app_id().await;
    assert_eq!(verdict.value, "v");
    tokio::time::sleep(Duration::from_secs(3)).await;
    assert!(matches!(h.session.app_id_status(), AppIdStatus::Invalid { .. }));
}

#[tokio::test(start_paused = true)]
async fn committed_submission_clears_form_and_lists_records() {
    let mut h = harness(StaticDirectory::new(["billing"]));
    h.session.set_app_id("billing");
    h.session.set_environment("test");
    let i = h.session.add_entry();
    fill(&mut h.session, i, "both", "42");
    h.session.wait_for_app_id().await;

    let stored = h.session.submit(&h.controller).await.unwrap();
    assert_eq!(stored.len(), 1);
    assert!(h.session.entries().is_empty());

    let records = h.controller.records().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].uuid.as_deref(), Some(stored[0].uuid.as_str()));
    assert!(h.surface.take().is_empty());
}

#[tokio::test]
async fn stale_index_is_an_error_not_a_panic() {
    let mut h = harness(StaticDirectory::new(["billing"]));
    h.session.add_entry();
    h.session.remove_entry(0).unwrap();
    assert_eq!(
        h.session.update_field(0, Field::Threshold, "5").unwrap_err(),
        EngineError::IndexOutOfRange { index: 0, len: 0 }
    );
}
