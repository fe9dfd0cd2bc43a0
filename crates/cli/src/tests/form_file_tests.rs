#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use alertdesk_engine::config::AppCheckConfig;
    use alertdesk_engine::gateway::{AppIdGateway, StaticDirectory};
    use alertdesk_engine::identity::StaticIdentity;
    use alertdesk_engine::model::Field;
    use alertdesk_engine::FormSession;

    use crate::cmd::form::FormFile;

    fn session() -> FormSession {
        let gateway = AppIdGateway::new(Arc::new(StaticDirectory::new(["billing"])), &AppCheckConfig::default());
        FormSession::new(gateway, &StaticIdentity::anonymous())
    }

    const FORM: &str = r#"
appId: billing
environment: prod
metrics:
  - fileSystemKind: ext4
    alertChannel: both
    condition: ">"
    threshold: 85
    mountPath: /var/log
    email: ops@example.com
    slackWebhook: https://hooks.slack.com/services/T000/B000/XXXX
"#;

    #[tokio::test(start_paused = true)]
    async fn applies_every_field_as_an_edit() {
        let form = FormFile::parse(FORM).unwrap();
        let mut s = session();
        form.apply_to(&mut s).unwrap();

        assert_eq!(s.app_id(), "billing");
        assert_eq!(s.entries().len(), 1);
        let entry = s.entries().get(0).unwrap();
        assert_eq!(entry.value(Field::Threshold), "85");
        assert_eq!(entry.value(Field::Condition), ">");

        s.wait_for_app_id().await;
        assert!(s.is_valid());
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_metric_key_rejected_before_any_edit() {
        let form = FormFile::parse(
            r#"
appId: billing
environment: dev
metrics:
  - fileSystemKind: ext4
    colour: red
"#,
        )
        .unwrap();
        let mut s = session();
        let err = form.apply_to(&mut s).unwrap_err();
        assert!(format!("{err:#}").contains("colour"));
        assert!(s.entries().is_empty());
        assert_eq!(s.app_id(), "");
    }

    #[tokio::test(start_paused = true)]
    async fn local_errors_surface_after_apply() {
        let form = FormFile::parse(
            r#"
appId: billing
environment: dev
metrics:
  - alertChannel: email
    threshold: 120
"#,
        )
        .unwrap();
        let mut s = session();
        form.apply_to(&mut s).unwrap();
        s.wait_for_app_id().await;

        let errors: Vec<String> = s.errors().iter().map(ToString::to_string).collect();
        assert!(errors.iter().any(|e| e.starts_with("Metric 1, Field 'threshold'")));
        assert!(errors.iter().any(|e| e.starts_with("Metric 1, Field 'email'")));
    }

    #[test]
    fn nested_values_are_rejected() {
        let form = FormFile::parse(
            r#"
metrics:
  - mountPath: [a, b]
"#,
        )
        .unwrap();
        let gateway = AppIdGateway::new(Arc::new(StaticDirectory::new(["billing"])), &AppCheckConfig::default());
        let mut s = FormSession::new(gateway, &StaticIdentity::anonymous());
        assert!(form.apply_to(&mut s).is_err());
    }

    #[test]
    fn empty_file_gives_empty_form() {
        let form = FormFile::parse("{}").unwrap();
        assert!(form.app_id.is_empty());
        assert!(form.metrics.is_empty());
    }
}
