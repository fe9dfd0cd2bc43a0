use alertdesk_common::wire::MetricDraft;
use comfy_table::{presets::UTF8_FULL, Attribute, Cell, Color, ContentArrangement, Table};

pub fn build_table(headers: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(
        headers
            .iter()
            .map(|h| Cell::new(h).fg(Color::Cyan).add_attribute(Attribute::Bold))
            .collect::<Vec<_>>(),
    );
    table
}

/// One row per `(uuid, metric)`; provisional rows show a dash for the id.
pub fn metric_table<'a>(rows: impl IntoIterator<Item = (Option<&'a str>, &'a MetricDraft)>) -> Table {
    let mut table = build_table(&["UUID", "FS", "Channel", "Condition", "Mount", "Delivery"]);
    for (uuid, m) in rows {
        let delivery = [m.email.as_deref(), m.slack_webhook.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join("\n");
        table.add_row(vec![
            Cell::new(uuid.unwrap_or("-")),
            Cell::new(m.file_system_kind.as_str()),
            Cell::new(m.alert_channel.as_str()),
            Cell::new(format!("{} {}", m.condition.as_str(), m.threshold)),
            Cell::new(&m.mount_path),
            Cell::new(delivery),
        ]);
    }
    table
}
