use alertdesk_engine::notify::{Notification, NotificationSurface};
use colored::Colorize;

use super::format::print_error;

/// Shows decoded backend errors on stderr.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalSurface;

impl NotificationSurface for TerminalSurface {
    fn notify(&self, notification: &Notification) {
        print_error(&notification.summary);
        for line in &notification.details {
            eprintln!("    {}", line.red());
        }
    }
}
