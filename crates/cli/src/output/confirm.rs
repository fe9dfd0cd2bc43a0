use dialoguer::{theme::ColorfulTheme, Confirm};

/// Asks a yes/no question defaulting to no; a failed prompt counts as no.
pub fn confirm_action(msg: &str) -> bool {
    Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(msg)
        .default(false)
        .interact()
        .unwrap_or(false)
}
