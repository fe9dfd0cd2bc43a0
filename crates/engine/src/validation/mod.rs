mod draft;
mod grammar;
mod rules;

pub use draft::{structured_violations, validate_draft};
pub use grammar::{is_email, is_mount_path};
pub use rules::{validate_field, Verdict, THRESHOLD_MAX, THRESHOLD_MIN};
