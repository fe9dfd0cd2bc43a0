mod channel;
mod field;

pub use channel::{dependent_fields, is_required, required_fields, BASE_FIELDS};
pub use field::{Field, UnknownField};

pub use alertdesk_common::wire::{AlertChannel, Condition, Environment, FileSystemKind};
