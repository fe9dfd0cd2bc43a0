mod collection;
mod record;
mod snapshot;

pub use collection::EntryCollection;
pub use record::{EntryRecord, FieldState};
pub use snapshot::EntrySnapshot;
