//! Rule-driven form engine for defining metric alert rules.
//!
//! The engine owns one editing session: a variable-length collection of metric
//! entries whose required fields depend on the alert channel, an app id that is
//! verified remotely with debounce and supersede semantics, and a submission
//! controller that mutates a working list optimistically and rolls back on
//! backend failure.

pub mod config;
pub mod decode;
pub mod entry;
pub mod error;
pub mod gateway;
pub mod identity;
pub mod model;
pub mod notify;
pub mod session;
pub mod submission;
pub mod validation;

pub use error::{EngineError, FieldError};
pub use session::FormSession;
