//! Optimistic create, update and delete against the rules backend.

mod backend;
mod controller;
mod http;
mod record;
mod simulated;
mod state;

pub use backend::{Backend, BackendErrorPayload, Operation, SubmitRequest};
pub use controller::{SubmissionController, LOAD_FALLBACK, TIMED_OUT};
pub use http::HttpBackend;
pub use record::{RecordKey, RuleTarget, WorkingRecord};
pub use simulated::SimulatedBackend;
pub use state::{BeforeImage, OpKind, OpState, OpStatus};
