mod apps;
mod error;
mod health;
mod metrics;
mod router;

pub use error::ApiError;
pub use router::{router, AppState};
