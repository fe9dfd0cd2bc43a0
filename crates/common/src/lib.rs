pub mod batch;
pub mod clock;
pub mod record_id;
pub mod retry;
pub mod seq;
pub mod wire;
