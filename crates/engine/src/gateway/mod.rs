//! Remote verification of the app id, debounced and superseded by sequence
//! number so only the latest edit's verdict is ever applied.

mod directory;
mod http;
mod validator;

pub use directory::{AppDirectory, DirectoryError, StaticDirectory, APP_NOT_FOUND};
pub use http::HttpDirectory;
pub use validator::{AppIdGateway, AppIdStatus, AppIdVerdict, CHECK_FAILED, CHECK_TIMED_OUT};
