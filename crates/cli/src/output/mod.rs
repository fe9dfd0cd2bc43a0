pub mod confirm;
mod format;
pub mod spinner;
mod surface;
mod table;
pub mod theme;

pub use format::{print_error, print_json, print_success, OutputMode};
pub use surface::TerminalSurface;
pub use table::metric_table;
