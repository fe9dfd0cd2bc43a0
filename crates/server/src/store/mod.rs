mod app_registry;
mod metric_store;

pub use app_registry::AppRegistry;
pub use metric_store::MetricStore;
