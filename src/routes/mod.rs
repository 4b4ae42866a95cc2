mod health_check;
mod metrics;
mod payments;

pub use health_check::health_check;
pub use metrics::metrics_endpoint;
pub use payments::{create_payment, get_payment};
