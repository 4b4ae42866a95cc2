mod middleware;

pub use middleware::RequestMetrics;

use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Installs the process-global Prometheus recorder once at startup. The
/// returned handle backs the `/metrics` route (§2 ambient stack — request
/// counters/latency, not a spec.md business feature).
///
/// # Panics
/// if a recorder has already been installed for this process.
#[must_use]
pub fn install_recorder() -> PrometheusHandle {
    PrometheusBuilder::new()
        .install_recorder()
        .expect("failed to install the Prometheus metrics recorder")
}
