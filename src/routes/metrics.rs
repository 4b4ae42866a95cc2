use actix_web::{HttpResponse, web};
use metrics_exporter_prometheus::PrometheusHandle;

/// Ambient `/metrics` route (§2), not a spec.md surface — scrape target for
/// the request-timing middleware's counters/histograms.
pub async fn metrics_endpoint(handle: web::Data<PrometheusHandle>) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; version=0.0.4")
        .body(handle.render())
}
