use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
};
use futures::future::LocalBoxFuture;
use std::future::{Ready, ready};
use std::rc::Rc;
use std::time::Instant;
use uuid::Uuid;

/// Request-timing middleware (§2 ambient stack, not a spec.md feature).
/// Keeps the teacher's page-view-counter *shape* but retargets it at the
/// payment routes: records `http_requests_total` / `http_request_duration_seconds`
/// per method+route+status via the process-global `metrics` recorder
/// installed by [`super::install_recorder`].
pub struct RequestMetrics;

impl<S, B> Transform<S, ServiceRequest> for RequestMetrics
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestMetricsMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestMetricsMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct RequestMetricsMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for RequestMetricsMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let method = req.method().to_string();
        let route = sanitize_route(req.path());
        let service = Rc::clone(&self.service);

        Box::pin(async move {
            let result = service.call(req).await;
            let duration = start.elapsed().as_secs_f64();

            let status = match &result {
                Ok(response) => response.status().as_u16(),
                Err(err) => err.as_response_error().status_code().as_u16(),
            };

            metrics::counter!(
                "http_requests_total",
                "method" => method.clone(),
                "route" => route.clone(),
                "status" => status.to_string(),
            )
            .increment(1);

            metrics::histogram!(
                "http_request_duration_seconds",
                "method" => method,
                "route" => route,
            )
            .record(duration);

            result
        })
    }
}

/// Collapses id-shaped path segments into a fixed placeholder so per-route
/// series don't fan out once per transaction id.
fn sanitize_route(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            if segment.parse::<Uuid>().is_ok() || (!segment.is_empty() && segment.chars().all(|c| c.is_ascii_digit())) {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}
