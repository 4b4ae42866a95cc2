use std::any::Any;
use std::panic::AssertUnwindSafe;

use actix_web::{
    Error,
    body::{BoxBody, MessageBody},
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};
use futures::FutureExt;

use super::PaymentError;

/// §7: "Panics inside a handler are caught by the recovery interceptor,
/// logged with a stack trace, and converted to `internal`." Grounded in the
/// Go original's gRPC recovery interceptor; the actix idiom for the same
/// concern is a `from_fn` middleware wrapping the call in `catch_unwind`
/// instead of letting a panicking handler take the worker thread down.
pub async fn recover_from_panics(
    req: ServiceRequest,
    next: Next<impl MessageBody + 'static>,
) -> Result<ServiceResponse<BoxBody>, Error> {
    match AssertUnwindSafe(next.call(req)).catch_unwind().await {
        Ok(Ok(response)) => Ok(response.map_into_boxed_body()),
        Ok(Err(err)) => Err(err),
        Err(panic) => {
            let message = panic_message(panic.as_ref());
            tracing::error!(panic.message = %message, "handler panicked, recovering");
            Err(PaymentError::Unexpected(anyhow::anyhow!("internal panic: {message}")).into())
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_owned()
    }
}
