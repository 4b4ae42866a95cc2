use actix_web::{
    Error, HttpMessage,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
};

use crate::authentication::MerchantId;
use crate::errors::AuthError;

use super::from_header;

const IDEMPOTENCY_HEADER: &str = "X-Idempotency-Key";

/// §4.2: idempotency interceptor, translated to an actix `from_fn`
/// middleware. Reads the caller-supplied header, composes it with the
/// merchant id resolved by [`crate::authentication::require_api_key`] into a
/// namespaced cache key, and attaches it as a request extension. Ordering
/// with the auth interceptor is enforced by composition in `startup.rs` —
/// this middleware must run after `require_api_key` so `MerchantId` is
/// already present.
pub async fn attach_idempotency_key(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let merchant_id = req
        .extensions()
        .get::<MerchantId>()
        .map(|merchant_id| merchant_id.0)
        .ok_or(AuthError::MerchantNotFound)?;

    let header_value = req
        .headers()
        .get(IDEMPOTENCY_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    if let Some(key) = from_header(merchant_id, header_value.as_deref()) {
        req.extensions_mut().insert(key);
    }

    next.call(req).await
}
