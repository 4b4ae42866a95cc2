use actix_web::{
    Error, HttpMessage,
    body::MessageBody,
    dev::{ServiceRequest, ServiceResponse},
    middleware::Next,
    web,
};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AuthError;
use crate::merchant;

/// The authenticated merchant id, attached to a request's extensions by
/// [`require_api_key`]. Downstream handlers may assume it is present iff the
/// call reached them (§4.1 contract).
#[derive(Debug, Clone, Copy)]
pub struct MerchantId(pub Uuid);

/// §4.1: api-key interceptor, translated from the Go gRPC interceptor to an
/// actix `from_fn` middleware. Looks up the `Authorization` header, resolves
/// it to an active merchant, and stashes the merchant id for the handler.
pub async fn require_api_key(
    req: ServiceRequest,
    next: Next<impl MessageBody>,
) -> Result<ServiceResponse<impl MessageBody>, Error> {
    let api_key = extract_api_key(&req)?;

    let pool = req
        .app_data::<web::Data<PgPool>>()
        .expect("PgPool must be registered as app_data")
        .clone();

    let merchant_id = merchant::get_id_by_api_key(&pool, api_key)
        .await
        .map_err(|e| AuthError::UnexpectedError(e.into()))?
        .ok_or(AuthError::MerchantNotFound)?;

    req.extensions_mut().insert(MerchantId(merchant_id));

    next.call(req).await
}

fn extract_api_key(req: &ServiceRequest) -> Result<Uuid, AuthError> {
    let header_value = req
        .headers()
        .get("Authorization")
        .ok_or(AuthError::MissingApiKey)?
        .to_str()
        .map_err(|_| AuthError::MalformedApiKey)?;

    let id: Uuid = header_value
        .parse()
        .map_err(|_| AuthError::MalformedApiKey)?;

    if id.is_nil() {
        return Err(AuthError::MalformedApiKey);
    }

    Ok(id)
}
