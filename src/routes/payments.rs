use actix_web::{HttpMessage, HttpRequest, HttpResponse, web};
use sqlx::PgPool;

use crate::acquirer::Acquirer;
use crate::authentication::MerchantId;
use crate::errors::PaymentError;
use crate::idempotency::{IdempotencyCache, IdempotencyKey};
use crate::payment::{self, dto::CreatePaymentRequest};

/// §4.3: `CreatePayment`. `MerchantId` and an optional `IdempotencyKey` are
/// read from request extensions, attached upstream by the auth and
/// idempotency interceptor middleware (`startup.rs` wires the ordering).
#[tracing::instrument(
    name = "Create payment",
    skip(req, body, pool, acquirer, cache),
    fields(merchant_id = tracing::field::Empty)
)]
pub async fn create_payment(
    req: HttpRequest,
    body: web::Json<CreatePaymentRequest>,
    pool: web::Data<PgPool>,
    acquirer: web::Data<dyn Acquirer>,
    cache: web::Data<dyn IdempotencyCache>,
) -> Result<HttpResponse, PaymentError> {
    let merchant_id = merchant_id(&req);
    tracing::Span::current().record("merchant_id", tracing::field::display(merchant_id));

    let idempotency_key = req.extensions().get::<IdempotencyKey>().cloned();

    let response = payment::create_payment(
        pool.get_ref(),
        acquirer.get_ref().as_ref(),
        cache.get_ref().as_ref(),
        merchant_id,
        idempotency_key.as_ref(),
        body.into_inner(),
    )
    .await?;

    // a declined or failed acquirer result surfaces as `Err` before reaching
    // here, and `PaymentError`'s `ResponseError` impl forwards its own
    // non-2xx status (§4.3.4/§6); a successful create is always 200.
    Ok(HttpResponse::Ok().json(response))
}

/// §4.5: `GetPayment`.
#[tracing::instrument(
    name = "Get payment",
    skip(req, pool),
    fields(merchant_id = tracing::field::Empty)
)]
pub async fn get_payment(
    req: HttpRequest,
    path: web::Path<String>,
    pool: web::Data<PgPool>,
) -> Result<HttpResponse, PaymentError> {
    let merchant_id = merchant_id(&req);
    tracing::Span::current().record("merchant_id", tracing::field::display(merchant_id));

    let id = payment::parse_payment_id(&path.into_inner())?;
    let response = payment::get_payment(pool.get_ref(), merchant_id, id).await?;

    Ok(HttpResponse::Ok().json(response))
}

/// Pulled from request extensions, attached by `authentication::require_api_key`.
/// Route registration in `startup.rs` guarantees this middleware runs first.
fn merchant_id(req: &HttpRequest) -> uuid::Uuid {
    req.extensions()
        .get::<MerchantId>()
        .expect("require_api_key must run before payment handlers")
        .0
}
