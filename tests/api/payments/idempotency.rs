use std::time::Duration;

use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use payment_gateway::acquirer::{Acquirer, PurchaseRequest, PurchaseResponse};
use payment_gateway::domain::{Fingerprint, NewTransaction, RecoveryPoint};
use payment_gateway::errors::AcquirerError;
use payment_gateway::idempotency::{IdempotencyCache, IdempotencyRecord, MokaIdempotencyCache, from_header};
use payment_gateway::payment::dto::{CreatePaymentRequest, CreditCard};
use payment_gateway::{payment, transaction};

use crate::helpers::{approved_acquirer_response, declined_acquirer_response, spawn_app, valid_payment_body};

/// spec.md §8: "`CreatePayment(req)` then immediate `CreatePayment(req)` with
/// the same `X-Idempotency-Key` returns the same response body (bit-identical)
/// and produces exactly one persisted row."
#[tokio::test]
async fn retrying_with_the_same_key_returns_a_byte_identical_response() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(201).set_body_json(approved_acquirer_response()))
        .expect(1)
        .mount(&app.acquirer)
        .await;

    let first = app
        .create_payment_with_key(&valid_payment_body(), "req-retry")
        .await;
    assert_eq!(first.status().as_u16(), 200);
    let first_body = first.text().await.unwrap();

    let second = app
        .create_payment_with_key(&valid_payment_body(), "req-retry")
        .await;
    assert_eq!(second.status().as_u16(), 200);
    let second_body = second.text().await.unwrap();

    assert_eq!(first_body, second_body);

    let row_count: i64 = sqlx::query_scalar!("SELECT COUNT(*) FROM transactions")
        .fetch_one(&app.db_pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(row_count, 1);
}

/// spec.md §8 scenario 4: acquirer refusal is persisted as a non-approved
/// transaction and surfaced with the acquirer's own HTTP code.
#[tokio::test]
async fn declined_purchase_is_persisted_and_surfaces_the_acquirers_status() {
    let app = spawn_app().await;

    Mock::given(method("POST"))
        .and(path("/transactions"))
        .respond_with(ResponseTemplate::new(422).set_body_json(declined_acquirer_response()))
        .expect(1)
        .mount(&app.acquirer)
        .await;

    let mut body = valid_payment_body();
    body["credit_card"]["number"] = serde_json::json!("4024007186645015");

    let response = app.create_payment_with_key(&body, "req-decline").await;

    assert_eq!(response.status().as_u16(), 422);

    let namespaced_key = format!("{}_{}", app.merchant.id, "req-decline");
    let row = sqlx::query!(
        "SELECT status, approved, response_code FROM transactions WHERE idempotency_key = $1",
        namespaced_key,
    )
    .fetch_one(&app.db_pool)
    .await
    .unwrap();
    assert_eq!(row.status, "failed");
    assert!(!row.approved);
    assert!(row.response_code.is_some());
}

/// spec.md §8 scenario 3: the acquirer already approved a prior attempt that
/// crashed before the DB write landed. The in-process cache that backs the
/// recovery-point dispatch isn't reachable from outside the running server
/// (§3: process-local by design), so this drives `payment::create_payment`
/// directly — seeding the same DB the HTTP server would use — rather than
/// going through the HTTP surface.
#[tokio::test]
async fn resuming_after_acquirer_approval_never_calls_the_acquirer_again() {
    let app = spawn_app().await;
    let merchant_id = app.merchant.id;
    let idempotency_key = from_header(merchant_id, Some("req-resume")).unwrap();

    transaction::create(
        &app.db_pool,
        &NewTransaction {
            merchant_id,
            amount: 1000,
            currency: "USD".to_owned(),
            reference: "order-001".to_owned(),
            source_first_name: "John".to_owned(),
            source_last_name: "Doe".to_owned(),
            source_number: "4485040371536584".to_owned(),
            source_expiry_month: "10".to_owned(),
            source_expiry_year: "2222".to_owned(),
            idempotency_key: idempotency_key.as_ref().to_owned(),
        },
    )
    .await
    .unwrap();

    let fingerprint_hash = Fingerprint {
        merchant_id,
        amount: 1000,
        currency: "USD".to_owned(),
        first_name: "John".to_owned(),
        last_name: "Doe".to_owned(),
        number: "4485040371536584".to_owned(),
        expiry_month: "10".to_owned(),
        expiry_year: "2222".to_owned(),
    }
    .hash();

    let cache = MokaIdempotencyCache::new(Duration::from_secs(3600));
    cache.set(
        &idempotency_key,
        IdempotencyRecord {
            recovery_point: RecoveryPoint::TransactionPurchased,
            fingerprint_hash,
            response: None,
            bank_response: Some(PurchaseResponse {
                status_code: 201,
                code: "00".to_owned(),
                summary: "approved".to_owned(),
                status: "approved".to_owned(),
                card_bin: "44850".to_owned(),
                card_type: "credit_card".to_owned(),
                first_name: "John".to_owned(),
                last_name: "Doe".to_owned(),
            }),
        },
    );

    struct PanicAcquirer;

    #[async_trait::async_trait]
    impl Acquirer for PanicAcquirer {
        async fn purchase(
            &self,
            _request: PurchaseRequest,
        ) -> Result<PurchaseResponse, AcquirerError> {
            panic!("the acquirer must not be consulted when resuming from transaction_purchased");
        }
    }

    let request = CreatePaymentRequest {
        amount: 1000,
        currency: "USD".to_owned(),
        reference: "order-001".to_owned(),
        credit_card: CreditCard {
            first_name: "John".to_owned(),
            last_name: "Doe".to_owned(),
            number: "4485040371536584".to_owned(),
            cvv: "123".to_owned(),
            expiry_month: "10".to_owned(),
            expiry_year: "2222".to_owned(),
        },
    };

    let outcome = payment::create_payment(
        &app.db_pool,
        &PanicAcquirer,
        &cache,
        merchant_id,
        Some(&idempotency_key),
        request,
    )
    .await
    .expect("resuming from transaction_purchased should succeed without the acquirer");

    assert!(outcome.response.approved);
    assert_eq!(outcome.response.status, "approved");

    let row = sqlx::query!(
        "SELECT status, approved FROM transactions WHERE merchant_id = $1 AND idempotency_key = $2",
        merchant_id,
        idempotency_key.as_ref(),
    )
    .fetch_one(&app.db_pool)
    .await
    .unwrap();
    assert_eq!(row.status, "approved");
    assert!(row.approved);
}
