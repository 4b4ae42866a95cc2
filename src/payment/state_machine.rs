use sqlx::PgPool;
use uuid::Uuid;

use crate::acquirer::{Acquirer, PurchaseRequest, PurchaseResponse};
use crate::domain::{Fingerprint, NewTransaction, RecoveryPoint, Status, Transaction};
use crate::errors::{AcquirerError, PaymentError, ValidationError};
use crate::idempotency::{IdempotencyCache, IdempotencyKey, IdempotencyRecord};
use crate::transaction;

use super::dto::{CreatePaymentRequest, CreatePaymentResponse, GetPaymentResponse};
use super::validation::validate_credit_card;

/// §4.3: the full recovery-point dispatch for `CreatePayment`. A declined
/// acquirer result surfaces as `Err(PaymentError::Acquirer(..))`, whose
/// `status_code()` already forwards the acquirer's non-2xx status (§6) — an
/// approved result always answers 200, so there is nothing left to forward
/// on the success path.
#[tracing::instrument(name = "Create payment", skip(pool, acquirer, cache, request, idempotency_key))]
pub async fn create_payment(
    pool: &PgPool,
    acquirer: &dyn Acquirer,
    cache: &dyn IdempotencyCache,
    merchant_id: Uuid,
    idempotency_key: Option<&IdempotencyKey>,
    request: CreatePaymentRequest,
) -> Result<CreatePaymentResponse, PaymentError> {
    validate_credit_card(&request.credit_card)?;

    let fingerprint = Fingerprint {
        merchant_id,
        amount: request.amount,
        currency: request.currency.clone(),
        first_name: request.credit_card.first_name.clone(),
        last_name: request.credit_card.last_name.clone(),
        number: request.credit_card.number.clone(),
        expiry_month: request.credit_card.expiry_month.clone(),
        expiry_year: request.credit_card.expiry_year.clone(),
    };
    let fingerprint_hash = fingerprint.hash();

    let mut step = RecoveryPoint::FirstPoint;
    let mut cached_record: Option<IdempotencyRecord> = None;

    if let Some(key) = idempotency_key {
        if let Some(record) = cache.get(key) {
            if !Fingerprint::matches_hash(&fingerprint_hash, &record.fingerprint_hash) {
                return Err(ValidationError::FingerprintMismatch.into());
            }
            if record.recovery_point == RecoveryPoint::TransactionUpdated {
                if let Some(response) = record.response.clone() {
                    return Ok(response);
                }
            }
            step = record.recovery_point;
            cached_record = Some(record);
        }
    }

    let new_transaction = NewTransaction {
        merchant_id,
        amount: request.amount,
        currency: request.currency.clone(),
        reference: request.reference.clone(),
        source_first_name: request.credit_card.first_name.clone(),
        source_last_name: request.credit_card.last_name.clone(),
        source_number: request.credit_card.number.clone(),
        source_expiry_month: request.credit_card.expiry_month.clone(),
        source_expiry_year: request.credit_card.expiry_year.clone(),
        idempotency_key: idempotency_key.map_or_else(String::new, |k| k.as_ref().to_owned()),
    };

    if step == RecoveryPoint::FirstPoint {
        return from_first_point(
            pool,
            acquirer,
            cache,
            idempotency_key,
            &fingerprint_hash,
            new_transaction,
        )
        .await;
    }

    // every non-first-point step above came from a cache hit, which requires a key
    let key = idempotency_key.expect("recovery point beyond first_point without an idempotency key");

    let transaction =
        transaction::get_by_merchant_id_and_idempotency_key(pool, merchant_id, key.as_ref())
            .await?;
    let Some(transaction) = transaction else {
        return from_first_point(
            pool,
            acquirer,
            cache,
            idempotency_key,
            &fingerprint_hash,
            new_transaction,
        )
        .await;
    };

    if step == RecoveryPoint::TransactionCreated {
        update_transaction_step(pool, acquirer, cache, idempotency_key, &fingerprint_hash, transaction).await
    } else if step == RecoveryPoint::TransactionPurchased {
        let bank_response = cached_record
            .and_then(|record| record.bank_response)
            .ok_or_else(|| {
                anyhow::anyhow!("transaction_purchased checkpoint without a cached acquirer response")
            })?;
        from_purchased_point(pool, cache, key, &fingerprint_hash, transaction, bank_response).await
    } else if step == RecoveryPoint::TransactionUpdated {
        Ok(finalize_success(cache, Some(key), &fingerprint_hash, &transaction))
    } else {
        Err(PaymentError::UnprocessableRecoveryPoint)
    }
}

/// §4.3.3: insert the row, checkpoint `transaction_created`, then fall
/// through to the acquirer step.
async fn from_first_point(
    pool: &PgPool,
    acquirer: &dyn Acquirer,
    cache: &dyn IdempotencyCache,
    idempotency_key: Option<&IdempotencyKey>,
    fingerprint_hash: &str,
    new_transaction: NewTransaction,
) -> Result<CreatePaymentResponse, PaymentError> {
    let transaction = transaction::create(pool, &new_transaction).await?;

    if let Some(key) = idempotency_key {
        cache.set(
            key,
            IdempotencyRecord {
                recovery_point: RecoveryPoint::TransactionCreated,
                fingerprint_hash: fingerprint_hash.to_owned(),
                response: None,
                bank_response: None,
            },
        );
    }

    update_transaction_step(pool, acquirer, cache, idempotency_key, fingerprint_hash, transaction).await
}

/// §4.3.4: call the acquirer, persist whatever it says (approval or
/// decline), checkpoint `transaction_purchased` only on approval. A
/// transport failure (no response at all) persists nothing.
async fn update_transaction_step(
    pool: &PgPool,
    acquirer: &dyn Acquirer,
    cache: &dyn IdempotencyCache,
    idempotency_key: Option<&IdempotencyKey>,
    fingerprint_hash: &str,
    transaction: Transaction,
) -> Result<CreatePaymentResponse, PaymentError> {
    let purchase_request = PurchaseRequest {
        amount: transaction.amount,
        currency: transaction.currency.clone(),
        expiry_month: transaction.source_expiry_month.clone(),
        expiry_year: transaction.source_expiry_year.clone(),
        first_name: transaction.source_first_name.clone(),
        last_name: transaction.source_last_name.clone(),
        number: transaction.source_number.clone(),
    };

    let (bank_response, declined) = match acquirer.purchase(purchase_request).await {
        Ok(response) => (response, false),
        Err(AcquirerError::Declined { response }) => (response, true),
        Err(err @ AcquirerError::Transport(_)) => return Err(err.into()),
    };

    if Status::new(&bank_response.status).is_approved() {
        if let Some(key) = idempotency_key {
            cache.set(
                key,
                IdempotencyRecord {
                    recovery_point: RecoveryPoint::TransactionPurchased,
                    fingerprint_hash: fingerprint_hash.to_owned(),
                    response: None,
                    bank_response: Some(bank_response.clone()),
                },
            );
        }
    }

    let updated = persist_bank_response(pool, &transaction, &bank_response).await?;

    if declined {
        return Err(PaymentError::Acquirer(AcquirerError::Declined {
            response: bank_response,
        }));
    }

    Ok(finalize_success(cache, idempotency_key, fingerprint_hash, &updated))
}

/// §4.3.5: the acquirer already approved this key on a prior attempt that
/// crashed before the DB write landed. Replay the write with the cached
/// response — never call the acquirer twice for the same key.
async fn from_purchased_point(
    pool: &PgPool,
    cache: &dyn IdempotencyCache,
    idempotency_key: &IdempotencyKey,
    fingerprint_hash: &str,
    transaction: Transaction,
    bank_response: PurchaseResponse,
) -> Result<CreatePaymentResponse, PaymentError> {
    let updated = persist_bank_response(pool, &transaction, &bank_response).await?;
    Ok(finalize_success(cache, Some(idempotency_key), fingerprint_hash, &updated))
}

async fn persist_bank_response(
    pool: &PgPool,
    transaction: &Transaction,
    bank_response: &PurchaseResponse,
) -> Result<Transaction, PaymentError> {
    let status = Status::new(&bank_response.status);
    let outcome = transaction::AcquirerOutcome {
        approved: status.is_approved(),
        status,
        source_bin: bank_response.card_bin.clone(),
        source_card_type: bank_response.card_type.clone(),
        response_code: bank_response.code.clone(),
        response_summary: bank_response.summary.clone(),
        source_first_name: bank_response.first_name.clone(),
        source_last_name: bank_response.last_name.clone(),
    };

    Ok(transaction::apply_acquirer_outcome(pool, transaction.id, &outcome).await?)
}

/// §4.3.6: build the terminal response and checkpoint `transaction_updated`
/// so a future retry short-circuits without touching the DB or the acquirer.
fn finalize_success(
    cache: &dyn IdempotencyCache,
    idempotency_key: Option<&IdempotencyKey>,
    fingerprint_hash: &str,
    transaction: &Transaction,
) -> CreatePaymentResponse {
    let response = CreatePaymentResponse::from(transaction);

    if let Some(key) = idempotency_key {
        cache.set(
            key,
            IdempotencyRecord {
                recovery_point: RecoveryPoint::TransactionUpdated,
                fingerprint_hash: fingerprint_hash.to_owned(),
                response: Some(response.clone()),
                bank_response: None,
            },
        );
    }

    response
}

/// §4.5: GetPayment. Id parsing happens in the route before this is called.
#[tracing::instrument(name = "Get payment", skip(pool))]
pub async fn get_payment(
    pool: &PgPool,
    merchant_id: Uuid,
    id: Uuid,
) -> Result<GetPaymentResponse, PaymentError> {
    let transaction = transaction::get_by_id(pool, id, merchant_id)
        .await?
        .ok_or(PaymentError::NotFound)?;

    Ok(GetPaymentResponse::from(&transaction))
}
