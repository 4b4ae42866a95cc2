use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::{NewTransaction, Status, Transaction};

struct TransactionRow {
    id: Uuid,
    merchant_id: Uuid,
    approved: bool,
    status: String,
    amount: i32,
    currency: String,
    source_first_name: String,
    source_last_name: String,
    source_number: String,
    source_bin: Option<String>,
    source_card_type: Option<String>,
    source_expiry_month: String,
    source_expiry_year: String,
    response_code: Option<String>,
    response_summary: Option<String>,
    reference: String,
    idempotency_key: String,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<TransactionRow> for Transaction {
    fn from(row: TransactionRow) -> Self {
        Self {
            id: row.id,
            merchant_id: row.merchant_id,
            approved: row.approved,
            status: Status::new(&row.status),
            amount: row.amount,
            currency: row.currency,
            source_first_name: row.source_first_name,
            source_last_name: row.source_last_name,
            source_number: row.source_number,
            source_bin: row.source_bin,
            source_card_type: row.source_card_type,
            source_expiry_month: row.source_expiry_month,
            source_expiry_year: row.source_expiry_year,
            response_code: row.response_code,
            response_summary: row.response_summary,
            reference: row.reference,
            idempotency_key: row.idempotency_key,
            created_at: row.created_at,
        }
    }
}

/// Inserts a fresh transaction in `pending` status, before the acquirer has
/// been consulted. Mirrors `FromFirstPoint`'s first write.
#[tracing::instrument(name = "Insert transaction", skip(pool, new))]
pub async fn create(pool: &PgPool, new: &NewTransaction) -> Result<Transaction, sqlx::Error> {
    let row = sqlx::query_as!(
        TransactionRow,
        r#"
        INSERT INTO transactions (
            merchant_id, amount, currency, source_first_name, source_last_name,
            source_expiry_month, source_expiry_year, source_number, reference, idempotency_key
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        RETURNING
            id, merchant_id, approved, status, amount, currency,
            source_first_name, source_last_name, source_number, source_bin,
            source_card_type, source_expiry_month, source_expiry_year,
            response_code, response_summary, reference, idempotency_key, created_at
        "#,
        new.merchant_id,
        new.amount,
        new.currency,
        new.source_first_name,
        new.source_last_name,
        new.source_expiry_month,
        new.source_expiry_year,
        new.source_number,
        new.reference,
        new.idempotency_key,
    )
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

/// Everything the acquirer's answer contributes to a transaction row. Applied
/// in a single `UPDATE ... RETURNING` — no multi-statement transaction is
/// held open across the acquirer round trip.
pub struct AcquirerOutcome {
    pub status: Status,
    pub approved: bool,
    pub source_bin: String,
    pub source_card_type: String,
    pub response_code: String,
    pub response_summary: String,
    pub source_first_name: String,
    pub source_last_name: String,
}

#[tracing::instrument(name = "Apply acquirer outcome to transaction", skip(pool, outcome))]
pub async fn apply_acquirer_outcome(
    pool: &PgPool,
    id: Uuid,
    outcome: &AcquirerOutcome,
) -> Result<Transaction, sqlx::Error> {
    let row = sqlx::query_as!(
        TransactionRow,
        r#"
        UPDATE transactions
        SET
            status = $1,
            approved = $2,
            source_bin = $3,
            source_card_type = $4,
            response_code = $5,
            response_summary = $6,
            source_first_name = $7,
            source_last_name = $8
        WHERE id = $9
        RETURNING
            id, merchant_id, approved, status, amount, currency,
            source_first_name, source_last_name, source_number, source_bin,
            source_card_type, source_expiry_month, source_expiry_year,
            response_code, response_summary, reference, idempotency_key, created_at
        "#,
        outcome.status.as_str(),
        outcome.approved,
        outcome.source_bin,
        outcome.source_card_type,
        outcome.response_code,
        outcome.response_summary,
        outcome.source_first_name,
        outcome.source_last_name,
        id,
    )
    .fetch_one(pool)
    .await?;

    Ok(row.into())
}

#[tracing::instrument(name = "Look up transaction by id", skip(pool))]
pub async fn get_by_id(
    pool: &PgPool,
    id: Uuid,
    merchant_id: Uuid,
) -> Result<Option<Transaction>, sqlx::Error> {
    let row = sqlx::query_as!(
        TransactionRow,
        r#"
        SELECT
            id, merchant_id, approved, status, amount, currency,
            source_first_name, source_last_name, source_number, source_bin,
            source_card_type, source_expiry_month, source_expiry_year,
            response_code, response_summary, reference, idempotency_key, created_at
        FROM transactions
        WHERE id = $1 AND merchant_id = $2
        "#,
        id,
        merchant_id,
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Into::into))
}

/// Used when a retry's idempotency key points at no cached checkpoint —
/// the recovery-point dispatch falls back to the transaction already on disk.
#[tracing::instrument(name = "Look up transaction by idempotency key", skip(pool))]
pub async fn get_by_merchant_id_and_idempotency_key(
    pool: &PgPool,
    merchant_id: Uuid,
    idempotency_key: &str,
) -> Result<Option<Transaction>, sqlx::Error> {
    let row = sqlx::query_as!(
        TransactionRow,
        r#"
        SELECT
            id, merchant_id, approved, status, amount, currency,
            source_first_name, source_last_name, source_number, source_bin,
            source_card_type, source_expiry_month, source_expiry_year,
            response_code, response_summary, reference, idempotency_key, created_at
        FROM transactions
        WHERE merchant_id = $1 AND idempotency_key = $2
        "#,
        merchant_id,
        idempotency_key,
    )
    .fetch_optional(pool)
    .await?;

    Ok(row.map(Into::into))
}
