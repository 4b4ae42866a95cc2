use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Transaction;

/// Request body for `POST /api/payments`. Field names follow the wire
/// contract in spec.md §6, not the Go protobuf names.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePaymentRequest {
    pub amount: i32,
    pub currency: String,
    pub reference: String,
    pub credit_card: CreditCard,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreditCard {
    pub first_name: String,
    pub last_name: String,
    pub number: String,
    pub cvv: String,
    pub expiry_month: String,
    pub expiry_year: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Source {
    pub first_name: String,
    pub last_name: String,
    pub last4: String,
    pub bin: String,
    pub card_type: String,
    pub expiry_month: String,
    pub expiry_year: String,
}

impl Source {
    fn from_transaction(tx: &Transaction) -> Self {
        Self {
            first_name: tx.source_first_name.clone(),
            last_name: tx.source_last_name.clone(),
            last4: tx.last_four(),
            bin: tx.source_bin.clone().unwrap_or_default(),
            card_type: tx.source_card_type.clone().unwrap_or_default(),
            expiry_month: tx.source_expiry_month.clone(),
            expiry_year: tx.source_expiry_year.clone(),
        }
    }
}

/// `CreatePayment` response (§6) — the full PAN never appears here, only
/// `last4`/`bin`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePaymentResponse {
    pub id: Uuid,
    pub amount: i32,
    pub currency: String,
    pub source: Source,
    pub status: String,
    pub approved: bool,
    pub processed_on: String,
    pub response_code: Option<String>,
    pub reference: String,
}

impl From<&Transaction> for CreatePaymentResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            amount: tx.amount,
            currency: tx.currency.clone(),
            source: Source::from_transaction(tx),
            status: tx.status.to_string(),
            approved: tx.approved,
            processed_on: format_timestamp(tx.created_at),
            response_code: tx.response_code.clone(),
            reference: tx.reference.clone(),
        }
    }
}

/// `GetPayment` response (§6): same shape as `CreatePaymentResponse` minus
/// `response_code`/`reference`, with `requested_on` in place of `processed_on`.
#[derive(Debug, Clone, Serialize)]
pub struct GetPaymentResponse {
    pub id: Uuid,
    pub amount: i32,
    pub currency: String,
    pub source: Source,
    pub status: String,
    pub approved: bool,
    pub requested_on: String,
}

impl From<&Transaction> for GetPaymentResponse {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: tx.id,
            amount: tx.amount,
            currency: tx.currency.clone(),
            source: Source::from_transaction(tx),
            status: tx.status.to_string(),
            approved: tx.approved,
            requested_on: format_timestamp(tx.created_at),
        }
    }
}

/// §4.3.6: `YYYY-MM-DDTHH:MM:SS.sssZ` — 3-digit millis, literal `Z`, never an
/// offset (matches the original's `"2006-01-02T15:04:05.000Z"`).
fn format_timestamp(ts: chrono::DateTime<chrono::Utc>) -> String {
    ts.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
