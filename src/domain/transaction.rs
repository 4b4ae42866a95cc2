use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::Status;

/// A persisted transaction row. `source_number` is the full PAN and is kept
/// in memory and in storage, but `payment::dto` never serialises it as-is —
/// only `last4`/`bin` reach the wire.
#[derive(Debug, Clone)]
pub struct Transaction {
    pub id: Uuid,
    pub merchant_id: Uuid,
    pub approved: bool,
    pub status: Status,
    pub amount: i32,
    pub currency: String,
    pub source_first_name: String,
    pub source_last_name: String,
    pub source_number: String,
    pub source_bin: Option<String>,
    pub source_card_type: Option<String>,
    pub source_expiry_month: String,
    pub source_expiry_year: String,
    pub response_code: Option<String>,
    pub response_summary: Option<String>,
    pub reference: String,
    pub idempotency_key: String,
    pub created_at: DateTime<Utc>,
}

impl Transaction {
    #[must_use]
    pub fn last_four(&self) -> String {
        let number = &self.source_number;
        if number.len() < 4 {
            String::new()
        } else {
            number[number.len() - 4..].to_owned()
        }
    }
}

/// Fields known before the acquirer has been consulted — what `FromFirstPoint`
/// inserts.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub merchant_id: Uuid,
    pub amount: i32,
    pub currency: String,
    pub reference: String,
    pub source_first_name: String,
    pub source_last_name: String,
    pub source_number: String,
    pub source_expiry_month: String,
    pub source_expiry_year: String,
    pub idempotency_key: String,
}
