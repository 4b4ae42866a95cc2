use std::time::Duration;

use moka::sync::Cache;

use crate::acquirer::PurchaseResponse;
use crate::domain::RecoveryPoint;
use crate::payment::dto::CreatePaymentResponse;

use super::IdempotencyKey;

/// A checkpoint for one idempotency key, persisted in-process only. Mirrors
/// the Go `model.Idempotency` struct, minus the fields the gRPC layer never
/// read back (`merchant_id`/`amount`/... are replaced by `fingerprint_hash`,
/// since that's the only thing a recovery-point lookup compares against).
#[derive(Debug, Clone)]
pub struct IdempotencyRecord {
    pub recovery_point: RecoveryPoint,
    pub fingerprint_hash: String,
    pub response: Option<CreatePaymentResponse>,
    pub bank_response: Option<PurchaseResponse>,
}

/// Process-local checkpoint store, keyed by namespaced idempotency key. Not
/// shared across instances — restarting the process, or routing a retry to a
/// different instance, loses in-flight checkpoints and falls back to the
/// transaction row on disk (§9 capability-boundary note).
pub trait IdempotencyCache: Send + Sync {
    fn get(&self, key: &IdempotencyKey) -> Option<IdempotencyRecord>;
    fn set(&self, key: &IdempotencyKey, record: IdempotencyRecord);
}

pub struct MokaIdempotencyCache {
    inner: Cache<String, IdempotencyRecord>,
}

impl MokaIdempotencyCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Cache::builder().time_to_live(ttl).build(),
        }
    }
}

impl IdempotencyCache for MokaIdempotencyCache {
    fn get(&self, key: &IdempotencyKey) -> Option<IdempotencyRecord> {
        self.inner.get(key.as_ref())
    }

    fn set(&self, key: &IdempotencyKey, record: IdempotencyRecord) {
        self.inner.insert(key.as_ref().to_owned(), record);
    }
}
