use md5::{Digest, Md5};
use uuid::Uuid;

/// The identity-bearing fields of a `CreatePayment` call — exactly the
/// fields that must agree for a retry to be considered "the same request".
/// Deliberately excludes `reference`, `cvv`, and anything response-shaped:
/// the hash guards request identity, not the whole payload.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fingerprint {
    pub merchant_id: Uuid,
    pub amount: i32,
    pub currency: String,
    pub first_name: String,
    pub last_name: String,
    pub number: String,
    pub expiry_month: String,
    pub expiry_year: String,
}

impl Fingerprint {
    /// Deterministic function of exactly the listed fields: two fingerprints
    /// built from identical fields hash identically, every time.
    #[must_use]
    pub fn hash(&self) -> String {
        // field order matters for determinism; keep it in struct-declaration order
        let serialised = format!(
            "{}|{}|{}|{}|{}|{}|{}|{}",
            self.merchant_id,
            self.amount,
            self.currency,
            self.first_name,
            self.last_name,
            self.number,
            self.expiry_month,
            self.expiry_year
        );

        let digest = Md5::digest(serialised.as_bytes());
        hex::encode(digest)
    }

    /// Two records match iff both hashes are non-empty and equal.
    #[must_use]
    pub fn matches_hash(hash: &str, other_hash: &str) -> bool {
        !hash.is_empty() && hash == other_hash
    }
}
