use uuid::Uuid;

/// The caller-supplied `X-Idempotency-Key` header, namespaced to a merchant
/// so two merchants can never collide on the same cache entry (mirrors the
/// Go interceptor's `fmt.Sprintf("%s_%s", merchantID, idempotencyKey)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct IdempotencyKey(String);

impl IdempotencyKey {
    fn new(merchant_id: Uuid, raw: &str) -> Self {
        Self(format!("{merchant_id}_{raw}"))
    }
}

impl AsRef<str> for IdempotencyKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Extracts and namespaces the idempotency key from the incoming request, if
/// any. Per §4.2 an absent *or empty* header simply disables caching for
/// that call — there is no length bound on an opaque caller token.
pub fn from_header(merchant_id: Uuid, header_value: Option<&str>) -> Option<IdempotencyKey> {
    match header_value {
        Some(raw) if !raw.is_empty() => Some(IdempotencyKey::new(merchant_id, raw)),
        _ => None,
    }
}
