mod cache;
mod key;
mod middleware;

pub use cache::{IdempotencyCache, IdempotencyRecord, MokaIdempotencyCache};
pub use key::{IdempotencyKey, from_header};
pub use middleware::attach_idempotency_key;
