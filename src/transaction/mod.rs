mod repository;

pub use repository::{
    AcquirerOutcome, apply_acquirer_outcome, create, get_by_id,
    get_by_merchant_id_and_idempotency_key,
};
