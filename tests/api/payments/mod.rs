mod idempotency;
mod validation;
