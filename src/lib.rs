pub mod acquirer;
pub mod authentication;
pub mod configuration;
pub mod domain;
pub mod errors;
pub mod idempotency;
pub mod merchant;
pub mod metrics;
pub mod payment;
pub mod routes;
pub mod startup;
pub mod telemetry;
pub mod transaction;
