mod auth;
mod payment;
mod recovery;
mod validation;

pub use auth::AuthError;
pub use payment::{AcquirerError, PaymentError};
pub use recovery::recover_from_panics;
pub use validation::ValidationError;
