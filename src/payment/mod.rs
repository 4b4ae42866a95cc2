pub mod dto;
mod state_machine;
mod validation;

pub use state_machine::{create_payment, get_payment};
pub use validation::parse_payment_id;
