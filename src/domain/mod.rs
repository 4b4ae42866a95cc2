mod fingerprint;
mod recovery_point;
mod status;
mod transaction;

pub use fingerprint::Fingerprint;
pub use recovery_point::RecoveryPoint;
pub use status::Status;
pub use transaction::{NewTransaction, Transaction};
