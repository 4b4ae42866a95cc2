use std::fmt;
use std::str::FromStr;

/// Marks how far the state machine progressed for a given idempotency key.
///
/// Strictly ordered: `FirstPoint -> TransactionCreated -> TransactionPurchased
/// -> TransactionUpdated`. A retry never moves the cache backwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryPoint {
    FirstPoint,
    TransactionCreated,
    TransactionPurchased,
    TransactionUpdated,
}

impl RecoveryPoint {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FirstPoint => "first_point",
            Self::TransactionCreated => "transaction_created",
            Self::TransactionPurchased => "transaction_purchased",
            Self::TransactionUpdated => "transaction_updated",
        }
    }
}

impl fmt::Display for RecoveryPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse is case-insensitive; anything unrecognised falls back to `FirstPoint`,
/// mirroring the Go original's `NewRecoveryPoint`.
impl FromStr for RecoveryPoint {
    type Err = std::convert::Infallible;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Ok(if raw.eq_ignore_ascii_case(Self::TransactionCreated.as_str()) {
            Self::TransactionCreated
        } else if raw.eq_ignore_ascii_case(Self::TransactionPurchased.as_str()) {
            Self::TransactionPurchased
        } else if raw.eq_ignore_ascii_case(Self::TransactionUpdated.as_str()) {
            Self::TransactionUpdated
        } else {
            Self::FirstPoint
        })
    }
}
