pub mod bank_simulator;

use async_trait::async_trait;

use crate::errors::AcquirerError;

/// Request sent to the upstream acquirer for a single card purchase.
#[derive(Debug, Clone)]
pub struct PurchaseRequest {
    pub amount: i32,
    pub currency: String,
    pub expiry_month: String,
    pub expiry_year: String,
    pub first_name: String,
    pub last_name: String,
    pub number: String,
}

/// What the acquirer told us about a purchase, win or lose. `status_code` is
/// the acquirer's own HTTP status, carried along so the caller can forward it
/// via the `X-http-code` side channel (§4.7, §9).
#[derive(Debug, Clone)]
pub struct PurchaseResponse {
    pub status_code: u16,
    pub code: String,
    pub summary: String,
    pub status: String,
    pub card_bin: String,
    pub card_type: String,
    pub first_name: String,
    pub last_name: String,
}

/// Single `Purchase` call to the upstream bank. One implementation
/// (`bank_simulator::BankSimulatorClient`) talks HTTP; tests point it at a
/// `wiremock` server instead of faking this trait.
#[async_trait]
pub trait Acquirer: Send + Sync {
    async fn purchase(&self, request: PurchaseRequest) -> Result<PurchaseResponse, AcquirerError>;
}
