use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

use crate::errors::AcquirerError;

use super::{Acquirer, PurchaseRequest, PurchaseResponse};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(65);

#[derive(Serialize)]
struct BankSimulatorRequest<'a> {
    amount: i32,
    currency: &'a str,
    expiry_month: &'a str,
    expiry_year: &'a str,
    first_name: &'a str,
    last_name: &'a str,
    number: &'a str,
}

#[derive(Deserialize)]
struct BankSimulatorResponse {
    code: String,
    message: String,
    status: String,
    source: BankSimulatorSource,
}

#[derive(Deserialize)]
struct BankSimulatorSource {
    bin: String,
    card_type: String,
    first_name: String,
    last_name: String,
}

/// Talks to the upstream bank simulator over HTTP. The only real
/// implementation of [`Acquirer`] — tests point `base_url` at a `wiremock`
/// server instead of mocking this type.
pub struct BankSimulatorClient {
    client: Client,
    base_url: String,
    api_key: SecretString,
}

impl BankSimulatorClient {
    /// # Panics
    /// if the underlying `reqwest` TLS backend fails to initialise.
    #[must_use]
    pub fn new(base_url: String, api_key: SecretString) -> Self {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .expect("Failed to build acquirer HTTP client");

        Self {
            client,
            base_url,
            api_key,
        }
    }
}

#[async_trait]
impl Acquirer for BankSimulatorClient {
    #[tracing::instrument(name = "Call acquirer", skip(self, request), fields(amount = request.amount, currency = %request.currency))]
    async fn purchase(&self, request: PurchaseRequest) -> Result<PurchaseResponse, AcquirerError> {
        let body = BankSimulatorRequest {
            amount: request.amount,
            currency: &request.currency,
            expiry_month: &request.expiry_month,
            expiry_year: &request.expiry_year,
            first_name: &request.first_name,
            last_name: &request.last_name,
            number: &request.number,
        };

        let response = self
            .client
            .post(format!("{}/transactions", self.base_url))
            .header("X-Auth-Token", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status_code = response.status();
        let parsed: BankSimulatorResponse = response.json().await?;

        let purchase_response = PurchaseResponse {
            status_code: status_code.as_u16(),
            code: parsed.code,
            summary: parsed.message,
            status: parsed.status,
            card_bin: parsed.source.bin,
            card_type: parsed.source.card_type,
            first_name: parsed.source.first_name,
            last_name: parsed.source.last_name,
        };

        if status_code == StatusCode::CREATED {
            Ok(purchase_response)
        } else {
            Err(AcquirerError::Declined {
                response: purchase_response,
            })
        }
    }
}
