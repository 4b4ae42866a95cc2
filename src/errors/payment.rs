use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;

use crate::acquirer::PurchaseResponse;

use super::{AuthError, ValidationError};

/// Raised by the [`crate::acquirer::Acquirer`] client.
#[derive(thiserror::Error, Debug)]
pub enum AcquirerError {
    #[error("acquirer request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// `(non-nil, non-nil)` from the Go contract: the acquirer answered, but
    /// declined the purchase. The response is carried along (not just the
    /// message) because a decline still has to be persisted as a non-approved
    /// transaction (§9) — only a transport failure leaves nothing to persist.
    #[error("{}", .response.summary)]
    Declined { response: PurchaseResponse },
}

/// Top-level error returned by the payment handlers. One variant per spec
/// §7 error kind, plus the `unprocessable_entity` hint for an unrecognised
/// recovery point (§4.3.2).
#[derive(thiserror::Error, Debug)]
pub enum PaymentError {
    #[error(transparent)]
    Unauthenticated(#[from] AuthError),
    #[error(transparent)]
    InvalidArgument(#[from] ValidationError),
    #[error("payment not found")]
    NotFound,
    #[error(transparent)]
    Acquirer(#[from] AcquirerError),
    #[error("unrecognised recovery point")]
    UnprocessableRecoveryPoint,
    #[error(transparent)]
    Database(#[from] sqlx::Error),
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl ResponseError for PaymentError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthenticated(e) => e.status_code(),
            Self::InvalidArgument(e) => e.status_code(),
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Acquirer(AcquirerError::Declined { response }) => {
                StatusCode::from_u16(response.status_code).unwrap_or(StatusCode::UNPROCESSABLE_ENTITY)
            }
            Self::Acquirer(AcquirerError::Transport(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::UnprocessableRecoveryPoint => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Database(_) | Self::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let message = match self {
            // internal failures never leak their cause to the caller
            Self::Database(_) | Self::Unexpected(_) | Self::Acquirer(AcquirerError::Transport(_)) => {
                "internal server error".to_owned()
            }
            other => other.to_string(),
        };

        HttpResponse::build(self.status_code()).json(ErrorBody { message })
    }
}
