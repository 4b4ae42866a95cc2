use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;

/// §4.1: everything that reaches `unauthenticated` in spec terms.
#[derive(thiserror::Error, Debug)]
pub enum AuthError {
    #[error("missing Authorization header")]
    MissingApiKey,
    #[error("Authorization header is not a valid, non-nil uuid")]
    MalformedApiKey,
    #[error("no active merchant is bound to this api key")]
    MerchantNotFound,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingApiKey | Self::MalformedApiKey | Self::MerchantNotFound => {
                StatusCode::UNAUTHORIZED
            }
            Self::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.to_string(),
        })
    }
}
