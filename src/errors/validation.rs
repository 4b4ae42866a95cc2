use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde::Serialize;

/// §4.3.1 card/field validation and §4.5 id parsing — both map to
/// `invalid_argument` in spec terms.
#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("first_name is required")]
    EmptyFirstName,
    #[error("last_name is required")]
    EmptyLastName,
    #[error("expiry_month need two numbers")]
    BadExpiryMonth,
    #[error("expiry_year need four numbers")]
    BadExpiryYear,
    #[error("card number is invalid")]
    BadCardNumber,
    #[error("the id must be a valid uuid")]
    IdMustBeValidUuid,
    #[error("the id must be uuid")]
    IdMustBeUuid,
    #[error("idempotency key reused with different request")]
    FingerprintMismatch,
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl ResponseError for ValidationError {
    fn status_code(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody {
            message: self.to_string(),
        })
    }
}
