use uuid::Uuid;

use crate::errors::ValidationError;

use super::dto::CreditCard;

/// §4.3.1: trimmed first/last name non-empty, expiry month/year fixed width,
/// card number length in `[16, 19]`. CVV is deliberately not checked here —
/// it passes through to the acquirer and is never persisted.
pub fn validate_credit_card(card: &CreditCard) -> Result<(), ValidationError> {
    if card.first_name.trim().is_empty() {
        return Err(ValidationError::EmptyFirstName);
    }
    if card.last_name.trim().is_empty() {
        return Err(ValidationError::EmptyLastName);
    }
    if card.expiry_month.trim().len() != 2 {
        return Err(ValidationError::BadExpiryMonth);
    }
    if card.expiry_year.trim().len() != 4 {
        return Err(ValidationError::BadExpiryYear);
    }
    let number_length = card.number.trim().len();
    if !(16..=19).contains(&number_length) {
        return Err(ValidationError::BadCardNumber);
    }
    Ok(())
}

/// §4.5: empty-string or nil UUID is a distinct error from a non-UUID string.
pub fn parse_payment_id(raw: &str) -> Result<Uuid, ValidationError> {
    if raw.is_empty() {
        return Err(ValidationError::IdMustBeValidUuid);
    }
    let id: Uuid = raw.parse().map_err(|_| ValidationError::IdMustBeUuid)?;
    if id.is_nil() {
        return Err(ValidationError::IdMustBeValidUuid);
    }
    Ok(id)
}
