//! Decoding of `application/x-www-form-urlencoded` values.

use crate::model::DomainError;

/// Decodes one submitted form value: `+` becomes a space and `%XX`
/// escapes are decoded as UTF-8 bytes.
///
/// # Errors
/// - `InvalidFormValue` when the decoded bytes are not valid UTF-8.
pub fn decode_form_value(value: &str) -> Result<String, DomainError> {
    let spaced = value.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|err| DomainError::InvalidFormValue(err.to_string()))
}
