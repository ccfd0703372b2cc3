//! Phone number formatting for the home region

use phonenumber::{country, Mode};
use thiserror::Error;

/// Region numbers without a country prefix are assumed to belong to
pub const HOME_REGION: country::Id = country::Id::CH;

/// A phone value that could not be read as a phone number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Ungültige Telefonnummer \"{value}\" ({reason})")]
pub struct PhoneError {
    pub value: String,
    pub reason: String,
}

/// Format a raw phone value.
///
/// Whitespace and apostrophes are removed before parsing. Numbers from the
/// home region come back in national format, all others in international
/// format. Empty input yields an empty string.
pub fn normalize(raw: Option<&str>) -> Result<String, PhoneError> {
    let Some(raw) = raw else {
        return Ok(String::new());
    };

    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\'')
        .collect();
    if cleaned.is_empty() {
        return Ok(String::new());
    }

    let number = phonenumber::parse(Some(HOME_REGION), &cleaned).map_err(|e| PhoneError {
        value: raw.trim().to_string(),
        reason: e.to_string(),
    })?;

    let mode = if number.country().id() == Some(HOME_REGION) {
        Mode::National
    } else {
        Mode::International
    };

    Ok(number.format().mode(mode).to_string())
}
