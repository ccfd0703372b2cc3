//! Derived fields computed from single raw values

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Leading `dd.mm.yyyy` of a "received on" timestamp
static LEADING_DATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2})\.(\d{2})\.(\d{4})").expect("valid date regex"));

/// Membership kinds by prefix, most specific first
const MEMBERSHIP_PREFIXES: &[(&str, &str)] = &[
    ("Kindermitglied", "Kindermitglied"),
    ("Jugendmitglied", "Jugendmitglied"),
    ("Nachwuchsmitglied", "Nachwuchsmitglied"),
    ("Aktivmitglied (Fitnessgruppe)", "Aktivmitglied (Fitness)"),
    ("Aktivmitglied", "Aktivmitglied"),
    ("Passivmitglied", "Passivmitglied"),
    ("Wettkampffunktionär:in", "Staff LC Therwil"),
    ("Trainer:in", "Staff LC Therwil"),
];

/// A derived field that could not be computed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error("Geschlecht fehlt - Anrede leer gelassen")]
    MissingGender,

    #[error("Unbekanntes Geschlecht \"{0}\" - Anrede leer gelassen")]
    UnknownGender(String),

    #[error("\"Erhalten am\" Datum fehlt - Eintritt leer gelassen")]
    MissingReceivedOn,

    #[error("Ungültiges Datumsformat in \"Erhalten am\": \"{0}\"")]
    InvalidReceivedOn(String),

    #[error("Mitgliedschaft fehlt")]
    MissingMembership,

    #[error("Unbekannte Mitgliedschaft \"{0}\"")]
    UnknownMembership(String),
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Salutation (`Frau`/`Herr`) from a gender value
pub fn salutation(gender: Option<&str>) -> Result<String, DerivationError> {
    let gender = present(gender).ok_or(DerivationError::MissingGender)?;

    match gender.trim().to_lowercase().as_str() {
        "weiblich" => Ok("Frau".to_string()),
        "männlich" => Ok("Herr".to_string()),
        _ => Err(DerivationError::UnknownGender(gender.to_string())),
    }
}

/// Entry date (`dd.mm.yyyy`) from a `dd.mm.yyyy hh:mm:ss` timestamp
pub fn entry_date(received_on: Option<&str>) -> Result<String, DerivationError> {
    let received_on = present(received_on).ok_or(DerivationError::MissingReceivedOn)?;

    LEADING_DATE
        .captures(received_on)
        .map(|caps| format!("{}.{}.{}", &caps[1], &caps[2], &caps[3]))
        .ok_or_else(|| DerivationError::InvalidReceivedOn(received_on.to_string()))
}

/// Membership status from the membership kind chosen on the form
pub fn membership_status(membership: Option<&str>) -> Result<String, DerivationError> {
    let membership = present(membership).ok_or(DerivationError::MissingMembership)?;

    MEMBERSHIP_PREFIXES
        .iter()
        .find(|(prefix, _)| membership.starts_with(prefix))
        .map(|(_, status)| status.to_string())
        .ok_or_else(|| DerivationError::UnknownMembership(membership.to_string()))
}

/// Remark for trial-training sign-ups, dated with the processing day
pub fn trial_remark(today: NaiveDate) -> String {
    format!("Schnuppert ab {}", today.format("%d.%m.%Y"))
}
