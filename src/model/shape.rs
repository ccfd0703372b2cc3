//! Record shapes and their canonical field layout

use serde::{Deserialize, Serialize};

/// Canonical and source column names
pub mod fields {
    pub const SALUTATION: &str = "Anrede";
    pub const GREETING: &str = "Briefanrede";
    pub const FIRST_NAME: &str = "Vorname";
    pub const LAST_NAME: &str = "Nachname";
    pub const ADDRESS: &str = "Adresse";
    pub const POSTCODE: &str = "PLZ";
    pub const CITY: &str = "Ort";
    pub const COUNTRY: &str = "Land";
    pub const GENDER: &str = "Geschlecht";
    pub const ENTRY_DATE: &str = "Eintritt";
    pub const STATUS: &str = "Status";
    pub const EMERGENCY_PHONE: &str = "Notfallnummer";
    pub const NATIONAL_ID: &str = "AHV-Nummer";
    pub const PHONE_PRIVATE: &str = "Telefon Privat";
    pub const PHONE_MOBILE: &str = "Telefon Mobil";
    pub const PHONE_BUSINESS: &str = "Telefon Geschäft";
    pub const EMAIL: &str = "E-Mail";
    pub const EMAIL_ALTERNATE: &str = "E-Mail Alternativ";
    pub const BIRTH_DATE: &str = "Geburtsdatum";
    pub const NATIONALITY: &str = "Nationalität";
    pub const REMARKS: &str = "Bemerkungen";
    pub const PROCESSED_AT: &str = "ProcessedAt";

    pub const RECEIVED_ON: &str = "Erhalten am";
    pub const MEMBERSHIP: &str = "Mitgliedschaft";
    pub const MOBILE_ATHLETE: &str = "Mobiltelefon Athlet:in";
    pub const MOBILE_MOTHER: &str = "Mobiltelefon Mutter";
    pub const MOBILE_FATHER: &str = "Mobiltelefon Vater";
    pub const EMAIL_ATHLETE: &str = "Email Athlet:in";
    pub const EMAIL_MOTHER: &str = "Email Mutter";
    pub const EMAIL_FATHER: &str = "Email Vater";
}

use fields::*;

/// Substring (lower case) of a column name that marks a trial-training export
const TRIAL_TRAINING_MARKER: &str = "schnuppertraining";

const COMMON_RENAMES: &[(&str, &str)] = &[("AHV-Nummer (756.xxxx.xxxx.xx)", NATIONAL_ID)];

const TRIAL_TRAINING_RENAMES: &[(&str, &str)] = &[
    ("E-Mail Erziehungsberechtigte", EMAIL),
    ("Vorname Athlet:in", FIRST_NAME),
    ("Nachname Athlet:in", LAST_NAME),
    ("Geschlecht Athlet:in", GENDER),
    ("Geburtsdatum Athlet:in", BIRTH_DATE),
];

const STANDARD_HEADERS: &[&str] = &[
    SALUTATION,
    GREETING,
    FIRST_NAME,
    LAST_NAME,
    ADDRESS,
    POSTCODE,
    CITY,
    COUNTRY,
    GENDER,
    ENTRY_DATE,
    STATUS,
    EMERGENCY_PHONE,
    NATIONAL_ID,
    EMAIL_FATHER,
    PHONE_PRIVATE,
    PHONE_MOBILE,
    PHONE_BUSINESS,
    EMAIL,
    EMAIL_ALTERNATE,
    BIRTH_DATE,
    NATIONALITY,
    REMARKS,
];

const TRIAL_TRAINING_HEADERS: &[&str] = &[
    SALUTATION,
    GREETING,
    FIRST_NAME,
    LAST_NAME,
    ADDRESS,
    POSTCODE,
    CITY,
    COUNTRY,
    GENDER,
    EMERGENCY_PHONE,
    NATIONAL_ID,
    PHONE_PRIVATE,
    EMAIL,
    BIRTH_DATE,
    REMARKS,
];

/// The kind of export a dataset came from
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RecordShape {
    /// Membership registration export
    #[default]
    Standard,
    /// Trial-training sign-up export
    TrialTraining,
}

impl RecordShape {
    /// Pick the shape from the column names of an export
    pub fn detect<S: AsRef<str>>(columns: &[S]) -> Self {
        let is_trial = columns
            .iter()
            .any(|c| c.as_ref().to_lowercase().contains(TRIAL_TRAINING_MARKER));

        if is_trial {
            RecordShape::TrialTraining
        } else {
            RecordShape::Standard
        }
    }

    /// Canonical name for a source column; unlisted columns keep their name
    pub fn rename<'a>(&self, column: &'a str) -> &'a str {
        let shape_renames: &[(&str, &str)] = match self {
            RecordShape::Standard => &[],
            RecordShape::TrialTraining => TRIAL_TRAINING_RENAMES,
        };

        COMMON_RENAMES
            .iter()
            .chain(shape_renames)
            .find(|(from, _)| *from == column)
            .map(|(_, to)| *to)
            .unwrap_or(column)
    }

    /// Output columns in their fixed order
    pub fn headers(&self) -> &'static [&'static str] {
        match self {
            RecordShape::Standard => STANDARD_HEADERS,
            RecordShape::TrialTraining => TRIAL_TRAINING_HEADERS,
        }
    }

    /// Name shown to users for this kind of file
    pub fn label(&self) -> &'static str {
        match self {
            RecordShape::Standard => "Anmeldung",
            RecordShape::TrialTraining => "Schnuppertraining",
        }
    }
}

impl std::fmt::Display for RecordShape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}
