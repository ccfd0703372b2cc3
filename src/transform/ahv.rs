//! Swiss social insurance number (AHV) validation

use thiserror::Error;

/// Number of digits in an AHV number
pub const AHV_DIGITS: usize = 13;

/// Why an AHV number was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NationalIdError {
    #[error("AHV-Nummer fehlt")]
    Missing,

    #[error("Ungültige AHV-Nummer \"{0}\"")]
    Invalid(String),

    #[error("Ungültige AHV-Nummer \"{value}\" (Prüfziffer {actual}, erwartet {expected})")]
    Checksum {
        value: String,
        expected: u32,
        actual: u32,
    },
}

/// Validate an AHV number and format it as `756.1234.5678.97`.
///
/// Whitespace and dots are ignored. The last digit is an EAN-13 style check
/// digit over the first twelve, weighted 1 and 3 alternately from the left.
pub fn validate(raw: Option<&str>) -> Result<String, NationalIdError> {
    let raw = raw.map(str::trim).filter(|v| !v.is_empty());
    let Some(raw) = raw else {
        return Err(NationalIdError::Missing);
    };

    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '.')
        .collect();

    let digits: Vec<u32> = cleaned.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != AHV_DIGITS || cleaned.chars().count() != AHV_DIGITS {
        return Err(NationalIdError::Invalid(raw.to_string()));
    }

    let expected = check_digit(&digits[..AHV_DIGITS - 1]);
    let actual = digits[AHV_DIGITS - 1];
    if expected != actual {
        return Err(NationalIdError::Checksum {
            value: raw.to_string(),
            expected,
            actual,
        });
    }

    Ok(format!(
        "{}.{}.{}.{}",
        &cleaned[0..3],
        &cleaned[3..7],
        &cleaned[7..11],
        &cleaned[11..]
    ))
}

/// Check digit for the twelve payload digits
fn check_digit(payload: &[u32]) -> u32 {
    let sum: u32 = payload
        .iter()
        .enumerate()
        .map(|(i, d)| if i % 2 == 0 { *d } else { d * 3 })
        .sum();
    (10 - sum % 10) % 10
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_valid_number() {
        assert_eq!(validate(Some("7561234567897")).unwrap(), "756.1234.5678.97");
        assert_eq!(
            validate(Some(" 756.1234.5678.97 ")).unwrap(),
            "756.1234.5678.97"
        );
        assert_eq!(
            validate(Some("756 1234 5678 97")).unwrap(),
            "756.1234.5678.97"
        );
    }

    #[test]
    fn test_checksum_mismatch() {
        assert_eq!(
            validate(Some("756.1234.5678.90")),
            Err(NationalIdError::Checksum {
                value: "756.1234.5678.90".to_string(),
                expected: 7,
                actual: 0,
            })
        );
    }

    #[test]
    fn test_missing_and_malformed() {
        assert_eq!(validate(None), Err(NationalIdError::Missing));
        assert_eq!(validate(Some("  ")), Err(NationalIdError::Missing));
        assert_eq!(
            validate(Some("756.1234.5678")),
            Err(NationalIdError::Invalid("756.1234.5678".to_string()))
        );
        assert!(matches!(
            validate(Some("756.1234.5678.9x")),
            Err(NationalIdError::Invalid(_))
        ));
        assert!(matches!(
            validate(Some("756-1234-5678-97")),
            Err(NationalIdError::Invalid(_))
        ));
    }

    fn with_check_digit(payload: &[u32]) -> String {
        payload
            .iter()
            .chain(std::iter::once(&check_digit(payload)))
            .map(|d| char::from_digit(*d, 10).unwrap())
            .collect()
    }

    proptest! {
        #[test]
        fn prop_formatted_number_revalidates(payload in prop::collection::vec(0u32..10, 12)) {
            let formatted = validate(Some(with_check_digit(&payload).as_str())).unwrap();
            prop_assert_eq!(validate(Some(formatted.replace('.', "").as_str())).unwrap(), formatted.clone());
            prop_assert_eq!(validate(Some(formatted.as_str())).unwrap(), formatted);
        }

        #[test]
        fn prop_wrong_check_digit_rejected(
            payload in prop::collection::vec(0u32..10, 12),
            offset in 1u32..10,
        ) {
            let valid = with_check_digit(&payload);
            let wrong = (check_digit(&payload) + offset) % 10;
            let number = format!("{}{}", &valid[..12], wrong);
            let is_checksum_error = matches!(validate(Some(number.as_str())), Err(NationalIdError::Checksum { .. }));
            prop_assert!(is_checksum_error);
        }

        #[test]
        fn prop_wrong_length_rejected(digits in "[0-9]{1,20}") {
            prop_assume!(digits.len() != AHV_DIGITS);
            let is_invalid = matches!(validate(Some(digits.as_str())), Err(NationalIdError::Invalid(_)));
            prop_assert!(is_invalid);
        }
    }
}
