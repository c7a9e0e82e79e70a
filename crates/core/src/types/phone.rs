//! Phone number type and messaging-handle helpers.
//!
//! Sellers register a messaging handle (usually a WhatsApp number) in
//! whatever shape they like: `+1 (312) 555-1234`, `098765 43210`, etc.
//! Deep links need the bare international digits.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Default country calling code applied to national-format numbers.
pub const DEFAULT_COUNTRY_CODE: &str = "+91";

/// Errors that can occur when parsing a [`PhoneNumber`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PhoneError {
    /// The input string is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// Fewer digits than any valid international number.
    #[error("phone number must have at least {min} digits")]
    TooShort {
        /// Minimum digit count.
        min: usize,
    },
    /// More digits than E.164 allows.
    #[error("phone number must have at most {max} digits")]
    TooLong {
        /// Maximum digit count.
        max: usize,
    },
    /// A character other than digits, spaces, `+`, `-`, `.`, or parentheses.
    #[error("phone number contains invalid character '{0}'")]
    InvalidCharacter(char),
}

/// A phone number reduced to its international digits.
///
/// ## Constraints
///
/// - 8-15 digits after stripping punctuation (E.164 caps at 15)
/// - Only digits, whitespace, `+`, `-`, `.`, `(` and `)` are accepted as input
///
/// ## Examples
///
/// ```
/// use markethub_core::PhoneNumber;
///
/// let phone = PhoneNumber::parse("+1 (312) 555-1234").unwrap();
/// assert_eq!(phone.digits(), "13125551234");
///
/// assert!(PhoneNumber::parse("").is_err());
/// assert!(PhoneNumber::parse("+1-800-TEXTILE").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Minimum number of digits.
    pub const MIN_DIGITS: usize = 8;
    /// Maximum number of digits (E.164).
    pub const MAX_DIGITS: usize = 15;

    /// Parse a `PhoneNumber` from user input.
    ///
    /// # Errors
    ///
    /// Returns an error if the input:
    /// - Is empty or whitespace
    /// - Contains letters or other unexpected characters
    /// - Has fewer than 8 or more than 15 digits
    pub fn parse(s: &str) -> Result<Self, PhoneError> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(PhoneError::Empty);
        }

        if let Some(bad) = trimmed
            .chars()
            .find(|c| !(c.is_ascii_digit() || c.is_whitespace() || "+-.()".contains(*c)))
        {
            return Err(PhoneError::InvalidCharacter(bad));
        }

        let digits = digits_only(trimmed);
        if digits.len() < Self::MIN_DIGITS {
            return Err(PhoneError::TooShort {
                min: Self::MIN_DIGITS,
            });
        }
        if digits.len() > Self::MAX_DIGITS {
            return Err(PhoneError::TooLong {
                max: Self::MAX_DIGITS,
            });
        }

        Ok(Self(digits))
    }

    /// Returns the digits, without any `+` prefix.
    #[must_use]
    pub fn digits(&self) -> &str {
        &self.0
    }

    /// Consumes the `PhoneNumber` and returns its digits.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "+{}", self.0)
    }
}

impl std::str::FromStr for PhoneNumber {
    type Err = PhoneError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Strip every character that is not an ASCII digit.
///
/// Total: any input, including the empty string, yields a (possibly empty)
/// digit string.
#[must_use]
pub fn digits_only(s: &str) -> String {
    s.chars().filter(char::is_ascii_digit).collect()
}

/// Normalize a handle to international digits for a messaging deep link.
///
/// Inputs already in international form (leading `+` or `00`) keep their
/// own country code. National-format inputs lose their trunk zeros and get
/// `country_code` prepended.
#[must_use]
pub fn format_for_messaging(phone: &str, country_code: &str) -> String {
    let trimmed = phone.trim();
    let digits = digits_only(trimmed);

    if trimmed.starts_with('+') {
        return digits;
    }
    if let Some(rest) = digits.strip_prefix("00") {
        return rest.to_owned();
    }

    let national = digits.trim_start_matches('0');
    if national.is_empty() {
        return String::new();
    }
    format!("{}{national}", digits_only(country_code))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_digits_only_strips_punctuation() {
        assert_eq!(digits_only("+1 (312) 555-1234"), "13125551234");
        assert_eq!(digits_only("+1-XXX-XXX-XXXX"), "1");
        assert_eq!(digits_only(""), "");
    }

    #[test]
    fn test_parse_valid() {
        assert_eq!(
            PhoneNumber::parse("+13125551234").unwrap().digits(),
            "13125551234"
        );
        assert_eq!(
            PhoneNumber::parse(" 98765.43210 ").unwrap().digits(),
            "9876543210"
        );
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(PhoneNumber::parse("   "), Err(PhoneError::Empty));
    }

    #[test]
    fn test_parse_letters() {
        assert_eq!(
            PhoneNumber::parse("+1-800-TEXTILE"),
            Err(PhoneError::InvalidCharacter('T'))
        );
    }

    #[test]
    fn test_parse_length_bounds() {
        assert!(matches!(
            PhoneNumber::parse("12345"),
            Err(PhoneError::TooShort { .. })
        ));
        assert!(matches!(
            PhoneNumber::parse("1234567890123456"),
            Err(PhoneError::TooLong { .. })
        ));
    }

    #[test]
    fn test_display_has_plus() {
        let phone = PhoneNumber::parse("13125551234").unwrap();
        assert_eq!(phone.to_string(), "+13125551234");
    }

    #[test]
    fn test_format_international_kept() {
        assert_eq!(
            format_for_messaging("+1 (312) 555-1234", DEFAULT_COUNTRY_CODE),
            "13125551234"
        );
        assert_eq!(
            format_for_messaging("0044 20 7946 0958", DEFAULT_COUNTRY_CODE),
            "442079460958"
        );
    }

    #[test]
    fn test_format_national_gets_country_code() {
        assert_eq!(
            format_for_messaging("098765 43210", DEFAULT_COUNTRY_CODE),
            "919876543210"
        );
        assert_eq!(format_for_messaging("9876543210", "+1"), "19876543210");
    }

    #[test]
    fn test_format_empty() {
        assert_eq!(format_for_messaging("", DEFAULT_COUNTRY_CODE), "");
        assert_eq!(format_for_messaging("000", DEFAULT_COUNTRY_CODE), "");
    }
}
