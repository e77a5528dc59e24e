//! Contact details collected at checkout.
//!
//! Each type validates on construction, so a value that exists is known to be
//! well-formed. Validation is structural only; nothing here verifies that an
//! inbox or phone line actually exists.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing contact details.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ContactError {
    /// The input string is empty.
    #[error("{field} cannot be empty")]
    Empty {
        /// Name of the field being parsed.
        field: &'static str,
    },
    /// The email address is longer than allowed.
    #[error("email must be at most {max} characters")]
    EmailTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The email address is not of the form `local@domain`.
    #[error("email must look like name@domain")]
    MalformedEmail,
    /// The phone number is not a 10-digit mobile number.
    #[error("phone number must be 10 digits, optionally prefixed with +91")]
    MalformedPhone,
    /// The PIN code is not six digits.
    #[error("PIN code must be 6 digits and cannot start with 0")]
    MalformedPinCode,
}

/// An email address.
///
/// ## Constraints
///
/// - Length: 1-254 characters
/// - Exactly one @ symbol, with a non-empty local part and domain
///
/// ```
/// use artcrafts_core::Email;
///
/// assert!(Email::parse("asha@example.in").is_ok());
/// assert!(Email::parse("asha@").is_err());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Maximum length of an email address (RFC 5321).
    pub const MAX_LENGTH: usize = 254;

    /// Parse an `Email` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, too long, or not of the form
    /// `local@domain`.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ContactError::Empty { field: "email" });
        }
        if s.len() > Self::MAX_LENGTH {
            return Err(ContactError::EmailTooLong {
                max: Self::MAX_LENGTH,
            });
        }

        let (local, domain) = s.split_once('@').ok_or(ContactError::MalformedEmail)?;
        if local.is_empty() || domain.is_empty() || domain.contains('@') {
            return Err(ContactError::MalformedEmail);
        }

        Ok(Self(s.to_owned()))
    }

    /// Returns the email address as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A mobile phone number, stored as its 10 national digits.
///
/// Spaces and dashes are ignored; a leading `+91` or `0` trunk prefix is
/// stripped.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse a phone number.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty or does not reduce to exactly
    /// ten digits.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let compact: String = s
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-')
            .collect();
        if compact.is_empty() {
            return Err(ContactError::Empty { field: "phone" });
        }

        let national = compact
            .strip_prefix("+91")
            .or_else(|| compact.strip_prefix('0').filter(|rest| rest.len() == 10))
            .unwrap_or(compact.as_str());

        if national.len() != 10 || !national.chars().all(|c| c.is_ascii_digit()) {
            return Err(ContactError::MalformedPhone);
        }

        Ok(Self(national.to_owned()))
    }

    /// The ten national digits.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A six-digit postal index number.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct PinCode(String);

impl PinCode {
    /// Parse a PIN code.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, not six digits, or starts
    /// with `0`.
    pub fn parse(s: &str) -> Result<Self, ContactError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ContactError::Empty { field: "PIN code" });
        }
        if s.len() != 6 || !s.chars().all(|c| c.is_ascii_digit()) || s.starts_with('0') {
            return Err(ContactError::MalformedPinCode);
        }
        Ok(Self(s.to_owned()))
    }

    /// Returns the PIN code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! string_conversions {
    ($name:ident) => {
        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ContactError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $name {
            type Error = ContactError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::parse(&s)
            }
        }

        impl From<$name> for String {
            fn from(value: $name) -> Self {
                value.0
            }
        }
    };
}

string_conversions!(Email);
string_conversions!(PhoneNumber);
string_conversions!(PinCode);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_emails() {
        assert!(Email::parse("user@example.com").is_ok());
        assert!(Email::parse("user+tag@shop.co.in").is_ok());
        assert_eq!(Email::parse("  a@b.c ").unwrap().as_str(), "a@b.c");
    }

    #[test]
    fn test_parse_invalid_emails() {
        assert_eq!(
            Email::parse(""),
            Err(ContactError::Empty { field: "email" })
        );
        assert_eq!(Email::parse("no-at"), Err(ContactError::MalformedEmail));
        assert_eq!(Email::parse("@x.com"), Err(ContactError::MalformedEmail));
        assert_eq!(Email::parse("a@b@c"), Err(ContactError::MalformedEmail));
        let long = format!("{}@x.com", "a".repeat(Email::MAX_LENGTH));
        assert!(matches!(
            Email::parse(&long),
            Err(ContactError::EmailTooLong { .. })
        ));
    }

    #[test]
    fn test_phone_prefixes_are_stripped() {
        assert_eq!(PhoneNumber::parse("98765 43210").unwrap().as_str(), "9876543210");
        assert_eq!(PhoneNumber::parse("+91-98765-43210").unwrap().as_str(), "9876543210");
        assert_eq!(PhoneNumber::parse("09876543210").unwrap().as_str(), "9876543210");
    }

    #[test]
    fn test_phone_rejects_wrong_length() {
        assert_eq!(PhoneNumber::parse("12345"), Err(ContactError::MalformedPhone));
        assert_eq!(PhoneNumber::parse("98765abcde"), Err(ContactError::MalformedPhone));
        assert_eq!(
            PhoneNumber::parse("   "),
            Err(ContactError::Empty { field: "phone" })
        );
    }

    #[test]
    fn test_pincode() {
        assert!(PinCode::parse("302001").is_ok());
        assert_eq!(PinCode::parse("012345"), Err(ContactError::MalformedPinCode));
        assert_eq!(PinCode::parse("30200"), Err(ContactError::MalformedPinCode));
        assert_eq!(PinCode::parse("30200a"), Err(ContactError::MalformedPinCode));
    }

    #[test]
    fn test_serde_validates() {
        assert!(serde_json::from_str::<PinCode>(r#""000000""#).is_err());
        let email: Email = serde_json::from_str(r#""asha@example.in""#).unwrap();
        assert_eq!(serde_json::to_string(&email).unwrap(), r#""asha@example.in""#);
    }
}
