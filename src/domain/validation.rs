//! Field-level validation for registration input.
//!
//! Every [`Field`] carries its own rule set. Rules are checked against the
//! trimmed input and all failing rules are reported, so a caller can show the
//! user everything that is wrong at once.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use thiserror::Error;

/// `local@domain.tld`, with at least one dot-separated segment after the `@`.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+(?:\.[A-Za-z0-9!#$%&'*+/=?^_`{|}~-]+)*@[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]*[A-Za-z0-9])?)+$",
    )
    .expect("email pattern is a valid regex")
});

static USER_ID_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+$").expect("user id pattern is a valid regex"));

/// Registration fields, in the order they are collected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    IdNumber,
    Name,
    Email,
    Password,
    UserId,
    Pin,
}

impl Field {
    pub const ALL: [Field; 6] = [
        Field::IdNumber,
        Field::Name,
        Field::Email,
        Field::Password,
        Field::UserId,
        Field::Pin,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::IdNumber => "idNumber",
            Field::Name => "name",
            Field::Email => "email",
            Field::Password => "password",
            Field::UserId => "userId",
            Field::Pin => "pin",
        }
    }

    /// Human label used in prompts.
    pub fn label(&self) -> &'static str {
        match self {
            Field::IdNumber => "ID Number",
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Password => "Password",
            Field::UserId => "User ID",
            Field::Pin => "PIN",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown field '{0}'. Valid fields: idNumber, name, email, password, userId, pin")]
pub struct UnknownField(pub String);

impl FromStr for Field {
    type Err = UnknownField;

    /// Accepts the canonical camelCase name as well as snake_case and
    /// kebab-case spellings, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();
        match normalized.as_str() {
            "idnumber" => Ok(Field::IdNumber),
            "name" => Ok(Field::Name),
            "email" => Ok(Field::Email),
            "password" => Ok(Field::Password),
            "userid" => Ok(Field::UserId),
            "pin" => Ok(Field::Pin),
            _ => Err(UnknownField(s.to_string())),
        }
    }
}

/// A single failed rule for one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: Field,
    pub message: &'static str,
}

impl Violation {
    fn new(field: Field, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Stateless rule evaluator for [`Field`] values.
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldValidator;

impl FieldValidator {
    pub fn new() -> Self {
        Self
    }

    /// Returns every rule `value` breaks for `field`. Empty means accepted.
    ///
    /// A blank value only reports the "required" rule.
    pub fn validate(&self, field: Field, value: &str) -> Vec<Violation> {
        let value = value.trim();
        if value.is_empty() {
            return vec![Violation::new(field, required_message(field))];
        }

        let length = value.chars().count();
        let mut violations = Vec::new();
        let mut check = |passed: bool, message: &'static str| {
            if !passed {
                violations.push(Violation::new(field, message));
            }
        };

        match field {
            Field::IdNumber => {
                check(length == 10, "ID number must be exactly 10 digits");
                check(all_digits(value), "ID number must contain digits only");
            }
            Field::Name => {
                check(
                    (2..=50).contains(&length),
                    "Name must be between 2 and 50 characters",
                );
            }
            Field::Email => {
                check(EMAIL_PATTERN.is_match(value), "Email format is invalid");
            }
            Field::Password => {
                check(length >= 8, "Password must be at least 8 characters");
                check(
                    value.chars().any(|c| c.is_ascii_digit())
                        && value.chars().any(|c| c.is_ascii_lowercase())
                        && value.chars().any(|c| c.is_ascii_uppercase()),
                    "Password must include upper, lower, and a number",
                );
            }
            Field::UserId => {
                check(
                    (3..=20).contains(&length),
                    "User ID must be between 3 and 20 characters",
                );
                check(
                    USER_ID_PATTERN.is_match(value),
                    "User ID can only contain letters, digits or underscore",
                );
            }
            Field::Pin => {
                check(
                    length == 4 && all_digits(value),
                    "PIN must be exactly 4 digits",
                );
            }
        }

        violations
    }

    /// Validate a field given by name, as typed on a command line.
    pub fn validate_named(&self, field: &str, value: &str) -> Result<Vec<Violation>, UnknownField> {
        let field: Field = field.parse()?;
        Ok(self.validate(field, value))
    }

    pub fn is_valid(&self, field: Field, value: &str) -> bool {
        self.validate(field, value).is_empty()
    }
}

fn required_message(field: Field) -> &'static str {
    match field {
        Field::IdNumber => "ID Number is required",
        Field::Name => "Name is required",
        Field::Email => "Email is required",
        Field::Password => "Password is required",
        Field::UserId => "User ID is required",
        Field::Pin => "PIN is required",
    }
}

fn all_digits(value: &str) -> bool {
    value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(field: Field, value: &str) -> Vec<&'static str> {
        FieldValidator::new()
            .validate(field, value)
            .into_iter()
            .map(|v| v.message)
            .collect()
    }

    #[test]
    fn test_field_name_roundtrip() {
        for field in Field::ALL {
            assert_eq!(field.as_str().parse::<Field>(), Ok(field));
        }
        assert_eq!("user_id".parse::<Field>(), Ok(Field::UserId));
        assert_eq!("ID-NUMBER".parse::<Field>(), Ok(Field::IdNumber));
        assert!("address".parse::<Field>().is_err());
    }

    #[test]
    fn test_blank_reports_required_only() {
        for field in Field::ALL {
            let found = messages(field, "   ");
            assert_eq!(found, vec![required_message(field)]);
        }
    }

    #[test]
    fn test_id_number() {
        assert!(messages(Field::IdNumber, "0123456789").is_empty());
        assert!(messages(Field::IdNumber, " 0123456789 ").is_empty());
        assert_eq!(
            messages(Field::IdNumber, "12345"),
            vec!["ID number must be exactly 10 digits"]
        );
        assert_eq!(
            messages(Field::IdNumber, "12345abcde"),
            vec!["ID number must contain digits only"]
        );
        assert_eq!(
            messages(Field::IdNumber, "12x"),
            vec![
                "ID number must be exactly 10 digits",
                "ID number must contain digits only"
            ]
        );
    }

    #[test]
    fn test_name_bounds() {
        assert!(messages(Field::Name, "Al").is_empty());
        assert!(messages(Field::Name, &"a".repeat(50)).is_empty());
        assert_eq!(messages(Field::Name, "A").len(), 1);
        assert_eq!(messages(Field::Name, &"a".repeat(51)).len(), 1);
    }

    #[test]
    fn test_name_counts_characters_not_bytes() {
        assert!(messages(Field::Name, "Zoë").is_empty());
        assert!(messages(Field::Name, &"é".repeat(50)).is_empty());
    }

    #[test]
    fn test_email() {
        for ok in ["user@example.com", "first.last+tag@mail.example.co", "a_b@x-y.io"] {
            assert!(messages(Field::Email, ok).is_empty(), "{ok} should pass");
        }
        for bad in [
            "plainaddress",
            "user@localhost",
            "@example.com",
            "user@.com",
            "a b@c.de",
            "user@example..com",
        ] {
            assert_eq!(
                messages(Field::Email, bad),
                vec!["Email format is invalid"],
                "{bad} should fail"
            );
        }
    }

    #[test]
    fn test_password() {
        assert!(messages(Field::Password, "Abcdef12").is_empty());
        assert_eq!(
            messages(Field::Password, "abcdefgh"),
            vec!["Password must include upper, lower, and a number"]
        );
        assert_eq!(
            messages(Field::Password, "Ab1"),
            vec!["Password must be at least 8 characters"]
        );
        assert_eq!(messages(Field::Password, "abc").len(), 2);
    }

    #[test]
    fn test_user_id() {
        assert!(messages(Field::UserId, "jane_doe42").is_empty());
        assert_eq!(
            messages(Field::UserId, "jo"),
            vec!["User ID must be between 3 and 20 characters"]
        );
        assert_eq!(
            messages(Field::UserId, "jane.doe"),
            vec!["User ID can only contain letters, digits or underscore"]
        );
        assert_eq!(messages(Field::UserId, "a-").len(), 2);
        assert_eq!(messages(Field::UserId, &"x".repeat(21)).len(), 1);
    }

    #[test]
    fn test_pin() {
        assert!(messages(Field::Pin, "1234").is_empty());
        assert_eq!(messages(Field::Pin, "12a4"), vec!["PIN must be exactly 4 digits"]);
        assert_eq!(messages(Field::Pin, "123"), vec!["PIN must be exactly 4 digits"]);
        assert_eq!(messages(Field::Pin, "12345"), vec!["PIN must be exactly 4 digits"]);
    }

    #[test]
    fn test_validate_named() {
        let validator = FieldValidator::new();
        assert_eq!(validator.validate_named("pin", "1234"), Ok(vec![]));
        assert_eq!(
            validator.validate_named("shoe_size", "42"),
            Err(UnknownField("shoe_size".to_string()))
        );
    }

    #[test]
    fn test_validation_is_deterministic() {
        let validator = FieldValidator::new();
        let first = validator.validate(Field::Password, "short");
        let second = validator.validate(Field::Password, "short");
        assert_eq!(first, second);
    }
}
