use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::{Field, FieldValidator, Violation};

const PASSWORD_MASK: &str = "*****";
const PIN_MASK: &str = "****";

/// Registration payload. Every field has passed [`FieldValidator`] by the
/// time a record exists; there is no mutation afterwards.
///
/// Secrets are kept out of `Debug`, `Display` and serialized output.
#[derive(Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    id_number: String,
    name: String,
    email: String,
    #[serde(skip_serializing)]
    password: String,
    user_id: String,
    #[serde(skip_serializing)]
    pin: String,
}

impl UserRecord {
    /// Validate and assemble a record from all six fields at once.
    pub fn new(
        id_number: &str,
        name: &str,
        email: &str,
        password: &str,
        user_id: &str,
        pin: &str,
    ) -> Result<Self, RegistrationError> {
        let validator = FieldValidator::new();
        let mut builder = UserRecordBuilder::new(validator);
        let mut violations = Vec::new();

        for (field, value) in Field::ALL
            .into_iter()
            .zip([id_number, name, email, password, user_id, pin])
        {
            if let Err(mut found) = builder.set(field, value) {
                violations.append(&mut found);
            }
        }

        if !violations.is_empty() {
            return Err(RegistrationError::Invalid(violations));
        }
        builder.build()
    }

    pub fn id_number(&self) -> &str {
        &self.id_number
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn pin(&self) -> &str {
        &self.pin
    }

    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::IdNumber => &self.id_number,
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::UserId => &self.user_id,
            Field::Pin => &self.pin,
        }
    }

    pub fn masked_password(&self) -> &'static str {
        mask(&self.password, PASSWORD_MASK)
    }

    pub fn masked_pin(&self) -> &'static str {
        mask(&self.pin, PIN_MASK)
    }
}

fn mask(value: &str, placeholder: &'static str) -> &'static str {
    if value.is_empty() { "" } else { placeholder }
}

impl fmt::Display for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "User {{idNumber={}, name={}, email={}, userId={}, password={}, pin={}}}",
            self.id_number,
            self.name,
            self.email,
            self.user_id,
            self.masked_password(),
            self.masked_pin()
        )
    }
}

impl fmt::Debug for UserRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRecord")
            .field("id_number", &self.id_number)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &self.masked_password())
            .field("user_id", &self.user_id)
            .field("pin", &self.masked_pin())
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("{} validation error(s): {}", .0.len(), join_messages(.0))]
    Invalid(Vec<Violation>),

    #[error("Field {0} has not been provided")]
    Missing(Field),
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(|v| v.message)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Collects fields one at a time, accepting each only once it validates.
#[derive(Default)]
pub struct UserRecordBuilder {
    validator: FieldValidator,
    id_number: Option<String>,
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    user_id: Option<String>,
    pin: Option<String>,
}

impl UserRecordBuilder {
    pub fn new(validator: FieldValidator) -> Self {
        Self {
            validator,
            ..Self::default()
        }
    }

    /// Store the trimmed `value` for `field` if it passes validation.
    /// On failure the builder is unchanged and the violations are returned.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), Vec<Violation>> {
        let violations = self.validator.validate(field, value);
        if !violations.is_empty() {
            return Err(violations);
        }

        let value = Some(value.trim().to_string());
        match field {
            Field::IdNumber => self.id_number = value,
            Field::Name => self.name = value,
            Field::Email => self.email = value,
            Field::Password => self.password = value,
            Field::UserId => self.user_id = value,
            Field::Pin => self.pin = value,
        }
        Ok(())
    }

    pub fn is_set(&self, field: Field) -> bool {
        self.slot(field).is_some()
    }

    /// Fields still waiting for a valid value, in collection order.
    pub fn missing(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| !self.is_set(*field))
            .collect()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::IdNumber => &self.id_number,
            Field::Name => &self.name,
            Field::Email => &self.email,
            Field::Password => &self.password,
            Field::UserId => &self.user_id,
            Field::Pin => &self.pin,
        }
    }

    pub fn build(self) -> Result<UserRecord, RegistrationError> {
        if let Some(field) = self.missing().first() {
            return Err(RegistrationError::Missing(*field));
        }

        Ok(UserRecord {
            id_number: self.id_number.unwrap_or_default(),
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
            user_id: self.user_id.unwrap_or_default(),
            pin: self.pin.unwrap_or_default(),
        })
    }
}
