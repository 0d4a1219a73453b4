use std::io::{BufRead, Write};

use crate::domain::{Field, FieldValidator, RegistrationError, UserRecord, UserRecordBuilder};

use super::AppError;

/// Shown when a line of input is not valid UTF-8.
pub const NOT_TEXT_MESSAGE: &str = "Input must be valid UTF-8 text";

/// Interactive registration: asks for each field in turn and keeps asking
/// until the answer validates.
pub struct RegistrationSession<R, W> {
    input: R,
    output: W,
    validator: FieldValidator,
    /// Number of rejected answers across the whole session.
    rejected: usize,
}

impl<R: BufRead, W: Write> RegistrationSession<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self {
            input,
            output,
            validator: FieldValidator::new(),
            rejected: 0,
        }
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Collect all fields in order and assemble the record.
    pub fn run(&mut self) -> Result<UserRecord, AppError> {
        let mut builder = UserRecordBuilder::new(self.validator);

        for field in Field::ALL {
            let value = self.prompt_until_valid(field)?;
            if let Err(violations) = builder.set(field, &value) {
                // prompt_until_valid already ran the same rules
                return Err(RegistrationError::Invalid(violations).into());
            }
        }

        let user = builder.build()?;
        tracing::info!(user_id = user.user_id(), rejected = self.rejected, "user registered");
        Ok(user)
    }

    /// Prompt for `field` until a line passes validation; returns it trimmed.
    pub fn prompt_until_valid(&mut self, field: Field) -> Result<String, AppError> {
        loop {
            write!(self.output, "{} is required: ", field.label())?;
            self.output.flush()?;

            let mut raw = Vec::new();
            if self.input.read_until(b'\n', &mut raw)? == 0 {
                return Err(AppError::InputClosed(field));
            }
            let Ok(line) = String::from_utf8(raw) else {
                self.rejected += 1;
                tracing::debug!(%field, "field rejected: not UTF-8");
                writeln!(self.output, "{}", NOT_TEXT_MESSAGE)?;
                continue;
            };
            let value = line.trim();

            let violations = self.validator.validate(field, value);
            if violations.is_empty() {
                tracing::debug!(%field, "field accepted");
                return Ok(value.to_string());
            }

            self.rejected += 1;
            tracing::debug!(%field, violations = violations.len(), "field rejected");
            for violation in &violations {
                writeln!(self.output, "{}", violation)?;
            }
        }
    }
}
