use thiserror::Error;

use crate::domain::{
    AccountError, ConstructionError, Field, ParseAmountError, RegistrationError, UnknownField,
};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Cannot open account: {0}")]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Account(#[from] AccountError),

    #[error("Registration failed: {0}")]
    Registration(#[from] RegistrationError),

    #[error(transparent)]
    UnknownField(#[from] UnknownField),

    #[error("Invalid amount: {0}")]
    InvalidAmount(#[from] ParseAmountError),

    #[error("Invalid operation '{0}'. Expected deposit:<amount> or withdraw:<amount>")]
    InvalidOperation(String),

    #[error("Input ended before {0} was provided")]
    InputClosed(Field),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
