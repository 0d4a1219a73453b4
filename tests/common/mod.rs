// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use std::str::FromStr;

use anyhow::Result;
use bankroll::domain::{Account, Amount, SavingsAccount};
use rust_decimal::Decimal;

/// Parse a decimal literal such as "1000.00".
pub fn amount(s: &str) -> Amount {
    Decimal::from_str(s).unwrap()
}

/// Helper to open a plain account with the given opening balance
pub fn funded_account(initial: &str) -> Result<Account> {
    Ok(Account::new(Some(amount(initial)))?)
}

/// Helper to open a savings account: balance, annual rate, monthly quota
pub fn savings_account(initial: &str, rate: &str, max_withdrawals: i64) -> Result<SavingsAccount> {
    Ok(SavingsAccount::new(
        Some(amount(initial)),
        amount(rate),
        max_withdrawals,
    )?)
}

/// Registration answers that pass every rule, in prompt order.
pub struct ValidAnswers;

impl ValidAnswers {
    pub const ID_NUMBER: &'static str = "0123456789";
    pub const NAME: &'static str = "Grace Hopper";
    pub const EMAIL: &'static str = "grace@navy.example.mil";
    pub const PASSWORD: &'static str = "C0b0lRules";
    pub const USER_ID: &'static str = "grace_h";
    pub const PIN: &'static str = "1906";

    pub fn as_lines() -> String {
        [
            Self::ID_NUMBER,
            Self::NAME,
            Self::EMAIL,
            Self::PASSWORD,
            Self::USER_ID,
            Self::PIN,
        ]
        .join("\n")
            + "\n"
    }
}
