use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use super::{format_amount, Amount};

pub type AccountId = Uuid;

/// Rejected attempt to create an account in an invalid initial state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConstructionError {
    #[error("Initial funds cannot be negative (got {0})")]
    NegativeInitialBalance(Amount),

    #[error("Interest rate must be between 0 and 1 (inclusive), got {0}")]
    InterestRateOutOfRange(Decimal),

    #[error("maxMonthlyWithdrawals cannot be negative (got {0})")]
    NegativeWithdrawalQuota(i64),
}

/// Rejected deposit, withdrawal or interest credit. The account is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    #[error("Amount for {operation} must be greater than zero (got {amount})")]
    InvalidAmount {
        operation: Operation,
        amount: Amount,
    },

    #[error("Insufficient funds for withdrawal: balance {balance}, requested {requested}")]
    InsufficientFunds { balance: Amount, requested: Amount },

    #[error("Monthly free-withdrawal limit exceeded ({limit} per period)")]
    QuotaExceeded { limit: u32 },

    #[error(
        "Balance would exceed the largest representable amount: balance {balance}, {operation} {amount}"
    )]
    BalanceOverflow {
        operation: Operation,
        balance: Amount,
        amount: Amount,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Deposit,
    Withdraw,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Deposit => "deposit",
            Operation::Withdraw => "withdraw",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Capability shared by every kind of account: an identity, a balance that
/// never goes negative, and the two balance mutations.
pub trait BankAccount {
    fn id(&self) -> AccountId;

    fn balance(&self) -> Amount;

    fn deposit(&mut self, amount: Amount) -> Result<(), AccountError>;

    fn withdraw(&mut self, amount: Amount) -> Result<(), AccountError>;
}

/// A plain account holding funds. Identity is the account id alone.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    id: AccountId,
    balance: Amount,
    opened_at: DateTime<Utc>,
}

impl Account {
    /// Open an account. `None` opens it empty; a negative amount is rejected.
    pub fn new(initial_balance: Option<Amount>) -> Result<Self, ConstructionError> {
        let balance = initial_balance.unwrap_or(Decimal::ZERO);
        if balance < Decimal::ZERO {
            return Err(ConstructionError::NegativeInitialBalance(balance));
        }

        let account = Self {
            id: Uuid::new_v4(),
            balance,
            opened_at: Utc::now(),
        };
        tracing::debug!(account = %account.id, balance = %account.balance, "account opened");
        Ok(account)
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    fn ensure_positive(operation: Operation, amount: Amount) -> Result<(), AccountError> {
        if amount <= Decimal::ZERO {
            return Err(AccountError::InvalidAmount { operation, amount });
        }
        Ok(())
    }
}

impl BankAccount for Account {
    fn id(&self) -> AccountId {
        self.id
    }

    fn balance(&self) -> Amount {
        self.balance
    }

    fn deposit(&mut self, amount: Amount) -> Result<(), AccountError> {
        Self::ensure_positive(Operation::Deposit, amount)?;
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(AccountError::BalanceOverflow {
                operation: Operation::Deposit,
                balance: self.balance,
                amount,
            })?;
        tracing::debug!(account = %self.id, %amount, balance = %self.balance, "deposit");
        Ok(())
    }

    fn withdraw(&mut self, amount: Amount) -> Result<(), AccountError> {
        Self::ensure_positive(Operation::Withdraw, amount)?;
        if amount > self.balance {
            return Err(AccountError::InsufficientFunds {
                balance: self.balance,
                requested: amount,
            });
        }
        self.balance -= amount;
        tracing::debug!(account = %self.id, %amount, balance = %self.balance, "withdraw");
        Ok(())
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account {{id={}, balance={}}}",
            self.id,
            format_amount(self.balance)
        )
    }
}
