use std::fmt;
use std::hash::{Hash, Hasher};

use rust_decimal::Decimal;
use serde::Serialize;

use super::{
    format_amount, round_half_up, round_to_cents, Account, AccountError, AccountId, Amount,
    BankAccount, ConstructionError,
};

/// Fractional digits kept on the monthly rate before the interest is rounded.
pub const MONTHLY_RATE_SCALE: u32 = 10;

const MONTHS_PER_YEAR: u32 = 12;

/// A savings account that accrues interest and limits the number of free
/// withdrawals per accrual period.
///
/// Balance handling is delegated to an owned [`Account`]; this type only adds
/// the quota check in front of withdrawals and the interest calculation.
#[derive(Debug, Clone, Serialize)]
pub struct SavingsAccount {
    #[serde(flatten)]
    account: Account,
    annual_interest_rate: Decimal,
    max_monthly_withdrawals: u32,
    withdrawals_this_period: u32,
}

impl SavingsAccount {
    /// `annual_interest_rate` is a fraction, e.g. 0.04 for 4% p.a.
    pub fn new(
        initial_balance: Option<Amount>,
        annual_interest_rate: Decimal,
        max_monthly_withdrawals: i64,
    ) -> Result<Self, ConstructionError> {
        let account = Account::new(initial_balance)?;

        if annual_interest_rate < Decimal::ZERO || annual_interest_rate > Decimal::ONE {
            return Err(ConstructionError::InterestRateOutOfRange(
                annual_interest_rate,
            ));
        }
        let max_monthly_withdrawals = u32::try_from(max_monthly_withdrawals)
            .map_err(|_| ConstructionError::NegativeWithdrawalQuota(max_monthly_withdrawals))?;

        Ok(Self {
            account,
            annual_interest_rate,
            max_monthly_withdrawals,
            withdrawals_this_period: 0,
        })
    }

    pub fn annual_interest_rate(&self) -> Decimal {
        self.annual_interest_rate
    }

    pub fn max_monthly_withdrawals(&self) -> u32 {
        self.max_monthly_withdrawals
    }

    pub fn withdrawals_this_period(&self) -> u32 {
        self.withdrawals_this_period
    }

    pub fn remaining_withdrawals(&self) -> u32 {
        self.max_monthly_withdrawals
            .saturating_sub(self.withdrawals_this_period)
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Annual rate divided by twelve, kept at [`MONTHLY_RATE_SCALE`] digits.
    pub fn monthly_rate(&self) -> Decimal {
        round_half_up(
            self.annual_interest_rate / Decimal::from(MONTHS_PER_YEAR),
            MONTHLY_RATE_SCALE,
        )
    }

    /// Interest one month would earn on the current balance, rounded to cents.
    ///
    /// The monthly rate is at most 1/12, so the product never exceeds the balance.
    pub fn monthly_interest(&self) -> Amount {
        round_to_cents(self.account.balance() * self.monthly_rate())
    }

    /// Apply one month's interest and return the amount credited.
    ///
    /// A zero result (empty balance or zero rate) credits nothing. Fails with
    /// [`AccountError::BalanceOverflow`] when the credited balance would not be
    /// representable; the balance is then left as it was.
    pub fn accrue_monthly_interest(&mut self) -> Result<Amount, AccountError> {
        let interest = self.monthly_interest();
        if interest.is_zero() {
            tracing::debug!(account = %self.id(), "no interest to accrue");
            return Ok(Decimal::ZERO);
        }

        self.account.deposit(interest)?;
        tracing::info!(
            account = %self.id(),
            %interest,
            balance = %self.account.balance(),
            "monthly interest accrued"
        );
        Ok(interest)
    }

    /// Start a new accrual period with a fresh withdrawal allowance.
    pub fn reset_withdrawal_count(&mut self) {
        self.withdrawals_this_period = 0;
        tracing::debug!(account = %self.id(), "withdrawal counter reset");
    }
}

impl BankAccount for SavingsAccount {
    fn id(&self) -> AccountId {
        self.account.id()
    }

    fn balance(&self) -> Amount {
        self.account.balance()
    }

    fn deposit(&mut self, amount: Amount) -> Result<(), AccountError> {
        self.account.deposit(amount)
    }

    fn withdraw(&mut self, amount: Amount) -> Result<(), AccountError> {
        if self.withdrawals_this_period >= self.max_monthly_withdrawals {
            return Err(AccountError::QuotaExceeded {
                limit: self.max_monthly_withdrawals,
            });
        }
        self.account.withdraw(amount)?;
        self.withdrawals_this_period += 1;
        Ok(())
    }
}

impl PartialEq for SavingsAccount {
    fn eq(&self, other: &Self) -> bool {
        self.account == other.account
    }
}

impl Eq for SavingsAccount {}

impl Hash for SavingsAccount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.account.hash(state);
    }
}

impl fmt::Display for SavingsAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SavingsAccount {{id={}, balance={}, rate={}, withdrawalsThisMonth={}/{}}}",
            self.id(),
            format_amount(self.balance()),
            self.annual_interest_rate,
            self.withdrawals_this_period,
            self.max_monthly_withdrawals
        )
    }
}
