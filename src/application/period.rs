use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{AccountError, Amount, BankAccount, SavingsAccount};

/// Outcome of one planned withdrawal inside an accrual period.
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawalAttempt {
    pub amount: Amount,
    /// `None` when the withdrawal went through.
    pub rejected: Option<String>,
}

impl WithdrawalAttempt {
    pub fn succeeded(&self) -> bool {
        self.rejected.is_none()
    }
}

/// What happened to a savings account during one accrual period.
#[derive(Debug, Clone, Serialize)]
pub struct MonthlyStatement {
    /// 1-based period number
    pub month: u32,
    pub opening_balance: Amount,
    pub withdrawals: Vec<WithdrawalAttempt>,
    pub withdrawals_used: u32,
    pub interest: Amount,
    pub closing_balance: Amount,
}

impl MonthlyStatement {
    pub fn rejected_count(&self) -> usize {
        self.withdrawals.iter().filter(|w| !w.succeeded()).count()
    }
}

/// Close the current accrual period: credit a month of interest, then start
/// the next period with a fresh withdrawal allowance. Returns the interest.
///
/// If the interest cannot be credited the period stays open.
pub fn close_period(account: &mut SavingsAccount) -> Result<Amount, AccountError> {
    let interest = account.accrue_monthly_interest()?;
    account.reset_withdrawal_count();
    Ok(interest)
}

/// Run one period: attempt each planned withdrawal, then close the period.
pub fn run_period(
    account: &mut SavingsAccount,
    month: u32,
    planned: &[Amount],
) -> Result<MonthlyStatement, AccountError> {
    let opening_balance = account.balance();

    let withdrawals = planned
        .iter()
        .map(|&amount| {
            let rejected = account.withdraw(amount).err().map(|err: AccountError| {
                tracing::debug!(month, %amount, error = %err, "planned withdrawal rejected");
                err.to_string()
            });
            WithdrawalAttempt { amount, rejected }
        })
        .collect();
    let withdrawals_used = account.withdrawals_this_period();

    let interest = close_period(account)?;

    Ok(MonthlyStatement {
        month,
        opening_balance,
        withdrawals,
        withdrawals_used,
        interest,
        closing_balance: account.balance(),
    })
}

/// Simulate `months` consecutive periods with the same withdrawal plan each month.
///
/// Stops at the first period whose interest would overflow the balance.
pub fn simulate(
    account: &mut SavingsAccount,
    months: u32,
    planned: &[Amount],
) -> Result<Vec<MonthlyStatement>, AccountError> {
    let statements = (1..=months)
        .map(|month| run_period(account, month, planned))
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|err| {
            tracing::warn!(account = %account.id(), error = %err, "simulation stopped");
        })?;

    let total_interest: Decimal = statements.iter().map(|s| s.interest).sum();
    tracing::info!(
        account = %account.id(),
        months,
        %total_interest,
        balance = %account.balance(),
        "simulation finished"
    );
    Ok(statements)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_close_period_accrues_and_resets() {
        let mut account = SavingsAccount::new(Some(dec("1000")), dec("0.12"), 1).unwrap();
        account.withdraw(dec("100")).unwrap();

        let interest = close_period(&mut account).unwrap();
        assert_eq!(interest, dec("9.00"));
        assert_eq!(account.balance(), dec("909.00"));
        assert_eq!(account.withdrawals_this_period(), 0);
    }

    #[test]
    fn test_run_period_reports_rejections() {
        let mut account = SavingsAccount::new(Some(dec("100")), dec("0"), 2).unwrap();
        let plan = [dec("10"), dec("500"), dec("10"), dec("10")];

        let statement = run_period(&mut account, 1, &plan).unwrap();

        // 500 fails on funds and does not consume the allowance; the fourth hits the quota
        assert_eq!(statement.withdrawals_used, 2);
        assert_eq!(statement.rejected_count(), 2);
        assert!(statement.withdrawals[0].succeeded());
        assert!(!statement.withdrawals[1].succeeded());
        assert!(statement.withdrawals[2].succeeded());
        assert!(!statement.withdrawals[3].succeeded());
        assert_eq!(statement.opening_balance, dec("100"));
        assert_eq!(statement.closing_balance, dec("80"));
    }

    #[test]
    fn test_simulate_compounds_monthly() {
        let mut account = SavingsAccount::new(Some(dec("1000")), dec("0.12"), 3).unwrap();
        let statements = simulate(&mut account, 2, &[]).unwrap();

        assert_eq!(statements.len(), 2);
        assert_eq!(statements[0].interest, dec("10.00"));
        assert_eq!(statements[1].interest, dec("10.10"));
        assert_eq!(account.balance(), dec("1020.10"));
    }

    #[test]
    fn test_simulate_stops_when_balance_would_overflow() {
        // Roughly 8.3% a month for 1000 months outgrows any Decimal
        let mut account = SavingsAccount::new(Some(dec("1000")), Decimal::ONE, 0).unwrap();

        let err = simulate(&mut account, 1000, &[]).unwrap_err();
        assert!(matches!(err, AccountError::BalanceOverflow { .. }));
        assert!(account.balance() > dec("1000"));
    }

    #[test]
    fn test_close_period_keeps_counter_when_accrual_fails() {
        let mut account = SavingsAccount::new(Some(Decimal::MAX), dec("0.12"), 2).unwrap();
        account.withdraw(Decimal::ONE).unwrap();

        assert!(close_period(&mut account).is_err());
        assert_eq!(account.withdrawals_this_period(), 1);
    }
}
