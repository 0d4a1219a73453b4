use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::domain::{format_amount, parse_amount, Amount, BankAccount, Operation};

use super::AppError;

/// One step of a transaction script, written as `deposit:50` or `withdraw:12.5`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ScriptedOp {
    pub operation: Operation,
    pub amount: Amount,
}

impl FromStr for ScriptedOp {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, amount) = s
            .split_once(':')
            .ok_or_else(|| AppError::InvalidOperation(s.to_string()))?;

        let operation = match kind.trim().to_lowercase().as_str() {
            "deposit" | "d" => Operation::Deposit,
            "withdraw" | "w" => Operation::Withdraw,
            _ => return Err(AppError::InvalidOperation(s.to_string())),
        };
        let amount = parse_amount(amount)?;

        Ok(Self { operation, amount })
    }
}

impl fmt::Display for ScriptedOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operation, format_amount(self.amount))
    }
}

/// Result of applying one [`ScriptedOp`].
#[derive(Debug, Clone, Serialize)]
pub struct OpOutcome {
    pub op: ScriptedOp,
    /// `None` when the operation was applied.
    pub error: Option<String>,
    pub balance_after: Amount,
}

impl OpOutcome {
    pub fn applied(&self) -> bool {
        self.error.is_none()
    }
}

/// Apply every op in order. A rejected op is reported and the script carries on.
pub fn apply_script<A: BankAccount>(account: &mut A, ops: &[ScriptedOp]) -> Vec<OpOutcome> {
    ops.iter()
        .map(|op| {
            let result = match op.operation {
                Operation::Deposit => account.deposit(op.amount),
                Operation::Withdraw => account.withdraw(op.amount),
            };
            OpOutcome {
                op: *op,
                error: result.err().map(|err| err.to_string()),
                balance_after: account.balance(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::{Account, SavingsAccount};

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_ops() {
        let op: ScriptedOp = "deposit:50".parse().unwrap();
        assert_eq!(op.operation, Operation::Deposit);
        assert_eq!(op.amount, dec("50"));

        let op: ScriptedOp = "W: 12.5".parse().unwrap();
        assert_eq!(op.operation, Operation::Withdraw);
        assert_eq!(op.amount, dec("12.5"));
    }

    #[test]
    fn test_parse_ops_invalid() {
        assert!(matches!(
            "transfer:5".parse::<ScriptedOp>(),
            Err(AppError::InvalidOperation(_))
        ));
        assert!(matches!(
            "deposit".parse::<ScriptedOp>(),
            Err(AppError::InvalidOperation(_))
        ));
        assert!(matches!(
            "deposit:".parse::<ScriptedOp>(),
            Err(AppError::InvalidAmount(_))
        ));
        assert!(matches!(
            "deposit:ten".parse::<ScriptedOp>(),
            Err(AppError::InvalidAmount(_))
        ));
    }

    #[test]
    fn test_apply_script_continues_after_rejection() {
        let mut account = Account::new(Some(dec("10"))).unwrap();
        let ops: Vec<ScriptedOp> = ["withdraw:20", "deposit:15", "withdraw:20", "deposit:-1"]
            .iter()
            .map(|s| s.parse().unwrap())
            .collect();

        let outcomes = apply_script(&mut account, &ops);

        let applied: Vec<bool> = outcomes.iter().map(OpOutcome::applied).collect();
        assert_eq!(applied, vec![false, true, true, false]);
        assert_eq!(outcomes[0].balance_after, dec("10"));
        assert_eq!(outcomes[2].balance_after, dec("5"));
        assert_eq!(account.balance(), dec("5"));
    }

    #[test]
    fn test_apply_script_on_savings_respects_quota() {
        let mut account = SavingsAccount::new(Some(dec("100")), dec("0.05"), 1).unwrap();
        let ops = [
            ScriptedOp {
                operation: Operation::Withdraw,
                amount: dec("1"),
            },
            ScriptedOp {
                operation: Operation::Withdraw,
                amount: dec("1"),
            },
        ];

        let outcomes = apply_script(&mut account, &ops);
        assert!(outcomes[0].applied());
        assert!(outcomes[1].error.as_deref().unwrap().contains("limit exceeded"));
    }
}
