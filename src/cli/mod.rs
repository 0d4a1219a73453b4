use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::application::{
    apply_script, simulate, MonthlyStatement, OpOutcome, RegistrationSession, ScriptedOp,
};
use crate::domain::{
    format_amount, parse_amount, Account, Amount, BankAccount, FieldValidator, SavingsAccount,
    UserRecord,
};

/// Bankroll - accounts, savings and registration checks
#[derive(Parser)]
#[command(name = "bankroll")]
#[command(about = "In-memory bank accounts, savings interest and user registration")]
#[command(version)]
pub struct Cli {
    /// Enable verbose (debug) logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Register a new user interactively
    Register {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Check a single registration field value
    Validate {
        /// Field: idNumber, name, email, password, userId, pin
        field: String,

        /// Value to check
        value: String,
    },

    /// Apply deposits and withdrawals to a fresh account
    Transact {
        /// Opening balance (defaults to 0)
        #[arg(short, long)]
        initial: Option<String>,

        /// Operations, e.g. "deposit:50" "withdraw:20.5"
        #[arg(required = true)]
        ops: Vec<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Simulate monthly accrual periods on a savings account
    Simulate {
        /// Opening balance (defaults to 0)
        #[arg(short, long)]
        initial: Option<String>,

        /// Annual interest rate as a fraction, e.g. "0.04" for 4%
        #[arg(short, long)]
        rate: String,

        /// Free withdrawals allowed per month
        #[arg(short, long, allow_negative_numbers = true)]
        max_withdrawals: i64,

        /// Number of months to simulate (1 to 1200)
        #[arg(long, default_value = "12", value_parser = clap::value_parser!(u32).range(1..=1200))]
        months: u32,

        /// Withdrawal attempted every month (repeatable)
        #[arg(short, long)]
        withdraw: Vec<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },
}

impl Cli {
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Register { format } => {
                let stdin = io::stdin();
                let user = run_register_command(stdin.lock(), io::stdout())?;
                print_user(&user, &format)?;
            }

            Commands::Validate { field, value } => {
                run_validate_command(&field, &value)?;
            }

            Commands::Transact {
                initial,
                ops,
                format,
            } => {
                run_transact_command(initial.as_deref(), &ops, &format)?;
            }

            Commands::Simulate {
                initial,
                rate,
                max_withdrawals,
                months,
                withdraw,
                format,
            } => {
                run_simulate_command(
                    initial.as_deref(),
                    &rate,
                    max_withdrawals,
                    months,
                    &withdraw,
                    &format,
                )?;
            }
        }

        Ok(())
    }
}

fn run_register_command<R: BufRead, W: Write>(input: R, output: W) -> Result<UserRecord> {
    let mut session = RegistrationSession::new(input, output);
    let user = session.run().context("Registration aborted")?;
    Ok(user)
}

fn print_user(user: &UserRecord, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(user)?);
        }
        _ => {
            println!();
            println!("=== New User Created ===");
            println!("{}", user);
        }
    }
    Ok(())
}

fn run_validate_command(field: &str, value: &str) -> Result<()> {
    let violations = FieldValidator::new().validate_named(field, value)?;

    if violations.is_empty() {
        println!("OK: {} accepted", field);
        return Ok(());
    }

    for violation in &violations {
        println!("  - {}", violation);
    }
    anyhow::bail!("{} rejected with {} violation(s)", field, violations.len());
}

fn parse_optional_amount(input: Option<&str>) -> Result<Option<Amount>> {
    input
        .map(parse_amount)
        .transpose()
        .context("Invalid amount format. Use '50.00' or '50'")
}

fn run_transact_command(initial: Option<&str>, ops: &[String], format: &str) -> Result<()> {
    let initial = parse_optional_amount(initial)?;
    let ops = ops
        .iter()
        .map(|op| op.parse::<ScriptedOp>())
        .collect::<Result<Vec<_>, _>>()?;

    let mut account = Account::new(initial)?;
    let outcomes = apply_script(&mut account, &ops);

    match format {
        "json" => {
            let report = serde_json::json!({
                "account": &account,
                "outcomes": &outcomes,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => print_outcomes(&account, &outcomes),
    }
    Ok(())
}

fn print_outcomes(account: &Account, outcomes: &[OpOutcome]) {
    println!("{:<24} {:>12}  {}", "OPERATION", "BALANCE", "RESULT");
    println!("{}", "-".repeat(60));
    for outcome in outcomes {
        println!(
            "{:<24} {:>12}  {}",
            outcome.op.to_string(),
            format_amount(outcome.balance_after),
            outcome.error.as_deref().unwrap_or("ok")
        );
    }
    println!();
    println!("{}", account);
}

fn run_simulate_command(
    initial: Option<&str>,
    rate: &str,
    max_withdrawals: i64,
    months: u32,
    withdraw: &[String],
    format: &str,
) -> Result<()> {
    let initial = parse_optional_amount(initial)?;
    let rate = parse_amount(rate).context("Invalid interest rate. Use a fraction like '0.04'")?;
    let planned = withdraw
        .iter()
        .map(|w| parse_amount(w))
        .collect::<Result<Vec<_>, _>>()
        .context("Invalid withdrawal amount")?;

    let mut account = SavingsAccount::new(initial, rate, max_withdrawals)?;
    let statements = simulate(&mut account, months, &planned)
        .context("Simulation stopped: balance grew past the largest supported amount")?;

    match format {
        "json" => {
            let report = serde_json::json!({
                "account": &account,
                "statements": &statements,
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        _ => print_statements(&account, &statements),
    }
    Ok(())
}

fn print_statements(account: &SavingsAccount, statements: &[MonthlyStatement]) {
    println!(
        "{:>5} {:>14} {:>10} {:>9} {:>12} {:>14}",
        "MONTH", "OPENING", "WITHDRAWN", "REJECTED", "INTEREST", "CLOSING"
    );
    println!("{}", "-".repeat(69));

    for statement in statements {
        let withdrawn: Amount = statement
            .withdrawals
            .iter()
            .filter(|w| w.succeeded())
            .map(|w| w.amount)
            .sum();
        println!(
            "{:>5} {:>14} {:>10} {:>9} {:>12} {:>14}",
            statement.month,
            format_amount(statement.opening_balance),
            format_amount(withdrawn),
            statement.rejected_count(),
            format_amount(statement.interest),
            format_amount(statement.closing_balance)
        );
    }

    println!();
    println!("{}", account);
    println!("Balance: {}", format_amount(account.balance()));
}
