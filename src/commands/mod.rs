use serde::Serialize;

use crate::cli::Command;
use crate::ledger::Ledger;
use crate::storage::Storage;

pub mod customer;
pub mod payment;
pub mod report;

pub trait CommandRunner {
    fn run<S: Storage>(&self, ledger: &Ledger<S>) -> anyhow::Result<()>;
}

impl CommandRunner for Command {
    fn run<S: Storage>(&self, ledger: &Ledger<S>) -> anyhow::Result<()> {
        match self {
            Command::Customer { cmd } => cmd.run(ledger),
            Command::Payment { cmd } => cmd.run(ledger),
            Command::Report { cmd } => cmd.run(ledger),
            Command::Village { cmd } => cmd.run(ledger),
        }
    }
}

/// One-shot results go to stdout as pretty JSON; logs stay on stderr.
pub(crate) fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
