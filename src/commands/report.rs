use super::{print_json, CommandRunner};
use crate::cli;
use crate::ledger::Ledger;
use crate::storage::Storage;
use anyhow::{Context, Result};

impl CommandRunner for cli::ReportCmd {
    fn run<S: Storage>(&self, ledger: &Ledger<S>) -> Result<()> {
        match self {
            cli::ReportCmd::Total { customer_id } => {
                let total = ledger
                    .total_paid(*customer_id)
                    .context("computing total")?;
                print_json(&total)
            }
        }
    }
}

impl CommandRunner for cli::VillageCmd {
    fn run<S: Storage>(&self, ledger: &Ledger<S>) -> Result<()> {
        match self {
            cli::VillageCmd::Add { name } => {
                let village = ledger.ensure_village(name).context("registering village")?;
                print_json(&village)
            }
            cli::VillageCmd::List => {
                let villages = ledger.list_villages().context("listing villages")?;
                print_json(&villages)
            }
        }
    }
}
