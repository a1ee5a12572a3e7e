use super::{print_json, CommandRunner};
use crate::cli;
use crate::ledger::{Ledger, NewCustomer};
use crate::storage::{CustomerFilter, Storage};
use anyhow::{Context, Result};

impl CommandRunner for cli::CustomerCmd {
    fn run<S: Storage>(&self, ledger: &Ledger<S>) -> Result<()> {
        match self {
            cli::CustomerCmd::Add {
                id,
                name,
                village,
                category,
                phone,
            } => {
                let customer = ledger
                    .add_customer(NewCustomer {
                        id: *id,
                        name: name.clone(),
                        village: village.clone(),
                        category: *category,
                        phone: phone.clone(),
                    })
                    .context("adding customer")?;
                print_json(&customer)
            }
            cli::CustomerCmd::Get { id } => {
                let customer = ledger.find_customer(*id).context("finding customer")?;
                print_json(&customer)
            }
            cli::CustomerCmd::List {
                name,
                village,
                category,
            } => {
                let filter = CustomerFilter {
                    name: name.clone(),
                    village: village.clone(),
                    category: *category,
                };
                let customers = ledger
                    .list_customers(&filter)
                    .context("listing customers")?;
                print_json(&customers)
            }
            cli::CustomerCmd::Delete { id } => {
                let deleted = ledger.delete_customer(*id).context("deleting customer")?;
                print_json(&deleted)
            }
        }
    }
}
