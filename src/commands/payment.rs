use super::{print_json, CommandRunner};
use crate::cli;
use crate::ledger::{Ledger, NewPayment};
use crate::storage::Storage;
use anyhow::{Context, Result};

impl CommandRunner for cli::PaymentCmd {
    fn run<S: Storage>(&self, ledger: &Ledger<S>) -> Result<()> {
        match self {
            cli::PaymentCmd::Add {
                customer_id,
                period,
                amount,
            } => {
                let payment = ledger
                    .add_payment(NewPayment {
                        customer_id: *customer_id,
                        period: period.clone(),
                        amount: *amount,
                    })
                    .context("recording payment")?;
                print_json(&payment)
            }
            cli::PaymentCmd::List {
                customer_id,
                period,
            } => {
                let rows = match (customer_id, period) {
                    (Some(id), _) => ledger.payments_for_customer(*id),
                    (None, Some(period)) => ledger.payments_for_period(period),
                    (None, None) => anyhow::bail!("either --customer-id or --period is required"),
                }
                .context("listing payments")?;
                print_json(&rows)
            }
        }
    }
}
