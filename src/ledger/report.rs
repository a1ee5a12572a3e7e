use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, path::Path};
use thiserror::Error;

use crate::storage::{CustomerId, Payment, PaymentView, Storage, StorageRead};

use super::{Ledger, LedgerError, LedgerResult};

/// Fixed price per period label, used when totals are derived from the
/// periods a customer paid for instead of stored amounts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceTable(BTreeMap<String, Decimal>);

#[derive(Debug, Error)]
pub enum PriceTableError {
    #[error("reading price table {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing price table: {0}")]
    Parse(#[from] serde_json::Error),
}

impl PriceTable {
    pub fn from_json_str(raw: &str) -> Result<Self, PriceTableError> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PriceTableError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| PriceTableError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Exact label match, no case folding.
    pub fn price(&self, period: &str) -> Option<Decimal> {
        self.0.get(period).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TotalsMode {
    /// Sum the amount stored on each payment.
    #[default]
    Stored,
    /// Sum the table price of each paid period.
    Priced(PriceTable),
}

/// What a priced total does with a period missing from the price table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UnpricedPeriodPolicy {
    #[default]
    Ignore,
    Reject,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerTotal {
    pub customer_id: CustomerId,
    pub total_amount: Decimal,
}

impl<S: Storage> Ledger<S> {
    /// Total paid by a customer. Zero when there are no payments, including
    /// for ids that were never registered.
    pub fn total_paid(&self, customer_id: CustomerId) -> LedgerResult<CustomerTotal> {
        let payments = self.storage.list_payments_by_customer(customer_id)?;
        let total_amount = match &self.settings.totals {
            TotalsMode::Stored => stored_total(&payments)?,
            TotalsMode::Priced(table) => self.priced_total(table, &payments)?,
        };
        Ok(CustomerTotal {
            customer_id,
            total_amount,
        })
    }

    fn priced_total(&self, table: &PriceTable, payments: &[Payment]) -> LedgerResult<Decimal> {
        let mut total = Decimal::ZERO;
        for payment in payments {
            match table.price(&payment.period) {
                Some(price) => total = add_to_total(total, price, payment)?,
                None => match self.settings.unpriced_period {
                    UnpricedPeriodPolicy::Ignore => {
                        log::warn!(
                            "No price for period {:?} (payment {}), counting it as zero",
                            payment.period,
                            payment.id
                        );
                    }
                    UnpricedPeriodPolicy::Reject => {
                        return Err(LedgerError::Validation(format!(
                            "no price for period {:?} (payment {})",
                            payment.period, payment.id
                        )));
                    }
                },
            }
        }
        Ok(total)
    }

    /// Payments of one customer joined with its name, in payment id order.
    /// Unknown customers yield an empty list.
    pub fn payments_for_customer(&self, customer_id: CustomerId) -> LedgerResult<Vec<PaymentView>> {
        Ok(self.storage.list_payment_views_by_customer(customer_id)?)
    }

    /// Payments whose period label equals `period` exactly, in payment id order.
    pub fn payments_for_period(&self, period: &str) -> LedgerResult<Vec<PaymentView>> {
        Ok(self.storage.list_payment_views_by_period(period)?)
    }
}

/// Payments recorded without an amount count as zero.
fn stored_total(payments: &[Payment]) -> LedgerResult<Decimal> {
    let mut total = Decimal::ZERO;
    for payment in payments {
        match payment.amount {
            Some(amount) => total = add_to_total(total, amount, payment)?,
            None => log::warn!(
                "Payment {} ({}) has no stored amount, counting it as zero",
                payment.id,
                payment.period
            ),
        }
    }
    Ok(total)
}

fn add_to_total(total: Decimal, amount: Decimal, payment: &Payment) -> LedgerResult<Decimal> {
    total.checked_add(amount).ok_or_else(|| {
        LedgerError::Internal(format!(
            "total of customer {} overflows at payment {}",
            payment.customer_id, payment.id
        ))
    })
}
