use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::storage::{
    CustomerId, Payment, PaymentSave, Storage, StorageRead, StorageTx, StorageWrite,
};

use super::{Ledger, LedgerError, LedgerResult, TotalsMode};

/// Amounts carry at most cents.
const MAX_AMOUNT_SCALE: u32 = 2;
/// Largest single payment, in whole units.
const MAX_AMOUNT_UNITS: i64 = 1_000_000_000_000;

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPayment {
    pub customer_id: CustomerId,
    pub period: String,
    /// Required when totals are summed from stored amounts.
    pub amount: Option<Decimal>,
}

impl<S: Storage> Ledger<S> {
    /// Records a payment stamped with the server clock. The owning customer
    /// must exist.
    pub fn add_payment(&self, new: NewPayment) -> LedgerResult<Payment> {
        let period = new.period.trim();
        if period.is_empty() {
            return Err(LedgerError::Validation("period is required".to_string()));
        }
        match new.amount {
            Some(amount) if amount < Decimal::ZERO => {
                return Err(LedgerError::Validation(format!(
                    "amount must not be negative, got {amount}"
                )));
            }
            Some(amount) if amount.normalize().scale() > MAX_AMOUNT_SCALE => {
                return Err(LedgerError::Validation(format!(
                    "amount must have at most {MAX_AMOUNT_SCALE} decimal places, got {amount}"
                )));
            }
            Some(amount) if amount > Decimal::from(MAX_AMOUNT_UNITS) => {
                return Err(LedgerError::Validation(format!(
                    "amount must not exceed {MAX_AMOUNT_UNITS}, got {amount}"
                )));
            }
            None if matches!(self.settings.totals, TotalsMode::Stored) => {
                return Err(LedgerError::Validation("amount is required".to_string()));
            }
            _ => {}
        }

        let tx = self.storage.begin_tx()?;
        if tx.load_customer(new.customer_id)?.is_none() {
            return Err(LedgerError::NotFound(format!(
                "customer {}",
                new.customer_id
            )));
        }
        let payment = tx.insert_payment(PaymentSave {
            customer_id: new.customer_id,
            paid_at: Utc::now(),
            period,
            amount: new.amount,
        })?;
        tx.commit()?;

        log::info!(
            "💰 Recorded payment {} for customer {} ({})",
            payment.id,
            payment.customer_id,
            payment.period
        );
        Ok(payment)
    }
}
