//! Customer ledger: village registry, customer identity and the payment
//! reports built on top of a [`Storage`](crate::storage::Storage).
//!
//! Every multi-step write runs inside one storage transaction, so the
//! village upsert, the id uniqueness check and the cascading delete are
//! atomic with respect to other writers.

mod customer;
mod error;
mod payment;
mod report;
mod village;

use std::sync::Arc;

pub use customer::{DeletedCustomer, NewCustomer};
pub use error::{LedgerError, LedgerResult};
pub use payment::NewPayment;
pub use report::{CustomerTotal, PriceTable, TotalsMode, UnpricedPeriodPolicy};

#[derive(Clone, Debug, Default)]
pub struct LedgerSettings {
    pub totals: TotalsMode,
    pub unpriced_period: UnpricedPeriodPolicy,
}

#[derive(Clone)]
pub struct Ledger<S> {
    storage: S,
    settings: Arc<LedgerSettings>,
}

impl<S> Ledger<S> {
    pub fn new(storage: S, settings: LedgerSettings) -> Self {
        Self {
            storage,
            settings: Arc::new(settings),
        }
    }
}
