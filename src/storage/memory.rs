use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use super::{
    traits::{Storage, StorageRead, StorageTx, StorageWrite},
    Customer, CustomerFilter, CustomerId, CustomerSave, Payment, PaymentId, PaymentSave,
    PaymentView, StorageError, StorageResult, Village,
};

#[derive(Clone, Debug, Default)]
struct MemoryState {
    villages: BTreeMap<String, Village>,
    customers: BTreeMap<CustomerId, Customer>,
    payments: Vec<Payment>,
    last_village_id: i64,
    last_payment_id: i64,
}

impl MemoryState {
    fn views<F: Fn(&Payment) -> bool>(&self, keep: F) -> Vec<PaymentView> {
        self.payments
            .iter()
            .filter(|p| keep(p))
            .filter_map(|p| {
                let customer = self.customers.get(&p.customer_id)?;
                Some(PaymentView {
                    payment_id: p.id,
                    customer_id: p.customer_id,
                    period: p.period.clone(),
                    amount: p.amount,
                    customer_name: customer.name.clone(),
                    paid_at: p.paid_at,
                })
            })
            .collect()
    }
}

impl StorageRead for MemoryState {
    fn load_village(&self, key: &str) -> StorageResult<Option<Village>> {
        Ok(self.villages.get(key).cloned())
    }

    fn list_villages(&self) -> StorageResult<Vec<Village>> {
        Ok(self.villages.values().cloned().collect())
    }

    fn load_customer(&self, id: CustomerId) -> StorageResult<Option<Customer>> {
        Ok(self.customers.get(&id).cloned())
    }

    fn list_customers(&self, filter: &CustomerFilter) -> StorageResult<Vec<Customer>> {
        Ok(self
            .customers
            .values()
            .filter(|c| filter.matches(c))
            .cloned()
            .collect())
    }

    fn list_payments_by_customer(&self, customer_id: CustomerId) -> StorageResult<Vec<Payment>> {
        Ok(self
            .payments
            .iter()
            .filter(|p| p.customer_id == customer_id)
            .cloned()
            .collect())
    }

    fn list_payment_views_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> StorageResult<Vec<PaymentView>> {
        Ok(self.views(|p| p.customer_id == customer_id))
    }

    fn list_payment_views_by_period(&self, period: &str) -> StorageResult<Vec<PaymentView>> {
        Ok(self.views(|p| p.period == period))
    }
}

/// In-process store for ledger tests. A transaction works on a private copy
/// of the state and publishes it on commit.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    state: Arc<Mutex<MemoryState>>,
}

pub struct MemoryTx {
    shared: Arc<Mutex<MemoryState>>,
    staged: RefCell<MemoryState>,
}

fn poisoned<T>(_: T) -> StorageError {
    StorageError::Unavailable("memory store lock poisoned".to_string())
}

impl Storage for MemoryStorage {
    type Tx = MemoryTx;

    fn begin_tx(&self) -> StorageResult<Self::Tx> {
        let snapshot = self.state.lock().map_err(poisoned)?.clone();
        Ok(MemoryTx {
            shared: self.state.clone(),
            staged: RefCell::new(snapshot),
        })
    }
}

impl StorageTx for MemoryTx {
    fn commit(self) -> StorageResult<()> {
        let mut guard = self.shared.lock().map_err(poisoned)?;
        *guard = self.staged.into_inner();
        Ok(())
    }
}

macro_rules! delegate_read {
    ($ty:ty, $this:ident => $state:expr) => {
        impl StorageRead for $ty {
            fn load_village(&$this, key: &str) -> StorageResult<Option<Village>> {
                $state.load_village(key)
            }

            fn list_villages(&$this) -> StorageResult<Vec<Village>> {
                $state.list_villages()
            }

            fn load_customer(&$this, id: CustomerId) -> StorageResult<Option<Customer>> {
                $state.load_customer(id)
            }

            fn list_customers(&$this, filter: &CustomerFilter) -> StorageResult<Vec<Customer>> {
                $state.list_customers(filter)
            }

            fn list_payments_by_customer(
                &$this,
                customer_id: CustomerId,
            ) -> StorageResult<Vec<Payment>> {
                $state.list_payments_by_customer(customer_id)
            }

            fn list_payment_views_by_customer(
                &$this,
                customer_id: CustomerId,
            ) -> StorageResult<Vec<PaymentView>> {
                $state.list_payment_views_by_customer(customer_id)
            }

            fn list_payment_views_by_period(
                &$this,
                period: &str,
            ) -> StorageResult<Vec<PaymentView>> {
                $state.list_payment_views_by_period(period)
            }
        }
    };
}

delegate_read!(MemoryStorage, self => self.state.lock().map_err(poisoned)?);
delegate_read!(MemoryTx, self => self.staged.borrow());

impl StorageWrite for MemoryTx {
    fn insert_village_if_absent(&self, key: &str, name: &str) -> StorageResult<bool> {
        let mut state = self.staged.borrow_mut();
        if state.villages.contains_key(key) {
            return Ok(false);
        }
        state.last_village_id += 1;
        let village = Village {
            id: state.last_village_id,
            name: name.to_string(),
            key: key.to_string(),
        };
        state.villages.insert(key.to_string(), village);
        Ok(true)
    }

    fn insert_customer(&self, customer: CustomerSave<'_>) -> StorageResult<Customer> {
        let mut state = self.staged.borrow_mut();
        let id = match customer.id {
            Some(id) if state.customers.contains_key(&id) => {
                return Err(StorageError::Conflict(format!("customers.id {id}")));
            }
            Some(id) => id,
            None => CustomerId(state.customers.keys().next_back().map_or(1, |id| id.0 + 1)),
        };
        let stored = Customer {
            id,
            name: customer.name.to_string(),
            village: customer.village.to_string(),
            category: customer.category,
            phone: customer.phone.to_string(),
        };
        state.customers.insert(id, stored.clone());
        Ok(stored)
    }

    fn delete_customer(&self, id: CustomerId) -> StorageResult<bool> {
        Ok(self.staged.borrow_mut().customers.remove(&id).is_some())
    }

    fn insert_payment(&self, payment: PaymentSave<'_>) -> StorageResult<Payment> {
        let mut state = self.staged.borrow_mut();
        state.last_payment_id += 1;
        let stored = Payment {
            id: PaymentId(state.last_payment_id),
            customer_id: payment.customer_id,
            paid_at: payment.paid_at,
            period: payment.period.to_string(),
            amount: payment.amount,
        };
        state.payments.push(stored.clone());
        Ok(stored)
    }

    fn delete_payments_by_customer(&self, customer_id: CustomerId) -> StorageResult<usize> {
        let mut state = self.staged.borrow_mut();
        let before = state.payments.len();
        state.payments.retain(|p| p.customer_id != customer_id);
        Ok(before - state.payments.len())
    }
}
