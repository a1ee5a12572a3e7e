use serde::{Deserialize, Serialize};

use crate::storage::{
    Category, Customer, CustomerFilter, CustomerId, CustomerSave, Storage, StorageError,
    StorageRead, StorageTx, StorageWrite,
};

use super::{village::ensure_village_in, Ledger, LedgerError, LedgerResult};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCustomer {
    /// Leave empty to let the store assign the next id.
    pub id: Option<CustomerId>,
    pub name: String,
    pub village: String,
    pub category: Category,
    pub phone: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedCustomer {
    pub customer: Customer,
    pub payment_count: usize,
}

impl<S: Storage> Ledger<S> {
    pub fn add_customer(&self, new: NewCustomer) -> LedgerResult<Customer> {
        let name = new.name.trim();
        if name.is_empty() {
            return Err(LedgerError::Validation(
                "customer name is required".to_string(),
            ));
        }
        if let Some(id) = new.id {
            if id.0 <= 0 {
                return Err(LedgerError::Validation(format!(
                    "customer id must be positive, got {id}"
                )));
            }
        }

        let tx = self.storage.begin_tx()?;
        let village = ensure_village_in(&tx, &new.village)?;

        if let Some(id) = new.id {
            if tx.load_customer(id)?.is_some() {
                return Err(duplicate_id(id));
            }
        }

        let customer = tx
            .insert_customer(CustomerSave {
                id: new.id,
                name,
                village: &village.name,
                category: new.category,
                phone: new.phone.trim(),
            })
            .map_err(|err| match (err, new.id) {
                (StorageError::Conflict(_), Some(id)) => duplicate_id(id),
                (err, _) => err.into(),
            })?;
        tx.commit()?;

        log::info!(
            "👤 Added customer {} ({}, {})",
            customer.id,
            customer.name,
            customer.village
        );
        Ok(customer)
    }

    pub fn find_customer(&self, id: CustomerId) -> LedgerResult<Customer> {
        self.storage
            .load_customer(id)?
            .ok_or_else(|| LedgerError::NotFound(format!("customer {id}")))
    }

    pub fn list_customers(&self, filter: &CustomerFilter) -> LedgerResult<Vec<Customer>> {
        Ok(self.storage.list_customers(filter)?)
    }

    /// Removes the customer and every payment it owns in one transaction.
    pub fn delete_customer(&self, id: CustomerId) -> LedgerResult<DeletedCustomer> {
        let tx = self.storage.begin_tx()?;
        let customer = tx
            .load_customer(id)?
            .ok_or_else(|| LedgerError::NotFound(format!("customer {id}")))?;

        let payment_count = tx.delete_payments_by_customer(id)?;
        if !tx.delete_customer(id)? {
            return Err(LedgerError::Internal(format!(
                "customer {id} disappeared during delete"
            )));
        }
        tx.commit()?;

        log::info!(
            "🗑️ Deleted customer {} and {} payment(s)",
            id,
            payment_count
        );
        Ok(DeletedCustomer {
            customer,
            payment_count,
        })
    }
}

fn duplicate_id(id: CustomerId) -> LedgerError {
    LedgerError::Conflict(format!("customer id {id} already exists"))
}
