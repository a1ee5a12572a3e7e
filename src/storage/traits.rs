use super::{
    Customer, CustomerFilter, CustomerId, CustomerSave, Payment, PaymentSave, PaymentView,
    StorageResult, Village,
};

pub trait StorageRead {
    /// Look up a village by its normalized key.
    fn load_village(&self, key: &str) -> StorageResult<Option<Village>>;
    fn list_villages(&self) -> StorageResult<Vec<Village>>;

    fn load_customer(&self, id: CustomerId) -> StorageResult<Option<Customer>>;
    /// Customers matching `filter`, ordered by id.
    fn list_customers(&self, filter: &CustomerFilter) -> StorageResult<Vec<Customer>>;

    /// Raw payments of one customer, ordered by payment id.
    fn list_payments_by_customer(&self, customer_id: CustomerId) -> StorageResult<Vec<Payment>>;
    fn list_payment_views_by_customer(
        &self,
        customer_id: CustomerId,
    ) -> StorageResult<Vec<PaymentView>>;
    fn list_payment_views_by_period(&self, period: &str) -> StorageResult<Vec<PaymentView>>;
}

pub trait StorageWrite {
    /// Returns true when a new row was inserted, false when `key` already existed.
    fn insert_village_if_absent(&self, key: &str, name: &str) -> StorageResult<bool>;
    fn insert_customer(&self, customer: CustomerSave<'_>) -> StorageResult<Customer>;
    /// Returns true when a row was removed.
    fn delete_customer(&self, id: CustomerId) -> StorageResult<bool>;
    fn insert_payment(&self, payment: PaymentSave<'_>) -> StorageResult<Payment>;
    /// Returns the number of payments removed.
    fn delete_payments_by_customer(&self, customer_id: CustomerId) -> StorageResult<usize>;
}

/// A write transaction. Dropping it without `commit` rolls everything back.
pub trait StorageTx: StorageRead + StorageWrite {
    fn commit(self) -> StorageResult<()>;
}

pub trait Storage: StorageRead {
    type Tx: StorageTx;

    fn begin_tx(&self) -> StorageResult<Self::Tx>;
}
