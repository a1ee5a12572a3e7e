mod customer;
mod error;
#[cfg(test)]
pub mod memory;
mod payment;
pub mod sqlite;
pub mod traits;
mod village;

pub use customer::{Category, Customer, CustomerFilter, CustomerId, CustomerSave};
pub use error::{StorageError, StorageResult};
pub use payment::{Payment, PaymentId, PaymentSave, PaymentView};
pub use sqlite::SqliteStorage;
pub use traits::{Storage, StorageRead, StorageTx, StorageWrite};
pub use village::Village;
