use crate::storage::{Storage, StorageRead, StorageTx, StorageWrite, Village};

use super::{Ledger, LedgerError, LedgerResult};

/// Registry key for a village name: trimmed, inner whitespace collapsed,
/// lowercased. Two spellings with the same key are the same village.
pub fn village_key(name: &str) -> String {
    name.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Registers `name` unless its key is already present, inside the caller's
/// transaction. Returns the registry entry, whose `name` is the first-seen
/// spelling.
pub(crate) fn ensure_village_in<T>(tx: &T, name: &str) -> LedgerResult<Village>
where
    T: StorageRead + StorageWrite,
{
    let key = village_key(name);
    if key.is_empty() {
        return Err(LedgerError::Validation("village is required".to_string()));
    }
    let display = name.split_whitespace().collect::<Vec<_>>().join(" ");
    if tx.insert_village_if_absent(&key, &display)? {
        log::info!("🏘️ Registered village {}", display);
    }
    tx.load_village(&key)?
        .ok_or_else(|| LedgerError::Internal(format!("village {key} vanished after upsert")))
}

impl<S: Storage> Ledger<S> {
    pub fn ensure_village(&self, name: &str) -> LedgerResult<Village> {
        let tx = self.storage.begin_tx()?;
        let village = ensure_village_in(&tx, name)?;
        tx.commit()?;
        Ok(village)
    }

    pub fn list_villages(&self) -> LedgerResult<Vec<Village>> {
        Ok(self.storage.list_villages()?)
    }
}
