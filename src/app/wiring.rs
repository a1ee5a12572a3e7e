use crate::configuration::TotalsSource;
use crate::ledger::{Ledger, LedgerSettings, PriceTable, TotalsMode};
use crate::{context, storage};
use anyhow::{Context, Result};

pub fn init_data_dir(ctx: &context::Context) -> Result<()> {
    let data_dir = std::path::PathBuf::from(&ctx.config.data_dir);
    std::fs::create_dir_all(&data_dir)?;
    Ok(())
}

pub fn init_storage(ctx: &context::Context) -> Result<storage::SqliteStorage> {
    let sqlite = storage::SqliteStorage::new(ctx.db_path());
    if ctx.config.reset {
        sqlite.reset_all().context("resetting storage")?;
    }
    sqlite.init().context("initializing storage")?;
    Ok(sqlite)
}

pub fn build_settings(ctx: &context::Context) -> Result<LedgerSettings> {
    let totals = match &ctx.config.totals {
        TotalsSource::StoredAmounts => TotalsMode::Stored,
        TotalsSource::PriceTable(path) => {
            let table = PriceTable::load(path).context("loading price table")?;
            if table.is_empty() {
                log::warn!("Price table {} is empty, every priced total will be zero", path);
            }
            log::info!("🏷️ Loaded {} period price(s) from {}", table.len(), path);
            TotalsMode::Priced(table)
        }
    };
    Ok(LedgerSettings {
        totals,
        unpriced_period: ctx.config.unpriced_period,
    })
}

pub fn build_ledger(
    storage: storage::SqliteStorage,
    settings: LedgerSettings,
) -> Ledger<storage::SqliteStorage> {
    Ledger::new(storage, settings)
}
