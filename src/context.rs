use std::path::PathBuf;

use crate::cli::{Cli, TotalsArg, UnpricedPeriodArg};
use crate::configuration::{Configuration, TotalsSource};
use crate::ledger::UnpricedPeriodPolicy;

pub const DB_FILE_NAME: &str = "scheme-ledger.sqlite";

pub struct Context {
    pub config: Configuration,
}

impl Context {
    pub fn from_cli(cli: &Cli) -> Self {
        let totals = match (cli.totals, &cli.price_table) {
            (TotalsArg::Priced, Some(path)) => TotalsSource::PriceTable(path.clone()),
            // clap enforces --price-table for priced totals
            _ => TotalsSource::StoredAmounts,
        };
        let cfg = Configuration {
            data_dir: cli.data_dir.clone(),
            log_file: cli.log_file.clone(),
            reset: cli.reset,
            api_listen: cli.api_listen,
            totals,
            unpriced_period: match cli.unpriced_period {
                UnpricedPeriodArg::Ignore => UnpricedPeriodPolicy::Ignore,
                UnpricedPeriodArg::Reject => UnpricedPeriodPolicy::Reject,
            },
        };
        Self { config: cfg }
    }

    pub fn db_path(&self) -> PathBuf {
        PathBuf::from(&self.config.data_dir).join(DB_FILE_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn context_maps_priced_totals_and_policy() {
        let cli = Cli::try_parse_from([
            "scheme-ledger",
            "--data-dir",
            "/tmp/ledger",
            "--totals",
            "priced",
            "--price-table",
            "prices.json",
            "--unpriced-period",
            "reject",
        ])
        .unwrap();
        let ctx = Context::from_cli(&cli);

        assert_eq!(
            ctx.config.totals,
            TotalsSource::PriceTable("prices.json".to_string())
        );
        assert_eq!(ctx.config.unpriced_period, UnpricedPeriodPolicy::Reject);
        assert_eq!(ctx.db_path(), PathBuf::from("/tmp/ledger").join(DB_FILE_NAME));
    }

    #[test]
    fn price_table_alone_keeps_stored_totals() {
        let cli =
            Cli::try_parse_from(["scheme-ledger", "--price-table", "prices.json"]).unwrap();
        let ctx = Context::from_cli(&cli);
        assert_eq!(ctx.config.totals, TotalsSource::StoredAmounts);
    }
}
