use std::net::SocketAddr;

use crate::ledger::UnpricedPeriodPolicy;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TotalsSource {
    StoredAmounts,
    PriceTable(String),
}

#[derive(Clone, Debug)]
pub struct Configuration {
    pub data_dir: String,
    pub log_file: Option<String>,
    pub reset: bool,
    pub api_listen: SocketAddr,
    pub totals: TotalsSource,
    pub unpriced_period: UnpricedPeriodPolicy,
}
