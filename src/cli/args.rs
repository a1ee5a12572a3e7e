use clap::{Parser, ValueEnum};
use std::env;

use crate::cli::command::Command;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum TotalsArg {
    /// Sum the amount stored on each payment
    Stored,
    /// Sum the price-table price of each paid period
    Priced,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnpricedPeriodArg {
    /// Count periods missing from the price table as zero
    Ignore,
    /// Fail the total when a period is missing from the price table
    Reject,
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Track members, villages and monthly payments of a collection scheme",
    long_about = "Records customers enrolled in a periodic collection scheme, their payments, and serves per-customer totals and per-period rosters over a REST API. Run without a subcommand to start the API server, or use a subcommand for a one-shot operation.",
    subcommand_required = false,
    arg_required_else_help = false
)]
pub struct Cli {
    #[arg(
        long,
        env = "SCHEME_LEDGER_DATA_DIR",
        default_value = ".scheme-ledger/",
        value_name = "DIR",
        help = "Directory to store persistent data"
    )]
    pub data_dir: String,

    #[arg(
        long,
        default_value_t = false,
        help = "Reset all persisted state (delete the SQLite database) before starting"
    )]
    pub reset: bool,

    #[arg(
        long = "log-file",
        env = "SCHEME_LEDGER_LOG_FILE",
        value_name = "PATH",
        help = "Write logs to PATH (in addition to stderr)"
    )]
    pub log_file: Option<String>,

    #[arg(
        long = "api-listen",
        env = "SCHEME_LEDGER_API_LISTEN",
        value_name = "ADDR",
        default_value = "127.0.0.1:3000",
        help = "REST API listen address (host:port)"
    )]
    pub api_listen: std::net::SocketAddr,

    #[arg(
        long,
        env = "SCHEME_LEDGER_TOTALS",
        value_enum,
        default_value_t = TotalsArg::Stored,
        help = "How customer totals are computed"
    )]
    pub totals: TotalsArg,

    #[arg(
        long = "price-table",
        env = "SCHEME_LEDGER_PRICE_TABLE",
        value_name = "PATH",
        required_if_eq("totals", "priced"),
        help = "JSON object mapping period labels to prices, e.g. {\"Jan\": \"100.00\"}"
    )]
    pub price_table: Option<String>,

    #[arg(
        long = "unpriced-period",
        env = "SCHEME_LEDGER_UNPRICED_PERIOD",
        value_enum,
        default_value_t = UnpricedPeriodArg::Ignore,
        help = "What priced totals do with periods missing from the price table"
    )]
    pub unpriced_period: UnpricedPeriodArg,

    #[command(subcommand)]
    pub cmd: Option<Command>,
}

pub fn parse() -> Cli {
    let dotenv_path = env::var("DOTENV_PATH").unwrap_or(".env".into());
    dotenvy::from_filename(&dotenv_path).ok();

    Cli::parse()
}
