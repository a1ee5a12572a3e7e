mod args;
mod command;
mod customer_cmd;
mod payment_cmd;
mod report_cmd;

pub use args::{Cli, TotalsArg, UnpricedPeriodArg};
pub use command::Command;
pub use customer_cmd::CustomerCmd;
pub use payment_cmd::PaymentCmd;
pub use report_cmd::{ReportCmd, VillageCmd};

pub use args::parse;
