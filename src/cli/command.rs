use clap::Subcommand;

use crate::cli::customer_cmd::CustomerCmd;
use crate::cli::payment_cmd::PaymentCmd;
use crate::cli::report_cmd::{ReportCmd, VillageCmd};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    #[command(
        about = "Customer management commands",
        long_about = "Register, look up, search and delete scheme members. Deleting a customer also deletes all of its payments."
    )]
    Customer {
        #[command(subcommand)]
        cmd: CustomerCmd,
    },
    #[command(
        about = "Payment commands",
        long_about = "Record payments for a customer and list them per customer or per period."
    )]
    Payment {
        #[command(subcommand)]
        cmd: PaymentCmd,
    },
    #[command(
        about = "Reports",
        long_about = "Aggregated views such as the total paid by a customer."
    )]
    Report {
        #[command(subcommand)]
        cmd: ReportCmd,
    },
    #[command(
        about = "Village registry commands",
        long_about = "Inspect the villages registered on first use by customers."
    )]
    Village {
        #[command(subcommand)]
        cmd: VillageCmd,
    },
}
