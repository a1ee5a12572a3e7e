use clap::{ArgGroup, Subcommand};
use rust_decimal::Decimal;

use crate::storage::CustomerId;

#[derive(Subcommand, Debug, Clone)]
pub enum PaymentCmd {
    #[command(
        about = "Record a payment",
        long_about = "Record a payment for an existing customer. The payment date is taken from the server clock."
    )]
    Add {
        #[arg(long = "customer-id", value_name = "ID")]
        customer_id: CustomerId,
        #[arg(long, value_name = "PERIOD", help = "Period label, e.g. a month name")]
        period: String,
        #[arg(
            long,
            value_name = "AMOUNT",
            help = "Amount paid (required unless totals are priced)"
        )]
        amount: Option<Decimal>,
    },
    #[command(
        about = "List payments with customer names",
        long_about = "List payments joined with the owning customer's name, either for one customer or for one period label (exact match).",
        group(ArgGroup::new("selector").required(true).args(["customer_id", "period"]))
    )]
    List {
        #[arg(long = "customer-id", value_name = "ID")]
        customer_id: Option<CustomerId>,
        #[arg(long, value_name = "PERIOD")]
        period: Option<String>,
    },
}
