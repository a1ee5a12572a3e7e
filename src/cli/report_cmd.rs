use clap::Subcommand;

use crate::storage::CustomerId;

#[derive(Subcommand, Debug, Clone)]
pub enum ReportCmd {
    #[command(
        about = "Total paid by a customer",
        long_about = "Sum of a customer's payments, or of the price-table prices of the periods it paid for when totals are priced. Zero when there are no payments."
    )]
    Total {
        #[arg(long = "customer-id", value_name = "ID")]
        customer_id: CustomerId,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum VillageCmd {
    #[command(
        about = "Register a village",
        long_about = "Register a village name ahead of its first customer. Spelling variants that differ only in case or spacing resolve to the existing entry."
    )]
    Add {
        #[arg(long, value_name = "NAME")]
        name: String,
    },
    #[command(about = "List registered villages")]
    List,
}
