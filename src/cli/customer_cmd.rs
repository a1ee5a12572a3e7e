use clap::Subcommand;

use crate::storage::{Category, CustomerId};

#[derive(Subcommand, Debug, Clone)]
pub enum CustomerCmd {
    #[command(
        about = "Add a customer",
        long_about = "Register a customer, creating its village on first use. Fails if the id is already taken; omit --id to let the store assign one."
    )]
    Add {
        #[arg(long, value_name = "ID", help = "Customer id (assigned when omitted)")]
        id: Option<CustomerId>,
        #[arg(long, value_name = "NAME", help = "Customer name")]
        name: String,
        #[arg(long, value_name = "VILLAGE", help = "Village name")]
        village: String,
        #[arg(
            long,
            value_name = "CATEGORY",
            help = "Membership category: gold, silver or bronze"
        )]
        category: Category,
        #[arg(long, value_name = "PHONE", default_value = "", help = "Phone number")]
        phone: String,
    },
    #[command(about = "Show one customer")]
    Get {
        #[arg(long, value_name = "ID")]
        id: CustomerId,
    },
    #[command(
        about = "List customers",
        long_about = "List customers ordered by id, optionally filtered by name or village (case-insensitive substring) and category."
    )]
    List {
        #[arg(long, value_name = "TEXT")]
        name: Option<String>,
        #[arg(long, value_name = "TEXT")]
        village: Option<String>,
        #[arg(long, value_name = "CATEGORY")]
        category: Option<Category>,
    },
    #[command(about = "Delete a customer and all of its payments")]
    Delete {
        #[arg(long, value_name = "ID")]
        id: CustomerId,
    },
}
