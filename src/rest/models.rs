use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::storage::CustomerId;

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub uptime_secs: u64,
}

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
}

/// Field aliases accept the payload shape of the legacy form client.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddCustomerRequest {
    #[serde(default, alias = "userId")]
    pub id: Option<CustomerId>,
    #[serde(alias = "c_name")]
    pub name: String,
    #[serde(alias = "c_vill")]
    pub village: String,
    #[serde(alias = "c_category")]
    pub category: String,
    #[serde(default)]
    pub phone: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPaymentRequest {
    #[serde(alias = "c_id")]
    pub customer_id: CustomerId,
    #[serde(alias = "p_month")]
    pub period: String,
    #[serde(default)]
    pub amount: Option<Decimal>,
}

#[derive(Deserialize, Default)]
pub struct CustomerQuery {
    pub name: Option<String>,
    pub village: Option<String>,
    pub category: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct PeriodQuery {
    #[serde(alias = "p_month")]
    pub period: Option<String>,
}
