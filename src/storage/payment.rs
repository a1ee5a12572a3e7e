use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::CustomerId;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(pub i64);

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: PaymentId,
    pub customer_id: CustomerId,
    pub paid_at: DateTime<Utc>,
    pub period: String,
    pub amount: Option<Decimal>,
}

#[derive(Clone, Debug)]
pub struct PaymentSave<'a> {
    pub customer_id: CustomerId,
    pub paid_at: DateTime<Utc>,
    pub period: &'a str,
    pub amount: Option<Decimal>,
}

/// A payment joined with the display name of its owner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    pub payment_id: PaymentId,
    pub customer_id: CustomerId,
    pub period: String,
    pub amount: Option<Decimal>,
    pub customer_name: String,
    pub paid_at: DateTime<Utc>,
}
