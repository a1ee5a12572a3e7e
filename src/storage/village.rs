use serde::{Deserialize, Serialize};

/// Registry entry for a village name.
///
/// `key` is the normalized form used for uniqueness, `name` is the spelling
/// that first registered it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Village {
    pub id: i64,
    pub name: String,
    pub key: String,
}
