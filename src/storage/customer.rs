use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};
use thiserror::Error;

/// Identity of a customer. Either supplied by the caller or assigned by the
/// store, the key space is the same.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(pub i64);

impl fmt::Display for CustomerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for CustomerId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse::<i64>().map(CustomerId)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Gold,
    Silver,
    Bronze,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Gold => "gold",
            Category::Silver => "silver",
            Category::Bronze => "bronze",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown category {0:?}, expected one of gold, silver, bronze")]
pub struct CategoryParseError(pub String);

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gold" => Ok(Category::Gold),
            "silver" => Ok(Category::Silver),
            "bronze" => Ok(Category::Bronze),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub village: String,
    pub category: Category,
    pub phone: String,
}

/// Row to insert. A `None` id lets the store assign the next key.
#[derive(Clone, Debug)]
pub struct CustomerSave<'a> {
    pub id: Option<CustomerId>,
    pub name: &'a str,
    pub village: &'a str,
    pub category: Category,
    pub phone: &'a str,
}

/// Conjunction of optional predicates. Text predicates are case-insensitive
/// substring matches, category is exact.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CustomerFilter {
    pub name: Option<String>,
    pub village: Option<String>,
    pub category: Option<Category>,
}

impl CustomerFilter {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.village.is_none() && self.category.is_none()
    }

    pub fn matches(&self, customer: &Customer) -> bool {
        if let Some(category) = self.category {
            if customer.category != category {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if !contains_ignore_case(&customer.name, name) {
                return false;
            }
        }
        if let Some(village) = &self.village {
            if !contains_ignore_case(&customer.village, village) {
                return false;
            }
        }
        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
