//! Domain DTOs for the bill API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently;
//! integration tests catch any schema drift between the two crates. Field
//! names are camelCase on the wire.
//!
//! The stored `total` is carried through but never displayed: `Bill::total`
//! always recomputes it from the three base amounts.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

const TEMP_PREFIX: &str = "temp-";

/// Identifier of a bill.
///
/// Servers may hand out numeric or string ids, so both shapes are accepted
/// and serialized back unchanged. Optimistic entries use a `temp-` string id
/// until a reload replaces them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BillId {
    Number(i64),
    Text(String),
}

impl BillId {
    /// A fresh placeholder id for a bill the server has not confirmed yet.
    pub fn temporary() -> Self {
        BillId::Text(format!("{TEMP_PREFIX}{}", Uuid::new_v4()))
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, BillId::Text(s) if s.starts_with(TEMP_PREFIX))
    }

    /// Compare by wire text, so `1` and `"1"` name the same bill.
    pub fn same_as(&self, other: &BillId) -> bool {
        match (self, other) {
            (BillId::Number(a), BillId::Number(b)) => a == b,
            (BillId::Text(a), BillId::Text(b)) => a == b,
            _ => self.to_string() == other.to_string(),
        }
    }
}

impl fmt::Display for BillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BillId::Number(n) => write!(f, "{n}"),
            BillId::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for BillId {
    fn from(n: i64) -> Self {
        BillId::Number(n)
    }
}

/// Digits become a numeric id, anything else a text id.
impl From<&str> for BillId {
    fn from(s: &str) -> Self {
        match s.parse::<i64>() {
            Ok(n) => BillId::Number(n),
            Err(_) => BillId::Text(s.to_string()),
        }
    }
}

impl std::str::FromStr for BillId {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(BillId::from(s))
    }
}

/// A bill as returned by the API.
///
/// Missing or null fields other than `id` read as empty or zero, so one
/// sparse record does not sink the whole list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: BillId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub customer_name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub bill_date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub amount: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tax: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub discount: f64,
    /// Whatever total the server stored. Not used for display.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Bill {
    /// Build the optimistic placeholder shown while a create is in flight.
    pub fn pending(payload: &NewBill) -> Self {
        Self {
            id: BillId::temporary(),
            customer_name: payload.customer_name.clone(),
            bill_date: payload.bill_date.clone(),
            amount: payload.amount,
            tax: payload.tax,
            discount: payload.discount,
            total: Some(payload.total),
        }
    }

    /// `amount + tax - discount`, ignoring any stored total.
    pub fn total(&self) -> f64 {
        compute_total(self.amount, self.tax, self.discount)
    }

    pub fn is_pending(&self) -> bool {
        self.id.is_temporary()
    }
}

/// Request payload for creating a bill. The server assigns the id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBill {
    pub customer_name: String,
    pub bill_date: String,
    pub amount: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,
}

pub fn compute_total(amount: f64, tax: f64, discount: f64) -> f64 {
    amount + tax - discount
}

/// Format a money value with exactly two decimals.
pub fn format_money(value: f64) -> String {
    // adding 0.0 folds -0.0 into 0.0
    format!("{:.2}", value + 0.0)
}
