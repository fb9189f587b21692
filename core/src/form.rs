//! Pending input for a new bill.
//!
//! Numeric fields keep the raw text the user typed so partially typed values
//! such as `"12."` survive, but a value that is not a number never gets in.

use chrono::NaiveDate;

use crate::error::FormError;
use crate::types::{compute_total, format_money, NewBill};

/// The five inputs of the bill form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    CustomerName,
    BillDate,
    Amount,
    Tax,
    Discount,
}

impl Field {
    pub const ALL: [Field; 5] = [
        Field::CustomerName,
        Field::BillDate,
        Field::Amount,
        Field::Tax,
        Field::Discount,
    ];

    /// Wire name of the field.
    pub fn name(self) -> &'static str {
        match self {
            Field::CustomerName => "customerName",
            Field::BillDate => "billDate",
            Field::Amount => "amount",
            Field::Tax => "tax",
            Field::Discount => "discount",
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(self, Field::Amount | Field::Tax | Field::Discount)
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    /// Accepts the wire name or a short alias, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "customername" | "customer" | "name" => Ok(Field::CustomerName),
            "billdate" | "date" => Ok(Field::BillDate),
            "amount" => Ok(Field::Amount),
            "tax" => Ok(Field::Tax),
            "discount" => Ok(Field::Discount),
            other => Err(format!("unknown field {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BillForm {
    pub customer_name: String,
    pub bill_date: String,
    pub amount: String,
    pub tax: String,
    pub discount: String,
}

impl BillForm {
    pub fn get(&self, field: Field) -> &str {
        match field {
            Field::CustomerName => &self.customer_name,
            Field::BillDate => &self.bill_date,
            Field::Amount => &self.amount,
            Field::Tax => &self.tax,
            Field::Discount => &self.discount,
        }
    }

    /// Update one field. Numeric fields reject non-empty values that do not
    /// parse as a number and keep their previous value.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), FormError> {
        if field.is_numeric() && !value.trim().is_empty() && parse_number(value).is_none() {
            return Err(FormError::NotANumber {
                field: field.name(),
                value: value.to_string(),
            });
        }
        let slot = match field {
            Field::CustomerName => &mut self.customer_name,
            Field::BillDate => &mut self.bill_date,
            Field::Amount => &mut self.amount,
            Field::Tax => &mut self.tax,
            Field::Discount => &mut self.discount,
        };
        *slot = value.to_string();
        Ok(())
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// `amount + tax - discount`, blanks counting as zero.
    pub fn total(&self) -> f64 {
        compute_total(
            number_or_zero(&self.amount),
            number_or_zero(&self.tax),
            number_or_zero(&self.discount),
        )
    }

    /// The live preview shown under the form.
    pub fn preview_total(&self) -> String {
        format_money(self.total())
    }

    /// Check the required fields and build the create payload.
    pub fn to_payload(&self) -> Result<NewBill, FormError> {
        let customer_name = self.customer_name.trim();
        if customer_name.is_empty() {
            return Err(FormError::Missing(Field::CustomerName.name()));
        }
        let bill_date = self.bill_date.trim();
        if bill_date.is_empty() {
            return Err(FormError::Missing(Field::BillDate.name()));
        }
        if NaiveDate::parse_from_str(bill_date, "%Y-%m-%d").is_err() {
            return Err(FormError::InvalidDate(bill_date.to_string()));
        }

        let amount = number_or_zero(&self.amount);
        let tax = number_or_zero(&self.tax);
        let discount = number_or_zero(&self.discount);
        Ok(NewBill {
            customer_name: customer_name.to_string(),
            bill_date: bill_date.to_string(),
            amount,
            tax,
            discount,
            total: compute_total(amount, tax, discount),
        })
    }
}

/// Parse user-typed numeric text. Surrounding whitespace is ignored;
/// NaN and infinities are not numbers here.
pub fn parse_number(raw: &str) -> Option<f64> {
    raw.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

fn number_or_zero(raw: &str) -> f64 {
    parse_number(raw).unwrap_or(0.0)
}
