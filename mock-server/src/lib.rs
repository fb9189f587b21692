use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: i64,
    pub customer_name: String,
    pub bill_date: String,
    pub amount: f64,
    pub tax: f64,
    pub discount: f64,
    pub total: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBill {
    pub customer_name: String,
    pub bill_date: String,
    #[serde(default)]
    pub amount: f64,
    #[serde(default)]
    pub tax: f64,
    #[serde(default)]
    pub discount: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    pub customer_name: String,
}

/// Bills in insertion order plus the id counter.
#[derive(Default)]
pub struct Ledger {
    bills: Vec<Bill>,
    last_id: i64,
}

pub type Db = Arc<RwLock<Ledger>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Ledger::default()));
    let bills = Router::new()
        .route("/allBills", get(list_bills))
        .route("/byCustomer", get(bills_by_customer))
        .route("/sortedByDate", get(bills_sorted_by_date))
        .route("/addBill", post(add_bill))
        .route("/{id}", delete(delete_bill))
        .with_state(db);
    Router::new().nest("/api/bills", bills)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn list_bills(State(db): State<Db>) -> Json<Vec<Bill>> {
    Json(db.read().await.bills.clone())
}

/// Case-insensitive substring match on the customer name.
async fn bills_by_customer(
    State(db): State<Db>,
    Query(query): Query<CustomerQuery>,
) -> Json<Vec<Bill>> {
    let needle = query.customer_name.to_lowercase();
    let ledger = db.read().await;
    Json(
        ledger
            .bills
            .iter()
            .filter(|b| b.customer_name.to_lowercase().contains(&needle))
            .cloned()
            .collect(),
    )
}

/// Oldest first. Dates that do not parse come before everything else.
async fn bills_sorted_by_date(State(db): State<Db>) -> Json<Vec<Bill>> {
    let mut bills = db.read().await.bills.clone();
    bills.sort_by_key(|b| NaiveDate::parse_from_str(&b.bill_date, "%Y-%m-%d").ok());
    Json(bills)
}

async fn add_bill(
    State(db): State<Db>,
    Json(input): Json<CreateBill>,
) -> (StatusCode, Json<Bill>) {
    let mut ledger = db.write().await;
    ledger.last_id += 1;
    let bill = Bill {
        id: ledger.last_id,
        customer_name: input.customer_name,
        bill_date: input.bill_date,
        amount: input.amount,
        tax: input.tax,
        discount: input.discount,
        total: input.amount + input.tax - input.discount,
    };
    debug!(id = bill.id, customer = %bill.customer_name, "bill added");
    ledger.bills.push(bill.clone());
    (StatusCode::CREATED, Json(bill))
}

async fn delete_bill(State(db): State<Db>, Path(id): Path<i64>) -> StatusCode {
    let mut ledger = db.write().await;
    match ledger.bills.iter().position(|b| b.id == id) {
        Some(index) => {
            ledger.bills.remove(index);
            debug!(id, "bill deleted");
            StatusCode::NO_CONTENT
        }
        None => StatusCode::NOT_FOUND,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bill_serializes_camel_case() {
        let bill = Bill {
            id: 1,
            customer_name: "John Doe".to_string(),
            bill_date: "2025-09-05".to_string(),
            amount: 2000.0,
            tax: 100.0,
            discount: 50.0,
            total: 2050.0,
        };
        let json = serde_json::to_value(&bill).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["customerName"], "John Doe");
        assert_eq!(json["billDate"], "2025-09-05");
        assert_eq!(json["total"], 2050.0);
    }

    #[test]
    fn create_bill_ignores_client_total_and_id() {
        let input: CreateBill = serde_json::from_str(
            r#"{"id":"temp-1","customerName":"Rahul","billDate":"2025-09-12","amount":1000.5,"tax":50,"discount":10,"total":1}"#,
        )
        .unwrap();
        assert_eq!(input.customer_name, "Rahul");
        assert_eq!(input.amount, 1000.5);
    }

    #[test]
    fn create_bill_defaults_missing_amounts() {
        let input: CreateBill =
            serde_json::from_str(r#"{"customerName":"Alice","billDate":"2025-09-10"}"#).unwrap();
        assert_eq!(input.amount, 0.0);
        assert_eq!(input.tax, 0.0);
        assert_eq!(input.discount, 0.0);
    }

    #[test]
    fn create_bill_rejects_missing_customer() {
        let result: Result<CreateBill, _> = serde_json::from_str(r#"{"billDate":"2025-09-10"}"#);
        assert!(result.is_err());
    }
}
