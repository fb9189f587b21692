//! Full bill lifecycle against the live mock server.
//!
//! # Design
//! Starts the mock server on a random port, then exercises the gateway and
//! the store over real HTTP using reqwest as the transport. Validates that
//! request building and response parsing agree with the actual server.

use async_trait::async_trait;
use quickbill_core::{
    format_money, ApiError, BillApi, BillClient, BillGateway, BillId, BillStore, Field,
    GatewayConfig, HttpMethod, HttpRequest, HttpResponse, NewBill, Outcome, Transport,
};

/// Execute an `HttpRequest` with reqwest and return an `HttpResponse`.
///
/// Status codes are returned as data rather than errors so the core client
/// handles status interpretation.
struct ReqwestTransport(reqwest::Client);

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, req: HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut builder = match req.method {
            HttpMethod::Get => self.0.get(&req.url),
            HttpMethod::Post => self.0.post(&req.url),
            HttpMethod::Delete => self.0.delete(&req.url),
        };
        for (name, value) in &req.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = req.body {
            builder = builder.body(body);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(HttpResponse {
            status,
            headers: Vec::new(),
            body,
        })
    }
}

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}/")
}

fn gateway(api_base: &str) -> BillGateway<ReqwestTransport> {
    BillGateway::new(
        BillClient::from_config(&GatewayConfig::new(api_base)),
        ReqwestTransport(reqwest::Client::new()),
    )
}

fn new_bill(name: &str, date: &str, amount: f64) -> NewBill {
    NewBill {
        customer_name: name.to_string(),
        bill_date: date.to_string(),
        amount,
        tax: 0.0,
        discount: 0.0,
        total: amount,
    }
}

#[tokio::test]
async fn gateway_crud_lifecycle() {
    let gw = gateway(&start_server().await);

    // Step 1: list — should be empty.
    assert!(gw.list_all().await.unwrap().is_empty(), "expected empty list");

    // Step 2: create two bills.
    let created = gw
        .create(&new_bill("John Doe", "2025-09-10", 2000.0))
        .await
        .unwrap()
        .expect("server echoes the created bill");
    assert_eq!(created.customer_name, "John Doe");
    assert!(!created.id.is_temporary());
    gw.create(&new_bill("Alice", "2025-09-05", 500.0))
        .await
        .unwrap();

    // Step 3: list in insertion order, sorted ascending by date.
    let all = gw.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    let sorted = gw.list_sorted().await.unwrap();
    assert_eq!(sorted[0].customer_name, "Alice");
    assert_eq!(sorted[1].customer_name, "John Doe");

    // Step 4: search with a name that needs encoding.
    let found = gw.list_by_customer("john doe").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, created.id);

    // Step 5: delete, then delete again.
    gw.delete(&created.id).await.unwrap();
    let err = gw.delete(&created.id).await.unwrap_err();
    assert!(matches!(err, ApiError::NotFound));

    // Step 6: one bill left.
    let all = gw.list_all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].customer_name, "Alice");
}

#[tokio::test]
async fn store_against_live_server() {
    let mut store = BillStore::new(gateway(&start_server().await));
    assert_eq!(store.load().await, Outcome::Applied);
    assert!(store.bills().is_empty());

    store.set_field(Field::CustomerName, "Rahul").unwrap();
    store.set_field(Field::BillDate, "2025-09-12").unwrap();
    store.set_field(Field::Amount, "1000.50").unwrap();
    store.set_field(Field::Tax, "50").unwrap();
    store.set_field(Field::Discount, "10").unwrap();
    assert_eq!(store.submit().await, Ok(Outcome::Applied));

    assert_eq!(store.bills().len(), 1);
    let rahul = store.bills()[0].clone();
    assert!(!rahul.is_pending(), "reload replaced the placeholder");
    assert_eq!(format_money(rahul.total()), "1040.50");
    assert_eq!(store.form().customer_name, "");

    assert_eq!(store.search_for("RAH").await, Outcome::Applied);
    assert_eq!(store.bills().len(), 1);

    assert_eq!(store.delete(&rahul.id, |_| true).await, Outcome::Applied);
    assert!(store.bills().is_empty());

    // Deleting again fails server-side; the banner goes up.
    assert_eq!(
        store.delete(&rahul.id, |_| true).await,
        Outcome::RolledBack
    );
    assert!(store.error().is_some());
}

#[tokio::test]
async fn unreachable_server_uses_fallbacks() {
    // Nothing listens on port 9 on loopback.
    let mut store = BillStore::new(gateway("http://127.0.0.1:9/"));

    assert_eq!(store.load().await, Outcome::Stale);
    assert!(store.error().is_none());
    assert_eq!(store.sort_by_date().await, Outcome::Fallback);
    assert!(!store.sort_ascending());
    assert_eq!(store.search_for("anyone").await, Outcome::Fallback);
    assert_eq!(store.delete(&BillId::Number(1), |_| true).await, Outcome::RolledBack);
    assert_eq!(store.error(), Some("Failed to delete bill. Restoring list."));
}
