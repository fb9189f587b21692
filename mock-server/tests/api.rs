use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, Bill};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn delete_request(uri: &str) -> Request<String> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(String::new())
        .unwrap()
}

fn add_body(name: &str, date: &str) -> String {
    format!(
        r#"{{"customerName":"{name}","billDate":"{date}","amount":100,"tax":10,"discount":5,"total":105}}"#
    )
}

// --- list ---

#[tokio::test]
async fn list_bills_empty() {
    let resp = app().oneshot(get_request("/api/bills/allBills")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let bills: Vec<Bill> = body_json(resp).await;
    assert!(bills.is_empty());
}

// --- create ---

#[tokio::test]
async fn add_bill_returns_201_with_id_and_total() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/bills/addBill",
            r#"{"customerName":"Rahul","billDate":"2025-09-12","amount":1000.5,"tax":50,"discount":10,"total":0}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let bill: Bill = body_json(resp).await;
    assert_eq!(bill.id, 1);
    assert_eq!(bill.customer_name, "Rahul");
    assert_eq!(bill.total, 1040.5);
}

#[tokio::test]
async fn add_bill_malformed_json_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/bills/addBill", r#"{"amount":1}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- search ---

#[tokio::test]
async fn by_customer_without_query_returns_400() {
    let resp = app()
        .oneshot(get_request("/api/bills/byCustomer"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_bill_not_found() {
    let resp = app()
        .oneshot(delete_request("/api/bills/42"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_bill_bad_id_returns_400() {
    let resp = app()
        .oneshot(delete_request("/api/bills/not-a-number"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- full lifecycle ---

#[tokio::test]
async fn bill_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create three bills out of date order
    for (name, date) in [
        ("John Doe", "2025-09-10"),
        ("Alice", "2025-09-05"),
        ("alicia", "2025-09-07"),
    ] {
        let resp = ServiceExt::ready(&mut app)
            .await
            .unwrap()
            .call(json_request("POST", "/api/bills/addBill", &add_body(name, date)))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    // list keeps insertion order
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/bills/allBills"))
        .await
        .unwrap();
    let bills: Vec<Bill> = body_json(resp).await;
    let ids: Vec<i64> = bills.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    // sorted is oldest first
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/bills/sortedByDate"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bills: Vec<Bill> = body_json(resp).await;
    let names: Vec<&str> = bills.iter().map(|b| b.customer_name.as_str()).collect();
    assert_eq!(names, vec!["Alice", "alicia", "John Doe"]);

    // search is a case-insensitive substring match, name url-encoded
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/bills/byCustomer?customerName=ALI"))
        .await
        .unwrap();
    let bills: Vec<Bill> = body_json(resp).await;
    assert_eq!(bills.len(), 2);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get_request("/api/bills/byCustomer?customerName=John%20Doe"))
        .await
        .unwrap();
    let bills: Vec<Bill> = body_json(resp).await;
    assert_eq!(bills.len(), 1);
    assert_eq!(bills[0].id, 1);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(delete_request("/api/bills/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // delete again — 404
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(delete_request("/api/bills/1"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    // ids are not reused
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/bills/addBill", &add_body("Bob", "2025-01-01")))
        .await
        .unwrap();
    let bill: Bill = body_json(resp).await;
    assert_eq!(bill.id, 4);
    assert_eq!(bill.total, 105.0);
}
