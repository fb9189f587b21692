//! Stateless HTTP request builder and response parser for the bill API.
//!
//! # Design
//! `BillClient` holds only the resource root and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The round-trip in between belongs to a `Transport`.

use serde::de::DeserializeOwned;

use crate::config::GatewayConfig;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Bill, BillId, NewBill};

/// Synchronous, stateless codec for the bill API.
#[derive(Debug, Clone)]
pub struct BillClient {
    base_url: String,
}

impl BillClient {
    /// `base_url` is the resource root, e.g. `http://localhost:8080/api/bills`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn from_config(config: &GatewayConfig) -> Self {
        Self::new(&config.endpoint())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_all(&self) -> HttpRequest {
        self.get(format!("{}/allBills", self.base_url))
    }

    pub fn build_list_by_customer(&self, customer_name: &str) -> HttpRequest {
        self.get(format!(
            "{}/byCustomer?customerName={}",
            self.base_url,
            urlencoding::encode(customer_name)
        ))
    }

    pub fn build_list_sorted(&self) -> HttpRequest {
        self.get(format!("{}/sortedByDate", self.base_url))
    }

    pub fn build_create(&self, input: &NewBill) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(input).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        Ok(HttpRequest {
            method: HttpMethod::Post,
            url: format!("{}/addBill", self.base_url),
            headers: vec![("content-type".to_string(), "application/json".to_string())],
            body: Some(body),
        })
    }

    pub fn build_delete(&self, id: &BillId) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            url: format!("{}/{}", self.base_url, urlencoding::encode(&id.to_string())),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Shared by all three list operations.
    pub fn parse_list(&self, response: HttpResponse) -> Result<Vec<Bill>, ApiError> {
        check_status(&response)?;
        decode(&response.body)
    }

    /// Success is all that matters here; the created bill is returned only
    /// when the body actually parses as one.
    pub fn parse_create(&self, response: HttpResponse) -> Result<Option<Bill>, ApiError> {
        check_status(&response)?;
        Ok(serde_json::from_str(&response.body).ok())
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    fn get(&self, url: String) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            url,
            headers: Vec::new(),
            body: None,
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, ApiError> {
    serde_json::from_str(body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}
