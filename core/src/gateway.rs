//! The five asynchronous bill operations the store depends on.
//!
//! `BillGateway` composes a `BillClient` with a host-supplied `Transport`
//! and logs every request, response and failure. Nothing is retried or
//! cached; errors are passed through unchanged.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::BillClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::types::{Bill, BillId, NewBill};

/// Remote bill operations as seen by `BillStore`.
#[async_trait]
pub trait BillApi: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Bill>, ApiError>;

    /// Match semantics are up to the server.
    async fn list_by_customer(&self, customer_name: &str) -> Result<Vec<Bill>, ApiError>;

    /// Direction is up to the server.
    async fn list_sorted(&self) -> Result<Vec<Bill>, ApiError>;

    async fn create(&self, bill: &NewBill) -> Result<Option<Bill>, ApiError>;

    async fn delete(&self, id: &BillId) -> Result<(), ApiError>;
}

#[derive(Debug, Clone)]
pub struct BillGateway<T> {
    client: BillClient,
    transport: T,
}

impl<T: Transport> BillGateway<T> {
    pub fn new(client: BillClient, transport: T) -> Self {
        Self { client, transport }
    }

    pub fn client(&self) -> &BillClient {
        &self.client
    }

    /// Run one round-trip and parse it, logging on the way in and out.
    async fn round_trip<R>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(&BillClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        let method = request.method;
        let url = request.url.clone();
        debug!(%method, %url, "starting request");

        let result = match self.transport.execute(request).await {
            Ok(response) => {
                debug!(status = response.status, body = %response.body, "response");
                parse(&self.client, response)
            }
            Err(e) => Err(e),
        };
        if let Err(e) = &result {
            warn!(%method, %url, error = %e, "api error");
        }
        result
    }
}

#[async_trait]
impl<T: Transport> BillApi for BillGateway<T> {
    async fn list_all(&self) -> Result<Vec<Bill>, ApiError> {
        let req = self.client.build_list_all();
        self.round_trip(req, BillClient::parse_list).await
    }

    async fn list_by_customer(&self, customer_name: &str) -> Result<Vec<Bill>, ApiError> {
        let req = self.client.build_list_by_customer(customer_name);
        self.round_trip(req, BillClient::parse_list).await
    }

    async fn list_sorted(&self) -> Result<Vec<Bill>, ApiError> {
        let req = self.client.build_list_sorted();
        self.round_trip(req, BillClient::parse_list).await
    }

    async fn create(&self, bill: &NewBill) -> Result<Option<Bill>, ApiError> {
        let req = self.client.build_create(bill)?;
        self.round_trip(req, BillClient::parse_create).await
    }

    async fn delete(&self, id: &BillId) -> Result<(), ApiError> {
        let req = self.client.build_delete(id);
        self.round_trip(req, BillClient::parse_delete).await
    }
}
