//! Client core for the QuickBill bill service.
//!
//! # Overview
//! Two layers. `BillClient` builds `HttpRequest` values and parses
//! `HttpResponse` values without touching the network (host-does-IO); a
//! `BillGateway` pairs it with a host-supplied `Transport` to expose the five
//! remote operations as the async `BillApi`. `BillStore` is the view-model
//! on top: it holds the bill list and the pending form and applies optimistic
//! updates that are reconciled against the server.
//!
//! # Design
//! - `BillClient` is stateless, it holds only the resource root.
//! - Each remote operation is split into `build_*` and `parse_*`, so the I/O
//!   boundary is explicit and testable without a server.
//! - `BillStore` is generic over `BillApi`; tests drive it with scripted
//!   fakes.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod form;
pub mod gateway;
pub mod http;
pub mod store;
pub mod types;

pub use client::BillClient;
pub use config::GatewayConfig;
pub use error::{ApiError, FormError};
pub use form::{BillForm, Field};
pub use gateway::{BillApi, BillGateway};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use store::{BillStore, FailurePolicy, Operation, Outcome};
pub use types::{format_money, Bill, BillId, NewBill};
