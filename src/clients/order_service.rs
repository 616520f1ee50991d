//! # Order Service Boundary
//!
//! The create-order and fetch-status endpoints are external collaborators. The
//! session only ever talks to them through the [`OrderService`] trait, which
//! keeps the HTTP transport ([`HttpOrderService`](crate::clients::HttpOrderService))
//! and the test double ([`MockOrderService`](crate::clients::mock::MockOrderService))
//! interchangeable.

use crate::model::{OrderCreate, OrderId};
use async_trait::async_trait;
use thiserror::Error;

/// Failures talking to the order service.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ServiceError {
    /// The request never produced a response (connection refused, reset, ...).
    #[error("Transport failure: {0}")]
    Transport(String),

    /// The service answered with a non-success status code.
    #[error("Unexpected HTTP status {0}")]
    Status(u16),

    /// The response body did not have the expected shape.
    #[error("Malformed response body: {0}")]
    Decode(String),

    /// The configured base URL cannot address the order endpoints.
    #[error("Invalid service URL: {0}")]
    InvalidUrl(String),
}

/// The two remote operations the order lifecycle depends on.
#[async_trait]
pub trait OrderService: Send + Sync + 'static {
    /// Sends one create-order request and returns the assigned identifier.
    async fn create_order(&self, order: &OrderCreate) -> Result<OrderId, ServiceError>;

    /// Fetches the current status string for `id`.
    async fn fetch_status(&self, id: &OrderId) -> Result<String, ServiceError>;
}
