//! # Order Submission Client
//!
//! Turns a validated form into exactly one create-order request. The client
//! never retries and never re-validates: the session runs the validator first
//! and guarantees at most one submission in flight.

use crate::clients::order_service::{OrderService, ServiceError};
use crate::model::{FormFields, OrderCreate, OrderId};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// User-facing message for every submission failure.
pub const SUBMISSION_FAILED: &str = "Failed to create order. Please try again.";

/// Errors that can occur while creating an order.
///
/// Every variant displays the same user-facing message; the variant and its
/// source carry the detail for logs.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SubmissionError {
    /// The service call failed (transport, non-success status, bad body).
    #[error("Failed to create order. Please try again.")]
    Rejected {
        #[source]
        source: ServiceError,
    },

    /// The service reported success but the identifier was blank.
    #[error("Failed to create order. Please try again.")]
    MissingOrderId,
}

/// Client for the create-order operation.
#[derive(Clone)]
pub struct SubmissionClient {
    service: Arc<dyn OrderService>,
}

impl SubmissionClient {
    pub fn new(service: Arc<dyn OrderService>) -> Self {
        Self { service }
    }

    /// Submits the form once and returns the identifier assigned by the service.
    #[instrument(skip(self, form), fields(restaurant = %form.restaurant, dish = %form.dish))]
    pub async fn submit(&self, form: &FormFields) -> Result<OrderId, SubmissionError> {
        let payload = OrderCreate::from(form);
        debug!(?payload, "submit called");
        info!("Sending create_order to service");

        match self.service.create_order(&payload).await {
            Ok(id) if id.is_blank() => {
                warn!("Service returned a blank order id");
                Err(SubmissionError::MissingOrderId)
            }
            Ok(id) => {
                info!(order_id = %id, "Order created");
                Ok(id)
            }
            Err(source) => {
                warn!(error = %source, "create_order failed");
                Err(SubmissionError::Rejected { source })
            }
        }
    }
}
