//! Represents the order being tracked by a session.
//!
//! The identifier is assigned by the order service and never changes; the
//! status is an opaque service-defined string that is overwritten on every
//! successful poll.

use crate::model::FormFields;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Status shown between order creation and the first successful poll.
pub const INITIAL_STATUS: &str = "Order created";

/// Opaque order identifier assigned by the order service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// True when the service handed back an empty or whitespace-only id.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for OrderId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for OrderId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    pub id: OrderId,
    pub status: String,
}

impl Order {
    /// Creates a freshly placed order with [`INITIAL_STATUS`].
    pub fn new(id: OrderId) -> Self {
        Self {
            id,
            status: INITIAL_STATUS.to_string(),
        }
    }
}

/// Payload for the create-order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderCreate {
    pub name: String,
    pub restaurant: String,
    pub dish: String,
}

impl From<&FormFields> for OrderCreate {
    fn from(fields: &FormFields) -> Self {
        Self {
            name: fields.name.clone(),
            restaurant: fields.restaurant.clone(),
            dish: fields.dish.clone(),
        }
    }
}

/// Body of a successful create-order response. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedOrder {
    pub id: OrderId,
}

/// Body of a successful status response. Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusBody {
    pub status: String,
}
