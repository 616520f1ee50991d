//! Error types for the session actor.

use crate::clients::SubmissionError;
use crate::model::{OrderId, ValidationErrors};
use thiserror::Error;

/// Errors returned by session operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum SessionError {
    /// The form failed validation; nothing was sent.
    #[error("Form is invalid: {0}")]
    Invalid(ValidationErrors),

    /// The create-order request failed. The message is the user-facing one.
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// An order is already being tracked by this session.
    #[error("Order already placed: {0}")]
    OrderAlreadyPlaced(OrderId),

    /// A create-order request from this session has not resolved yet.
    #[error("Order submission already in progress")]
    SubmissionInFlight,

    /// The restaurant is not in the catalog.
    #[error("Unknown restaurant: {0}")]
    UnknownRestaurant(String),

    /// The dish is not offered by the selected restaurant.
    #[error("{restaurant} does not offer {dish}")]
    DishNotOffered { restaurant: String, dish: String },

    /// A dish was chosen before any restaurant.
    #[error("Select a restaurant before choosing a dish")]
    NoRestaurantSelected,

    #[error("Session actor closed")]
    ActorClosed,

    #[error("Session actor dropped response channel")]
    ActorDropped,
}
