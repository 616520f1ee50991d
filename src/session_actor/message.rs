//! Messages accepted by the session actor.

use super::error::SessionError;
use super::SessionSnapshot;
use crate::model::{OrderId, ValidationErrors};
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by the session actor.
pub type Response<T> = oneshot::Sender<Result<T, SessionError>>;

#[derive(Debug)]
pub enum SessionRequest {
    SetName {
        name: String,
        respond_to: Response<()>,
    },
    SelectRestaurant {
        restaurant: String,
        respond_to: Response<Vec<String>>,
    },
    SelectDish {
        dish: String,
        respond_to: Response<()>,
    },
    Validate {
        respond_to: Response<ValidationErrors>,
    },
    Submit {
        respond_to: Response<OrderId>,
    },
    Snapshot {
        respond_to: Response<SessionSnapshot>,
    },
    StopTracking {
        respond_to: Response<bool>,
    },
    /// Ends the event loop even while other clients are still alive.
    Shutdown {
        respond_to: Response<()>,
    },
}
