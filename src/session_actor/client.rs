use super::error::SessionError;
use super::message::{Response, SessionRequest};
use super::state::SessionSnapshot;
use crate::model::{OrderId, ValidationErrors};
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, instrument};

/// Client for interacting with the session actor.
///
/// Cheap to clone. The actor stops once every clone is dropped or any clone
/// calls [`SessionClient::shutdown`].
#[derive(Clone)]
pub struct SessionClient {
    sender: mpsc::Sender<SessionRequest>,
    snapshots: watch::Receiver<SessionSnapshot>,
}

impl SessionClient {
    pub fn new(
        sender: mpsc::Sender<SessionRequest>,
        snapshots: watch::Receiver<SessionSnapshot>,
    ) -> Self {
        Self { sender, snapshots }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(Response<T>) -> SessionRequest,
    ) -> Result<T, SessionError> {
        let (respond_to, response) = oneshot::channel();
        self.sender
            .send(build(respond_to))
            .await
            .map_err(|_| SessionError::ActorClosed)?;
        response.await.map_err(|_| SessionError::ActorDropped)?
    }

    #[instrument(skip_all)]
    pub async fn set_name(&self, name: impl Into<String>) -> Result<(), SessionError> {
        let name = name.into();
        self.request(|respond_to| SessionRequest::SetName { name, respond_to })
            .await
    }

    /// Selects a restaurant and returns its dishes. The dish is always reset.
    #[instrument(skip_all)]
    pub async fn select_restaurant(
        &self,
        restaurant: impl Into<String>,
    ) -> Result<Vec<String>, SessionError> {
        let restaurant = restaurant.into();
        debug!(%restaurant, "select_restaurant called");
        self.request(|respond_to| SessionRequest::SelectRestaurant {
            restaurant,
            respond_to,
        })
        .await
    }

    #[instrument(skip_all)]
    pub async fn select_dish(&self, dish: impl Into<String>) -> Result<(), SessionError> {
        let dish = dish.into();
        debug!(%dish, "select_dish called");
        self.request(|respond_to| SessionRequest::SelectDish { dish, respond_to })
            .await
    }

    /// Re-runs validation, stores the result, and returns it without submitting.
    #[instrument(skip(self))]
    pub async fn validate(&self) -> Result<ValidationErrors, SessionError> {
        self.request(|respond_to| SessionRequest::Validate { respond_to })
            .await
    }

    /// Validates the form and, if it is clean, places the order.
    ///
    /// On success the session starts polling the new order's status.
    #[instrument(skip(self))]
    pub async fn submit(&self) -> Result<OrderId, SessionError> {
        info!("Sending submit to session");
        self.request(|respond_to| SessionRequest::Submit { respond_to })
            .await
    }

    #[instrument(skip(self))]
    pub async fn snapshot(&self) -> Result<SessionSnapshot, SessionError> {
        self.request(|respond_to| SessionRequest::Snapshot { respond_to })
            .await
    }

    /// Stops status polling. Returns whether polling was active.
    #[instrument(skip(self))]
    pub async fn stop_tracking(&self) -> Result<bool, SessionError> {
        self.request(|respond_to| SessionRequest::StopTracking { respond_to })
            .await
    }

    /// Stops the session: polling ends and a submission in flight is abandoned.
    ///
    /// Resolves once the actor has cleaned up. Requests sent afterwards fail
    /// with [`SessionError::ActorClosed`].
    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), SessionError> {
        info!("Sending shutdown to session");
        self.request(|respond_to| SessionRequest::Shutdown { respond_to })
            .await
    }

    /// A receiver that sees a new snapshot after every state change.
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }
}
