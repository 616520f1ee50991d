use super::config::TrackerConfig;
use crate::clients::{HttpOrderService, OrderService, ServiceError};
use crate::model::{Catalog, CatalogError};
use crate::session_actor::{SessionActor, SessionClient, SessionContext};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

/// Errors that prevent the system from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Order service error: {0}")]
    Service(#[from] ServiceError),
}

/// The runtime orchestrator for one order-tracking session.
///
/// `OrderTrackerSystem` is responsible for:
/// - **Wiring**: loading the catalog and building the order service
/// - **Lifecycle**: spawning the session actor and stopping it again
///
/// # Example
///
/// ```ignore
/// let system = OrderTrackerSystem::new(&TrackerConfig::from_env()?)?;
///
/// system.session.set_name("Ana").await?;
/// system.session.select_restaurant("Agadir").await?;
/// system.session.select_dish("Classic Burger").await?;
/// let order_id = system.session.submit().await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderTrackerSystem {
    /// Client for interacting with the session actor
    pub session: SessionClient,

    /// The catalog the session validates selections against
    pub catalog: Arc<Catalog>,

    handle: tokio::task::JoinHandle<()>,
}

impl OrderTrackerSystem {
    /// Loads the catalog, builds the HTTP order service and starts the session.
    ///
    /// Must be called inside a Tokio runtime.
    pub fn new(config: &TrackerConfig) -> Result<Self, StartupError> {
        let catalog = match &config.catalog_path {
            Some(path) => {
                info!(path = %path.display(), "Loading catalog");
                Catalog::load(path)?
            }
            None => Catalog::builtin(),
        };
        let service = HttpOrderService::new(&config.base_url)?;
        info!(base_url = %service.base_url(), "Order service configured");
        Ok(Self::with_service(config, catalog, Arc::new(service)))
    }

    /// Starts the session against any [`OrderService`], e.g. a mock in tests.
    pub fn with_service(
        config: &TrackerConfig,
        catalog: Catalog,
        service: Arc<dyn OrderService>,
    ) -> Self {
        let catalog = Arc::new(catalog);
        let (actor, session) = SessionActor::new(config.buffer_size, config.poll_settings());
        let handle = tokio::spawn(actor.run(SessionContext {
            catalog: catalog.clone(),
            service,
        }));

        Self {
            session,
            catalog,
            handle,
        }
    }

    /// Gracefully shuts the session down.
    ///
    /// The actor stops its poller, abandons any submission in flight and
    /// exits, even while clones of the client are held elsewhere. Fetches still
    /// in flight finish into a closed channel and never reach the state.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");
        if let Err(e) = self.session.shutdown().await {
            debug!(error = %e, "Session already stopped");
        }
        drop(self.session);

        if let Err(e) = self.handle.await {
            error!("Session task failed: {:?}", e);
            return Err(format!("Session task failed: {:?}", e));
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
