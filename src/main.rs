//! # Order Tracker demo
//!
//! Lists the catalog, fills the form with the first restaurant and its first
//! dish, submits it to the configured order service and logs every status
//! change. It stops after a terminal status,
//! after [`MAX_UPDATES`] changes, or on Ctrl-C, and then shuts down gracefully.
//!
//! Configuration comes from the environment (see [`TrackerConfig`]); a
//! `.env.local` file in the working directory is loaded first if present.

use order_tracker::lifecycle::{setup_tracing, OrderTrackerSystem, TrackerConfig};
use order_tracker::session_actor::SessionClient;
use tracing::{error, info, warn, Instrument};

const MAX_UPDATES: usize = 20;

#[tokio::main]
async fn main() -> Result<(), String> {
    let _ = dotenvy::from_filename(".env.local");
    setup_tracing();

    let config = TrackerConfig::from_env().map_err(|e| e.to_string())?;
    info!(base_url = %config.base_url, "Starting order tracker");

    let system = OrderTrackerSystem::new(&config).map_err(|e| e.to_string())?;

    let restaurants: Vec<&str> = system.catalog.restaurants().collect();
    info!(?restaurants, "Catalog loaded");
    let restaurant = restaurants
        .first()
        .copied()
        .ok_or("Catalog has no restaurants")?;

    let span = tracing::info_span!("order_form", %restaurant);
    let placed = async {
        let session = &system.session;
        session.set_name("Ana").await?;
        let dishes = session.select_restaurant(restaurant).await?;
        info!(?dishes, "Menu loaded");
        match dishes.first() {
            Some(dish) => session.select_dish(dish.as_str()).await?,
            None => warn!("Restaurant has no dishes, submitting anyway"),
        }
        session.submit().await
    }
    .instrument(span)
    .await;

    match placed {
        Ok(order_id) => {
            info!(%order_id, "Order placed, tracking status");
            watch_status(&system.session).await;
        }
        Err(e) => error!(error = %e, "Order could not be placed"),
    }

    system.shutdown().await?;
    info!("Application completed successfully");
    Ok(())
}

async fn watch_status(session: &SessionClient) {
    let mut updates = session.subscribe();
    let mut last_status = None;
    let mut last_error = None;
    let mut changes = 0;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = updates.borrow_and_update().clone();
                let status = snapshot.state.order.map(|order| order.status);
                if status != last_status {
                    info!(status = ?status, "Order status");
                    last_status = status;
                    changes += 1;
                }
                if snapshot.state.last_error != last_error {
                    if let Some(message) = &snapshot.state.last_error {
                        warn!(%message, "Order tracking problem");
                    }
                    last_error = snapshot.state.last_error;
                }
                if !snapshot.polling {
                    info!("Polling finished");
                    break;
                }
                if changes >= MAX_UPDATES {
                    info!(changes, "Update limit reached");
                    break;
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }
}
