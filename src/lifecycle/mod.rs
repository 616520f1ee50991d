//! Runtime orchestration and lifecycle management.
//!
//! - [`OrderTrackerSystem`] - starts the session actor with its catalog and order service
//! - [`TrackerConfig`] - environment-driven configuration
//! - [`setup_tracing`] - initializes the tracing/logging infrastructure

pub mod config;
pub mod tracing;
pub mod tracker_system;

pub use self::config::*;
pub use self::tracing::*;
pub use self::tracker_system::*;
