//! Session actor: owns the form, the tracked order and the status poller.

pub mod actor;
pub mod client;
pub mod error;
pub mod message;
pub mod state;

pub use actor::*;
pub use client::*;
pub use error::*;
pub use state::*;
