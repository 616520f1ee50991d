//! Clients for the external order service.

pub mod http;
pub mod mock;
pub mod order_service;
pub mod submission;

pub use http::*;
pub use order_service::*;
pub use submission::*;
