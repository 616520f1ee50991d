//! # Order Tracker
//!
//! > **Place a food order and watch its status, one owned session at a time.**
//!
//! The user fills a three-field form (name, restaurant, dish), submits it once,
//! and the session then polls the order service every few seconds until it is
//! told to stop.
//!
//! ## 🏗️ Design
//!
//! ### One owner for all state
//! The form, the validation errors, the tracked order and the last error live in
//! a single [`SessionState`](session_actor::SessionState) owned by one Tokio task,
//! the session actor. Client calls and poll results both arrive as messages and
//! are processed sequentially, so nothing needs a lock.
//!
//! ### Polling with a cancellation handle
//! Arming the [`StatusPoller`](polling::StatusPoller) issues a
//! [`PollToken`](polling::PollToken). Every fetch result carries the token of
//! the poll that issued it plus a tick sequence number, and the actor checks
//! both before applying it. Stopping the poller aborts its timer and makes every
//! fetch still in flight inert.
//!
//! ### Late binding
//! The catalog and the order service are injected through
//! [`SessionActor::run`](session_actor::SessionActor::run), not at construction,
//! so tests can swap in [`MockOrderService`](clients::mock::MockOrderService).
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Data ([`model`])
//! The validated [`Catalog`](model::Catalog), the form and its pure
//! [`validate`](model::validate) function, and the order DTOs.
//!
//! ### 2. The Boundary ([`clients`])
//! The [`OrderService`](clients::OrderService) trait, its `reqwest`
//! implementation, the submission client and the mock.
//!
//! ### 3. The Scheduler ([`polling`])
//! The fixed-period timer, the per-tick fetch tasks and the stale-response guard.
//!
//! ### 4. The Owner ([`session_actor`])
//! The actor, its messages and the [`SessionClient`](session_actor::SessionClient)
//! handle the rest of the program talks to.
//!
//! ### 5. The Orchestrator ([`lifecycle`])
//! Configuration, tracing setup, and
//! [`OrderTrackerSystem`](lifecycle::OrderTrackerSystem), which starts the actor
//! and shuts it down.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! # Against a local order service on port 8000
//! RUST_LOG=info cargo run
//!
//! # Stop once the order is delivered
//! ORDER_TRACKER_TERMINAL_STATUSES=delivered RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod clients;
pub mod lifecycle;
pub mod model;
pub mod polling;
pub mod session_actor;
