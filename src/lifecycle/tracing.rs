//! # Observability & Tracing
//!
//! [`setup_tracing`] installs a compact `fmt` subscriber filtered by `RUST_LOG`.
//! Module targets are hidden (`with_target(false)`); the structured fields
//! (`order_id`, `token`, `seq`, `status`) carry the context instead.
//!
//! ## Usage Examples
//!
//! ```bash
//! # Submissions, status transitions and failures
//! RUST_LOG=info cargo run
//!
//! # Every tick, discarded stale responses and request payloads
//! RUST_LOG=debug cargo run
//!
//! # Only the poller
//! RUST_LOG=order_tracker::polling=debug cargo run
//! ```
//!
//! ## Workflow Trace Example
//!
//! **With `RUST_LOG=info`**:
//!
//! ```text
//! INFO Session started interval_ms=3000 restaurants=5
//! INFO submit: Sending submit to session
//! INFO submit: Sending create_order to service restaurant=Agadir dish=Classic Burger
//! INFO submit: Order created order_id=abc123 restaurant=Agadir dish=Classic Burger
//! INFO Polling started order_id=abc123 token=poll_1 interval_ms=3000
//! INFO Status updated order_id=abc123 seq=1 status=preparing
//! WARN Status fetch failed order_id=abc123 seq=2 error=Transport failure: connection refused
//! INFO Polling stopped order_id=abc123 token=poll_1
//! INFO Shutdown order_id=Some(OrderId("abc123"))
//! ```
//!
//! With `RUST_LOG=debug` the `Tick` of every period appears as well, together
//! with `Discarding out-of-order status response` whenever a slow fetch loses
//! the race against a later tick.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
