//! # Mock Order Service & Testing Guide
//!
//! `MockOrderService` implements [`OrderService`] entirely in memory. Tests queue
//! up the responses the service should give, hand the mock to a session, and
//! then assert on what the session did with them.
//!
//! ## When to use the mock vs the HTTP service
//!
//! | Feature | MockOrderService | HttpOrderService |
//! |---------|------------------|------------------|
//! | **Speed** | Instant (in-memory) | Real sockets |
//! | **Determinism** | Full, including in-flight fetches | Subject to the network stack |
//! | **Error Injection** | Easy (`return_err`) | Needs a misbehaving server |
//! | **Use Case** | Session and polling logic | Wire format and status handling |
//!
//! ## Expectations
//!
//! Expectations are consumed in FIFO order, one per call. A call that does not
//! match the next expectation is answered with a [`ServiceError::Transport`]
//! error and counted as unexpected, so a runaway poll loop shows up in
//! [`MockOrderService::verify`] instead of panicking inside a background task.
//!
//! ```rust
//! use order_tracker::clients::mock::MockOrderService;
//! use order_tracker::clients::{OrderService, ServiceError};
//! use order_tracker::model::{OrderCreate, OrderId};
//!
//! #[tokio::main]
//! async fn main() {
//!     let mock = MockOrderService::new();
//!     mock.expect_create().return_ok("abc123");
//!     mock.expect_status("abc123").return_err(ServiceError::Status(503));
//!
//!     let order = OrderCreate {
//!         name: "Ana".into(),
//!         restaurant: "Agadir".into(),
//!         dish: "Classic Burger".into(),
//!     };
//!     let id = mock.create_order(&order).await.unwrap();
//!     assert_eq!(id, OrderId::from("abc123"));
//!     assert!(mock.fetch_status(&id).await.is_err());
//!
//!     mock.verify();
//! }
//! ```
//!
//! ## In-flight calls
//!
//! [`StatusExpectationBuilder::return_pending`] and
//! [`CreateExpectationBuilder::return_pending`] hand back a `oneshot::Sender`.
//! The call stays in flight until the test sends a result through it (or drops
//! it, which resolves the call with a transport error). This is how the
//! teardown, overlap and hung-submission scenarios are driven.

use crate::clients::order_service::{OrderService, ServiceError};
use crate::model::{OrderCreate, OrderId};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// How an expectation resolves.
enum Reply<T> {
    Ready(Result<T, ServiceError>),
    Pending(oneshot::Receiver<Result<T, ServiceError>>),
}

impl<T> Reply<T> {
    async fn resolve(self) -> Result<T, ServiceError> {
        match self {
            Reply::Ready(result) => result,
            Reply::Pending(receiver) => receiver.await.unwrap_or_else(|_| {
                Err(ServiceError::Transport("pending reply dropped".into()))
            }),
        }
    }
}

/// Represents an expected call to the mock service.
enum Expectation {
    Create { reply: Reply<OrderId> },
    Status { id: OrderId, reply: Reply<String> },
}

#[derive(Default)]
struct MockState {
    expectations: VecDeque<Expectation>,
    create_calls: Vec<OrderCreate>,
    status_calls: Vec<OrderId>,
    unexpected: Vec<String>,
}

/// A mock order service with expectation tracking for fluent testing.
///
/// Cloning shares the same expectation queue and call log, so a test can keep
/// one handle while the session owns another.
#[derive(Clone, Default)]
pub struct MockOrderService {
    state: Arc<Mutex<MockState>>,
}

impl MockOrderService {
    /// Creates a new mock with no expectations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expects a `create_order` call.
    pub fn expect_create(&self) -> CreateExpectationBuilder {
        CreateExpectationBuilder {
            state: self.state.clone(),
        }
    }

    /// Expects a `fetch_status` call for `id`.
    pub fn expect_status(&self, id: impl Into<OrderId>) -> StatusExpectationBuilder {
        StatusExpectationBuilder {
            id: id.into(),
            state: self.state.clone(),
        }
    }

    /// Payloads of every `create_order` call, in order.
    pub fn create_calls(&self) -> Vec<OrderCreate> {
        self.state.lock().unwrap().create_calls.clone()
    }

    /// Number of `fetch_status` calls made so far.
    pub fn status_calls(&self) -> usize {
        self.state.lock().unwrap().status_calls.len()
    }

    /// Ids passed to `fetch_status`, in order.
    pub fn status_call_ids(&self) -> Vec<OrderId> {
        self.state.lock().unwrap().status_calls.clone()
    }

    /// Number of expectations not yet consumed.
    pub fn remaining(&self) -> usize {
        self.state.lock().unwrap().expectations.len()
    }

    /// Verifies that all expectations were met and nothing unexpected happened.
    pub fn verify(&self) {
        let state = self.state.lock().unwrap();
        if !state.expectations.is_empty() {
            panic!(
                "Not all expectations were met. {} remaining",
                state.expectations.len()
            );
        }
        if !state.unexpected.is_empty() {
            panic!("Unexpected calls: {:?}", state.unexpected);
        }
    }
}

#[async_trait]
impl OrderService for MockOrderService {
    async fn create_order(&self, order: &OrderCreate) -> Result<OrderId, ServiceError> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.create_calls.push(order.clone());
            match state.expectations.pop_front() {
                Some(Expectation::Create { reply }) => reply,
                other => {
                    if let Some(expectation) = other {
                        state.expectations.push_front(expectation);
                    }
                    state.unexpected.push(format!("create_order({:?})", order));
                    return Err(ServiceError::Transport("unexpected create_order call".into()));
                }
            }
        };

        reply.resolve().await
    }

    async fn fetch_status(&self, id: &OrderId) -> Result<String, ServiceError> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.status_calls.push(id.clone());
            match state.expectations.pop_front() {
                Some(Expectation::Status {
                    id: expected,
                    reply,
                }) if &expected == id => reply,
                other => {
                    if let Some(expectation) = other {
                        state.expectations.push_front(expectation);
                    }
                    state.unexpected.push(format!("fetch_status({})", id));
                    return Err(ServiceError::Transport("unexpected fetch_status call".into()));
                }
            }
        }; // Release lock before awaiting a pending reply

        reply.resolve().await
    }
}

/// Builder for `create_order` expectations.
pub struct CreateExpectationBuilder {
    state: Arc<Mutex<MockState>>,
}

impl CreateExpectationBuilder {
    /// Sets the expectation to return the given identifier.
    pub fn return_ok(self, id: impl Into<OrderId>) {
        self.push(Reply::Ready(Ok(id.into())));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ServiceError) {
        self.push(Reply::Ready(Err(error)));
    }

    /// Leaves the create call in flight until the returned sender is used.
    pub fn return_pending(self) -> oneshot::Sender<Result<OrderId, ServiceError>> {
        let (sender, receiver) = oneshot::channel();
        self.push(Reply::Pending(receiver));
        sender
    }

    fn push(self, reply: Reply<OrderId>) {
        let mut state = self.state.lock().unwrap();
        state.expectations.push_back(Expectation::Create { reply });
    }
}

/// Builder for `fetch_status` expectations.
pub struct StatusExpectationBuilder {
    id: OrderId,
    state: Arc<Mutex<MockState>>,
}

impl StatusExpectationBuilder {
    /// Sets the expectation to return the given status.
    pub fn return_ok(self, status: impl Into<String>) {
        self.push(Reply::Ready(Ok(status.into())));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: ServiceError) {
        self.push(Reply::Ready(Err(error)));
    }

    /// Leaves the fetch in flight until the returned sender is used.
    pub fn return_pending(self) -> oneshot::Sender<Result<String, ServiceError>> {
        let (sender, receiver) = oneshot::channel();
        self.push(Reply::Pending(receiver));
        sender
    }

    fn push(self, reply: Reply<String>) {
        let mut state = self.state.lock().unwrap();
        state.expectations.push_back(Expectation::Status { id: self.id, reply });
    }
}
