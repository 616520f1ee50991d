//! # Status Polling Scheduler
//!
//! Once an order exists, the session asks the [`StatusPoller`] to track it. The
//! poller arms a timer task that fires every `interval` (the first tick one full
//! period after arming, never at t = 0) and spawns one status fetch per tick.
//!
//! ## States
//!
//! ```text
//! Idle --start(id)--> Polling { id, token } --stop()--> Idle
//!                        |  ^
//!                        +--+ start(other_id): stop, then re-arm with a new token
//! ```
//!
//! ## Tokens and sequence numbers
//!
//! Fetches never mutate session state directly. Every tick sends two
//! [`PollEvent`]s back to the session, both carrying the [`PollToken`] of the
//! poll that issued them and the tick's sequence number:
//!
//! - [`PollEventKind::TickStarted`] when the tick fires, before its fetch is sent,
//! - [`PollEventKind::Fetched`] when that fetch resolves.
//!
//! The session calls [`StatusPoller::admit`] before applying either:
//!
//! - a token that is not the active one (poll stopped or retargeted) is rejected,
//! - a sequence number at or below the last admitted one of the same kind is
//!   rejected, so a slow fetch can never overwrite the result of a later tick.
//!
//! Fetches are spawned independently of the timer, so a hung request only delays
//! its own tick. Stopping aborts the timer; fetches already in flight run to
//! completion and their events are rejected by the token check.

use crate::clients::{OrderService, ServiceError};
use crate::model::OrderId;
use std::fmt::Display;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, Instrument};

/// Polling period used when none is configured.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(3);

/// User-facing message for every failed status fetch.
pub const POLL_FAILED: &str = "Failed to fetch order status. Please refresh the page.";

/// A failed status fetch. Never stops polling.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PollError {
    #[error("Failed to fetch order status. Please refresh the page.")]
    FetchFailed(#[source] ServiceError),
}

/// Identifies one armed poll. A new token is issued every time polling starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PollToken(u64);

impl Display for PollToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "poll_{}", self.0)
    }
}

/// What happened on a tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEventKind {
    /// The tick fired; its fetch is about to be sent.
    TickStarted,
    /// The tick's fetch resolved.
    Fetched(Result<String, ServiceError>),
}

/// One tick's news, addressed back to the session.
#[derive(Debug)]
pub struct PollEvent {
    pub token: PollToken,
    pub seq: u64,
    pub order_id: OrderId,
    pub kind: PollEventKind,
}

/// Observable scheduler state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling { order_id: OrderId, token: PollToken },
}

struct ActivePoll {
    order_id: OrderId,
    token: PollToken,
    timer: JoinHandle<()>,
    last_started: u64,
    last_fetched: u64,
}

/// Owns the single polling timer of a session.
pub struct StatusPoller {
    service: Arc<dyn OrderService>,
    interval: Duration,
    events: mpsc::Sender<PollEvent>,
    next_token: u64,
    active: Option<ActivePoll>,
}

impl StatusPoller {
    /// Creates an idle poller. Fetch results are delivered on `events`.
    ///
    /// A zero interval is treated as one millisecond.
    pub fn new(
        service: Arc<dyn OrderService>,
        interval: Duration,
        events: mpsc::Sender<PollEvent>,
    ) -> Self {
        Self {
            service,
            interval: interval.max(Duration::from_millis(1)),
            events,
            next_token: 0,
            active: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn state(&self) -> PollState {
        match &self.active {
            Some(active) => PollState::Polling {
                order_id: active.order_id.clone(),
                token: active.token,
            },
            None => PollState::Idle,
        }
    }

    pub fn is_polling(&self) -> bool {
        self.active.is_some()
    }

    pub fn tracked_order(&self) -> Option<&OrderId> {
        self.active.as_ref().map(|active| &active.order_id)
    }

    /// Starts polling `order_id`.
    ///
    /// Tracking the same order again is a no-op that returns the current token.
    /// Tracking a different order stops the current poll first.
    pub fn start(&mut self, order_id: OrderId) -> PollToken {
        if let Some(active) = &self.active {
            if active.order_id == order_id {
                debug!(order_id = %order_id, token = %active.token, "Already polling");
                return active.token;
            }
        }
        self.stop();

        self.next_token += 1;
        let token = PollToken(self.next_token);
        let timer = tokio::spawn(run_timer(
            self.service.clone(),
            self.events.clone(),
            order_id.clone(),
            token,
            self.interval,
        ));
        info!(
            order_id = %order_id,
            %token,
            interval_ms = self.interval.as_millis() as u64,
            "Polling started"
        );
        self.active = Some(ActivePoll {
            order_id,
            token,
            timer,
            last_started: 0,
            last_fetched: 0,
        });
        token
    }

    /// Follows the tracked order id: `Some` (re)starts, `None` stops.
    pub fn retarget(&mut self, order_id: Option<OrderId>) -> Option<PollToken> {
        match order_id {
            Some(order_id) => Some(self.start(order_id)),
            None => {
                self.stop();
                None
            }
        }
    }

    /// Cancels the timer and returns to `Idle`. Returns whether a poll was active.
    pub fn stop(&mut self) -> bool {
        match self.active.take() {
            Some(active) => {
                active.timer.abort();
                info!(order_id = %active.order_id, token = %active.token, "Polling stopped");
                true
            }
            None => false,
        }
    }

    /// Decides whether `event` may be applied to session state.
    pub fn admit(&mut self, event: &PollEvent) -> bool {
        let active = match self.active.as_mut() {
            Some(active) if active.token == event.token => active,
            _ => {
                debug!(token = %event.token, seq = event.seq, "Discarding event from stopped poll");
                return false;
            }
        };

        let last = match event.kind {
            PollEventKind::TickStarted => &mut active.last_started,
            PollEventKind::Fetched(_) => &mut active.last_fetched,
        };
        if event.seq <= *last {
            debug!(
                token = %event.token,
                seq = event.seq,
                last = *last,
                "Discarding out-of-order status response"
            );
            return false;
        }
        *last = event.seq;
        true
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        if let Some(active) = self.active.take() {
            active.timer.abort();
        }
    }
}

async fn run_timer(
    service: Arc<dyn OrderService>,
    events: mpsc::Sender<PollEvent>,
    order_id: OrderId,
    token: PollToken,
    period: Duration,
) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut seq = 0;

    loop {
        ticker.tick().await;
        seq += 1;
        debug!(order_id = %order_id, %token, seq, "Tick");
        let started = PollEvent {
            token,
            seq,
            order_id: order_id.clone(),
            kind: PollEventKind::TickStarted,
        };
        if events.send(started).await.is_err() {
            break;
        }

        let service = service.clone();
        let events = events.clone();
        let order_id = order_id.clone();
        let span = tracing::debug_span!("status_fetch", order_id = %order_id, seq);
        tokio::spawn(
            async move {
                let outcome = service.fetch_status(&order_id).await;
                let _ = events
                    .send(PollEvent {
                        token,
                        seq,
                        order_id,
                        kind: PollEventKind::Fetched(outcome),
                    })
                    .await;
            }
            .instrument(span),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::mock::MockOrderService;

    fn poller(mock: &MockOrderService) -> (StatusPoller, mpsc::Receiver<PollEvent>) {
        let (tx, rx) = mpsc::channel(8);
        (
            StatusPoller::new(Arc::new(mock.clone()), DEFAULT_POLL_INTERVAL, tx),
            rx,
        )
    }

    fn fetched(token: PollToken, seq: u64) -> PollEvent {
        PollEvent {
            token,
            seq,
            order_id: OrderId::from("abc123"),
            kind: PollEventKind::Fetched(Ok("preparing".into())),
        }
    }

    fn started(token: PollToken, seq: u64) -> PollEvent {
        PollEvent {
            token,
            seq,
            order_id: OrderId::from("abc123"),
            kind: PollEventKind::TickStarted,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_tick_waits_one_full_period() {
        let mock = MockOrderService::new();
        mock.expect_status("abc123").return_ok("preparing");
        let (mut poller, mut events) = poller(&mock);

        let begin = Instant::now();
        let token = poller.start(OrderId::from("abc123"));

        tokio::time::sleep(Duration::from_millis(2_999)).await;
        assert_eq!(mock.status_calls(), 0, "no poll may fire at t=0");

        let tick = events.recv().await.unwrap();
        assert!(begin.elapsed() >= DEFAULT_POLL_INTERVAL);
        assert_eq!(tick.token, token);
        assert_eq!(tick.seq, 1);
        assert_eq!(tick.kind, PollEventKind::TickStarted);
        assert!(poller.admit(&tick));

        let first = events.recv().await.unwrap();
        assert_eq!(first.seq, 1);
        assert_eq!(first.kind, PollEventKind::Fetched(Ok("preparing".to_string())));
        assert!(poller.admit(&first));
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_keep_the_timer_armed() {
        let mock = MockOrderService::new();
        mock.expect_status("abc123")
            .return_err(ServiceError::Transport("connection reset".into()));
        mock.expect_status("abc123").return_ok("out for delivery");
        let (mut poller, mut events) = poller(&mock);
        poller.start(OrderId::from("abc123"));

        let kinds: Vec<(u64, PollEventKind)> = vec![
            events.recv().await.unwrap(),
            events.recv().await.unwrap(),
            events.recv().await.unwrap(),
            events.recv().await.unwrap(),
        ]
        .into_iter()
        .map(|event| (event.seq, event.kind))
        .collect();

        assert_eq!(
            kinds,
            vec![
                (1, PollEventKind::TickStarted),
                (
                    1,
                    PollEventKind::Fetched(Err(ServiceError::Transport("connection reset".into())))
                ),
                (2, PollEventKind::TickStarted),
                (2, PollEventKind::Fetched(Ok("out for delivery".into()))),
            ]
        );
        assert!(poller.is_polling());
        mock.verify();
    }

    #[tokio::test(start_paused = true)]
    async fn test_tick_start_is_announced_while_fetch_is_pending() {
        let mock = MockOrderService::new();
        let _hung = mock.expect_status("abc123").return_pending();
        let (mut poller, mut events) = poller(&mock);
        let token = poller.start(OrderId::from("abc123"));

        let tick = events.recv().await.unwrap();
        assert_eq!(tick.kind, PollEventKind::TickStarted);
        assert!(poller.admit(&tick));

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(mock.status_calls(), 1);
        assert!(events.try_recv().is_err(), "fetch still in flight");
        assert!(!poller.admit(&started(token, 1)), "duplicate start");
    }

    #[tokio::test(start_paused = true)]
    async fn test_stop_cancels_future_ticks() {
        let mock = MockOrderService::new();
        let (mut poller, mut events) = poller(&mock);
        poller.start(OrderId::from("abc123"));

        assert!(poller.stop());
        assert!(!poller.stop());
        assert_eq!(poller.state(), PollState::Idle);

        tokio::time::sleep(Duration::from_secs(30)).await;
        assert_eq!(mock.status_calls(), 0);
        assert!(events.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_start_same_order_keeps_token() {
        let mock = MockOrderService::new();
        let (mut poller, _events) = poller(&mock);

        let first = poller.start(OrderId::from("abc123"));
        let again = poller.start(OrderId::from("abc123"));
        assert_eq!(first, again);
        assert_eq!(
            poller.state(),
            PollState::Polling {
                order_id: OrderId::from("abc123"),
                token: first
            }
        );
    }

    #[tokio::test]
    async fn test_retarget_invalidates_previous_token() {
        let mock = MockOrderService::new();
        let (mut poller, _events) = poller(&mock);

        let old = poller.start(OrderId::from("abc123"));
        let new = poller.retarget(Some(OrderId::from("def456"))).unwrap();
        assert_ne!(old, new);
        assert_eq!(poller.tracked_order(), Some(&OrderId::from("def456")));
        assert!(!poller.admit(&fetched(old, 1)));
        assert!(!poller.admit(&started(old, 2)));
        assert!(poller.admit(&fetched(new, 1)));

        assert_eq!(poller.retarget(None), None);
        assert!(!poller.is_polling());
        assert!(!poller.admit(&fetched(new, 2)));
    }

    #[tokio::test]
    async fn test_admit_rejects_out_of_order_responses() {
        let mock = MockOrderService::new();
        let (mut poller, _events) = poller(&mock);
        let token = poller.start(OrderId::from("abc123"));

        assert!(poller.admit(&fetched(token, 2)));
        assert!(!poller.admit(&fetched(token, 1)), "older tick resolved late");
        assert!(!poller.admit(&fetched(token, 2)), "duplicate");
        assert!(poller.admit(&fetched(token, 3)));
    }

    #[tokio::test]
    async fn test_starts_and_fetches_are_sequenced_separately() {
        let mock = MockOrderService::new();
        let (mut poller, _events) = poller(&mock);
        let token = poller.start(OrderId::from("abc123"));

        assert!(poller.admit(&started(token, 1)));
        assert!(poller.admit(&started(token, 2)));
        // Tick 1's fetch resolving after tick 2 started is still the newest result
        assert!(poller.admit(&fetched(token, 1)));
        assert!(!poller.admit(&started(token, 2)));
        assert!(poller.admit(&fetched(token, 2)));
    }

    #[test]
    fn test_poll_error_message_is_fixed() {
        let err = PollError::FetchFailed(ServiceError::Status(502));
        assert_eq!(err.to_string(), POLL_FAILED);
    }
}
