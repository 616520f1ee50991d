//! The session actor: sole owner of [`SessionState`].
//!
//! Three kinds of input reach the actor, and it handles them one at a time:
//!
//! - [`SessionRequest`]s from [`SessionClient`]s (form edits, submit, stop),
//! - [`PollEvent`]s from the status poller's timer and fetch tasks,
//! - the outcome of the create-order call, which runs in its own task.
//!
//! Every poll event passes [`StatusPoller::admit`] before it touches state, so
//! results from a stopped poll or an older tick are dropped here. After each
//! mutation the actor publishes a [`SessionSnapshot`] on a `watch` channel.
//!
//! A submission never blocks the loop. While it is in flight the session keeps
//! answering requests, refuses a second submit and can still be shut down.

use super::client::SessionClient;
use super::error::SessionError;
use super::message::{Response, SessionRequest};
use super::state::{SessionSnapshot, SessionState};
use crate::clients::{OrderService, SubmissionClient, SubmissionError};
use crate::model::{Catalog, OrderId};
use crate::polling::{PollError, PollEvent, PollEventKind, StatusPoller, DEFAULT_POLL_INTERVAL};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn, Instrument};

/// Polling behaviour of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSettings {
    pub interval: Duration,
    /// Statuses that end polling, compared trimmed and ASCII case-insensitively.
    /// Empty means poll until the session stops.
    pub terminal_statuses: Vec<String>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            terminal_statuses: Vec::new(),
        }
    }
}

impl PollSettings {
    pub fn is_terminal(&self, status: &str) -> bool {
        let status = status.trim();
        self.terminal_statuses
            .iter()
            .any(|terminal| terminal.trim().eq_ignore_ascii_case(status))
    }
}

/// Dependencies injected when the actor starts running.
#[derive(Clone)]
pub struct SessionContext {
    pub catalog: Arc<Catalog>,
    pub service: Arc<dyn OrderService>,
}

type SubmitOutcome = Result<OrderId, SubmissionError>;

/// The create-order call currently in flight and the caller waiting on it.
struct PendingSubmit {
    respond_to: Response<OrderId>,
    task: JoinHandle<()>,
}

pub struct SessionActor {
    receiver: mpsc::Receiver<SessionRequest>,
    updates: watch::Sender<SessionSnapshot>,
    buffer_size: usize,
    settings: PollSettings,
    state: SessionState,
    pending_submit: Option<PendingSubmit>,
}

impl SessionActor {
    pub fn new(buffer_size: usize, settings: PollSettings) -> (Self, SessionClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let (updates, snapshots) = watch::channel(SessionSnapshot::default());
        let actor = Self {
            receiver,
            updates,
            buffer_size,
            settings,
            state: SessionState::new(),
            pending_submit: None,
        };
        (actor, SessionClient::new(sender, snapshots))
    }

    /// Runs the event loop until a shutdown request arrives or every
    /// [`SessionClient`] is dropped.
    ///
    /// The poller is created here, with the injected service, and is stopped
    /// before the loop returns. A submission still in flight is aborted and its
    /// caller sees [`SessionError::ActorDropped`].
    pub async fn run(mut self, context: SessionContext) {
        let (events, mut event_rx) = mpsc::channel(self.buffer_size);
        let (submitted, mut submitted_rx) = mpsc::channel::<SubmitOutcome>(1);
        let mut poller = StatusPoller::new(context.service.clone(), self.settings.interval, events);
        let submission = SubmissionClient::new(context.service.clone());
        info!(
            interval_ms = poller.interval().as_millis() as u64,
            restaurants = context.catalog.len(),
            "Session started"
        );

        let mut shutdown_reply = None;
        loop {
            tokio::select! {
                msg = self.receiver.recv() => match msg {
                    Some(SessionRequest::Shutdown { respond_to }) => {
                        shutdown_reply = Some(respond_to);
                        break;
                    }
                    Some(msg) => {
                        self.handle_request(msg, &context.catalog, &submission, &submitted, &mut poller)
                    }
                    None => break,
                },
                Some(event) = event_rx.recv() => self.handle_poll_event(event, &mut poller),
                Some(outcome) = submitted_rx.recv() => self.finish_submit(outcome, &mut poller),
            }
        }

        if let Some(pending) = self.pending_submit.take() {
            warn!("Abandoning order submission in flight");
            pending.task.abort();
        }
        poller.stop();
        info!(order_id = ?self.state.order_id(), "Shutdown");
        if let Some(respond_to) = shutdown_reply {
            let _ = respond_to.send(Ok(()));
        }
    }

    fn handle_request(
        &mut self,
        msg: SessionRequest,
        catalog: &Catalog,
        submission: &SubmissionClient,
        submitted: &mpsc::Sender<SubmitOutcome>,
        poller: &mut StatusPoller,
    ) {
        match msg {
            SessionRequest::SetName { name, respond_to } => {
                debug!("SetName");
                self.state.set_name(name);
                self.publish(poller);
                let _ = respond_to.send(Ok(()));
            }
            SessionRequest::SelectRestaurant {
                restaurant,
                respond_to,
            } => {
                let result = self
                    .state
                    .select_restaurant(catalog, restaurant)
                    .map(|dishes| dishes.to_vec());
                match &result {
                    Ok(dishes) => {
                        debug!(
                            restaurant = %self.state.fields.restaurant,
                            dishes = dishes.len(),
                            "Restaurant selected"
                        );
                        self.publish(poller);
                    }
                    Err(e) => warn!(error = %e, "Restaurant rejected"),
                }
                let _ = respond_to.send(result);
            }
            SessionRequest::SelectDish { dish, respond_to } => {
                let result = self.state.select_dish(catalog, dish);
                match &result {
                    Ok(()) => {
                        debug!(dish = %self.state.fields.dish, "Dish selected");
                        self.publish(poller);
                    }
                    Err(e) => warn!(error = %e, "Dish rejected"),
                }
                let _ = respond_to.send(result);
            }
            SessionRequest::Validate { respond_to } => {
                let errors = self.state.run_validation();
                debug!(invalid = errors.len(), "Validate");
                self.publish(poller);
                let _ = respond_to.send(Ok(errors));
            }
            SessionRequest::Submit { respond_to } => {
                if let Err(e) = self.check_submit(poller) {
                    let _ = respond_to.send(Err(e));
                    return;
                }
                self.state.begin_attempt();
                let task = spawn_submission(submission.clone(), &self.state, submitted.clone());
                self.pending_submit = Some(PendingSubmit { respond_to, task });
                self.publish(poller);
            }
            SessionRequest::Snapshot { respond_to } => {
                let _ = respond_to.send(Ok(self.snapshot(poller)));
            }
            SessionRequest::StopTracking { respond_to } => {
                let stopped = poller.stop();
                if stopped {
                    self.publish(poller);
                }
                let _ = respond_to.send(Ok(stopped));
            }
            SessionRequest::Shutdown { respond_to } => {
                // Handled by the event loop before dispatch.
                let _ = respond_to.send(Ok(()));
            }
        }
    }

    /// Refuses a submit that must not reach the service. Validation runs last
    /// and is published either way.
    fn check_submit(&mut self, poller: &StatusPoller) -> Result<(), SessionError> {
        if let Some(id) = self.state.order_id() {
            warn!(order_id = %id, "Order already placed");
            return Err(SessionError::OrderAlreadyPlaced(id.clone()));
        }
        if self.pending_submit.is_some() {
            warn!("Submit refused, another one is in flight");
            return Err(SessionError::SubmissionInFlight);
        }

        let errors = self.state.run_validation();
        if !errors.is_empty() {
            info!(%errors, "Submit blocked by validation");
            self.publish(poller);
            return Err(SessionError::Invalid(errors));
        }
        Ok(())
    }

    fn finish_submit(&mut self, outcome: SubmitOutcome, poller: &mut StatusPoller) {
        let Some(pending) = self.pending_submit.take() else {
            debug!("Discarding submission outcome with no caller");
            return;
        };

        let result = match outcome {
            Ok(id) => {
                self.state.place_order(id.clone());
                poller.start(id.clone());
                Ok(id)
            }
            Err(e) => {
                self.state.record_error(e.to_string());
                Err(SessionError::Submission(e))
            }
        };
        self.publish(poller);
        let _ = pending.respond_to.send(result);
    }

    fn handle_poll_event(&mut self, event: PollEvent, poller: &mut StatusPoller) {
        if !poller.admit(&event) {
            return;
        }

        match event.kind {
            PollEventKind::TickStarted => {
                if !self.state.begin_attempt() {
                    return;
                }
                debug!(order_id = %event.order_id, seq = event.seq, "Cleared last error");
            }
            PollEventKind::Fetched(Ok(status)) => {
                if self.state.apply_status(status.clone()) {
                    info!(order_id = %event.order_id, seq = event.seq, %status, "Status updated");
                } else {
                    debug!(order_id = %event.order_id, seq = event.seq, "Status unchanged");
                }
                if self.settings.is_terminal(&status) {
                    info!(order_id = %event.order_id, %status, "Terminal status reached");
                    poller.stop();
                }
            }
            PollEventKind::Fetched(Err(source)) => {
                warn!(order_id = %event.order_id, seq = event.seq, error = %source, "Status fetch failed");
                self.state
                    .record_error(PollError::FetchFailed(source).to_string());
            }
        }
        self.publish(poller);
    }

    fn snapshot(&self, poller: &StatusPoller) -> SessionSnapshot {
        SessionSnapshot {
            state: self.state.clone(),
            polling: poller.is_polling(),
            submitting: self.pending_submit.is_some(),
        }
    }

    fn publish(&self, poller: &StatusPoller) {
        self.updates.send_replace(self.snapshot(poller));
    }
}

/// Sends the current form in its own task and reports back on `submitted`.
fn spawn_submission(
    submission: SubmissionClient,
    state: &SessionState,
    submitted: mpsc::Sender<SubmitOutcome>,
) -> JoinHandle<()> {
    let form = state.fields.clone();
    let span = tracing::info_span!("submission", restaurant = %form.restaurant);
    tokio::spawn(
        async move {
            let outcome = submission.submit(&form).await;
            if submitted.send(outcome).await.is_err() {
                debug!("Session gone, dropping submission outcome");
            }
        }
        .instrument(span),
    )
}
