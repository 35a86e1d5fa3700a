//! The Reader task: owns [`OrderingState`] and hands off exactly one
//! message at a time to the Coordinator (§4.2, §5 CONCURRENCY MODEL).

// Layer 1: Standard library
use std::sync::Arc;

// Layer 2: Third-party
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Notify};
use tokio::task::JoinHandle;

// Layer 3: Internal
use super::state::{AdvanceAction, OrderingState};
use crate::message::InboundMessage;
use crate::predicate::Predicate;
use crate::transport::TransportInbound;
use crate::util::MessageId;

/// The Reader task has shut down; any outstanding call against its handle
/// can no longer be serviced.
#[derive(Debug, Error)]
#[error("ordering engine reader task is no longer running")]
pub struct OrderingClosed;

/// Handle used by the Coordinator-side tasks ([`crate::dispatch::Dispatcher`],
/// [`crate::send::SendCoordinator`]) to feed events into the Reader task.
///
/// Cheap to clone: every field is itself a cheap-clone channel handle.
pub struct OrderingHandle<P: Predicate> {
    local_acceptance: mpsc::UnboundedSender<MessageId>,
    wait_for_clearance: mpsc::UnboundedSender<(MessageId, oneshot::Sender<()>)>,
    start: Arc<Notify>,
    _predicate: std::marker::PhantomData<P>,
}

impl<P: Predicate> Clone for OrderingHandle<P> {
    fn clone(&self) -> Self {
        Self {
            local_acceptance: self.local_acceptance.clone(),
            wait_for_clearance: self.wait_for_clearance.clone(),
            start: Arc::clone(&self.start),
            _predicate: std::marker::PhantomData,
        }
    }
}

impl<P: Predicate> OrderingHandle<P> {
    /// Announce that `id` has been fully resolved — a dispatch completed or
    /// a cleared local send completed.
    pub fn notify_local_acceptance(&self, id: MessageId) {
        // The Reader task only ever shuts down once every handle (and the
        // transport) is gone, so a send failure here means the component is
        // already tearing down; there's nothing useful left to do.
        let _ = self.local_acceptance.send(id);
    }

    /// Register a reserved id as waiting for its turn, resolving once the
    /// ordering engine grants clearance.
    pub async fn wait_for_clearance(&self, id: MessageId) -> Result<(), OrderingClosed> {
        let (tx, rx) = oneshot::channel();
        self.wait_for_clearance
            .send((id, tx))
            .map_err(|_| OrderingClosed)?;
        rx.await.map_err(|_| OrderingClosed)
    }

    /// Signal that the component has completed startup and message handling
    /// may begin (§4.6 state machine).
    pub fn start(&self) {
        self.start.notify_one();
    }
}

/// Spawn the Reader task, returning the handle used to feed it events and
/// the bounded(1) receiver the Coordinator polls for dispatch handoffs.
///
/// The dispatch channel's capacity is fixed at 1: this is what structurally
/// enforces invariant 5 (at most one dispatch in flight) without a separate
/// "dispatching" flag — once a message is handed off, `nid` cannot advance
/// again until [`OrderingHandle::notify_local_acceptance`] is called for it.
pub fn spawn<P, T>(
    first_id: MessageId,
    mut transport: T,
) -> (
    OrderingHandle<P>,
    mpsc::Receiver<InboundMessage<P>>,
    JoinHandle<()>,
)
where
    P: Predicate,
    T: TransportInbound<P> + 'static,
{
    let (local_acceptance_tx, mut local_acceptance_rx) = mpsc::unbounded_channel();
    let (wait_for_clearance_tx, mut wait_for_clearance_rx) = mpsc::unbounded_channel();
    let (dispatch_tx, dispatch_rx) = mpsc::channel(1);
    let start = Arc::new(Notify::new());

    let handle = OrderingHandle {
        local_acceptance: local_acceptance_tx,
        wait_for_clearance: wait_for_clearance_tx,
        start: Arc::clone(&start),
        _predicate: std::marker::PhantomData,
    };

    let join = tokio::spawn(async move {
        let mut state = OrderingState::<P>::new(first_id);
        let mut started = false;

        loop {
            tokio::select! {
                biased;

                _ = start.notified(), if !started => {
                    started = true;
                    state.start();
                    tracing::debug!("ordering engine started");
                }
                maybe = transport.recv() => {
                    match maybe {
                        Some(message) => state.receive(message),
                        None => {
                            tracing::debug!("transport inbound closed, reader task stopping");
                            break;
                        }
                    }
                }
                Some(id) = local_acceptance_rx.recv() => {
                    state.note_local_acceptance(id);
                }
                Some((id, reply)) = wait_for_clearance_rx.recv() => {
                    state.wait_for_clearance(id, reply);
                }
                else => break,
            }

            if let Some(action) = state.try_advance() {
                match action {
                    AdvanceAction::Dispatch(message) => {
                        if dispatch_tx.send(message).await.is_err() {
                            tracing::debug!("dispatch channel closed, reader task stopping");
                            break;
                        }
                    }
                    AdvanceAction::Clearance(reply) => {
                        let _ = reply.send(());
                    }
                }
            }
        }
    });

    (handle, dispatch_rx, join)
}
