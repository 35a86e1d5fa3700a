//! Pure ordering state machine, driven by the Reader task (§4.2, §4.6).

// Layer 1: Standard library
use std::collections::BTreeMap;

// Layer 2: Third-party
use tokio::sync::oneshot;

// Layer 3: Internal
use crate::message::InboundMessage;
use crate::predicate::Predicate;
use crate::util::MessageId;

/// What the Reader task should do as a result of a state transition.
///
/// At most one action is ever produced per call to [`OrderingState::try_advance`]:
/// once `nid` is handed off — either to a dispatch or to a waiting local
/// send — it stays "in limbo" (removed from `inbox`, not resolved) until
/// the matching [`OrderingState::note_local_acceptance`] call, which is the
/// only thing that can advance `nid` again. This is what enforces invariant
/// 5 (at most one dispatch in flight) without a separate flag.
#[derive(Debug)]
pub(crate) enum AdvanceAction<P: Predicate> {
    /// Hand this message to the Dispatcher.
    Dispatch(InboundMessage<P>),
    /// Grant clearance to the process waiting to send `nid`.
    Clearance(oneshot::Sender<()>),
}

/// The ordering state for a single component: the next id due for handling
/// (`nid`), messages that arrived out of turn, ids already resolved, and at
/// most one local send waiting for its turn.
#[derive(Debug)]
pub(crate) struct OrderingState<P: Predicate> {
    nid: MessageId,
    inbox: BTreeMap<MessageId, InboundMessage<P>>,
    waited: Option<(MessageId, oneshot::Sender<()>)>,
    started: bool,
}

impl<P: Predicate> OrderingState<P> {
    /// A fresh ordering state starting at `first_id`. `started` is false
    /// until [`OrderingState::start`] is called — no message is handled
    /// before the component announces it is ready (§4.6 state machine).
    pub(crate) fn new(first_id: MessageId) -> Self {
        Self {
            nid: first_id,
            inbox: BTreeMap::new(),
            waited: None,
            started: false,
        }
    }

    /// Mark the component as started. Idempotent.
    pub(crate) fn start(&mut self) {
        self.started = true;
    }

    /// Record a message delivered by the transport, in whatever order it
    /// arrived.
    pub(crate) fn receive(&mut self, message: InboundMessage<P>) {
        self.inbox.insert(message.id, message);
    }

    /// Register a local send waiting for clearance on `id`. Overwrites any
    /// previous waiter — the `SendCoordinator` only ever has one send
    /// in flight per process's `want_to_send` call.
    pub(crate) fn wait_for_clearance(&mut self, id: MessageId, reply: oneshot::Sender<()>) {
        self.waited = Some((id, reply));
    }

    /// Acknowledge that `id` has been fully resolved — either a dispatch
    /// handed to the Coordinator completed, or a cleared local send
    /// completed. Advances `nid` if `id` was the one being awaited.
    pub(crate) fn note_local_acceptance(&mut self, id: MessageId) {
        if id == self.nid {
            self.nid = self.nid.next();
        }
    }

    /// Attempt to advance past the current `nid`. Returns `None` if nothing
    /// can proceed yet (not started, or `nid` is neither buffered nor
    /// awaited).
    pub(crate) fn try_advance(&mut self) -> Option<AdvanceAction<P>> {
        if !self.started {
            return None;
        }
        if let Some(message) = self.inbox.remove(&self.nid) {
            return Some(AdvanceAction::Dispatch(message));
        }
        if self.waited.as_ref().is_some_and(|(id, _)| *id == self.nid) {
            if let Some((_, reply)) = self.waited.take() {
                return Some(AdvanceAction::Clearance(reply));
            }
        }
        None
    }

    /// The id this state machine currently expects to handle next.
    #[cfg(test)]
    pub(crate) fn next_id(&self) -> MessageId {
        self.nid
    }
}
