//! Send authorisation handed to a process once clearance is granted (§4.4).

// Layer 1: Standard library
use std::mem;

// Layer 2: Third-party
use tokio::sync::oneshot;

// Layer 3: Internal
use crate::attributes::AttributeStore;
use crate::predicate::Predicate;

/// What a process decides to do with a send authorisation.
#[derive(Debug, Clone)]
pub enum PredicateSubmission<P: Predicate> {
    /// Transmit a real message with this payload and predicate.
    Send {
        /// The outbound message body.
        payload: String,
        /// The predicate attached to the send.
        predicate: P,
    },
    /// Decline to use the reserved id; the core will forward a sentinel
    /// (§4.4 step 5, §8 Law "Gap-fill").
    Invalid,
}

/// Authorisation to send, carrying the loaned [`AttributeStore`] and a
/// one-shot channel back to the `SendCoordinator`.
///
/// Obtained via `Subscription::want_to_send`, which only resolves once the
/// `OrderingEngine` has granted clearance for the reserved id.
#[derive(Debug)]
pub struct SendGrant<P: Predicate> {
    /// The loaned attribute store. Mutate tentatively before submitting.
    pub attributes: AttributeStore,
    outcome: oneshot::Sender<(AttributeStore, PredicateSubmission<P>)>,
}

impl<P: Predicate> SendGrant<P> {
    pub(crate) fn new(
        attributes: AttributeStore,
    ) -> (
        Self,
        oneshot::Receiver<(AttributeStore, PredicateSubmission<P>)>,
    ) {
        let (outcome, rx) = oneshot::channel();
        (
            Self {
                attributes,
                outcome,
            },
            rx,
        )
    }

    /// Submit the final decision for this send cycle. Consumes `self` — a
    /// grant can be submitted exactly once.
    pub fn submit(mut self, submission: PredicateSubmission<P>) -> Result<(), PredicateSubmission<P>> {
        let attrs = mem::take(&mut self.attributes);
        self.outcome
            .send((attrs, submission))
            .map_err(|(_, submission)| submission)
    }
}
