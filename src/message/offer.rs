//! The message offered to a subscribed process during dispatch (§4.3).

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use tokio::sync::oneshot;

// Layer 3: Internal
use super::types::InboundMessage;
use crate::attributes::AttributeStore;
use crate::predicate::Predicate;

/// A loan of the component's [`AttributeStore`] paired with the message
/// being offered, handed to exactly one subscribed process at a time.
///
/// The reply channel is embedded rather than kept on the `Subscription`
/// separately: a `MessageOffer` is a self-contained request/response round
/// trip, the same shape `MessageBroker::request` uses in the teacher crate.
/// The process mutates `attributes` directly via its `get`/`set` API, then
/// calls [`MessageOffer::respond`] to return both the (possibly mutated)
/// store and its accept/reject decision.
#[derive(Debug)]
pub struct MessageOffer<P: Predicate> {
    /// The loaned attribute store. Mutate freely before responding.
    pub attributes: AttributeStore,
    /// The message being offered.
    pub message: InboundMessage<P>,
    reply: oneshot::Sender<(AttributeStore, bool)>,
}

impl<P: Predicate> MessageOffer<P> {
    pub(crate) fn new(
        attributes: AttributeStore,
        message: InboundMessage<P>,
    ) -> (Self, oneshot::Receiver<(AttributeStore, bool)>) {
        let (reply, rx) = oneshot::channel();
        (
            Self {
                attributes,
                message,
                reply,
            },
            rx,
        )
    }

    /// Answer the offer: `accept` is the process's verdict, and the store
    /// travels back with whatever tentative writes the process made.
    ///
    /// Consumes `self` — an offer can be answered exactly once.
    pub fn respond(self, accept: bool) -> Result<(), AttributeStore> {
        self.reply
            .send((self.attributes, accept))
            .map_err(|(store, _)| store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::MessageId;

    #[derive(Debug, Clone, Default)]
    struct AlwaysTrue;
    impl Predicate for AlwaysTrue {}

    #[tokio::test]
    async fn respond_delivers_store_and_verdict() {
        let store = AttributeStore::with_initial([("x".to_string(), "1".to_string())]);
        let msg = InboundMessage::new(MessageId::new(0), "hi", AlwaysTrue);
        let (mut offer, rx) = MessageOffer::new(store, msg);
        offer.attributes.set("x", "2");
        offer.respond(true).unwrap();

        let (returned, accept) = rx.await.unwrap();
        assert!(accept);
        assert_eq!(returned.get("x"), ("2".to_string(), true));
    }

    #[tokio::test]
    async fn dropping_offer_without_responding_closes_the_channel() {
        let store = AttributeStore::new();
        let msg = InboundMessage::new(MessageId::new(0), "hi", AlwaysTrue);
        let (offer, rx) = MessageOffer::new(store, msg);
        drop(offer);
        assert!(rx.await.is_err());
    }
}
