//! The boundary between a component and the outside infrastructure that
//! assigns ids and carries messages between components (§6 EXTERNAL
//! INTERFACES).

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
use async_trait::async_trait;

// Layer 3: Internal
use crate::message::{InboundMessage, OutboundMessage};
use crate::predicate::Predicate;
use crate::util::MessageId;

/// The read half of a [`Transport`]: delivers inbound messages in the order
/// the infrastructure assigned them.
///
/// Split out from [`Transport`] so the Reader task can own only this half
/// (§5 CONCURRENCY & RESOURCE MODEL) without also holding send capability.
#[async_trait]
pub trait TransportInbound<P: Predicate>: Send {
    /// Await the next inbound message. Returns `None` once the transport is
    /// permanently closed.
    async fn recv(&mut self) -> Option<InboundMessage<P>>;
}

/// The write half of a [`Transport`]: reserves ids and transmits outbound
/// messages, including the sentinel sends of §4.4 step 5.
#[async_trait]
pub trait TransportOutbound<P: Predicate>: Send {
    /// Error produced by a failed reservation or send.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Reserve the next id in the infrastructure's globally increasing
    /// sequence (§3 DATA MODEL).
    async fn reserve_id(&mut self) -> Result<MessageId, Self::Error>;

    /// Transmit an outbound message, real or sentinel.
    async fn send(&mut self, message: OutboundMessage<P>) -> Result<(), Self::Error>;
}

/// A connection to the surrounding infrastructure, split into independently
/// ownable read/write halves.
///
/// Bundling both halves behind one trait (rather than requiring callers to
/// assemble a reader and a writer separately) keeps [`crate::component::Component`]'s
/// generic parameter list to one type per concern, the same shape the
/// teacher crate's `MessageBroker<M>` parameter takes.
pub trait Transport<P: Predicate>: Send + 'static {
    /// The read half, handed to the Reader task.
    type Inbound: TransportInbound<P> + 'static;
    /// The write half, handed to the Coordinator task.
    type Outbound: TransportOutbound<P> + 'static;

    /// Consume the transport into its two independently-owned halves, plus
    /// the id this component should treat as its own starting point in the
    /// ordering sequence.
    fn split(self) -> (MessageId, Self::Inbound, Self::Outbound);
}
