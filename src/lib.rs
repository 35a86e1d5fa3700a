//! # airssys-rt — the coordination core of an Attribute-based Communication (AbC) component
//!
//! AbC is a process-algebraic coordination model: autonomous **components**,
//! each pairing a private attribute environment with a behaviour made of
//! cooperating processes, communicate by multicast over a shared
//! infrastructure. A sender annotates each outgoing message with a
//! predicate over attributes; the infrastructure broadcasts the message to
//! every component, and each subscribed process independently decides
//! whether to accept it by evaluating its own receive guard.
//!
//! This crate is the per-component coordinator: the total-order delivery
//! engine that aligns locally observed send/receive events with the
//! infrastructure's global message-id sequence, the transactional attribute
//! store, and the process-dispatch protocol that offers an incoming message
//! to subscribers one at a time and serialises send authorisations.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use airssys_rt::component::Component;
//! use airssys_rt::predicate::Predicate;
//! use airssys_rt::transport::{Transport, TransportInbound, TransportOutbound};
//! use airssys_rt::message::{InboundMessage, OutboundMessage};
//! use airssys_rt::util::MessageId;
//! use async_trait::async_trait;
//!
//! #[derive(Debug, Clone, Default)]
//! struct AlwaysAccept;
//! impl Predicate for AlwaysAccept {}
//!
//! # struct MyInbound;
//! # #[async_trait]
//! # impl TransportInbound<AlwaysAccept> for MyInbound {
//! #     async fn recv(&mut self) -> Option<InboundMessage<AlwaysAccept>> { None }
//! # }
//! # struct MyOutbound;
//! # #[derive(Debug, thiserror::Error)]
//! # #[error("closed")]
//! # struct MyError;
//! # #[async_trait]
//! # impl TransportOutbound<AlwaysAccept> for MyOutbound {
//! #     type Error = MyError;
//! #     async fn reserve_id(&mut self) -> Result<MessageId, Self::Error> { Ok(MessageId::new(0)) }
//! #     async fn send(&mut self, _m: OutboundMessage<AlwaysAccept>) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MyTransport;
//! # impl Transport<AlwaysAccept> for MyTransport {
//! #     type Inbound = MyInbound;
//! #     type Outbound = MyOutbound;
//! #     fn split(self) -> (MessageId, Self::Inbound, Self::Outbound) {
//! #         (MessageId::new(0), MyInbound, MyOutbound)
//! #     }
//! # }
//! #
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let component = Component::with_initial(
//!     [("role".to_string(), "sensor".to_string())],
//!     MyTransport,
//! )?;
//!
//! let mut process = component.subscribe().await;
//! while let Some(offer) = process.next_offer().await {
//!     let accept = offer.message.payload.contains("ping");
//!     offer.respond(accept)?;
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Module Organization
//!
//! - [`attributes`] — the transactional attribute store (commit/rollback overlay)
//! - [`predicate`] — the opaque `Predicate` interface and the `False` sentinel
//! - [`message`] — inbound/outbound message shapes and the loaned-store offer/grant types
//! - [`ordering`] — the Reader task: aligns inbound, local-acceptance and clearance events by id
//! - [`subscription`] — the concurrently-mutable set of processes subscribed to a component
//! - [`dispatch`] — offers an inbound message to subscribers one at a time until one accepts
//! - [`send`] — reserves an id, waits for clearance, then commits or sends a sentinel
//! - [`transport`] — the boundary trait to the surrounding infrastructure
//! - [`monitoring`] — structured event recording for dispatch/send/subscription transitions
//! - [`component`] — the public `Component` handle wiring the above into two long-lived tasks
//! - [`util`] — `MessageId`, `ProcessId` and small serialization helpers
//!
//! # Architecture Principles
//!
//! - **Two long-lived tasks per component.** A Reader task owns the ordering
//!   engine; a Coordinator task owns the attribute store, the dispatcher and
//!   the send coordinator. They communicate only by channel — no shared
//!   mutable state except the attribute store, which only the Coordinator
//!   task ever mutates.
//! - **Strict id order.** The Reader task is the single point that decides
//!   what happens next for the current message id, which is what prevents a
//!   locally-initiated send from racing ahead of a lower-id inbound message.
//! - **Serial dispatch.** A message is offered to one subscriber at a time,
//!   stopping at the first acceptance; rejects roll back and move to the
//!   next subscriber. Exhausting every subscriber without an acceptance is a
//!   normal outcome, not an error.
//! - **Gap-free ids.** Every reserved send id is always consumed, by a real
//!   send or by a sentinel (`False`-predicate, empty payload) send, so the
//!   infrastructure's id sequence never develops a permanent hole.
//!
//! # Out of scope
//!
//! The network transport to the infrastructure server, predicate evaluation
//! semantics, and the process-behaviour language (actions, guards, parallel
//! composition) are external collaborators referenced only through their
//! interface contracts ([`transport::Transport`], [`predicate::Predicate`]).

pub mod attributes;
pub mod component;
pub mod dispatch;
pub mod message;
pub mod monitoring;
pub mod ordering;
pub mod predicate;
pub mod send;
pub mod subscription;
pub mod transport;
pub mod util;

// Re-export the most commonly used types at the crate root.
pub use attributes::AttributeStore;
pub use component::{Component, ComponentConfig, ComponentError};
pub use message::{InboundMessage, MessageOffer, OutboundMessage, PredicateSubmission, SendGrant};
pub use monitoring::{
    ComponentEvent, ComponentEventKind, EventSeverity, InMemoryMonitor, Monitor, MonitoringConfig,
    MonitoringError, MonitoringEvent, MonitoringSnapshot, NoopMonitor,
};
pub use predicate::{FalsePredicate, Predicate};
pub use subscription::Subscription;
pub use transport::{Transport, TransportInbound, TransportOutbound};
pub use util::{MessageId, ProcessId};

/// Convenience re-exports for the common case of wiring a new transport and
/// component type.
pub mod prelude {
    pub use crate::attributes::AttributeStore;
    pub use crate::component::{Component, ComponentConfig, ComponentError};
    pub use crate::message::{
        InboundMessage, MessageOffer, OutboundMessage, PredicateSubmission, SendGrant,
    };
    pub use crate::monitoring::{Monitor, NoopMonitor};
    pub use crate::predicate::{FalsePredicate, Predicate};
    pub use crate::subscription::Subscription;
    pub use crate::transport::{Transport, TransportInbound, TransportOutbound};
    pub use crate::util::{MessageId, ProcessId};
}
