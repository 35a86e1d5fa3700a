//! Inbound/outbound message shapes and the loan-carrying offer/grant types
//! exchanged between the Coordinator and a component's subscribed processes
//! (§3 DATA MODEL, §4.3, §4.4).

pub mod grant;
pub mod offer;
pub mod types;

pub use grant::{PredicateSubmission, SendGrant};
pub use offer::MessageOffer;
pub use types::{InboundMessage, OutboundMessage};
