//! Inbound and outbound message shapes (§3 DATA MODEL).

// Layer 1: Standard library
// (none)

// Layer 2: Third-party
// (none)

// Layer 3: Internal
use crate::predicate::Predicate;
use crate::util::MessageId;

/// A message delivered by the transport, already assigned its globally
/// ordered id.
#[derive(Debug, Clone)]
pub struct InboundMessage<P: Predicate> {
    /// The id assigned by the infrastructure.
    pub id: MessageId,
    /// The message body. Opaque to the core.
    pub payload: String,
    /// The predicate attached by the sender, evaluated by the recipient
    /// process (evaluation itself is out of scope).
    pub predicate: P,
}

impl<P: Predicate> InboundMessage<P> {
    /// Construct an inbound message.
    pub fn new(id: MessageId, payload: impl Into<String>, predicate: P) -> Self {
        Self {
            id,
            payload: payload.into(),
            predicate,
        }
    }
}

/// A message submitted to the transport for broadcast, carrying a reserved
/// id.
///
/// `invalid` outbound messages are the sentinel sends of §4.4 step 5: they
/// consume a reserved id a process chose not to use, keeping the
/// infrastructure's id sequence gap-free (§8 Law "Gap-fill").
#[derive(Debug, Clone)]
pub struct OutboundMessage<P: Predicate> {
    /// The reserved id this message consumes.
    pub id: MessageId,
    /// The message body; empty for sentinel sends.
    pub payload: String,
    /// The predicate attached to this send.
    pub predicate: P,
    /// Whether this is a sentinel (invalid) send rather than a real one.
    pub invalid: bool,
}

impl<P: Predicate> OutboundMessage<P> {
    /// A real outbound send.
    pub fn real(id: MessageId, payload: impl Into<String>, predicate: P) -> Self {
        Self {
            id,
            payload: payload.into(),
            predicate,
            invalid: false,
        }
    }

    /// A sentinel outbound send carrying the distinguished `False`
    /// predicate and an empty payload.
    pub fn sentinel(id: MessageId, predicate: P) -> Self {
        Self {
            id,
            payload: String::new(),
            predicate,
            invalid: true,
        }
    }
}
