//! Shared in-memory transport double used by the integration tests. Mirrors
//! the unit-test doubles in `src/transport/mod.rs` and `src/ordering/reader.rs`,
//! but built against the public API since integration tests live outside the
//! crate boundary.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use airssys_rt::message::{InboundMessage, OutboundMessage};
use airssys_rt::transport::{Transport, TransportInbound, TransportOutbound};
use airssys_rt::util::MessageId;
use airssys_rt::Predicate;

/// A predicate with two values, used so tests can exercise both the
/// true-predicate commit path and the false-predicate sentinel path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TestPredicate {
    #[default]
    False,
    True,
}

impl Predicate for TestPredicate {
    fn is_false(&self) -> bool {
        matches!(self, TestPredicate::False)
    }
}

pub struct QueueInbound {
    queue: Mutex<VecDeque<InboundMessage<TestPredicate>>>,
}

#[async_trait]
impl TransportInbound<TestPredicate> for QueueInbound {
    async fn recv(&mut self) -> Option<InboundMessage<TestPredicate>> {
        loop {
            if let Some(message) = self.queue.lock().unwrap().pop_front() {
                return Some(message);
            }
            tokio::task::yield_now().await;
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("test transport closed")]
pub struct TestTransportError;

pub struct RecordingOutbound {
    next: u64,
    sent: Arc<Mutex<Vec<OutboundMessage<TestPredicate>>>>,
}

#[async_trait]
impl TransportOutbound<TestPredicate> for RecordingOutbound {
    type Error = TestTransportError;

    async fn reserve_id(&mut self) -> Result<MessageId, Self::Error> {
        let id = MessageId::new(self.next);
        self.next += 1;
        Ok(id)
    }

    async fn send(&mut self, message: OutboundMessage<TestPredicate>) -> Result<(), Self::Error> {
        self.sent.lock().unwrap().push(message);
        Ok(())
    }
}

pub struct MemoryTransport {
    start: MessageId,
    inbound: QueueInbound,
    outbound: RecordingOutbound,
}

impl Transport<TestPredicate> for MemoryTransport {
    type Inbound = QueueInbound;
    type Outbound = RecordingOutbound;

    fn split(self) -> (MessageId, Self::Inbound, Self::Outbound) {
        (self.start, self.inbound, self.outbound)
    }
}

/// Build a transport pre-loaded with `initial` inbound messages (in the order
/// given — the ordering engine only relies on each message's own id, the
/// arrival order need not match id order) whose outbound sends accumulate
/// into `sent` for inspection.
pub fn transport(
    initial: Vec<InboundMessage<TestPredicate>>,
    sent: Arc<Mutex<Vec<OutboundMessage<TestPredicate>>>>,
) -> MemoryTransport {
    MemoryTransport {
        start: MessageId::new(0),
        inbound: QueueInbound {
            queue: Mutex::new(VecDeque::from(initial)),
        },
        outbound: RecordingOutbound { next: 0, sent },
    }
}
