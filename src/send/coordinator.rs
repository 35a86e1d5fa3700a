//! Coordinates a process's send request against the ordering engine and the
//! transport (§4.4 SendCoordinator).

// Layer 1: Standard library
use std::collections::HashMap;

// Layer 2: Third-party
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, Notify};

// Layer 3: Internal
use crate::attributes::AttributeStore;
use crate::dispatch::Dispatcher;
use crate::message::{InboundMessage, PredicateSubmission, SendGrant};
use crate::monitoring::{ComponentEvent, ComponentEventKind, Monitor};
use crate::ordering::OrderingHandle;
use crate::predicate::Predicate;
use crate::transport::TransportOutbound;
use crate::util::{MessageId, ProcessId};

/// A process's request to send, submitted through its [`crate::subscription::Subscription`]
/// and serviced by the Coordinator task's select loop.
pub struct SendRequest<P: Predicate> {
    pub(crate) process_id: ProcessId,
    pub(crate) reply: oneshot::Sender<SendGrant<P>>,
}

/// Error produced when the Coordinator task is no longer servicing sends.
#[derive(Debug, Error)]
#[error("send coordinator is no longer running")]
pub struct SendCoordinatorClosed;

/// Drives one send cycle: reserve an id, wait in line behind the ordering
/// engine, grant the loaned store to the requesting process, then commit or
/// roll back based on what it submits.
///
/// While waiting for clearance, [`SendCoordinator::handle_send`] must keep
/// servicing the dispatch handoff channel itself — the Coordinator task is
/// single-threaded and owns both the [`Dispatcher`] and the
/// [`AttributeStore`], so a send that blocks without also driving dispatch
/// would deadlock any message ordered ahead of it.
pub struct SendCoordinator<P: Predicate, T: TransportOutbound<P>, M: Monitor<ComponentEvent>> {
    transport: T,
    ordering: OrderingHandle<P>,
    attribute_update: Arc<Notify>,
    monitor: M,
}

impl<P: Predicate, T: TransportOutbound<P>, M: Monitor<ComponentEvent>> SendCoordinator<P, T, M> {
    /// Construct a coordinator over the given transport write half.
    pub fn new(
        transport: T,
        ordering: OrderingHandle<P>,
        attribute_update: Arc<Notify>,
        monitor: M,
    ) -> Self {
        Self {
            transport,
            ordering,
            attribute_update,
            monitor,
        }
    }

    /// Service one send request end to end, interleaving dispatch handoffs
    /// as needed while waiting for clearance.
    pub async fn handle_send(
        &mut self,
        request: SendRequest<P>,
        mut attributes: AttributeStore,
        dispatch_rx: &mut mpsc::Receiver<InboundMessage<P>>,
        dispatcher: &Dispatcher<P, M>,
    ) -> AttributeStore {
        let id = match self.transport.reserve_id().await {
            Ok(id) => id,
            Err(err) => {
                self.record(ComponentEventKind::TransportError {
                    message: err.to_string(),
                })
                .await;
                return attributes;
            }
        };
        self.record(ComponentEventKind::SendReserved {
            message_id: id,
            process_id: request.process_id,
        })
        .await;

        loop {
            tokio::select! {
                biased;
                result = self.ordering.wait_for_clearance(id) => {
                    if result.is_err() {
                        return attributes;
                    }
                    break;
                }
                Some(message) = dispatch_rx.recv() => {
                    attributes = dispatcher.dispatch(message, attributes).await;
                }
            }
        }
        self.record(ComponentEventKind::SendCleared { message_id: id })
            .await;

        let (grant, outcome_rx) = SendGrant::new(attributes);
        if request.reply.send(grant).is_err() {
            // The requesting process vanished with the grant already handed
            // over; the reserved id must still be consumed so the
            // infrastructure's sequence stays gap-free.
            self.ordering.notify_local_acceptance(id);
            return AttributeStore::new();
        }

        let (mut store, submission) = match outcome_rx.await {
            Ok(outcome) => outcome,
            Err(_) => (AttributeStore::new(), PredicateSubmission::Invalid),
        };

        match submission {
            PredicateSubmission::Send { payload, predicate } => {
                let outbound = crate::message::OutboundMessage::real(id, payload, predicate);
                if let Err(err) = self.transport.send(outbound).await {
                    self.record(ComponentEventKind::TransportError {
                        message: err.to_string(),
                    })
                    .await;
                }
                if store.commit() {
                    self.attribute_update.notify_waiters();
                }
                self.record(ComponentEventKind::SendCommitted { message_id: id })
                    .await;
            }
            PredicateSubmission::Invalid => {
                store.rollback();
                let outbound = crate::message::OutboundMessage::sentinel(id, P::default());
                if let Err(err) = self.transport.send(outbound).await {
                    self.record(ComponentEventKind::TransportError {
                        message: err.to_string(),
                    })
                    .await;
                }
                self.record(ComponentEventKind::SendSentinel { message_id: id })
                    .await;
            }
        }

        self.ordering.notify_local_acceptance(id);
        store
    }

    async fn record(&self, kind: ComponentEventKind) {
        let event = ComponentEvent {
            timestamp: chrono::Utc::now(),
            event_kind: kind,
            metadata: HashMap::new(),
        };
        let _ = self.monitor.record(event).await;
    }
}
