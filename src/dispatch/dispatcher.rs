//! Offers an inbound message to subscribed processes one at a time until one
//! accepts, or every subscriber has declined (§4.3 Dispatcher).

// Layer 1: Standard library
use std::collections::HashMap;
use std::sync::Arc;

// Layer 2: Third-party
use tokio::sync::Notify;

// Layer 3: Internal
use crate::attributes::AttributeStore;
use crate::message::InboundMessage;
use crate::monitoring::{ComponentEvent, ComponentEventKind, Monitor};
use crate::ordering::OrderingHandle;
use crate::predicate::Predicate;
use crate::subscription::SubscriptionRegistry;

/// Offers messages to a component's subscribers in subscribe order,
/// stopping at the first acceptance.
///
/// Grounded on the teacher's `broker` request/response idiom: the offer is a
/// self-contained round trip (see [`crate::message::MessageOffer`]), and the
/// Dispatcher itself holds no per-offer state beyond the loop variables.
pub struct Dispatcher<P: Predicate, M: Monitor<ComponentEvent>> {
    registry: SubscriptionRegistry<P, M>,
    ordering: OrderingHandle<P>,
    attribute_update: Arc<Notify>,
    monitor: M,
}

impl<P: Predicate, M: Monitor<ComponentEvent>> Dispatcher<P, M> {
    /// Construct a dispatcher over the given registry and ordering handle.
    ///
    /// `attribute_update` is notified (`notify_waiters`) whenever an
    /// acceptance actually commits a change to the attribute store, so
    /// anything awaiting fresh attributes (§9 DESIGN NOTES, "update
    /// broadcast via Notify") wakes promptly.
    pub fn new(
        registry: SubscriptionRegistry<P, M>,
        ordering: OrderingHandle<P>,
        attribute_update: Arc<Notify>,
        monitor: M,
    ) -> Self {
        Self {
            registry,
            ordering,
            attribute_update,
            monitor,
        }
    }

    /// Run one dispatch cycle for `message`, loaning `attributes` to each
    /// subscriber in turn until one accepts.
    ///
    /// Always returns the (possibly mutated) store and always notifies
    /// [`OrderingHandle::notify_local_acceptance`] exactly once, win or
    /// lose — a message with no taker still consumes its turn (§8 Law
    /// "Gap-fill" applies to dispatch too: the ordering engine must advance
    /// regardless of outcome).
    pub async fn dispatch(
        &self,
        message: InboundMessage<P>,
        mut attributes: AttributeStore,
    ) -> AttributeStore {
        self.record(ComponentEventKind::DispatchStarted {
            message_id: message.id,
        })
        .await;

        for process_id in self.registry.snapshot() {
            let Some((sender, cancel)) = self.registry.sender_for(process_id) else {
                continue;
            };

            // Recovery snapshot only used if the process vanishes after the
            // offer is already in its mailbox — see DESIGN.md for why a
            // clone is the pragmatic choice here rather than the golden-path
            // move semantics the rest of the store uses.
            let fallback = attributes.clone();
            let (offer, reply_rx) = crate::message::MessageOffer::new(attributes, message.clone());

            attributes = match sender.send(offer).await {
                Ok(()) => {
                    tokio::select! {
                        biased;
                        result = reply_rx => match result {
                            Ok((mut store, true)) => {
                                if store.commit() {
                                    self.attribute_update.notify_waiters();
                                }
                                self.ordering.notify_local_acceptance(message.id);
                                self.record(ComponentEventKind::DispatchAccepted {
                                    message_id: message.id,
                                    process_id,
                                })
                                .await;
                                return store;
                            }
                            Ok((mut store, false)) => {
                                store.rollback();
                                store
                            }
                            Err(_) => fallback,
                        },
                        _ = cancel.notified() => fallback,
                    }
                }
                Err(_) => fallback,
            };
        }

        self.ordering.notify_local_acceptance(message.id);
        self.record(ComponentEventKind::DispatchRejectedByAll {
            message_id: message.id,
        })
        .await;
        attributes
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
