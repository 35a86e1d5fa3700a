//! Concurrently-mutable table of processes subscribed to a component
//! (§4.5 SubscriptionRegistry).

// Layer 1: Standard library
use std::collections::HashMap;
use std::sync::Arc;

// Layer 2: Third-party
use dashmap::DashMap;
use tokio::sync::{mpsc, Notified, Notify};

// Layer 3: Internal
use crate::message::{MessageOffer, SendGrant};
use crate::monitoring::{ComponentEvent, ComponentEventKind, Monitor, NoopMonitor};
use crate::predicate::Predicate;
use crate::send::SendRequest;
use crate::util::ProcessId;

/// A single subscribed process's inbox for offers plus its cancellation
/// signal.
///
/// Grounded on the teacher's `broker/registry.rs` actor-registration entry:
/// a `DashMap` value that the registry can mutate without routing through a
/// select loop, so subscribe/unsubscribe take effect immediately rather than
/// waiting for the Coordinator to notice an event.
struct ProcessEntry<P: Predicate> {
    offers: mpsc::Sender<MessageOffer<P>>,
    cancel: Arc<Notify>,
}

/// Handle a subscribed process uses to receive offers and to unsubscribe.
///
/// Dropping the handle does *not* unsubscribe by itself; call
/// [`Subscription::unsubscribe`] explicitly so a dispatch currently racing
/// this process's offer is told to stop waiting (§4.5, "unsubscribe during
/// offer" race).
pub struct Subscription<P: Predicate, M: Monitor<ComponentEvent> = NoopMonitor<ComponentEvent>> {
    process_id: ProcessId,
    registry: SubscriptionRegistry<P, M>,
    offers: mpsc::Receiver<MessageOffer<P>>,
    cancel: Arc<Notify>,
    send_requests: mpsc::Sender<SendRequest<P>>,
    attribute_update: Arc<Notify>,
}

impl<P: Predicate, M: Monitor<ComponentEvent>> Subscription<P, M> {
    /// This subscription's assigned process id.
    pub fn process_id(&self) -> ProcessId {
        self.process_id
    }

    /// Receive the next offer addressed to this process. Returns `None` once
    /// the registry drops this process's sender (i.e. after unsubscribe).
    pub async fn next_offer(&mut self) -> Option<MessageOffer<P>> {
        self.offers.recv().await
    }

    /// Request to send, resolving once the `SendCoordinator` has reserved an
    /// id and the ordering engine has granted this process its turn.
    ///
    /// Returns `None` if the Coordinator task is no longer running.
    pub async fn want_to_send(&self) -> Option<SendGrant<P>> {
        let (reply, rx) = tokio::sync::oneshot::channel();
        let request = SendRequest {
            process_id: self.process_id,
            reply,
        };
        self.send_requests.send(request).await.ok()?;
        rx.await.ok()
    }

    /// A handle for the component's attribute-store update broadcast (§9
    /// Design Notes, "update broadcast via Notify").
    ///
    /// Call this *before* inspecting whatever attribute state prompted the
    /// wait, then `.await` the returned handle afterwards — `Notify::notified`
    /// captures this instant's notification count at creation, so a commit
    /// that lands between the call and the `.await` is not missed (the
    /// "capture-before-check" rule).
    pub fn update_event(&self) -> Notified<'_> {
        self.attribute_update.notified()
    }

    /// Remove this process from the registry, waking any in-flight dispatch
    /// that is currently racing an offer against this process's cancel
    /// signal.
    pub async fn unsubscribe(&self) {
        self.registry.unsubscribe(self.process_id).await;
        self.cancel.notify_waiters();
    }
}

/// The set of processes currently subscribed to a component, keyed by
/// [`ProcessId`] so iteration order reflects subscribe order even though
/// `DashMap` itself has no ordering guarantee.
///
/// Cheap to clone: the inner map is `Arc`-shared, the same M-SERVICES-CLONE
/// idiom the teacher uses for its monitors.
#[derive(Clone)]
pub struct SubscriptionRegistry<P: Predicate, M: Monitor<ComponentEvent> = NoopMonitor<ComponentEvent>>
{
    entries: Arc<DashMap<ProcessId, ProcessEntry<P>>>,
    send_requests: mpsc::Sender<SendRequest<P>>,
    attribute_update: Arc<Notify>,
    monitor: M,
}

impl<P: Predicate, M: Monitor<ComponentEvent>> SubscriptionRegistry<P, M> {
    /// An empty registry whose subscribers submit send requests to
    /// `send_requests` — the receiving half the Coordinator task polls
    /// alongside its dispatch handoff channel. `attribute_update` is the
    /// same broadcast `Notify` the Dispatcher and SendCoordinator signal on
    /// commit, shared so every [`Subscription`] can observe it.
    pub fn new(
        send_requests: mpsc::Sender<SendRequest<P>>,
        attribute_update: Arc<Notify>,
        monitor: M,
    ) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            send_requests,
            attribute_update,
            monitor,
        }
    }

    /// Register a new subscriber, returning its handle.
    ///
    /// `offer_buffer` bounds how many undelivered offers may queue for this
    /// process before the dispatcher backs up waiting on it.
    pub fn subscribe(&self, process_id: ProcessId, offer_buffer: usize) -> Subscription<P, M> {
        let (tx, rx) = mpsc::channel(offer_buffer);
        let cancel = Arc::new(Notify::new());
        self.entries.insert(
            process_id,
            ProcessEntry {
                offers: tx,
                cancel: Arc::clone(&cancel),
            },
        );
        Subscription {
            process_id,
            registry: self.clone(),
            offers: rx,
            cancel,
            send_requests: self.send_requests.clone(),
            attribute_update: Arc::clone(&self.attribute_update),
        }
    }

    /// Remove a process from the registry. A no-op if already absent.
    pub async fn unsubscribe(&self, process_id: ProcessId) {
        self.entries.remove(&process_id);
        self.record(ComponentEventKind::ProcessUnsubscribed { process_id })
            .await;
    }

    /// Number of currently subscribed processes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry currently has no subscribers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of subscriber ids in insertion order, used by the
    /// Dispatcher to offer a message to one process at a time (§4.3).
    pub(crate) fn snapshot(&self) -> Vec<ProcessId> {
        let mut ids: Vec<ProcessId> = self.entries.iter().map(|e| *e.key()).collect();
        ids.sort_unstable();
        ids
    }

    /// Offer a message to a specific process, returning `None` if it has
    /// since unsubscribed.
    pub(crate) fn sender_for(
        &self,
        process_id: ProcessId,
    ) -> Option<(mpsc::Sender<MessageOffer<P>>, Arc<Notify>)> {
        self.entries
            .get(&process_id)
            .map(|e| (e.offers.clone(), Arc::clone(&e.cancel)))
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

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default)]
    struct AlwaysTrue;
    impl Predicate for AlwaysTrue {}

    fn registry() -> SubscriptionRegistry<AlwaysTrue> {
        let (send_requests, _rx) = mpsc::channel(1);
        SubscriptionRegistry::new(send_requests, Arc::new(Notify::new()), NoopMonitor::new())
    }

    #[tokio::test]
    async fn subscribe_then_unsubscribe_removes_from_snapshot() {
        let registry = registry();
        let sub = registry.subscribe(ProcessId::new(0), 4);
        assert_eq!(registry.len(), 1);
        sub.unsubscribe().await;
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn snapshot_reflects_subscribe_order_by_id() {
        let registry = registry();
        let _a = registry.subscribe(ProcessId::new(2), 4);
        let _b = registry.subscribe(ProcessId::new(1), 4);
        assert_eq!(
            registry.snapshot(),
            vec![ProcessId::new(1), ProcessId::new(2)]
        );
    }

    #[tokio::test]
    async fn unsubscribe_wakes_cancel_waiters() {
        let registry = registry();
        let sub = registry.subscribe(ProcessId::new(0), 4);
        let (_, cancel) = registry.sender_for(ProcessId::new(0)).unwrap();
        let waiter = tokio::spawn(async move { cancel.notified().await });
        // give the spawned task a chance to register as a waiter
        tokio::task::yield_now().await;
        sub.unsubscribe().await;
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn sender_for_missing_process_is_none() {
        let registry = registry();
        assert!(registry.sender_for(ProcessId::new(0)).is_none());
    }

    #[tokio::test]
    async fn want_to_send_forwards_a_request_carrying_this_process_id() {
        let (send_requests, mut rx) = mpsc::channel(1);
        let registry = SubscriptionRegistry::new(
            send_requests,
            Arc::new(Notify::new()),
            NoopMonitor::new(),
        );
        let sub = registry.subscribe(ProcessId::new(7), 4);

        let requester = tokio::spawn(async move { sub.want_to_send().await });
        let request = rx.recv().await.unwrap();
        assert_eq!(request.process_id, ProcessId::new(7));
        drop(request.reply);
        assert!(requester.await.unwrap().is_none());
    }

    // The handle returned by `update_event` captures the notification at
    // call time, so a `notify_waiters` racing the caller's state check —
    // fired before the handle is ever polled — is still observed (§9,
    // "capture-before-check").
    #[tokio::test]
    async fn update_event_sees_a_notification_fired_before_it_is_awaited() {
        let (send_requests, _rx) = mpsc::channel(1);
        let attribute_update = Arc::new(Notify::new());
        let registry = SubscriptionRegistry::new(
            send_requests,
            Arc::clone(&attribute_update),
            NoopMonitor::new(),
        );
        let sub = registry.subscribe(ProcessId::new(0), 4);

        let handle = sub.update_event();
        attribute_update.notify_waiters();
        tokio::time::timeout(std::time::Duration::from_millis(50), handle)
            .await
            .expect("captured handle must observe the notification");
    }
}
