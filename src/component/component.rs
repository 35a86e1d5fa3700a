//! The public entry point: wires the Reader task, the Coordinator task and
//! the subscription registry into one running component (§2 SYSTEM OVERVIEW,
//! §4.6 State machine).

// Layer 1: Standard library
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// Layer 2: Third-party
use tokio::sync::{mpsc, Notify};
use tokio::task::JoinHandle;

// Layer 3: Internal
use super::config::ComponentConfig;
use super::error::ComponentError;
use crate::attributes::AttributeStore;
use crate::dispatch::Dispatcher;
use crate::message::InboundMessage;
use crate::monitoring::{ComponentEvent, ComponentEventKind, Monitor, NoopMonitor};
use crate::ordering::{self, OrderingHandle};
use crate::predicate::Predicate;
use crate::send::{SendCoordinator, SendRequest};
use crate::subscription::{Subscription, SubscriptionRegistry};
use crate::transport::Transport;
use crate::util::ProcessIdGenerator;

/// A running AbC component: a private attribute environment plus a set of
/// subscribed processes, coordinated against one transport connection
/// (§2 SYSTEM OVERVIEW).
///
/// `Component` is the handle subscribed processes and callers interact
/// with; the actual state lives in two long-lived tasks spawned by
/// [`Component::with_config_and_monitor`] — a Reader task owning the
/// [`ordering`](crate::ordering) engine and a Coordinator task owning the
/// [`AttributeStore`], the [`Dispatcher`] and the [`SendCoordinator`]
/// (§5 CONCURRENCY & RESOURCE MODEL). `Component` itself is cheap to clone,
/// the same `Arc`-sharing idiom the teacher crate uses for its
/// `ActorSystem`.
pub struct Component<P, T, M = NoopMonitor<ComponentEvent>>
where
    P: Predicate,
    T: Transport<P>,
    M: Monitor<ComponentEvent>,
{
    registry: SubscriptionRegistry<P, M>,
    ordering: OrderingHandle<P>,
    process_ids: Arc<ProcessIdGenerator>,
    started: Arc<AtomicBool>,
    config: ComponentConfig,
    monitor: M,
    // Keeps the Reader and Coordinator tasks alive for as long as any clone
    // of this handle exists; dropping the last clone lets them be dropped
    // too (they then wind down the next time their channels close).
    _reader: Arc<JoinHandle<()>>,
    _coordinator: Arc<JoinHandle<()>>,
    _transport: PhantomData<fn() -> T>,
}

impl<P, T, M> Clone for Component<P, T, M>
where
    P: Predicate,
    T: Transport<P>,
    M: Monitor<ComponentEvent>,
{
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            ordering: self.ordering.clone(),
            process_ids: Arc::clone(&self.process_ids),
            started: Arc::clone(&self.started),
            config: self.config.clone(),
            monitor: self.monitor.clone(),
            _reader: Arc::clone(&self._reader),
            _coordinator: Arc::clone(&self._coordinator),
            _transport: PhantomData,
        }
    }
}

impl<P, T, M> Component<P, T, M>
where
    P: Predicate,
    T: Transport<P>,
    M: Monitor<ComponentEvent>,
{
    /// Build a component with an explicit initial environment, configuration
    /// and monitor — the fully general constructor the two §6 "Component
    /// construction" entry points delegate to.
    pub fn with_config_and_monitor(
        initial: impl IntoIterator<Item = (String, String)>,
        transport: T,
        config: ComponentConfig,
        monitor: M,
    ) -> Result<Self, ComponentError> {
        config.validate()?;

        let (first_id, inbound, outbound) = transport.split();
        let (ordering, dispatch_rx, reader_join) = ordering::spawn::<P, _>(first_id, inbound);

        let attribute_update = Arc::new(Notify::new());
        let (send_requests_tx, send_requests_rx) = mpsc::channel(config.send_request_buffer);
        let registry = SubscriptionRegistry::new(
            send_requests_tx,
            Arc::clone(&attribute_update),
            monitor.clone(),
        );

        let dispatcher = Dispatcher::new(
            registry.clone(),
            ordering.clone(),
            Arc::clone(&attribute_update),
            monitor.clone(),
        );
        let send_coordinator = SendCoordinator::new(
            outbound,
            ordering.clone(),
            attribute_update,
            monitor.clone(),
        );
        let attributes = AttributeStore::with_initial(initial);

        let coordinator_join = tokio::spawn(run_coordinator(
            dispatcher,
            send_coordinator,
            dispatch_rx,
            send_requests_rx,
            attributes,
        ));

        Ok(Self {
            registry,
            ordering,
            process_ids: Arc::new(ProcessIdGenerator::new()),
            started: Arc::new(AtomicBool::new(false)),
            config,
            monitor,
            _reader: Arc::new(reader_join),
            _coordinator: Arc::new(coordinator_join),
            _transport: PhantomData,
        })
    }

    /// This component's current configuration.
    pub fn config(&self) -> &ComponentConfig {
        &self.config
    }

    /// Number of processes currently subscribed.
    pub fn subscriber_count(&self) -> usize {
        self.registry.len()
    }

    /// Subscribe a new process to this component (§4.5 subscribe).
    ///
    /// The first-ever call on a given component flips it to *started*
    /// (§3 Lifecycle), releasing any message or send buffered at id 0 for
    /// dispatch. Later calls are ordinary subscribes.
    pub async fn subscribe(&self) -> Subscription<P, M> {
        let process_id = self.process_ids.next_id();
        let subscription = self.registry.subscribe(process_id, self.config.offer_buffer);
        tracing::debug!(%process_id, "process subscribed");
        self.record(ComponentEventKind::ProcessSubscribed { process_id })
            .await;

        if !self.started.swap(true, Ordering::SeqCst) {
            self.ordering.start();
            tracing::info!("component started");
        }

        subscription
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

impl<P, T> Component<P, T, NoopMonitor<ComponentEvent>>
where
    P: Predicate,
    T: Transport<P>,
{
    /// Construct a component with an empty initial attribute environment
    /// (§6 EXTERNAL INTERFACES, "Component construction").
    pub fn new(transport: T) -> Result<Self, ComponentError> {
        Self::with_config_and_monitor(
            std::iter::empty(),
            transport,
            ComponentConfig::default(),
            NoopMonitor::new(),
        )
    }

    /// Construct a component with an initial environment given by a
    /// string→string map (§6 EXTERNAL INTERFACES, "Component construction").
    pub fn with_initial(
        initial: impl IntoIterator<Item = (String, String)>,
        transport: T,
    ) -> Result<Self, ComponentError> {
        Self::with_config_and_monitor(
            initial,
            transport,
            ComponentConfig::default(),
            NoopMonitor::new(),
        )
    }
}

/// The Coordinator task's main loop (§4.6): services dispatch handoffs from
/// the Reader and send requests from subscribed processes, one at a time
/// (invariant 5, §3 DATA MODEL).
async fn run_coordinator<P, T, M>(
    dispatcher: Dispatcher<P, M>,
    mut send_coordinator: SendCoordinator<P, T::Outbound, M>,
    mut dispatch_rx: mpsc::Receiver<InboundMessage<P>>,
    mut send_requests_rx: mpsc::Receiver<SendRequest<P>>,
    mut attributes: AttributeStore,
) where
    P: Predicate,
    T: Transport<P>,
    M: Monitor<ComponentEvent>,
{
    loop {
        tokio::select! {
            biased;

            maybe = dispatch_rx.recv() => {
                match maybe {
                    Some(message) => {
                        attributes = dispatcher.dispatch(message, attributes).await;
                    }
                    None => {
                        tracing::debug!("ordering engine closed, coordinator stopping");
                        break;
                    }
                }
            }
            maybe = send_requests_rx.recv() => {
                match maybe {
                    Some(request) => {
                        attributes = send_coordinator
                            .handle_send(request, attributes, &mut dispatch_rx, &dispatcher)
                            .await;
                    }
                    None => {
                        tracing::debug!("no subscribers left, coordinator stopping");
                        break;
                    }
                }
            }
        }
    }
}
