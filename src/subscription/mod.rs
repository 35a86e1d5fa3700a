//! The set of processes subscribed to a component (§4.5 SubscriptionRegistry).

pub mod registry;

pub use registry::{Subscription, SubscriptionRegistry};
