//! Offers inbound messages to subscribed processes in order (§4.3 Dispatcher).

pub mod dispatcher;

pub use dispatcher::Dispatcher;
