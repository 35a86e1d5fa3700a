//! Coordinates a process's send request against the ordering engine and the
//! transport (§4.4 SendCoordinator).

pub mod coordinator;

pub use coordinator::{SendCoordinator, SendCoordinatorClosed, SendRequest};
