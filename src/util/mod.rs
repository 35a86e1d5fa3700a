//! Utility types and helpers shared across the coordination core.

pub mod ids;
pub mod serde_helpers;

pub use ids::{MessageId, ProcessId, ProcessIdGenerator};
pub use serde_helpers::duration_serde;
