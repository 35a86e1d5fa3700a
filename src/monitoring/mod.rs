//! # Monitoring Module
//!
//! Universal monitoring infrastructure for observing and tracking events across the
//! coordination core: dispatch cycles, send cycles, and subscription changes.
//!
//! ## Features
//! - **Generic Monitor<E> Trait**: Universal monitoring for any entity type
//! - **Zero-Cost Abstraction**: NoopMonitor compiles away when disabled
//! - **Lock-Free Recording**: Atomic counters for concurrent event tracking
//! - **Type Safety**: MonitoringEvent trait ensures compile-time correctness
//!
//! ## Event Types
//! - `ComponentEvent`: dispatch, send and subscription lifecycle events (§6 Logging)
//!
//! ## Examples
//! ```rust
//! use airssys_rt::monitoring::{InMemoryMonitor, Monitor, MonitoringConfig, ComponentEvent};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = MonitoringConfig::default();
//! let monitor = InMemoryMonitor::<ComponentEvent>::new(config);
//!
//! let snapshot = monitor.snapshot().await?;
//! assert_eq!(snapshot.total_events, 0);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod in_memory;
pub mod noop;
pub mod traits;
pub mod types;

pub use error::MonitoringError;
pub use in_memory::InMemoryMonitor;
pub use noop::NoopMonitor;
pub use traits::{EventSeverity, Monitor, MonitoringEvent};
pub use types::{ComponentEvent, ComponentEventKind, MonitoringConfig, MonitoringSnapshot};
