//! # agenthub
//!
//! Plugin infrastructure for agent-tool frameworks.
//!
//! Three components, each depended upon by the next:
//! - [`capabilities`] — declarative capability markers and the stateless
//!   scanner that discovers marked types and derives registration metadata
//! - [`registry`] — the concurrent, category-partitioned store mapping
//!   `(category, name)` to a live provider instance
//! - [`events`] — a typed publish/subscribe bus with synchronous and
//!   asynchronous delivery, per-listener failure isolation, and explicit
//!   lifecycle
//!
//! At startup, [`bootstrap`] iterates scanner results into the registry;
//! application code thereafter resolves providers by `(category, name)` and
//! exchanges domain events over the bus.

pub mod bootstrap;
pub mod capabilities;
pub mod events;
pub mod registry;

pub use capabilities::{CapabilityScanner, Marker, MarkerKind, TypeDescriptor};
pub use events::{Event, EventBus, ListenerId};
pub use registry::{ConfigurationError, Provider, ProviderRegistry, KNOWN_CATEGORIES};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
