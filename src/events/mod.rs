//! Event system for monitoring and extending framework behaviour.
//!
//! This module provides the publish/subscribe infrastructure that lets
//! components:
//! - React to task, workflow, and registration lifecycle moments
//! - Build custom logging and analytics without coupling to producers
//! - Choose per listener between synchronous (publisher-thread) and
//!   asynchronous (worker-pool) delivery

// ---------------------------------------------------------------------------
// Core infrastructure
// ---------------------------------------------------------------------------

/// The event bus implementation.
pub mod event_bus;

// ---------------------------------------------------------------------------
// Event type definitions
// ---------------------------------------------------------------------------

/// Domain-specific event type structs.
pub mod types;

// ---------------------------------------------------------------------------
// Convenience re-exports
// ---------------------------------------------------------------------------

pub use event_bus::{Event, EventBus, ListenerId};
pub use types::{
    ProviderRegisteredEvent, TaskCompletedEvent, TaskQueuedEvent, WorkflowCompletedEvent,
};
