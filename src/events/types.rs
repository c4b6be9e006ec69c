//! Domain event types published over the bus.
//!
//! A representative set of the lifecycle events the framework's components
//! emit. The bus itself places no constraint on payload shape; these structs
//! are plain serializable values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Emitted when a task is placed on a work queue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskQueuedEvent {
    pub task_id: String,
    /// Name of the queue the task was placed on.
    pub queue: String,
    pub enqueued_at: DateTime<Utc>,
}

impl TaskQueuedEvent {
    pub fn new(task_id: impl Into<String>, queue: impl Into<String>) -> Self {
        Self {
            task_id: task_id.into(),
            queue: queue.into(),
            enqueued_at: Utc::now(),
        }
    }
}

/// Emitted when a task finishes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskCompletedEvent {
    pub task_id: String,
    /// Task output, serialized as JSON.
    pub output: Value,
    pub completed_at: DateTime<Utc>,
}

impl TaskCompletedEvent {
    pub fn new(task_id: impl Into<String>, output: Value) -> Self {
        Self {
            task_id: task_id.into(),
            output,
            completed_at: Utc::now(),
        }
    }
}

/// Emitted when a whole workflow finishes, successfully or not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowCompletedEvent {
    pub workflow_id: String,
    pub succeeded: bool,
    pub completed_at: DateTime<Utc>,
}

impl WorkflowCompletedEvent {
    pub fn new(workflow_id: impl Into<String>, succeeded: bool) -> Self {
        Self {
            workflow_id: workflow_id.into(),
            succeeded,
            completed_at: Utc::now(),
        }
    }
}

/// Emitted by bootstrap after a provider lands in the registry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderRegisteredEvent {
    pub category: String,
    pub name: String,
    pub registered_at: DateTime<Utc>,
}

impl ProviderRegisteredEvent {
    pub fn new(category: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            name: name.into(),
            registered_at: Utc::now(),
        }
    }
}
