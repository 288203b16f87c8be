//! Progress event types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The kind of progress event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    TaskStatusChanged,
    TaskCompleted,
    PhaseCompleted,
    CheckpointTriggered,
    MilestoneCompleted,
}

/// A progress event emitted after a successful state change.
///
/// Must be Clone for `tokio::sync::broadcast`. Subscribers filter by
/// `plan_id` and `kind` on their side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressEvent {
    pub kind: EventKind,
    /// Plan the event belongs to
    pub plan_id: Uuid,
    /// Id of the task, phase, milestone or checkpoint that changed
    pub entity_id: String,
    /// Optional payload with event data (e.g. new status, unblocked tasks)
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl ProgressEvent {
    /// Create a new event with the current timestamp.
    pub fn new(kind: EventKind, plan_id: Uuid, entity_id: impl Into<String>) -> Self {
        Self {
            kind,
            plan_id,
            entity_id: entity_id.into(),
            payload: serde_json::Value::Null,
            timestamp: Utc::now(),
        }
    }

    /// Attach a payload.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_kind_serde_roundtrip() {
        let variants = vec![
            EventKind::TaskStatusChanged,
            EventKind::TaskCompleted,
            EventKind::PhaseCompleted,
            EventKind::CheckpointTriggered,
            EventKind::MilestoneCompleted,
        ];
        for variant in &variants {
            let json = serde_json::to_string(variant).unwrap();
            let parsed: EventKind = serde_json::from_str(&json).unwrap();
            assert_eq!(variant, &parsed);
        }
        assert_eq!(
            serde_json::to_string(&EventKind::CheckpointTriggered).unwrap(),
            "\"checkpoint_triggered\""
        );
    }

    #[test]
    fn test_progress_event_null_payload_omitted() {
        let event = ProgressEvent::new(EventKind::TaskCompleted, Uuid::new_v4(), "t1");
        let json = serde_json::to_string(&event).unwrap();
        assert!(!json.contains("\"payload\""));
    }

    #[test]
    fn test_progress_event_payload_roundtrip() {
        let event = ProgressEvent::new(EventKind::TaskStatusChanged, Uuid::new_v4(), "t1")
            .with_payload(serde_json::json!({"status": "in_progress"}));
        let json = serde_json::to_string(&event).unwrap();
        let parsed: ProgressEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.kind, EventKind::TaskStatusChanged);
        assert_eq!(parsed.payload["status"], "in_progress");
    }
}
