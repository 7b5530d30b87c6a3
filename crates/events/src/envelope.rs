use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use larder_core::{AggregateId, PodId};

use crate::Event;
use crate::bus::MessageFilter;

/// Envelope for an event, carrying pod + aggregate metadata.
///
/// This is the unit published on the bus after a mutation was accepted by the store.
///
/// - **Pod scoping** is carried via `pod_id`.
/// - `sequence_number` is the aggregate version after the event was applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: Uuid,
    pod_id: PodId,

    aggregate_id: AggregateId,
    aggregate_type: String,

    event_type: String,
    occurred_at: DateTime<Utc>,

    /// Aggregate version after applying this event.
    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        event_id: Uuid,
        pod_id: PodId,
        aggregate_id: AggregateId,
        aggregate_type: impl Into<String>,
        event_type: impl Into<String>,
        occurred_at: DateTime<Utc>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            pod_id,
            aggregate_id,
            aggregate_type: aggregate_type.into(),
            event_type: event_type.into(),
            occurred_at,
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    pub fn pod_id(&self) -> PodId {
        self.pod_id
    }

    pub fn aggregate_id(&self) -> AggregateId {
        self.aggregate_id
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: 'static> EventEnvelope<E> {
    /// Filter admitting only envelopes from one household.
    pub fn pod_filter(pod_id: PodId) -> MessageFilter<Self> {
        std::sync::Arc::new(move |envelope: &Self| envelope.pod_id == pod_id)
    }

    /// Filter admitting only envelopes whose aggregate type starts with `prefix`
    /// (`"inventory."` for everything that happens to list items).
    pub fn aggregate_filter(prefix: &'static str) -> MessageFilter<Self> {
        std::sync::Arc::new(move |envelope: &Self| envelope.aggregate_type.starts_with(prefix))
    }
}

impl EventEnvelope<JsonValue> {
    /// Wrap a typed domain event, serializing its payload to JSON.
    pub fn from_typed<T>(
        pod_id: PodId,
        aggregate_id: AggregateId,
        aggregate_type: impl Into<String>,
        sequence_number: u64,
        event: &T,
    ) -> Result<Self, serde_json::Error>
    where
        T: Event + Serialize,
    {
        Ok(Self::new(
            Uuid::now_v7(),
            pod_id,
            aggregate_id,
            aggregate_type,
            event.event_type(),
            event.occurred_at(),
            sequence_number,
            serde_json::to_value(event)?,
        ))
    }
}
