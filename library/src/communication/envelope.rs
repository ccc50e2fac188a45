//! Wire format for messages that passed through a fan-out topic
//!
//! Messages published to a topic are wrapped in a [`DeliveryEnvelope`] before
//! being copied into the subscribed queues. The envelope carries the assigned
//! message identifier, the originating topic and any attributes while the
//! actual notification travels as a JSON string in the `Message` field.
//! Messages written directly into a queue skip the envelope and arrive as
//! plain JSON. [`decode`] accepts both shapes and tells them apart by the
//! presence of the `Message` field.

use super::event::{AttributeMap, MessageId};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::Deref;
use thiserror::Error;
use uuid::Uuid;

/// Envelope wrapped around messages that pass through a topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryEnvelope {
    /// Identifier assigned to the message when it was published
    #[serde(rename = "MessageId", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<MessageId>,
    /// Key of the topic the message was published to
    #[serde(rename = "Topic", default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    /// Notification payload, usually a JSON document encoded as a string
    #[serde(rename = "Message")]
    pub message: Value,
    /// Instant at which the message was published
    #[serde(rename = "Timestamp", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    /// Routing metadata attached by the publisher
    #[serde(rename = "Attributes", default, skip_serializing_if = "AttributeMap::is_empty")]
    pub attributes: AttributeMap,
}

impl DeliveryEnvelope {
    /// Wraps a serialized notification for fan-out from the given topic,
    /// assigning a fresh message identifier and publish timestamp
    pub fn wrap(topic: &str, payload: &str, attributes: AttributeMap) -> Self {
        Self {
            message_id: Some(Uuid::new_v4().to_string()),
            topic: Some(topic.to_owned()),
            message: Value::String(payload.to_owned()),
            timestamp: Some(Utc::now()),
            attributes,
        }
    }

    /// Serializes the envelope into its wire representation
    pub fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// Envelope metadata retained after a notification has been unwrapped
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryMetadata {
    /// Identifier assigned to the message when it was published
    pub message_id: Option<MessageId>,
    /// Key of the topic the message was published to
    pub topic: Option<String>,
    /// Instant at which the message was published
    pub timestamp: Option<DateTime<Utc>>,
    /// Routing metadata attached by the publisher
    pub attributes: AttributeMap,
}

/// Notification received from a queue together with how it got there
#[derive(Debug, PartialEq)]
pub enum Delivery<T> {
    /// Notification that was fanned out by a topic, with its envelope metadata
    Published {
        /// The unwrapped notification
        notification: T,
        /// Metadata carried by the envelope
        metadata: DeliveryMetadata,
    },
    /// Notification that was written into the queue directly
    Direct(T),
}

impl<T> Delivery<T> {
    /// Consumes the delivery, yielding the contained notification
    pub fn into_inner(self) -> T {
        match self {
            Self::Published { notification, .. } => notification,
            Self::Direct(notification) => notification,
        }
    }

    /// Envelope metadata, present when the notification passed through a topic
    pub fn metadata(&self) -> Option<&DeliveryMetadata> {
        match self {
            Self::Published { metadata, .. } => Some(metadata),
            Self::Direct(_) => None,
        }
    }
}

impl<T> Deref for Delivery<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        match self {
            Self::Published { notification, .. } => notification,
            Self::Direct(notification) => notification,
        }
    }
}

/// Failure modes when decoding a queue payload
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The payload is not valid JSON at all
    #[error("payload is not valid JSON")]
    Payload(#[source] serde_json::Error),
    /// The payload looked like an envelope but did not parse as one
    #[error("malformed delivery envelope")]
    Envelope(#[source] serde_json::Error),
    /// The (unwrapped) message did not match the expected notification schema
    #[error("notification does not match the expected schema")]
    Notification(#[source] serde_json::Error),
}

/// Decodes a queue payload into a [`Delivery`]
///
/// Payloads whose top-level JSON object contains a `Message` field are treated
/// as enveloped; the inner message is parsed a second time when it arrives as
/// a JSON string. Everything else is handed to the notification parser as-is.
pub fn decode<T>(payload: &[u8]) -> Result<Delivery<T>, DecodeError>
where
    T: DeserializeOwned,
{
    let value: Value = serde_json::from_slice(payload).map_err(DecodeError::Payload)?;

    let enveloped = value
        .as_object()
        .map(|object| object.contains_key("Message"))
        .unwrap_or(false);

    if enveloped {
        let envelope: DeliveryEnvelope =
            serde_json::from_value(value).map_err(DecodeError::Envelope)?;

        let notification = match &envelope.message {
            Value::String(inner) => {
                serde_json::from_str(inner).map_err(DecodeError::Notification)?
            }
            other => serde_json::from_value(other.clone()).map_err(DecodeError::Notification)?,
        };

        Ok(Delivery::Published {
            notification,
            metadata: DeliveryMetadata {
                message_id: envelope.message_id,
                topic: envelope.topic,
                timestamp: envelope.timestamp,
                attributes: envelope.attributes,
            },
        })
    } else {
        serde_json::from_value(value)
            .map(Delivery::Direct)
            .map_err(DecodeError::Notification)
    }
}

#[cfg(test)]
mod does {
    use super::*;
    use crate::communication::event::AttributeValue;
    use pretty_assertions::assert_eq;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Ping {
        sequence: u32,
    }

    #[test]
    fn decode_direct_payloads() {
        let delivery = decode::<Ping>(br#"{"sequence": 42}"#).unwrap();

        assert_eq!(delivery, Delivery::Direct(Ping { sequence: 42 }));
        assert!(delivery.metadata().is_none());
    }

    #[test]
    fn unwrap_enveloped_payloads() {
        let payload = br#"{
            "MessageId": "d430cd73-4129-4747-80e4-5a5b97aa5844",
            "Topic": "pings",
            "Message": "{\"sequence\": 7}",
            "Timestamp": "2024-03-01T12:00:00Z"
        }"#;

        let delivery = decode::<Ping>(payload).unwrap();

        assert_eq!(*delivery, Ping { sequence: 7 });

        let metadata = delivery.metadata().unwrap();
        assert_eq!(metadata.topic.as_deref(), Some("pings"));
        assert_eq!(
            metadata.message_id.as_deref(),
            Some("d430cd73-4129-4747-80e4-5a5b97aa5844")
        );
    }

    #[test]
    fn unwrap_envelopes_with_structured_messages() {
        let payload = br#"{"Message": {"sequence": 3}}"#;
        let delivery = decode::<Ping>(payload).unwrap();

        assert_eq!(*delivery, Ping { sequence: 3 });
    }

    #[test]
    fn preserve_envelope_attributes() {
        let payload = br#"{
            "Message": "{\"sequence\": 1}",
            "Attributes": {"priority": "high", "weight": 0.5}
        }"#;

        let delivery = decode::<Ping>(payload).unwrap();
        let attributes = &delivery.metadata().unwrap().attributes;

        assert_eq!(
            attributes.get("priority"),
            Some(&AttributeValue::String("high".into()))
        );
        assert_eq!(
            attributes.get("weight"),
            Some(&AttributeValue::Number(0.5))
        );
    }

    #[test]
    fn reject_invalid_json() {
        assert!(matches!(
            decode::<Ping>(b"not json"),
            Err(DecodeError::Payload(_))
        ));
    }

    #[test]
    fn reject_garbled_inner_messages() {
        let payload = br#"{"Message": "not json"}"#;

        assert!(matches!(
            decode::<Ping>(payload),
            Err(DecodeError::Notification(_))
        ));
    }

    #[test]
    fn survive_a_wrap_unwrap_cycle() {
        let notification = serde_json::to_string(&Ping { sequence: 9 }).unwrap();
        let envelope = DeliveryEnvelope::wrap("pings", &notification, AttributeMap::new());
        let encoded = envelope.encode().unwrap();

        let delivery = decode::<Ping>(&encoded).unwrap();

        assert_eq!(*delivery, Ping { sequence: 9 });
        assert_eq!(delivery.metadata().unwrap().topic.as_deref(), Some("pings"));
    }
}
