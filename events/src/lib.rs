//! Shared event model and JSON codec for the visit push channel.
//!
//! This crate owns the wire representation of realtime events exchanged with
//! the push server. Every message is an envelope `{"event": <name>, "data": {...}}`
//! where `data` keys use the backend's camelCase spelling.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Error returned by [`decode_event`].
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The raw text is not a valid envelope, or its payload does not match the event.
    #[error("failed to decode event: {0}")]
    Decode(#[from] serde_json::Error),
    /// The envelope names an event this client does not understand.
    #[error("unknown event: {0}")]
    UnknownEvent(String),
}

/// Event names used on the wire.
pub mod names {
    pub const CONNECTED: &str = "connected";
    pub const START_LOCATION_SHARING: &str = "start_location_sharing";
    pub const LOCATION_UPDATE: &str = "location_update";
    pub const VISIT_STATUS_UPDATE: &str = "visit_status_update";
}

/// Untyped envelope as it travels over the socket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Event name, e.g. `"location_update"`.
    pub event: String,
    /// Event payload.
    #[serde(default = "empty_object")]
    pub data: Value,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}

/// Server acknowledgment sent once the socket is authenticated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connected {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Announces that a teacher started sharing location for a visit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartLocationSharing {
    pub visit_id: String,
}

/// One position sample for a visit.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationUpdate {
    pub visit_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Accuracy radius in meters.
    pub accuracy: f64,
}

/// A visit moved to a new workflow status.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitStatusUpdate {
    pub visit_id: String,
    /// Wire status name, e.g. `"en_route"`.
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

/// Typed push-channel event.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Connected(Connected),
    StartLocationSharing(StartLocationSharing),
    LocationUpdate(LocationUpdate),
    VisitStatusUpdate(VisitStatusUpdate),
}

impl Event {
    /// Wire name of this event.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Connected(_) => names::CONNECTED,
            Self::StartLocationSharing(_) => names::START_LOCATION_SHARING,
            Self::LocationUpdate(_) => names::LOCATION_UPDATE,
            Self::VisitStatusUpdate(_) => names::VISIT_STATUS_UPDATE,
        }
    }

    /// Visit this event is scoped to, if any.
    #[must_use]
    pub fn visit_id(&self) -> Option<&str> {
        match self {
            Self::Connected(_) => None,
            Self::StartLocationSharing(e) => Some(&e.visit_id),
            Self::LocationUpdate(e) => Some(&e.visit_id),
            Self::VisitStatusUpdate(e) => Some(&e.visit_id),
        }
    }

    /// Convert into an untyped envelope.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Decode`] if the payload cannot be represented as JSON.
    pub fn to_envelope(&self) -> Result<Envelope, CodecError> {
        let data = match self {
            Self::Connected(e) => serde_json::to_value(e)?,
            Self::StartLocationSharing(e) => serde_json::to_value(e)?,
            Self::LocationUpdate(e) => serde_json::to_value(e)?,
            Self::VisitStatusUpdate(e) => serde_json::to_value(e)?,
        };
        Ok(Envelope { event: self.name().to_owned(), data })
    }

    /// Build a typed event from an envelope.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownEvent`] for unrecognized names and
    /// [`CodecError::Decode`] when the payload does not fit the named event.
    pub fn from_envelope(envelope: Envelope) -> Result<Self, CodecError> {
        let Envelope { event, data } = envelope;
        match event.as_str() {
            names::CONNECTED => Ok(Self::Connected(serde_json::from_value(data)?)),
            names::START_LOCATION_SHARING => Ok(Self::StartLocationSharing(serde_json::from_value(data)?)),
            names::LOCATION_UPDATE => Ok(Self::LocationUpdate(serde_json::from_value(data)?)),
            names::VISIT_STATUS_UPDATE => Ok(Self::VisitStatusUpdate(serde_json::from_value(data)?)),
            _ => Err(CodecError::UnknownEvent(event)),
        }
    }
}

/// Encode an event into its JSON text form.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] if serialization fails.
pub fn encode_event(event: &Event) -> Result<String, CodecError> {
    let envelope = event.to_envelope()?;
    Ok(serde_json::to_string(&envelope)?)
}

/// Decode JSON text into a typed event.
///
/// # Errors
///
/// Returns [`CodecError::Decode`] for malformed text or payloads and
/// [`CodecError::UnknownEvent`] for unrecognized event names.
pub fn decode_event(text: &str) -> Result<Event, CodecError> {
    let envelope: Envelope = serde_json::from_str(text)?;
    Event::from_envelope(envelope)
}

#[cfg(test)]
#[path = "lib_test.rs"]
mod tests;
