//! Inbound events and the request envelope.
//!
//! A [`SkillEvent`] is what the invocation mechanism delivers for one turn:
//! the session block plus a [`RequestEnvelope`] tagged by `type`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::session::Session;

/// One inbound turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    pub session: Session,

    pub request: RequestEnvelope,
}

impl SkillEvent {
    pub fn new(session: Session, request: RequestEnvelope) -> Self {
        Self {
            version: Some("1.0".into()),
            session,
            request,
        }
    }
}

/// What triggered the current turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum RequestEnvelope {
    LaunchRequest(LaunchRequest),
    IntentRequest(IntentRequest),
    SessionEndedRequest(SessionEndedRequest),
}

impl RequestEnvelope {
    pub fn request_id(&self) -> &str {
        match self {
            Self::LaunchRequest(r) => &r.request_id,
            Self::IntentRequest(r) => &r.request_id,
            Self::SessionEndedRequest(r) => &r.request_id,
        }
    }

    /// The wire name of the request type.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::LaunchRequest(_) => "LaunchRequest",
            Self::IntentRequest(_) => "IntentRequest",
            Self::SessionEndedRequest(_) => "SessionEndedRequest",
        }
    }

    pub fn launch(request_id: impl Into<String>) -> Self {
        Self::LaunchRequest(LaunchRequest {
            request_id: request_id.into(),
            timestamp: None,
            locale: None,
        })
    }

    pub fn intent(request_id: impl Into<String>, intent: Intent) -> Self {
        Self::IntentRequest(IntentRequest {
            request_id: request_id.into(),
            timestamp: None,
            locale: None,
            intent,
        })
    }

    pub fn session_ended(request_id: impl Into<String>, reason: Option<String>) -> Self {
        Self::SessionEndedRequest(SessionEndedRequest {
            request_id: request_id.into(),
            timestamp: None,
            locale: None,
            reason,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    pub intent: Intent,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    /// Why the platform closed the session (e.g. `USER_INITIATED`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// A named user goal with its slot values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default)]
    pub slots: BTreeMap<String, Slot>,
}

impl Intent {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slots: BTreeMap::new(),
        }
    }

    pub fn with_slot(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        self.slots.insert(
            name.clone(),
            Slot {
                name,
                value: Some(value.into()),
            },
        );
        self
    }

    /// The filled value of a slot, if the user supplied one.
    pub fn slot_value(&self, name: &str) -> Option<&str> {
        self.slots
            .get(name)
            .and_then(|slot| slot.value.as_deref())
            .filter(|v| !v.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}
