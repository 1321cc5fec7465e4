//! Session descriptor: per-turn state passed in by the caller and echoed back.
//!
//! The attribute map is the only state threaded between turns. The caller
//! persists and restores it; this layer treats it as transient.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// The session block of an inbound event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub session_id: String,

    /// True on the first turn of a conversation.
    #[serde(rename = "new", default)]
    pub is_new: bool,

    pub application: Application,

    /// Free-form attributes carried from the previous turn.
    /// Missing or `null` normalizes to an empty map.
    #[serde(default)]
    pub attributes: SessionAttributes,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<SessionUser>,
}

impl Session {
    pub fn new(session_id: impl Into<String>, application_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            is_new: false,
            application: Application {
                application_id: application_id.into(),
            },
            attributes: SessionAttributes::default(),
            user: None,
        }
    }

    pub fn application_id(&self) -> &str {
        &self.application.application_id
    }

    /// Mark this as the first turn of the conversation.
    pub fn starting(mut self) -> Self {
        self.is_new = true;
        self
    }

    /// Seed an attribute (builder style, for constructing events).
    pub fn with_attribute(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key, value);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

/// The platform user, as reported by the platform. Not used for cross-turn
/// identity; skills keep their own identity in the attribute map.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: String,
}

/// Shared handle to the session's attribute map.
///
/// Values are kept as raw JSON so whatever the caller carried is echoed
/// back unchanged; skills read them through [`get`](Self::get) or impose
/// their own schema on [`get_value`](Self::get_value).
///
/// Cloning the handle shares the map: a handler that writes through its
/// copy is visible to the response context bound to the same session.
#[derive(Default)]
pub struct SessionAttributes {
    inner: Arc<Mutex<BTreeMap<String, Value>>>,
}

impl SessionAttributes {
    pub fn from_map(map: BTreeMap<String, Value>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(map)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, Value>> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Text form of an attribute. Strings come back verbatim, other values
    /// as their JSON text. `null` counts as absent.
    pub fn get(&self, key: &str) -> Option<String> {
        match self.lock().get(key)? {
            Value::Null => None,
            Value::String(text) => Some(text.clone()),
            other => Some(other.to_string()),
        }
    }

    /// The raw carried value.
    pub fn get_value(&self, key: &str) -> Option<Value> {
        self.lock().get(key).cloned()
    }

    /// Insert or overwrite an attribute, returning the previous value.
    pub fn insert(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.lock().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        self.lock().remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Copy of the current map, read at call time.
    pub fn snapshot(&self) -> BTreeMap<String, Value> {
        self.lock().clone()
    }

    /// Whether two handles share the same underlying map.
    pub fn shares_with(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Clone for SessionAttributes {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl PartialEq for SessionAttributes {
    fn eq(&self, other: &Self) -> bool {
        self.shares_with(other) || self.snapshot() == other.snapshot()
    }
}

impl std::fmt::Debug for SessionAttributes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.snapshot()).finish()
    }
}

impl From<BTreeMap<String, Value>> for SessionAttributes {
    fn from(map: BTreeMap<String, Value>) -> Self {
        Self::from_map(map)
    }
}

impl Serialize for SessionAttributes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.snapshot().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for SessionAttributes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
        Ok(Self::from_map(map.unwrap_or_default()))
    }
}
