//! Response envelope and the single-use response context.
//!
//! A [`ResponseContext`] is bound to one session and one completion slot.
//! Exactly one of its four terminal operations (`tell`, `tell_with_card`,
//! `ask`, `ask_with_card`) may succeed per request; later calls are
//! rejected with [`ResponseError::AlreadyCompleted`] and emit nothing.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::error::ResponseError;
use crate::session::{Session, SessionAttributes};
use crate::speech::{OutputSpeech, Speech};

/// Protocol version stamped on every envelope.
pub const RESPONSE_VERSION: &str = "1.0";

/// The single terminal output of one turn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,

    pub response: ResponseBody,

    /// Attributes to carry into the next turn. Omitted when empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_attributes: Option<BTreeMap<String, serde_json::Value>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBody {
    pub output_speech: OutputSpeech,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card: Option<Card>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reprompt: Option<Reprompt>,

    pub should_end_session: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Card {
    Simple { title: String, content: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}

/// Inputs for one envelope.
struct EnvelopeParts<'a> {
    output: Speech,
    reprompt: Option<Speech>,
    card: Option<(&'a str, &'a str)>,
    should_end_session: bool,
}

impl ResponseEnvelope {
    fn build(parts: EnvelopeParts<'_>, attributes: &SessionAttributes) -> Self {
        let reprompt = parts
            .reprompt
            .filter(|speech| !speech.is_empty())
            .map(|speech| Reprompt {
                output_speech: speech.into(),
            });

        let card = parts
            .card
            .filter(|(title, content)| !title.is_empty() && !content.is_empty())
            .map(|(title, content)| Card::Simple {
                title: title.to_string(),
                content: content.to_string(),
            });

        let snapshot = attributes.snapshot();
        Self {
            version: RESPONSE_VERSION.into(),
            response: ResponseBody {
                output_speech: parts.output.into(),
                card,
                reprompt,
                should_end_session: parts.should_end_session,
            },
            session_attributes: (!snapshot.is_empty()).then_some(snapshot),
        }
    }
}

/// Receiving half of a response context, held by the dispatcher.
pub type ResponseReceiver = oneshot::Receiver<ResponseEnvelope>;

struct Completion {
    request_id: String,
    attributes: SessionAttributes,
    sender: Mutex<Option<oneshot::Sender<ResponseEnvelope>>>,
}

/// Per-invocation response builder bound to one session.
///
/// Cheap to clone; all clones share the same completion slot, so a handler
/// may move a clone into a spawned task and complete the turn from there.
#[derive(Clone)]
pub struct ResponseContext {
    inner: Arc<Completion>,
}

impl ResponseContext {
    /// Create a context bound to `session`, plus the receiver that yields
    /// the one envelope it will emit.
    pub fn channel(request_id: impl Into<String>, session: &Session) -> (Self, ResponseReceiver) {
        let (tx, rx) = oneshot::channel();
        let ctx = Self {
            inner: Arc::new(Completion {
                request_id: request_id.into(),
                attributes: session.attributes.clone(),
                sender: Mutex::new(Some(tx)),
            }),
        };
        (ctx, rx)
    }

    /// Speak and end the session.
    pub fn tell(&self, speech: impl Into<Speech>) -> Result<(), ResponseError> {
        self.complete(EnvelopeParts {
            output: speech.into(),
            reprompt: None,
            card: None,
            should_end_session: true,
        })
    }

    /// Speak, attach a simple card, and end the session.
    pub fn tell_with_card(
        &self,
        speech: impl Into<Speech>,
        title: &str,
        content: &str,
    ) -> Result<(), ResponseError> {
        self.complete(EnvelopeParts {
            output: speech.into(),
            reprompt: None,
            card: Some((title, content)),
            should_end_session: true,
        })
    }

    /// Speak and keep the session open, with a reprompt.
    pub fn ask(
        &self,
        speech: impl Into<Speech>,
        reprompt: impl Into<Speech>,
    ) -> Result<(), ResponseError> {
        self.complete(EnvelopeParts {
            output: speech.into(),
            reprompt: Some(reprompt.into()),
            card: None,
            should_end_session: false,
        })
    }

    /// Speak with a reprompt and a simple card, keeping the session open.
    pub fn ask_with_card(
        &self,
        speech: impl Into<Speech>,
        reprompt: impl Into<Speech>,
        title: &str,
        content: &str,
    ) -> Result<(), ResponseError> {
        self.complete(EnvelopeParts {
            output: speech.into(),
            reprompt: Some(reprompt.into()),
            card: Some((title, content)),
            should_end_session: false,
        })
    }

    /// Whether a terminal operation has already been invoked.
    pub fn is_completed(&self) -> bool {
        self.inner
            .sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_none()
    }

    pub fn request_id(&self) -> &str {
        &self.inner.request_id
    }

    fn complete(&self, parts: EnvelopeParts<'_>) -> Result<(), ResponseError> {
        let sender = self
            .inner
            .sender
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();

        let Some(sender) = sender else {
            warn!(
                request_id = %self.inner.request_id,
                "Response already sent; ignoring second terminal call"
            );
            return Err(ResponseError::AlreadyCompleted);
        };

        // Attributes are read now, so handler writes made before this call are included.
        let envelope = ResponseEnvelope::build(parts, &self.inner.attributes);
        debug!(
            request_id = %self.inner.request_id,
            should_end_session = envelope.response.should_end_session,
            "Response emitted"
        );
        sender.send(envelope).map_err(|_| ResponseError::Abandoned)
    }
}

impl std::fmt::Debug for ResponseContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResponseContext")
            .field("request_id", &self.inner.request_id)
            .field("completed", &self.is_completed())
            .finish()
    }
}
