//! Speech specifications and the typed output-speech payload.
//!
//! A [`Speech`] is what a handler asks to be spoken: a bare string (plain
//! text) or an explicit `{type, speech}` pair. [`OutputSpeech`] is the
//! normalized wire form the platform consumes. Markup is passed through
//! verbatim; well-formedness is the platform's concern.

use serde::{Deserialize, Serialize};

/// The two speech encodings the platform understands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeechType {
    #[default]
    PlainText,
    #[serde(rename = "SSML")]
    Ssml,
}

/// A speech specification supplied by a handler.
///
/// Deserializes from either `"Hello"` or `{"type": "SSML", "speech": "<speak>Hi</speak>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "SpeechSpec")]
pub struct Speech {
    #[serde(rename = "type")]
    pub kind: SpeechType,
    pub speech: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum SpeechSpec {
    Bare(String),
    Typed {
        #[serde(rename = "type", default)]
        kind: SpeechType,
        speech: String,
    },
}

impl From<SpeechSpec> for Speech {
    fn from(spec: SpeechSpec) -> Self {
        match spec {
            SpeechSpec::Bare(text) => Self::plain(text),
            SpeechSpec::Typed { kind, speech } => Self { kind, speech },
        }
    }
}

impl Speech {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            kind: SpeechType::PlainText,
            speech: text.into(),
        }
    }

    pub fn ssml(markup: impl Into<String>) -> Self {
        Self {
            kind: SpeechType::Ssml,
            speech: markup.into(),
        }
    }

    /// Whether there is nothing to say.
    pub fn is_empty(&self) -> bool {
        self.speech.is_empty()
    }
}

impl From<&str> for Speech {
    fn from(text: &str) -> Self {
        Self::plain(text)
    }
}

impl From<String> for Speech {
    fn from(text: String) -> Self {
        Self::plain(text)
    }
}

/// Normalized output speech, exactly one of `text` / `ssml` set per tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum OutputSpeech {
    PlainText { text: String },
    #[serde(rename = "SSML")]
    Ssml { ssml: String },
}

impl OutputSpeech {
    /// The spoken content regardless of encoding.
    pub fn content(&self) -> &str {
        match self {
            Self::PlainText { text } => text,
            Self::Ssml { ssml } => ssml,
        }
    }

    pub fn kind(&self) -> SpeechType {
        match self {
            Self::PlainText { .. } => SpeechType::PlainText,
            Self::Ssml { .. } => SpeechType::Ssml,
        }
    }
}

impl From<Speech> for OutputSpeech {
    fn from(speech: Speech) -> Self {
        match speech.kind {
            SpeechType::PlainText => Self::PlainText {
                text: speech.speech,
            },
            SpeechType::Ssml => Self::Ssml {
                ssml: speech.speech,
            },
        }
    }
}
