//! # Speechlet Core
//!
//! Domain types, traits, and error definitions for the Speechlet voice-skill
//! dispatcher. This crate has **no transport dependencies**: it defines the
//! request/response protocol that the dispatcher, the skill domains, and the
//! HTTP gateway all build against.
//!
//! ## Design Philosophy
//!
//! Skill behavior is injected as data, not inherited:
//! - Lifecycle hooks are one trait object ([`LifecycleHooks`])
//! - Intent handlers live in an immutable [`IntentHandlerTable`]
//! - Downstream compute is reached through [`ComputeInvoker`]
//!
//! Every turn produces at most one [`ResponseEnvelope`], emitted through a
//! single-use [`ResponseContext`].

pub mod error;
pub mod handler;
pub mod invoker;
pub mod request;
pub mod response;
pub mod session;
pub mod speech;

// Re-export key types at crate root for ergonomics
pub use error::{HandlerError, InvokeError, ResponseError, SkillError};
pub use handler::{
    HandlerResult, IntentHandler, IntentHandlerTable, IntentHandlerTableBuilder, LifecycleHooks,
};
pub use invoker::ComputeInvoker;
pub use request::{
    Intent, IntentRequest, LaunchRequest, RequestEnvelope, SessionEndedRequest, SkillEvent, Slot,
};
pub use response::{
    Card, RESPONSE_VERSION, Reprompt, ResponseBody, ResponseContext, ResponseEnvelope,
    ResponseReceiver,
};
pub use session::{Application, Session, SessionAttributes, SessionUser};
pub use speech::{OutputSpeech, Speech, SpeechType};
