//! Handler traits and the immutable intent handler table.
//!
//! A skill domain supplies one [`LifecycleHooks`] implementation and an
//! [`IntentHandlerTable`]. The dispatcher only looks handlers up and invokes
//! them; it never constructs or mutates the table.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::HandlerError;
use crate::request::{Intent, LaunchRequest, RequestEnvelope, SessionEndedRequest};
use crate::response::ResponseContext;
use crate::session::Session;

pub type HandlerResult = std::result::Result<(), HandlerError>;

/// Handles one named intent.
///
/// The handler must complete `response` exactly once, either before
/// returning or from a task it spawned with a clone of the context.
#[async_trait]
pub trait IntentHandler: Send + Sync {
    async fn handle(
        &self,
        intent: &Intent,
        session: &Session,
        response: ResponseContext,
    ) -> HandlerResult;
}

/// The three lifecycle hooks of a skill.
///
/// `on_launch` has no default: every skill must greet the user.
#[async_trait]
pub trait LifecycleHooks: Send + Sync {
    /// Called before dispatch on the first turn of a session.
    async fn on_session_started(
        &self,
        _request: &RequestEnvelope,
        _session: &Session,
    ) -> HandlerResult {
        Ok(())
    }

    /// Called when the user opens the skill without naming an intent.
    async fn on_launch(
        &self,
        request: &LaunchRequest,
        session: &Session,
        response: ResponseContext,
    ) -> HandlerResult;

    /// Called when the platform closes the session. No response is built.
    async fn on_session_ended(
        &self,
        _request: &SessionEndedRequest,
        _session: &Session,
    ) -> HandlerResult {
        Ok(())
    }
}

/// Immutable mapping from intent name to handler, built once at startup.
#[derive(Clone, Default)]
pub struct IntentHandlerTable {
    handlers: Arc<HashMap<String, Arc<dyn IntentHandler>>>,
}

impl IntentHandlerTable {
    pub fn builder() -> IntentHandlerTableBuilder {
        IntentHandlerTableBuilder::default()
    }

    /// Get a handler by intent name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn IntentHandler>> {
        self.handlers.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// All registered intent names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for IntentHandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntentHandlerTable")
            .field("intents", &self.names())
            .finish()
    }
}

/// Collects handlers before freezing them into an [`IntentHandlerTable`].
#[derive(Default)]
pub struct IntentHandlerTableBuilder {
    handlers: HashMap<String, Arc<dyn IntentHandler>>,
}

impl IntentHandlerTableBuilder {
    /// Register a handler. Replaces any existing handler with the same name.
    pub fn handler(mut self, name: impl Into<String>, handler: impl IntentHandler + 'static) -> Self {
        self.handlers.insert(name.into(), Arc::new(handler));
        self
    }

    /// Register an already shared handler under another name.
    pub fn shared(mut self, name: impl Into<String>, handler: Arc<dyn IntentHandler>) -> Self {
        self.handlers.insert(name.into(), handler);
        self
    }

    pub fn build(self) -> IntentHandlerTable {
        IntentHandlerTable {
            handlers: Arc::new(self.handlers),
        }
    }
}
