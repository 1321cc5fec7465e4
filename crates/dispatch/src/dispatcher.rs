//! Event dispatcher: routes one request to exactly one hook or handler.

use std::sync::Arc;

use speechlet_core::error::{HandlerError, SkillError};
use speechlet_core::handler::{IntentHandlerTable, LifecycleHooks};
use speechlet_core::request::RequestEnvelope;
use speechlet_core::response::{ResponseContext, ResponseEnvelope, ResponseReceiver};
use speechlet_core::session::Session;
use tracing::{debug, info};

/// Everything a skill domain injects: identity, hooks, and intent handlers.
#[derive(Clone)]
pub struct SkillDefinition {
    /// Expected application id. `None` or empty disables the identity check.
    pub application_id: Option<String>,
    pub hooks: Arc<dyn LifecycleHooks>,
    pub intents: IntentHandlerTable,
}

impl SkillDefinition {
    pub fn new(hooks: Arc<dyn LifecycleHooks>, intents: IntentHandlerTable) -> Self {
        Self {
            application_id: None,
            hooks,
            intents,
        }
    }

    pub fn with_application_id(mut self, application_id: impl Into<String>) -> Self {
        self.application_id = Some(application_id.into());
        self
    }
}

/// Routes requests by type, and intent requests by intent name.
pub struct Dispatcher {
    hooks: Arc<dyn LifecycleHooks>,
    intents: IntentHandlerTable,
}

impl Dispatcher {
    pub fn new(hooks: Arc<dyn LifecycleHooks>, intents: IntentHandlerTable) -> Self {
        Self { hooks, intents }
    }

    pub fn intents(&self) -> &IntentHandlerTable {
        &self.intents
    }

    /// Dispatch one request.
    ///
    /// Returns `Ok(Some(envelope))` for launch and intent requests,
    /// `Ok(None)` for session-ended requests.
    pub async fn dispatch(
        &self,
        request: &RequestEnvelope,
        session: &Session,
    ) -> Result<Option<ResponseEnvelope>, SkillError> {
        if session.is_new {
            info!(
                request_id = %request.request_id(),
                session_id = %session.session_id,
                "Session started"
            );
            self.hooks
                .on_session_started(request, session)
                .await
                .map_err(|e| fault("session_started", e))?;
        }

        match request {
            RequestEnvelope::LaunchRequest(launch) => {
                let (response, rx) = ResponseContext::channel(&launch.request_id, session);
                self.hooks
                    .on_launch(launch, session, response)
                    .await
                    .map_err(|e| fault("launch", e))?;
                await_response(rx).await.map(Some)
            }
            RequestEnvelope::IntentRequest(intent_request) => {
                let intent = &intent_request.intent;
                let handler = self
                    .intents
                    .get(&intent.name)
                    .ok_or_else(|| SkillError::UnsupportedIntent(intent.name.clone()))?;

                info!(
                    request_id = %intent_request.request_id,
                    intent = %intent.name,
                    "Dispatching intent"
                );
                let (response, rx) = ResponseContext::channel(&intent_request.request_id, session);
                handler
                    .handle(intent, session, response)
                    .await
                    .map_err(|e| fault(&intent.name, e))?;
                await_response(rx).await.map(Some)
            }
            RequestEnvelope::SessionEndedRequest(ended) => {
                info!(
                    request_id = %ended.request_id,
                    session_id = %session.session_id,
                    reason = ended.reason.as_deref().unwrap_or("unspecified"),
                    "Session ended"
                );
                self.hooks
                    .on_session_ended(ended, session)
                    .await
                    .map_err(|e| fault("session_ended", e))?;
                Ok(None)
            }
        }
    }
}

fn fault(stage: &str, source: HandlerError) -> SkillError {
    SkillError::HandlerFault {
        stage: stage.to_string(),
        source,
    }
}

/// Wait for the response context to be completed. Fails once every
/// handle has been dropped without a terminal call.
async fn await_response(rx: ResponseReceiver) -> Result<ResponseEnvelope, SkillError> {
    let envelope = rx.await.map_err(|_| SkillError::ResponseNotSent)?;
    debug!(
        should_end_session = envelope.response.should_end_session,
        "Response received from handler"
    );
    Ok(envelope)
}
