//! Skill assembly: identity check, dispatch, and the failure boundary.
//!
//! [`Skill::execute`] is the single entry point the invocation mechanism
//! calls. Every failure (identity, lookup, handler fault) is logged here
//! and returned as `Err`; no envelope is emitted on that path.

use speechlet_config::SkillConfig;
use speechlet_core::error::SkillError;
use speechlet_core::request::SkillEvent;
use speechlet_core::response::ResponseEnvelope;
use speechlet_core::session::Session;
use tracing::{error, info, warn};

use crate::dispatcher::{Dispatcher, SkillDefinition};

/// Result of one invocation: an envelope, no payload (session ended), or a failure.
pub type Outcome = Result<Option<ResponseEnvelope>, SkillError>;

/// An assembled skill: identity plus dispatcher.
pub struct Skill {
    application_id: Option<String>,
    dispatcher: Dispatcher,
}

impl Skill {
    pub fn new(definition: SkillDefinition) -> Self {
        let application_id = definition.application_id.filter(|id| !id.is_empty());
        if application_id.is_none() {
            warn!("No application id configured; identity check disabled");
        }
        Self {
            application_id,
            dispatcher: Dispatcher::new(definition.hooks, definition.intents),
        }
    }

    /// Build from a definition, taking the application id from configuration.
    pub fn from_config(config: &SkillConfig, definition: SkillDefinition) -> Self {
        Self::new(SkillDefinition {
            application_id: config.application_id().map(str::to_string),
            ..definition
        })
    }

    pub fn application_id(&self) -> Option<&str> {
        self.application_id.as_deref()
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Execute one turn.
    pub async fn execute(&self, event: SkillEvent) -> Outcome {
        let SkillEvent {
            session, request, ..
        } = event;

        info!(
            application_id = %session.application_id(),
            request_type = request.kind(),
            request_id = %request.request_id(),
            "Request received"
        );

        let outcome = match self.verify_identity(&session) {
            Ok(()) => self.dispatcher.dispatch(&request, &session).await,
            Err(e) => Err(e),
        };

        if let Err(e) = &outcome {
            error!(
                error = %e,
                kind = e.kind(),
                request_id = %request.request_id(),
                session_id = %session.session_id,
                "Unexpected exception"
            );
        }
        outcome
    }

    /// Execute one turn from raw JSON, failing with `InvalidEvent` if it does not parse.
    pub async fn execute_json(&self, event: serde_json::Value) -> Outcome {
        match serde_json::from_value::<SkillEvent>(event) {
            Ok(event) => self.execute(event).await,
            Err(e) => {
                error!(error = %e, "Rejected malformed event");
                Err(SkillError::InvalidEvent(e.to_string()))
            }
        }
    }

    fn verify_identity(&self, session: &Session) -> Result<(), SkillError> {
        match &self.application_id {
            Some(expected) if expected != session.application_id() => {
                warn!(
                    expected = %expected,
                    actual = %session.application_id(),
                    "The applicationIds don't match"
                );
                Err(SkillError::IdentityMismatch {
                    expected: expected.clone(),
                    actual: session.application_id().to_string(),
                })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use speechlet_core::error::HandlerError;
    use speechlet_core::handler::{HandlerResult, IntentHandler, IntentHandlerTable, LifecycleHooks};
    use speechlet_core::request::{Intent, LaunchRequest, RequestEnvelope};
    use speechlet_core::response::ResponseContext;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[derive(Default)]
    struct CountingHooks {
        started: AtomicUsize,
        launched: AtomicUsize,
    }

    #[async_trait]
    impl LifecycleHooks for CountingHooks {
        async fn on_session_started(&self, _: &RequestEnvelope, _: &Session) -> HandlerResult {
            self.started.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn on_launch(
            &self,
            _: &LaunchRequest,
            _: &Session,
            response: ResponseContext,
        ) -> HandlerResult {
            self.launched.fetch_add(1, Ordering::SeqCst);
            response.tell("hello")?;
            Ok(())
        }
    }

    /// Records the caller's name in the session, then asks.
    struct Remember;

    #[async_trait]
    impl IntentHandler for Remember {
        async fn handle(
            &self,
            intent: &Intent,
            session: &Session,
            response: ResponseContext,
        ) -> HandlerResult {
            if let Some(name) = intent.slot_value("name") {
                session.attributes.insert("userId", name);
            }
            response.ask("Noted.", "Anything else?")?;
            Ok(())
        }
    }

    struct Explodes;

    #[async_trait]
    impl IntentHandler for Explodes {
        async fn handle(&self, _: &Intent, _: &Session, _: ResponseContext) -> HandlerResult {
            Err(HandlerError::Failed("boom".into()))
        }
    }

    /// Tells twice; the second call must be rejected.
    struct Chatty;

    #[async_trait]
    impl IntentHandler for Chatty {
        async fn handle(&self, _: &Intent, _: &Session, response: ResponseContext) -> HandlerResult {
            response.tell("first")?;
            assert!(response.tell("second").is_err());
            Ok(())
        }
    }

    fn skill(hooks: Arc<CountingHooks>, app_id: Option<&str>) -> Skill {
        let table = IntentHandlerTable::builder()
            .handler("Remember", Remember)
            .handler("Explodes", Explodes)
            .handler("Chatty", Chatty)
            .build();
        let mut definition = SkillDefinition::new(hooks, table);
        if let Some(id) = app_id {
            definition = definition.with_application_id(id);
        }
        Skill::new(definition)
    }

    #[tokio::test]
    async fn identity_mismatch_runs_no_hooks() {
        let hooks = Arc::new(CountingHooks::default());
        let skill = skill(hooks.clone(), Some("X"));
        let event = SkillEvent::new(
            Session::new("s-1", "Y").starting(),
            RequestEnvelope::launch("r-1"),
        );

        let err = skill.execute(event).await.unwrap_err();
        assert!(matches!(err, SkillError::IdentityMismatch { .. }));
        assert_eq!(hooks.started.load(Ordering::SeqCst), 0);
        assert_eq!(hooks.launched.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn matching_identity_dispatches() {
        let hooks = Arc::new(CountingHooks::default());
        let skill = skill(hooks.clone(), Some("X"));
        let event = SkillEvent::new(
            Session::new("s-1", "X").starting(),
            RequestEnvelope::launch("r-1"),
        );

        let envelope = skill.execute(event).await.unwrap().unwrap();
        assert!(envelope.response.should_end_session);
        assert_eq!(hooks.started.load(Ordering::SeqCst), 1);
        assert_eq!(hooks.launched.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn empty_application_id_disables_check() {
        let hooks = Arc::new(CountingHooks::default());
        let skill = skill(hooks, Some(""));
        assert!(skill.application_id().is_none());

        let event = SkillEvent::new(Session::new("s-1", "anything"), RequestEnvelope::launch("r-1"));
        assert!(skill.execute(event).await.is_ok());
    }

    #[tokio::test]
    async fn handler_mutation_reaches_session_attributes() {
        let skill = skill(Arc::default(), None);
        let event = SkillEvent::new(
            Session::new("s-1", "app").with_attribute("userId", "A"),
            RequestEnvelope::intent("r-2", Intent::new("Remember").with_slot("name", "B")),
        );

        let envelope = skill.execute(event).await.unwrap().unwrap();
        let attrs = envelope.session_attributes.unwrap();
        assert_eq!(attrs.get("userId").and_then(serde_json::Value::as_str), Some("B"));
    }

    #[tokio::test]
    async fn handler_fault_surfaces_as_failure() {
        let skill = skill(Arc::default(), None);
        let event = SkillEvent::new(
            Session::new("s-1", "app"),
            RequestEnvelope::intent("r-3", Intent::new("Explodes")),
        );

        let err = skill.execute(event).await.unwrap_err();
        match err {
            SkillError::HandlerFault { stage, source } => {
                assert_eq!(stage, "Explodes");
                assert!(source.to_string().contains("boom"));
            }
            other => panic!("expected HandlerFault, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn double_completion_emits_first_envelope_only() {
        let skill = skill(Arc::default(), None);
        let event = SkillEvent::new(
            Session::new("s-1", "app"),
            RequestEnvelope::intent("r-4", Intent::new("Chatty")),
        );

        let envelope = skill.execute(event).await.unwrap().unwrap();
        assert_eq!(envelope.response.output_speech.content(), "first");
    }

    #[tokio::test]
    async fn malformed_json_is_invalid_event() {
        let skill = skill(Arc::default(), None);
        let err = skill
            .execute_json(serde_json::json!({
                "session": {"sessionId": "s", "application": {"applicationId": "a"}},
                "request": {"type": "Display.ElementSelected", "requestId": "r"}
            }))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), "invalid_event");
    }

    #[tokio::test]
    async fn json_event_with_numeric_attribute_executes() {
        let skill = skill(Arc::default(), None);
        let envelope = skill
            .execute_json(serde_json::json!({
                "session": {
                    "sessionId": "s",
                    "application": {"applicationId": "a"},
                    "attributes": {"nut_number": 3, "history": {"jobs": [1, 2]}}
                },
                "request": {"type": "LaunchRequest", "requestId": "r"}
            }))
            .await
            .unwrap()
            .unwrap();
        let attrs = envelope.session_attributes.unwrap();
        assert_eq!(attrs.get("nut_number"), Some(&serde_json::json!(3)));
        assert_eq!(attrs.get("history"), Some(&serde_json::json!({"jobs": [1, 2]})));
    }

    #[tokio::test]
    async fn json_event_without_attributes_executes() {
        let skill = skill(Arc::default(), None);
        let envelope = skill
            .execute_json(serde_json::json!({
                "session": {"sessionId": "s", "new": false, "application": {"applicationId": "a"}},
                "request": {
                    "type": "IntentRequest",
                    "requestId": "r",
                    "intent": {"name": "Remember", "slots": {"name": {"name": "name", "value": "Kim"}}}
                }
            }))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            envelope.session_attributes.unwrap().get("userId").and_then(serde_json::Value::as_str),
            Some("Kim")
        );
    }

    #[test]
    fn from_config_uses_configured_id() {
        let config = SkillConfig {
            application_id: Some("amzn1.app.cfg".into()),
            ..SkillConfig::default()
        };
        let definition = SkillDefinition::new(
            Arc::new(CountingHooks::default()),
            IntentHandlerTable::default(),
        );
        let skill = Skill::from_config(&config, definition);
        assert_eq!(skill.application_id(), Some("amzn1.app.cfg"));
    }
}
