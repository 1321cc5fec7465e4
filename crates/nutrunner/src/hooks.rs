//! Lifecycle hooks for the training skill.

use async_trait::async_trait;
use speechlet_core::handler::{HandlerResult, LifecycleHooks};
use speechlet_core::request::{LaunchRequest, RequestEnvelope, SessionEndedRequest};
use speechlet_core::response::ResponseContext;
use speechlet_core::session::Session;
use tracing::info;

pub const WELCOME: &str = "Welcome to the Amazon Bosch Hackday.";
pub const WELCOME_REPROMPT: &str =
    "Say hello and state your name to begin your nutrunner training.";

pub struct TrainingHooks;

#[async_trait]
impl LifecycleHooks for TrainingHooks {
    async fn on_session_started(
        &self,
        request: &RequestEnvelope,
        session: &Session,
    ) -> HandlerResult {
        info!(
            request_id = %request.request_id(),
            session_id = %session.session_id,
            "Training session started"
        );
        Ok(())
    }

    async fn on_launch(
        &self,
        request: &LaunchRequest,
        session: &Session,
        response: ResponseContext,
    ) -> HandlerResult {
        info!(
            request_id = %request.request_id,
            session_id = %session.session_id,
            "Training skill launched"
        );
        response.ask(WELCOME, WELCOME_REPROMPT)?;
        Ok(())
    }

    async fn on_session_ended(
        &self,
        request: &SessionEndedRequest,
        session: &Session,
    ) -> HandlerResult {
        info!(
            request_id = %request.request_id,
            session_id = %session.session_id,
            "Training session ended"
        );
        Ok(())
    }
}
