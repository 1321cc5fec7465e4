//! Intent handlers for the nut-tightening training skill.

use async_trait::async_trait;
use serde_json::Value;
use speechlet_core::handler::{HandlerResult, IntentHandler};
use speechlet_core::invoker::ComputeInvoker;
use speechlet_core::request::Intent;
use speechlet_core::response::ResponseContext;
use speechlet_core::session::Session;
use std::sync::Arc;
use tracing::{info, warn};

use crate::invoker::payload_text;
use crate::state::TrainingSession;

pub const UNAVAILABLE: &str = "Sorry, I could not reach the nutrunner. Please try again.";
pub const UNKNOWN_PLAYER: &str = "i do not know you yet. please say hello and state your name.";
pub const ASK_NAME_REPROMPT: &str = "Please say hello and state your name.";
pub const WHICH_NUT: &str = "Which nut would you like to fasten?";
pub const NUT_REPROMPT: &str = "Tell me the nut you want to fasten, for example front left.";
pub const ENCOURAGEMENT: &str = "You have been doing wonderful, keep going";
pub const LOW_BATTERY: &str =
    "Oh my gosh my battery is dieing. please help me and stick a new battery in.";

/// Battery level (percent) below which the nutrunner complains.
const LOW_BATTERY_PERCENT: u64 = 20;

/// Invoke `function`; on failure tell the user and return `None`.
async fn call(
    invoker: &dyn ComputeInvoker,
    function: &str,
    payload: Option<Value>,
    response: &ResponseContext,
) -> Result<Option<Value>, speechlet_core::HandlerError> {
    match invoker.invoke(function, payload).await {
        Ok(result) => {
            info!(function = %function, result = %result, "Result from compute invocation");
            Ok(Some(result))
        }
        Err(e) => {
            warn!(function = %function, error = %e, "Compute invocation failed");
            response.tell(UNAVAILABLE)?;
            Ok(None)
        }
    }
}

/// The slot object as JSON, the shape the compute functions expect.
fn slot_payload(intent: &Intent, name: &str) -> Option<Value> {
    intent
        .slots
        .get(name)
        .and_then(|slot| serde_json::to_value(slot).ok())
}

/// Speaks a fixed phrase and ends the session.
pub struct FixedTell(pub &'static str);

#[async_trait]
impl IntentHandler for FixedTell {
    async fn handle(&self, _: &Intent, _: &Session, response: ResponseContext) -> HandlerResult {
        response.tell(self.0)?;
        Ok(())
    }
}

/// Speaks a fixed phrase and keeps the session open.
pub struct FixedAsk {
    pub speech: &'static str,
    pub reprompt: &'static str,
}

#[async_trait]
impl IntentHandler for FixedAsk {
    async fn handle(&self, _: &Intent, _: &Session, response: ResponseContext) -> HandlerResult {
        response.ask(self.speech, self.reprompt)?;
        Ok(())
    }
}

/// `Hello`: registers the player and starts a tightening process.
pub struct HelloHandler {
    pub invoker: Arc<dyn ComputeInvoker>,
    pub function: String,
}

#[async_trait]
impl IntentHandler for HelloHandler {
    async fn handle(
        &self,
        intent: &Intent,
        session: &Session,
        response: ResponseContext,
    ) -> HandlerResult {
        let Some(name) = intent.slot_value("playername").map(str::trim).filter(|n| !n.is_empty())
        else {
            response.ask(
                "I did not catch your name. Please say hello and state your name.",
                ASK_NAME_REPROMPT,
            )?;
            return Ok(());
        };

        let payload = slot_payload(intent, "playername");
        if call(self.invoker.as_ref(), &self.function, payload, &response)
            .await?
            .is_none()
        {
            return Ok(());
        }

        // Stored before responding so the carried attributes include it.
        TrainingSession::new(&session.attributes).set_player(name);
        response.ask(
            format!("welcome new player {name} which nut would you like to screw?"),
            WHICH_NUT,
        )?;
        Ok(())
    }
}

/// `SelectNut`: loads the program for the chosen nut. Requires a registered player.
pub struct SelectNutHandler {
    pub invoker: Arc<dyn ComputeInvoker>,
    pub function: String,
}

#[async_trait]
impl IntentHandler for SelectNutHandler {
    async fn handle(
        &self,
        intent: &Intent,
        session: &Session,
        response: ResponseContext,
    ) -> HandlerResult {
        let state = TrainingSession::new(&session.attributes);
        let Some(player) = state.player() else {
            response.ask(UNKNOWN_PLAYER, ASK_NAME_REPROMPT)?;
            return Ok(());
        };
        if intent.slot_value("nutname").is_none() {
            response.ask(WHICH_NUT, NUT_REPROMPT)?;
            return Ok(());
        }

        let payload = slot_payload(intent, "nutname");
        let Some(result) = call(self.invoker.as_ref(), &self.function, payload, &response).await?
        else {
            return Ok(());
        };

        let nut = payload_text(&result);
        match nut.trim().trim_matches('"').parse::<u32>() {
            Ok(number) => state.set_nut_number(number),
            Err(_) => warn!(player = %player, result = %nut, "Nut number is not numeric"),
        }
        response.tell(format!(
            "Start fastening your nuts, begin with this nut now: {nut}"
        ))?;
        Ok(())
    }
}

/// `LoadProgram`: loads a named program onto the nutrunner.
pub struct LoadProgramHandler {
    pub invoker: Arc<dyn ComputeInvoker>,
    pub function: String,
}

#[async_trait]
impl IntentHandler for LoadProgramHandler {
    async fn handle(&self, intent: &Intent, _: &Session, response: ResponseContext) -> HandlerResult {
        let Some(program) = intent.slot_value("programname") else {
            response.ask(
                "Which program should I load?",
                "Tell me the program number to load.",
            )?;
            return Ok(());
        };

        let payload = slot_payload(intent, "programname");
        if call(self.invoker.as_ref(), &self.function, payload, &response)
            .await?
            .is_some()
        {
            response.tell(format!(
                "Okay i am done loading the new program number {program}"
            ))?;
        }
        Ok(())
    }
}

/// Invokes a status function and tells the rendered result.
pub struct ReportHandler {
    pub invoker: Arc<dyn ComputeInvoker>,
    pub function: String,
    pub render: fn(&Value) -> String,
}

#[async_trait]
impl IntentHandler for ReportHandler {
    async fn handle(&self, _: &Intent, _: &Session, response: ResponseContext) -> HandlerResult {
        if let Some(result) = call(self.invoker.as_ref(), &self.function, None, &response).await? {
            response.tell((self.render)(&result))?;
        }
        Ok(())
    }
}

/// `GetBattery` speech. Complains when the level is low or unknown.
pub fn battery_speech(result: &Value) -> String {
    match result.get("level").and_then(Value::as_u64) {
        Some(level) if level >= LOW_BATTERY_PERCENT => {
            format!("My battery is at {level} percent. Keep going!")
        }
        _ => LOW_BATTERY.to_string(),
    }
}

/// `WhichProgram` speech.
pub fn program_speech(result: &Value) -> String {
    format!("the nexo is equipped with program number {}", payload_text(result))
}

/// `GetLastJob` / `GetSummary` speech.
pub fn evaluation_speech(_result: &Value) -> String {
    ENCOURAGEMENT.to_string()
}
