//! `speechlet simulate` — Build a synthetic event and execute it.

use clap::Subcommand;
use speechlet_core::request::{Intent, RequestEnvelope, SkillEvent};
use speechlet_core::session::Session;
use uuid::Uuid;

use super::{load_skill, print_outcome};

/// Application id used when none is configured.
const LOCAL_APPLICATION_ID: &str = "speechlet.local";

#[derive(Subcommand)]
pub enum SimulateKind {
    /// Open the skill without an intent
    Launch,

    /// Invoke a named intent
    Intent {
        /// Intent name (e.g. `Hello`, `AMAZON.StopIntent`)
        name: String,

        /// Slot value as `name=value` (repeatable)
        #[arg(short, long = "slot", value_parser = parse_key_val)]
        slots: Vec<(String, String)>,

        /// Carried session attribute as `key=value` (repeatable)
        #[arg(short, long = "attr", value_parser = parse_key_val)]
        attrs: Vec<(String, String)>,

        /// Mark the session as new
        #[arg(long)]
        new_session: bool,
    },

    /// Close the session
    End {
        /// Reason reported by the platform
        #[arg(short, long, default_value = "USER_INITIATED")]
        reason: String,
    },
}

pub async fn run(kind: SimulateKind) -> Result<(), Box<dyn std::error::Error>> {
    let (config, skill) = load_skill()?;
    let application_id = config
        .application_id()
        .unwrap_or(LOCAL_APPLICATION_ID)
        .to_string();

    let event = build_event(kind, &application_id);
    tracing::debug!(event = %serde_json::to_string(&event)?, "Simulated event");
    print_outcome(skill.execute(event).await)
}

fn build_event(kind: SimulateKind, application_id: &str) -> SkillEvent {
    let session = Session::new(
        format!("amzn1.echo-api.session.{}", Uuid::new_v4()),
        application_id,
    );
    let request_id = format!("amzn1.echo-api.request.{}", Uuid::new_v4());

    match kind {
        SimulateKind::Launch => {
            SkillEvent::new(session.starting(), RequestEnvelope::launch(request_id))
        }
        SimulateKind::Intent {
            name,
            slots,
            attrs,
            new_session,
        } => {
            let intent = slots
                .into_iter()
                .fold(Intent::new(name), |intent, (k, v)| intent.with_slot(k, v));
            let mut session = attrs
                .into_iter()
                .fold(session, |session, (k, v)| session.with_attribute(k, v));
            session.is_new = new_session;
            SkillEvent::new(session, RequestEnvelope::intent(request_id, intent))
        }
        SimulateKind::End { reason } => SkillEvent::new(
            session,
            RequestEnvelope::session_ended(request_id, Some(reason)),
        ),
    }
}

/// Parse a `key=value` argument.
fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    if key.is_empty() {
        return Err(format!("empty key in '{s}'"));
    }
    Ok((key.to_string(), value.to_string()))
}
