//! End-to-end turns through the assembled training skill.
//!
//! Each test feeds raw JSON events into `Skill::execute_json`, carrying
//! `sessionAttributes` from one envelope into the next event the way the
//! platform does.

use std::sync::Arc;

use serde_json::{Value, json};
use speechlet_config::{ComputeFunctions, SkillConfig};
use speechlet_core::error::SkillError;
use speechlet_nutrunner::{StaticInvoker, definition, hooks, intents};
use speechlet_dispatch::Skill;

const APP_ID: &str = "amzn1.echo-sdk-ams.app.b24af45c";

fn training_skill() -> (Skill, Arc<StaticInvoker>) {
    let config = SkillConfig {
        application_id: Some(APP_ID.into()),
        ..SkillConfig::default()
    };
    let invoker = Arc::new(StaticInvoker::training_defaults(&ComputeFunctions::default()));
    (Skill::new(definition(&config, invoker.clone())), invoker)
}

fn event(new: bool, attributes: Value, request: Value) -> Value {
    json!({
        "version": "1.0",
        "session": {
            "sessionId": "amzn1.echo-api.session.e2e",
            "new": new,
            "application": {"applicationId": APP_ID},
            "attributes": attributes,
            "user": {"userId": "amzn1.account.e2e"}
        },
        "request": request
    })
}

fn intent(request_id: &str, name: &str, slots: Value) -> Value {
    json!({
        "type": "IntentRequest",
        "requestId": request_id,
        "timestamp": "2016-03-12T10:00:00Z",
        "intent": {"name": name, "slots": slots}
    })
}

#[tokio::test]
async fn full_training_conversation() {
    let (skill, invoker) = training_skill();

    // Turn 1: launch on a new session, no attributes yet.
    let launch = skill
        .execute_json(event(
            true,
            Value::Null,
            json!({"type": "LaunchRequest", "requestId": "r-1"}),
        ))
        .await
        .unwrap()
        .unwrap();
    let launch_json = serde_json::to_value(&launch).unwrap();
    assert_eq!(
        launch_json["response"]["outputSpeech"],
        json!({"type": "PlainText", "text": hooks::WELCOME})
    );
    assert_eq!(
        launch_json["response"]["reprompt"]["outputSpeech"]["text"],
        hooks::WELCOME_REPROMPT
    );
    assert_eq!(launch_json["response"]["shouldEndSession"], false);
    assert!(launch_json.get("sessionAttributes").is_none());

    // Turn 2: Hello registers the player.
    let hello = skill
        .execute_json(event(
            false,
            json!({}),
            intent("r-2", "Hello", json!({"playername": {"name": "playername", "value": "Alex"}})),
        ))
        .await
        .unwrap()
        .unwrap();
    let carried = serde_json::to_value(hello.session_attributes.clone().unwrap()).unwrap();
    assert_eq!(carried, json!({"userId": "Alex"}));

    // Turn 3: SelectNut with the carried attributes.
    let select = skill
        .execute_json(event(
            false,
            carried,
            intent("r-3", "SelectNut", json!({"nutname": {"name": "nutname", "value": "front"}})),
        ))
        .await
        .unwrap()
        .unwrap();
    assert!(select.response.should_end_session);
    assert_eq!(
        select.response.output_speech.content(),
        "Start fastening your nuts, begin with this nut now: 3"
    );
    let attrs = select.session_attributes.unwrap();
    assert_eq!(attrs.get("userId").and_then(serde_json::Value::as_str), Some("Alex"));
    assert_eq!(attrs.get("nut_number").and_then(serde_json::Value::as_str), Some("3"));

    // Turn 4: the platform closes the session; no payload.
    let ended = skill
        .execute_json(event(
            false,
            json!({"userId": "Alex"}),
            json!({"type": "SessionEndedRequest", "requestId": "r-4", "reason": "USER_INITIATED"}),
        ))
        .await
        .unwrap();
    assert!(ended.is_none());

    let functions: Vec<String> = invoker.calls().into_iter().map(|(f, _)| f).collect();
    assert_eq!(functions, vec!["newTighteningProcess", "updateNexoProgram"]);
}

#[tokio::test]
async fn select_nut_before_hello_asks_for_name() {
    let (skill, invoker) = training_skill();
    let envelope = skill
        .execute_json(event(true, json!({}), intent("r-1", "SelectNut", json!({}))))
        .await
        .unwrap()
        .unwrap();

    assert_eq!(envelope.response.output_speech.content(), intents::UNKNOWN_PLAYER);
    assert!(!envelope.response.should_end_session);
    assert!(invoker.calls().is_empty());
}

#[tokio::test]
async fn status_reports() {
    let (skill, _) = training_skill();

    let battery = skill
        .execute_json(event(false, json!({}), intent("r-1", "GetBattery", json!({}))))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(battery.response.output_speech.content(), intents::LOW_BATTERY);

    let program = skill
        .execute_json(event(false, json!({}), intent("r-2", "WhichProgram", json!({}))))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(
        program.response.output_speech.content(),
        "the nexo is equipped with program number 5"
    );

    for name in ["GetLastJob", "GetSummary"] {
        let envelope = skill
            .execute_json(event(false, json!({}), intent("r-3", name, json!({}))))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(envelope.response.output_speech.content(), intents::ENCOURAGEMENT);
    }
}

#[tokio::test]
async fn help_keeps_session_open() {
    let (skill, _) = training_skill();
    let envelope = skill
        .execute_json(event(false, json!({}), intent("r-1", "AMAZON.HelpIntent", json!({}))))
        .await
        .unwrap()
        .unwrap();
    assert!(!envelope.response.should_end_session);
    assert!(envelope.response.reprompt.is_some());
}

#[tokio::test]
async fn unsupported_intent_fails() {
    let (skill, _) = training_skill();
    let err = skill
        .execute_json(event(false, json!({}), intent("r-1", "OrderPizza", json!({}))))
        .await
        .unwrap_err();
    assert!(matches!(err, SkillError::UnsupportedIntent(ref name) if name == "OrderPizza"));
}

#[tokio::test]
async fn foreign_application_is_rejected() {
    let (skill, invoker) = training_skill();
    let mut foreign = event(
        true,
        json!({}),
        intent("r-1", "Hello", json!({"playername": {"name": "playername", "value": "Eve"}})),
    );
    foreign["session"]["application"]["applicationId"] = json!("amzn1.echo-sdk-ams.app.other");

    let err = skill.execute_json(foreign).await.unwrap_err();
    assert!(matches!(err, SkillError::IdentityMismatch { .. }));
    assert!(invoker.calls().is_empty());
}
