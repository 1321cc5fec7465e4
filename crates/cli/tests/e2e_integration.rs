//! End-to-end tests: raw HTTP events through the gateway into the training skill.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use speechlet_config::SkillConfig;
use speechlet_gateway::{GatewayState, build_router};
use tower::ServiceExt;

const APP_ID: &str = "amzn1.echo-sdk-ams.app.e2e";

fn app() -> axum::Router {
    let config = SkillConfig {
        application_id: Some(APP_ID.into()),
        ..SkillConfig::default()
    };
    let skill = speechlet_nutrunner::skill(&config).unwrap();
    build_router(Arc::new(GatewayState { skill }), config.gateway.max_body_bytes)
}

async fn post(app: axum::Router, event: Value) -> (StatusCode, Option<Value>) {
    let req = Request::builder()
        .method("POST")
        .uri("/skill")
        .header("Content-Type", "application/json")
        .body(Body::from(event.to_string()))
        .unwrap();
    let response = app.oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = (!bytes.is_empty()).then(|| serde_json::from_slice(&bytes).unwrap());
    (status, body)
}

fn event(attributes: Value, request: Value) -> Value {
    json!({
        "version": "1.0",
        "session": {
            "sessionId": "amzn1.echo-api.session.http",
            "new": false,
            "application": {"applicationId": APP_ID},
            "attributes": attributes
        },
        "request": request
    })
}

#[tokio::test]
async fn e2e_hello_then_select_nut_over_http() {
    let (status, body) = post(
        app(),
        event(
            json!({}),
            json!({
                "type": "IntentRequest",
                "requestId": "r-1",
                "intent": {"name": "Hello", "slots": {"playername": {"name": "playername", "value": "Sam"}}}
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let hello = body.unwrap();
    assert_eq!(
        hello["response"]["outputSpeech"]["text"],
        "welcome new player Sam which nut would you like to screw?"
    );
    assert_eq!(hello["sessionAttributes"], json!({"userId": "Sam"}));

    let (status, body) = post(
        app(),
        event(
            hello["sessionAttributes"].clone(),
            json!({
                "type": "IntentRequest",
                "requestId": "r-2",
                "intent": {"name": "SelectNut", "slots": {"nutname": {"name": "nutname", "value": "rear"}}}
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let select = body.unwrap();
    assert_eq!(select["response"]["shouldEndSession"], true);
    assert_eq!(select["sessionAttributes"]["nut_number"], "3");
}

#[tokio::test]
async fn e2e_stop_intent_ends_session() {
    let (status, body) = post(
        app(),
        event(
            Value::Null,
            json!({"type": "IntentRequest", "requestId": "r-1", "intent": {"name": "AMAZON.StopIntent"}}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(
        body["response"]["outputSpeech"]["text"],
        "Training session has ended. Come back tomorrow."
    );
    assert_eq!(body["response"]["shouldEndSession"], true);
    assert!(body.get("sessionAttributes").is_none());
}

#[tokio::test]
async fn e2e_session_ended_has_no_body() {
    let (status, body) = post(
        app(),
        event(json!({}), json!({"type": "SessionEndedRequest", "requestId": "r-9"})),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_none());
}

#[tokio::test]
async fn e2e_wrong_application_is_forbidden() {
    let mut foreign = event(json!({}), json!({"type": "LaunchRequest", "requestId": "r-1"}));
    foreign["session"]["application"]["applicationId"] = json!("amzn1.echo-sdk-ams.app.intruder");

    let (status, body) = post(app(), foreign).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body.unwrap()["error"], "identity_mismatch");
}
