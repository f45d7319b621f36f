use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use teloxide::types::Update;
use tower::ServiceExt;

use muteme_bot::bot::handle_update;
use muteme_bot::server::{router, WebhookState, SECRET_TOKEN_HEADER};

use crate::test_utils::*;
use crate::TestBot;

const WEBHOOK_PATH: &str = "/telegram/webhook";
const SECRET: &str = "s3cret";

fn group_chat() -> Value {
    json!({ "id": GROUP_CHAT_ID, "type": "supergroup", "title": "Quiet please" })
}

fn user(id: i64, first_name: &str) -> Value {
    json!({ "id": id, "is_bot": false, "first_name": first_name })
}

fn message_update(text: &str) -> Value {
    json!({
        "update_id": 1,
        "message": {
            "message_id": COMMAND_MESSAGE_ID,
            "date": 1_700_000_000,
            "chat": group_chat(),
            "from": user(AUTHOR_ID, "Alice"),
            "text": text,
        }
    })
}

fn callback_update(from_id: i64, data: &str) -> Value {
    json!({
        "update_id": 2,
        "callback_query": {
            "id": "4382",
            "from": user(from_id, "Alice"),
            "chat_instance": "-5712",
            "data": data,
            "message": {
                "message_id": 1000,
                "date": 1_700_000_000,
                "chat": group_chat(),
                "from": { "id": 777, "is_bot": true, "first_name": "Mute", "username": BOT_USERNAME },
                "text": "⏳ How long do you want to stay silent?",
            }
        }
    })
}

fn parse_update(value: Value) -> Update {
    serde_json::from_str(&value.to_string()).expect("Test update should deserialize")
}

fn webhook_state(bot: &TestBot, secret: Option<&str>) -> WebhookState {
    WebhookState {
        ctx: bot.ctx.clone(),
        bot_username: Arc::from(BOT_USERNAME),
        secret: secret.map(Arc::from),
    }
}

fn post_update(body: String, secret: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(WEBHOOK_PATH)
        .header("content-type", "application/json");
    if let Some(secret) = secret {
        builder = builder.header(SECRET_TOKEN_HEADER, secret);
    }
    builder.body(Body::from(body)).unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_message_update_runs_command() {
    let bot = TestBot::new();

    handle_update(&bot.ctx, BOT_USERNAME, parse_update(message_update("/muteme 45m")))
        .await
        .unwrap();

    let restrictions = bot.api.restrictions();
    assert_eq!(restrictions.len(), 1);
    assert_eq!((restrictions[0].0, restrictions[0].1), (GROUP_CHAT_ID, AUTHOR_ID));
    TestAssertions::assert_mute_length(restrictions[0].2, 45 * 60);
    assert!(bot
        .api
        .last_message_text()
        .unwrap()
        .ends_with("muted themselves for 45 minutes."));
}

#[tokio::test]
async fn test_callback_update_is_routed() {
    let bot = TestBot::new();

    handle_update(
        &bot.ctx,
        BOT_USERNAME,
        parse_update(callback_update(AUTHOR_ID, "muteme:42:30:m")),
    )
    .await
    .unwrap();

    assert_eq!(bot.api.restrictions().len(), 1);
    assert_eq!(bot.api.deleted_messages(), vec![(GROUP_CHAT_ID, 1000)]);
    assert_eq!(bot.api.callback_answers(), vec![("4382".to_string(), None)]);
}

#[tokio::test]
async fn test_other_messages_are_ignored() {
    let bot = TestBot::new();

    for text in ["just chatting", "/muteme@another_bot 5m", "/unknown"] {
        handle_update(&bot.ctx, BOT_USERNAME, parse_update(message_update(text)))
            .await
            .unwrap();
    }

    assert!(bot.api.calls().is_empty());
}

#[tokio::test]
async fn test_health() {
    let bot = TestBot::new();
    let app = router(WEBHOOK_PATH, webhook_state(&bot, Some(SECRET)));

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "ok");
}

#[tokio::test]
async fn test_webhook_accepts_update_with_secret() {
    let bot = TestBot::new();
    let app = router(WEBHOOK_PATH, webhook_state(&bot, Some(SECRET)));

    let response = app
        .oneshot(post_update(message_update("/muteme 2h").to_string(), Some(SECRET)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(bot.api.restrictions().len(), 1);
}

#[tokio::test]
async fn test_webhook_rejects_missing_or_wrong_secret() {
    let bot = TestBot::new();

    for secret in [None, Some("wrong")] {
        let app = router(WEBHOOK_PATH, webhook_state(&bot, Some(SECRET)));
        let response = app
            .oneshot(post_update(message_update("/muteme 2h").to_string(), secret))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    assert!(bot.api.calls().is_empty());
}

#[tokio::test]
async fn test_secret_is_checked_before_the_body() {
    let bot = TestBot::new();
    let app = router(WEBHOOK_PATH, webhook_state(&bot, Some(SECRET)));

    let response = app
        .oneshot(post_update("{ not json".to_string(), None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_webhook_without_secret_configured() {
    let bot = TestBot::new();
    let app = router(WEBHOOK_PATH, webhook_state(&bot, None));

    let response = app
        .oneshot(post_update(callback_update(OTHER_USER_ID, "muteme:42:30:m").to_string(), None))
        .await
        .unwrap();

    // refusing a stranger's press is a handled outcome
    assert_eq!(response.status(), StatusCode::OK);
    assert!(bot.api.restrictions().is_empty());
    assert_eq!(bot.api.callback_answers().len(), 1);
}

#[tokio::test]
async fn test_failed_mute_returns_generic_server_error() {
    let bot = TestBot::new();
    bot.api.fail_restrictions();
    let app = router(WEBHOOK_PATH, webhook_state(&bot, Some(SECRET)));

    let response = app
        .oneshot(post_update(message_update("/muteme 2h").to_string(), Some(SECRET)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_text(response).await;
    assert_eq!(body, "internal server error");
    assert!(!body.contains("not enough rights"));
}

#[tokio::test]
async fn test_failed_send_still_returns_ok() {
    let bot = TestBot::new();
    bot.api.fail_sends();
    let app = router(WEBHOOK_PATH, webhook_state(&bot, Some(SECRET)));

    let response = app
        .oneshot(post_update(message_update("/muteme 2h").to_string(), Some(SECRET)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(bot.api.restrictions().len(), 1);
}
