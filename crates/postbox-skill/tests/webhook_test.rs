//! End-to-end webhook tests: real router, in-memory store, one request per
//! call via `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use postbox_db::{MailboxStore, MemoryStore};

fn app_with_store(store: Arc<MemoryStore>) -> Router {
    postbox_skill::router(store)
}

fn envelope(command: &str, user_id: &str) -> Value {
    json!({
        "timezone": "UTC",
        "request": { "type": "SimpleUtterance", "command": command },
        "session": { "new": false, "user": { "user_id": user_id } },
        "version": "1.0",
    })
}

async fn post_json(app: &Router, body: &Value) -> (StatusCode, Option<Value>) {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = serde_json::from_slice(&bytes).ok();
    (status, value)
}

fn spoken_text(body: &Value) -> &str {
    body["response"]["text"].as_str().unwrap()
}

#[tokio::test]
async fn wrong_verb_is_method_not_allowed() {
    let app = app_with_store(Arc::new(MemoryStore::new()));

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn undecodable_body_is_internal_error() {
    let app = app_with_store(Arc::new(MemoryStore::new()));

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/")
                .body(Body::from("not json at all"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn unsupported_request_type_is_unprocessable() {
    let app = app_with_store(Arc::new(MemoryStore::new()));

    let mut body = envelope("Привет", "bob");
    body["request"]["type"] = json!("ButtonPressed");

    let (status, _) = post_json(&app, &body).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn register_send_read_flow() {
    let store = Arc::new(MemoryStore::new());
    let app = app_with_store(store.clone());

    // alice claims her name
    let (status, body) = post_json(&app, &envelope("Зарегистрируй alice", "alice-id")).await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert_eq!(
        spoken_text(&body),
        "Вы успешно зарегистрированы под именем alice"
    );
    assert_eq!(body["version"], "1.0");

    // bob sends her a message
    let (status, body) = post_json(&app, &envelope("Отправь alice привет", "bob-id")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        spoken_text(&body.unwrap()),
        "Сообщение успешно отправлено"
    );
    assert_eq!(store.list_messages("alice-id").unwrap().len(), 1);

    // alice reads it back
    let (status, body) = post_json(&app, &envelope("Прочитай 1", "alice-id")).await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert!(spoken_text(&body).starts_with("Сообщение от "));
    assert!(spoken_text(&body).ends_with(": привет"));
}

#[tokio::test]
async fn read_past_the_end_is_a_spoken_miss() {
    let store = Arc::new(MemoryStore::new());
    store.register_user("alice-id", "alice").unwrap();
    store.save_message("alice-id", "bob-id", "привет").unwrap();
    let app = app_with_store(store);

    let (status, body) = post_json(&app, &envelope("Прочитай 5", "alice-id")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(spoken_text(&body.unwrap()), "Такого сообщения не существует.");
}

#[tokio::test]
async fn register_conflict_is_a_spoken_miss() {
    let store = Arc::new(MemoryStore::new());
    store.register_user("bob-id", "carol").unwrap();
    let app = app_with_store(store.clone());

    let (status, body) = post_json(&app, &envelope("Зарегистрируй carol", "dave-id")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        spoken_text(&body.unwrap()),
        "Извините, такое имя уже занято. Попробуйте другое."
    );
    assert_eq!(store.find_recipient("carol").unwrap(), "bob-id");
}

#[tokio::test]
async fn new_session_prepends_local_time() {
    let app = app_with_store(Arc::new(MemoryStore::new()));

    let mut body = envelope("Привет, Алиса", "bob-id");
    body["session"]["new"] = json!(true);
    body["timezone"] = json!("Europe/Moscow");

    let (status, body) = post_json(&app, &body).await;
    assert_eq!(status, StatusCode::OK);
    let body = body.unwrap();
    assert!(spoken_text(&body).starts_with("Точное время "));
    assert!(spoken_text(&body).ends_with("Для вас нет новых сообщений."));
}

#[tokio::test]
async fn unresolvable_timezone_is_bad_request() {
    let app = app_with_store(Arc::new(MemoryStore::new()));

    let mut body = envelope("Привет, Алиса", "bob-id");
    body["session"]["new"] = json!(true);
    body["timezone"] = json!("Atlantis/Nowhere");

    let (status, _) = post_json(&app, &body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
