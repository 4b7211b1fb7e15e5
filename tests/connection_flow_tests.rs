
use actix_web::{http::StatusCode, test};
use serde_json::json;
use test_utils::*;
use uuid::Uuid;

#[actix_rt::test]
async fn accepted_connection_lets_both_sides_message() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let (ada, bob) = (TestUser::new(), TestUser::new());

    let conversation_id = connect(&app, &ada, &bob).await;

    let (status, sent) = send(
        &app,
        ada.post(
            "/api/messages",
            json!({ "conversation_id": conversation_id, "sender_id": ada.id, "body": "Hi Bob!" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{sent}");
    assert_eq!(sent["ok"], true);

    let uri = format!("/api/conversations/{}/messages", conversation_id);
    let (status, messages) = send(&app, bob.get(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(messages[0]["body"], "Hi Bob!");
    assert_eq!(messages[0]["sender_id"], ada.id.to_string());

    let (_, conversations) = send(&app, bob.get("/api/conversations").to_request()).await;
    assert_eq!(conversations.as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn accepting_twice_is_a_conflict() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let (ada, bob) = (TestUser::new(), TestUser::new());

    let (_, request) = send(
        &app,
        ada.post("/api/connections", json!({ "recipient_id": bob.id })).to_request(),
    )
    .await;
    let uri = format!("/api/connections/{}/accept", parse_id(&request["id"]));

    let (status, _) = send(&app, bob.post_empty(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, bob.post_empty(&uri).to_request()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Connection request is no longer pending");
}

#[actix_rt::test]
async fn only_the_recipient_may_accept() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let (ada, bob) = (TestUser::new(), TestUser::new());

    let (_, request) = send(
        &app,
        ada.post("/api/connections", json!({ "recipient_id": bob.id })).to_request(),
    )
    .await;
    let uri = format!("/api/connections/{}/accept", parse_id(&request["id"]));

    let (status, _) = send(&app, ada.post_empty(&uri).to_request()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn a_pair_has_at_most_one_live_request() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let (ada, bob) = (TestUser::new(), TestUser::new());

    let (status, _) = send(
        &app,
        ada.post("/api/connections", json!({ "recipient_id": bob.id })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send(
        &app,
        bob.post("/api/connections", json!({ "recipient_id": ada.id })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[actix_rt::test]
async fn rejected_request_can_be_sent_again() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let (ada, bob) = (TestUser::new(), TestUser::new());

    let (_, request) = send(
        &app,
        ada.post("/api/connections", json!({ "recipient_id": bob.id })).to_request(),
    )
    .await;
    let uri = format!("/api/connections/{}/reject", parse_id(&request["id"]));
    let (status, rejected) = send(&app, bob.post_empty(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(rejected["status"], "rejected");

    let (status, _) = send(
        &app,
        ada.post("/api/connections", json!({ "recipient_id": bob.id })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[actix_rt::test]
async fn self_connection_is_forbidden() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let ada = TestUser::new();

    let (status, _) = send(
        &app,
        ada.post("/api/connections", json!({ "recipient_id": ada.id })).to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn outsiders_cannot_read_or_write_a_conversation() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let (ada, bob, eve) = (TestUser::new(), TestUser::new(), TestUser::new());
    let conversation_id = connect(&app, &ada, &bob).await;

    let uri = format!("/api/conversations/{}/messages", conversation_id);
    let (status, _) = send(&app, eve.get(&uri).to_request()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        eve.post(
            "/api/messages",
            json!({ "conversation_id": conversation_id, "sender_id": eve.id, "body": "psst" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not a participant of this conversation");
}

#[actix_rt::test]
async fn sender_must_be_the_caller() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let (ada, bob) = (TestUser::new(), TestUser::new());
    let conversation_id = connect(&app, &ada, &bob).await;

    let (status, _) = send(
        &app,
        ada.post(
            "/api/messages",
            json!({ "conversation_id": conversation_id, "sender_id": bob.id, "body": "as bob" }),
        )
        .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn blank_and_orphan_messages_are_rejected() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let (ada, bob) = (TestUser::new(), TestUser::new());
    let conversation_id = connect(&app, &ada, &bob).await;

    let (status, _) = send(
        &app,
        ada.post(
            "/api/messages",
            json!({ "conversation_id": conversation_id, "sender_id": ada.id, "body": "   " }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        ada.post(
            "/api/messages",
            json!({ "conversation_id": Uuid::new_v4(), "sender_id": ada.id, "body": "hello?" }),
        )
        .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Conversation not found");
}
