
use actix_web::{http::StatusCode, test};
use serde_json::{json, Value};
use test_utils::*;
use uuid::Uuid;

struct Pair {
    ada: TestUser,
    bob: TestUser,
    ada_skill: Uuid,
    bob_skill: Uuid,
}

fn session_body(pair: &Pair) -> Value {
    json!({
        "partner_id": pair.bob.id,
        "skill_a_id": pair.ada_skill,
        "skill_b_id": pair.bob_skill,
        "scheduled_at": "2026-11-02T15:00:00Z",
        "notes": "Bring a laptop"
    })
}

#[actix_rt::test]
async fn sessions_need_an_accepted_connection() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let (ada, bob) = (TestUser::new(), TestUser::new());
    let pair = Pair {
        ada_skill: create_skill(&app, &ada, "Rust", "teach").await,
        bob_skill: create_skill(&app, &bob, "Go", "teach").await,
        ada,
        bob,
    };

    let (status, _) = send(
        &app,
        pair.ada
            .post("/api/connections", json!({ "recipient_id": pair.bob.id }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(&app, pair.ada.post("/api/sessions", session_body(&pair)).to_request()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Connection not accepted");
}

#[actix_rt::test]
async fn session_lifecycle_rejects_illegal_transitions() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let pair = connected_pair(&app).await;

    let (status, session) = send(&app, pair.ada.post("/api/sessions", session_body(&pair)).to_request()).await;
    assert_eq!(status, StatusCode::CREATED, "{session}");
    assert_eq!(session["status"], "scheduled");
    assert_eq!(session["duration_minutes"], 60);
    assert_eq!(session["user_a_id"], pair.ada.id.to_string());
    assert_eq!(session["user_b_id"], pair.bob.id.to_string());

    let uri = format!("/api/sessions/{}/status", parse_id(&session["id"]));
    let (status, _) = send(&app, pair.bob.patch(&uri, json!({ "status": "completed" })).to_request()).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, pair.ada.patch(&uri, json!({ "status": "ongoing" })).to_request()).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Cannot change session status from completed to ongoing");
}

#[actix_rt::test]
async fn reschedule_keeps_participants_and_revalidates_skills() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let pair = connected_pair(&app).await;
    let (_, session) = send(&app, pair.ada.post("/api/sessions", session_body(&pair)).to_request()).await;
    let uri = format!("/api/sessions/{}", parse_id(&session["id"]));

    let other_ada_skill = create_skill(&app, &pair.ada, "SQL", "teach").await;
    let (status, moved) = send(
        &app,
        pair.bob
            .patch(
                &uri,
                json!({ "scheduled_at": "2026-11-09T15:00", "skill_a_id": other_ada_skill, "duration_minutes": 90 }),
            )
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{moved}");
    assert_eq!(moved["user_a_id"], pair.ada.id.to_string());
    assert_eq!(moved["user_b_id"], pair.bob.id.to_string());
    assert_eq!(moved["skill_a_id"], other_ada_skill.to_string());
    assert_eq!(moved["duration_minutes"], 90);
    assert_eq!(moved["notes"], "Bring a laptop");

    let (status, _) = send(
        &app,
        pair.bob.patch(&uri, json!({ "skill_a_id": pair.bob_skill })).to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn outsiders_cannot_touch_a_session() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let pair = connected_pair(&app).await;
    let eve = TestUser::new();
    let (_, session) = send(&app, pair.ada.post("/api/sessions", session_body(&pair)).to_request()).await;

    let uri = format!("/api/sessions/{}/status", parse_id(&session["id"]));
    let (status, body) = send(&app, eve.patch(&uri, json!({ "status": "cancelled" })).to_request()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not a participant of this session");

    let (_, listed) = send(&app, eve.get("/api/sessions").to_request()).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(0));

    let (_, listed) = send(&app, pair.bob.get("/api/sessions").to_request()).await;
    assert_eq!(listed.as_array().map(Vec::len), Some(1));
}

#[actix_rt::test]
async fn skills_in_use_cannot_be_deleted() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let pair = connected_pair(&app).await;
    let (status, _) = send(&app, pair.ada.post("/api/sessions", session_body(&pair)).to_request()).await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/api/skills/{}", pair.ada_skill);
    let (status, body) = send(&app, pair.ada.delete(&uri).to_request()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Skill is used by a scheduled session");
}

#[actix_rt::test]
async fn missing_fields_are_reported_per_field() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let ada = TestUser::new();

    let (status, body) = send(&app, ada.post("/api/sessions", json!({})).to_request()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "partner_id");
}

#[actix_rt::test]
async fn scheduling_with_yourself_is_forbidden() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let ada = TestUser::new();
    let skill = create_skill(&app, &ada, "Rust", "teach").await;

    let body = json!({
        "partner_id": ada.id,
        "skill_a_id": skill,
        "skill_b_id": skill,
        "scheduled_at": "2026-11-02T15:00:00Z"
    });
    let (status, body) = send(&app, ada.post("/api/sessions", body).to_request()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Cannot schedule a session with yourself");
}

#[actix_rt::test]
async fn duration_must_fit_in_a_day() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let pair = connected_pair(&app).await;

    for minutes in [0, 1441] {
        let mut body = session_body(&pair);
        body["duration_minutes"] = json!(minutes);

        let (status, body) = send(&app, pair.ada.post("/api/sessions", body).to_request()).await;

        assert_eq!(status, StatusCode::BAD_REQUEST, "{minutes} minutes");
        assert_eq!(body["details"][0]["field"], "duration_minutes");
    }
}

#[actix_rt::test]
async fn unparseable_dates_are_rejected() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let pair = connected_pair(&app).await;

    let mut body = session_body(&pair);
    body["scheduled_at"] = json!("next tuesday");
    let (status, body) = send(&app, pair.ada.post("/api/sessions", body).to_request()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "scheduled_at");
}

async fn connected_pair<S, B>(app: &S) -> Pair
where
    S: actix_web::dev::Service<
        actix_http::Request,
        Response = actix_web::dev::ServiceResponse<B>,
        Error = actix_web::Error,
    >,
    B: actix_web::body::MessageBody,
{
    let (ada, bob) = (TestUser::new(), TestUser::new());
    connect(app, &ada, &bob).await;

    Pair {
        ada_skill: create_skill(app, &ada, "Rust", "teach").await,
        bob_skill: create_skill(app, &bob, "Go", "teach").await,
        ada,
        bob,
    }
}
