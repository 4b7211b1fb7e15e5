
use actix_web::{
    http::StatusCode,
    test::{self, TestRequest},
};
use serde_json::json;
use skillswap_backend::settings::AppConfig;
use test_utils::*;

#[actix_rt::test]
async fn upserting_twice_overwrites_the_same_profile() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let ada = TestUser::new();

    upsert_profile(&app, &ada, "Ada").await;
    let (status, body) = send(
        &app,
        ada.post("/api/profile-upsert", json!({ "id": ada.id, "bio": "Compilers and tea" }))
            .to_request(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["ok"], true);

    let uri = format!("/api/profiles/{}", ada.id);
    let (status, profile) = send(&app, ada.get(&uri).to_request()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["full_name"], "Ada");
    assert_eq!(profile["bio"], "Compilers and tea");
    assert_eq!(profile["swap_points"], 0);
}

#[actix_rt::test]
async fn explicit_null_clears_a_field() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let ada = TestUser::new();
    upsert_profile(&app, &ada, "Ada").await;

    let (_, body) = send(
        &app,
        ada.post("/api/profile-upsert", json!({ "id": ada.id, "full_name": null }))
            .to_request(),
    )
    .await;

    assert!(body["profile"]["full_name"].is_null());
}

#[actix_rt::test]
async fn profiles_of_others_cannot_be_written() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let (ada, bob) = (TestUser::new(), TestUser::new());

    let (status, body) = send(
        &app,
        ada.post("/api/profile-upsert", json!({ "id": bob.id, "full_name": "Not Bob" }))
            .to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "You can only update your own profile");
}

#[actix_rt::test]
async fn skills_are_listed_and_deleted_by_their_owner() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let (ada, bob) = (TestUser::new(), TestUser::new());
    upsert_profile(&app, &ada, "Ada").await;

    let skill_id = create_skill(&app, &ada, "Rust", "teach").await;

    let (_, skills) = send(&app, ada.get("/api/skills").to_request()).await;
    assert_eq!(skills[0]["name"], "Rust");
    assert_eq!(skills[0]["proficiency_level"], "beginner");

    let uri = format!("/api/profiles/{}", ada.id);
    let (_, profile) = send(&app, ada.get(&uri).to_request()).await;
    assert_eq!(profile["skills_count"], 1);

    let uri = format!("/api/skills/{}", skill_id);
    let (status, _) = send(&app, bob.delete(&uri).to_request()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let res = test::call_service(&app, ada.delete(&uri).to_request()).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    let (_, skills) = send(&app, ada.get("/api/skills").to_request()).await;
    assert_eq!(skills.as_array().map(Vec::len), Some(0));
}

#[actix_rt::test]
async fn blank_skill_names_fail_validation() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let ada = TestUser::new();

    let (status, body) = send(
        &app,
        ada.post("/api/skills", json!({ "name": "   ", "skill_type": "learn" })).to_request(),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "name");
}

#[actix_rt::test]
async fn explore_pairs_learners_with_teachers_publicly() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let (ada, bob) = (TestUser::new(), TestUser::new());
    upsert_profile(&app, &ada, "Ada").await;
    create_skill(&app, &ada, "Rust", "teach").await;
    create_skill(&app, &bob, "Rust", "learn").await;

    let req = TestRequest::get().uri("/api/matched-swaps?skill=%20Rust%20").to_request();
    let (status, matches) = send(&app, req).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(matches.as_array().map(Vec::len), Some(1));
    assert_eq!(matches[0]["skill_name"], "Rust");
    assert_eq!(matches[0]["learner_id"], bob.id.to_string());
    assert_eq!(matches[0]["teacher_id"], ada.id.to_string());
    assert_eq!(matches[0]["teacher_profile"]["full_name"], "Ada");
}

#[actix_rt::test]
async fn matching_skill_notifies_the_counterpart() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let (ada, bob) = (TestUser::new(), TestUser::new());
    create_skill(&app, &ada, "Rust", "teach").await;
    create_skill(&app, &bob, "Rust", "learn").await;

    let (_, notifications) = send(&app, ada.get("/api/notifications").to_request()).await;

    assert_eq!(notifications[0]["type"], "skill_match");
    assert_eq!(notifications[0]["text"], "Someone wants to learn Rust from you");
}

#[actix_rt::test]
async fn empty_explore_serves_samples_outside_production() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;

    let (_, matches) = send(&app, TestRequest::get().uri("/api/matched-swaps").to_request()).await;

    assert_eq!(matches.as_array().map(Vec::len), Some(2));
    assert_eq!(matches[0]["skill_name"], "React");
}

#[actix_rt::test]
async fn empty_explore_stays_empty_when_samples_are_off() {
    let config = AppConfig { sample_matches: Some(false), ..test_config() };
    let app = test::init_service(build_app(memory_state(&config))).await;

    let (status, matches) = send(&app, TestRequest::get().uri("/api/matched-swaps").to_request()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(matches.as_array().map(Vec::len), Some(0));
}

#[actix_rt::test]
async fn malformed_ids_in_the_path_are_rejected() {
    let app = test::init_service(build_app(memory_state(&test_config()))).await;
    let ada = TestUser::new();

    let (status, body) = send(&app, ada.get("/api/profiles/not-a-uuid").to_request()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "path");

    let (status, _) = send(&app, ada.delete("/api/skills/42").to_request()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
