//! The caller's own account: `/user/me`, profile edits, and role switching.

mod common;

use axum::http::StatusCode;
use common::{body_json, build_test_app};
use serde_json::json;
use totalgrind_core::roles::Role;

#[tokio::test]
async fn me_resolves_linked_coach() {
    let app = build_test_app();
    let mut ana = app.seed_user("Ana", Role::Athlete).await;
    let mut carla = app.seed_user("Carla", Role::Coach).await;
    ana.link.link_to(carla.id);
    carla.athletes.push(ana.id);
    app.repos.users.save_links(&ana).await.unwrap();
    app.repos.users.save_links(&carla).await.unwrap();

    let response = app.get("/api/v1/user/me", &app.token_for(&ana)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["id"], ana.id);
    assert_eq!(json["email"], "ana@example.com");
    assert_eq!(json["role"], "athlete");
    assert_eq!(json["coachId"], carla.id);
    assert_eq!(json["coach"]["name"], "Carla");
}

#[tokio::test]
async fn me_without_coach_has_null_coach() {
    let app = build_test_app();
    let ana = app.seed_user("Ana", Role::Athlete).await;

    let json = body_json(app.get("/api/v1/user/me", &app.token_for(&ana)).await).await;
    assert!(json["coach"].is_null());
    assert!(json["coachRequests"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn profile_update_trims_name() {
    let app = build_test_app();
    let ana = app.seed_user("Ana", Role::Athlete).await;
    let token = app.token_for(&ana);

    let response = app
        .put("/api/v1/user/profile", &token, json!({ "name": "  Ana Lopez " }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["name"], "Ana Lopez");

    let response = app
        .put("/api/v1/user/profile", &token, json!({ "name": "  " }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn role_switch_between_athlete_and_coach() {
    let app = build_test_app();
    let ana = app.seed_user("Ana", Role::Athlete).await;
    let token = app.token_for(&ana);

    let response = app
        .put("/api/v1/users/role", &token, json!({ "role": "coach" }))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["role"], "coach");

    // The role is re-read from the store, so the old token now reaches coach routes.
    let roster = app.get("/api/v1/coach/athletes", &token).await;
    assert_eq!(roster.status(), StatusCode::OK);

    let response = app
        .put("/api/v1/users/role", &token, json!({ "role": "athlete" }))
        .await;
    assert_eq!(body_json(response).await["role"], "athlete");
}

#[tokio::test]
async fn role_switch_refuses_admin_and_unknown_roles() {
    let app = build_test_app();
    let ana = app.seed_user("Ana", Role::Athlete).await;
    let token = app.token_for(&ana);

    for role in ["admin", "superuser", ""] {
        let response = app
            .put("/api/v1/users/role", &token, json!({ "role": role }))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "role {role:?}");
        assert_eq!(
            body_json(response).await["error"],
            "Invalid role. Must be 'athlete' or 'coach'"
        );
    }

    let stored = app.repos.users.find_by_id(ana.id).await.unwrap().unwrap();
    assert_eq!(stored.role, Role::Athlete);
}
