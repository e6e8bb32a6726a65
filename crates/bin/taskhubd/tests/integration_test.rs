//! End-to-end smoke tests for the full taskhubd stack.
//!
//! Each test spins up the complete application (in-memory `SQLite`, real
//! repos, real services, real token codec and hasher, real axum router)
//! and exercises the HTTP layer via `tower::ServiceExt::oneshot` — no TCP
//! port is bound.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use taskhub_adapter_auth_jwt::{Argon2Hasher, JwtCodec};
use taskhub_adapter_http_axum::router;
use taskhub_adapter_http_axum::state::AppState;
use taskhub_adapter_storage_sqlite_sqlx::{
    Config, SqliteProjectRepository, SqliteTaskRepository, SqliteTeamRepository,
    SqliteUserRepository,
};
use taskhub_app::hub::ProjectHub;
use taskhub_app::notify::{LogMailer, spawn_worker};
use taskhub_app::services::auth_service::AuthService;
use taskhub_app::services::project_service::ProjectService;
use taskhub_app::services::task_service::TaskService;
use taskhub_app::services::team_service::TeamService;
use taskhub_app::services::user_service::UserService;
use tower::ServiceExt;

/// Build a fully-wired router backed by an in-memory `SQLite` database.
///
/// Returns the hub alongside the router so tests can subscribe to
/// project events the same way the WebSocket transport does.
async fn app() -> (axum::Router, Arc<ProjectHub>) {
    let db = Config {
        database_url: "sqlite::memory:".to_string(),
    }
    .build()
    .await
    .expect("in-memory database should initialise");

    let pool = db.pool().clone();

    let user_repo = SqliteUserRepository::new(pool.clone());
    let project_repo = SqliteProjectRepository::new(pool.clone());
    let task_repo = SqliteTaskRepository::new(pool.clone());
    let team_repo = SqliteTeamRepository::new(pool);

    let hub = Arc::new(ProjectHub::new(16));
    let (outbox, _worker) = spawn_worker(LogMailer);

    let state = AppState::new(
        AuthService::new(
            user_repo.clone(),
            JwtCodec::new("test-secret", 60),
            Argon2Hasher,
        ),
        UserService::new(user_repo.clone()),
        ProjectService::new(
            project_repo.clone(),
            team_repo.clone(),
            user_repo.clone(),
            Arc::clone(&hub),
        ),
        TaskService::new(
            task_repo,
            project_repo.clone(),
            team_repo.clone(),
            user_repo.clone(),
            Arc::clone(&hub),
            outbox,
        ),
        TeamService::new(team_repo, project_repo, user_repo, Arc::clone(&hub)),
        Arc::clone(&hub),
    );

    (router::build(state), hub)
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(value) => builder
            .header("content-type", "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = resp.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register a user and return their id.
async fn register(app: &axum::Router, name: &str, email: &str, role: &str) -> String {
    let resp = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "name": name,
                "email": email,
                "password": "s3cret-pw",
                "role": role,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    body["id"].as_str().unwrap().to_string()
}

/// Log in and return the bearer token.
async fn login(app: &axum::Router, email: &str) -> String {
    let resp = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": "s3cret-pw" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["token_type"], "bearer");
    body["access_token"].as_str().unwrap().to_string()
}

// ---------------------------------------------------------------------------
// Health check
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_return_ok_when_health_check_called() {
    let (app, _hub) = app().await;
    let resp = app
        .oneshot(request(Method::GET, "/health", None, None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Registration and login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_register_login_and_fetch_own_profile() {
    let (app, _hub) = app().await;

    register(&app, "Alice", "alice@example.com", "owner").await;
    let token = login(&app, "alice@example.com").await;

    let resp = app
        .oneshot(request(Method::GET, "/api/users/me", Some(&token), None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["name"], "Alice");
    assert_eq!(body["email"], "alice@example.com");
    assert_eq!(body["role"], "owner");
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn should_conflict_when_email_differs_only_in_case() {
    let (app, _hub) = app().await;

    register(&app, "Alice", "alice@example.com", "member").await;

    let resp = app
        .oneshot(request(
            Method::POST,
            "/api/auth/register",
            None,
            Some(json!({
                "name": "Imposter",
                "email": "  ALICE@Example.COM ",
                "password": "s3cret-pw",
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn should_reject_request_without_token() {
    let (app, _hub) = app().await;
    let resp = app
        .oneshot(request(Method::GET, "/api/projects", None, None))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Projects, teams, tasks end to end
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_create_project_team_and_task_through_the_full_stack() {
    let (app, hub) = app().await;

    register(&app, "Root", "root@example.com", "admin").await;
    let owner_id = register(&app, "Olive", "olive@example.com", "owner").await;
    let member_id = register(&app, "Mia", "mia@example.com", "member").await;

    let admin_token = login(&app, "root@example.com").await;
    let owner_token = login(&app, "olive@example.com").await;

    // Admin creates a project owned by Olive.
    let resp = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/projects",
            Some(&admin_token),
            Some(json!({
                "name": "Website relaunch",
                "description": "Q4 marketing site",
                "owner_id": owner_id,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let project = json_body(resp).await;
    assert_eq!(project["status"], "active");
    let project_id = project["id"].as_str().unwrap().to_string();

    // Subscribe before the next mutation, like a WebSocket client would.
    let mut events = hub.subscribe(project_id.parse().unwrap());

    // Olive creates a team with Mia; membership picks up Olive too.
    let resp = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/teams",
            Some(&owner_token),
            Some(json!({
                "name": "Frontend",
                "project_id": project_id,
                "member_ids": [member_id],
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let team = json_body(resp).await;
    let members = team["member_ids"].as_array().unwrap();
    assert_eq!(members.len(), 2);
    assert!(members.iter().any(|m| m == member_id.as_str()));
    assert!(members.iter().any(|m| m == owner_id.as_str()));

    let event = events.recv().await.unwrap();
    let event = serde_json::to_value(&event).unwrap();
    assert_eq!(event["event"], "team_created");

    // Admin assigns a task to Mia.
    let resp = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/tasks",
            Some(&admin_token),
            Some(json!({
                "title": "Fix bug",
                "project_id": project_id,
                "assigned_to_id": member_id,
            })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let task = json_body(resp).await;
    assert_eq!(task["title"], "Fix bug");
    assert_eq!(task["status"], "in_progress");

    let event = events.recv().await.unwrap();
    let event = serde_json::to_value(&event).unwrap();
    assert_eq!(event["event"], "task_created");
    assert_eq!(event["title"], "Fix bug");

    // Mia sees the task through her team membership.
    let member_token = login(&app, "mia@example.com").await;
    let task_id = task["id"].as_str().unwrap();
    let resp = app
        .oneshot(request(
            Method::GET,
            &format!("/api/tasks/{task_id}"),
            Some(&member_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn should_forbid_outsider_member_from_reading_a_task() {
    let (app, _hub) = app().await;

    register(&app, "Root", "root@example.com", "admin").await;
    register(&app, "Sam", "sam@example.com", "member").await;
    let admin_token = login(&app, "root@example.com").await;

    let resp = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/projects",
            Some(&admin_token),
            Some(json!({ "name": "Internal tooling" })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let project = json_body(resp).await;
    let project_id = project["id"].as_str().unwrap();

    let resp = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/tasks",
            Some(&admin_token),
            Some(json!({ "title": "Secret work", "project_id": project_id })),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let task = json_body(resp).await;
    let task_id = task["id"].as_str().unwrap();

    // Sam belongs to no team on the project and is not assigned.
    let outsider_token = login(&app, "sam@example.com").await;
    let resp = app
        .oneshot(request(
            Method::GET,
            &format!("/api/tasks/{task_id}"),
            Some(&outsider_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn should_delete_project_and_cascade_its_tasks() {
    let (app, _hub) = app().await;

    register(&app, "Root", "root@example.com", "admin").await;
    let admin_token = login(&app, "root@example.com").await;

    let resp = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/projects",
            Some(&admin_token),
            Some(json!({ "name": "Doomed" })),
        ))
        .await
        .unwrap();
    let project = json_body(resp).await;
    let project_id = project["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/tasks",
            Some(&admin_token),
            Some(json!({ "title": "Orphan-to-be", "project_id": project_id })),
        ))
        .await
        .unwrap();
    let task = json_body(resp).await;
    let task_id = task["id"].as_str().unwrap().to_string();

    let resp = app
        .clone()
        .oneshot(request(
            Method::DELETE,
            &format!("/api/projects/{project_id}"),
            Some(&admin_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let resp = app
        .oneshot(request(
            Method::GET,
            &format!("/api/tasks/{task_id}"),
            Some(&admin_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Admin metrics
// ---------------------------------------------------------------------------

#[tokio::test]
async fn should_report_entity_counts_to_admins_only() {
    let (app, _hub) = app().await;

    register(&app, "Root", "root@example.com", "admin").await;
    register(&app, "Mia", "mia@example.com", "member").await;
    let admin_token = login(&app, "root@example.com").await;
    let member_token = login(&app, "mia@example.com").await;

    let resp = app
        .clone()
        .oneshot(request(
            Method::GET,
            "/api/admin/metrics",
            Some(&admin_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let metrics = json_body(resp).await;
    assert_eq!(metrics["users"], 2);
    assert_eq!(metrics["projects"], 0);
    assert_eq!(metrics["teams"], 0);
    assert_eq!(metrics["tasks"], 0);

    let resp = app
        .oneshot(request(
            Method::GET,
            "/api/admin/metrics",
            Some(&member_token),
            None,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}
