// ABOUTME: End-to-end router tests over an in-memory database
// ABOUTME: Exercises capability gates, status codes, and response envelopes

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use sqlx::SqlitePool;
use tower::ServiceExt;

use planline_api::{create_baselines_router, create_projects_router, create_users_router};
use planline_projects::DbState;
use planline_rbac::{Role, UserCreateInput};

async fn setup_app() -> (Router, DbState) {
    let pool = SqlitePool::connect(":memory:").await.unwrap();
    planline_projects::db::MIGRATOR.run(&pool).await.unwrap();
    let db = DbState::new(pool);

    let app = Router::new()
        .nest("/api/projects", create_projects_router())
        .nest("/api/baselines", create_baselines_router())
        .nest("/api/users", create_users_router())
        .with_state(db.clone());

    (app, db)
}

async fn add_user(db: &DbState, email: &str, role: Role) -> String {
    db.user_storage
        .create_user(UserCreateInput {
            email: email.to_string(),
            name: email.split('@').next().unwrap().to_string(),
            role,
            avatar_url: None,
        })
        .await
        .unwrap()
        .id
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}

async fn create_project(app: &Router, name: &str, extra: Value) -> String {
    let mut body = json!({ "name": name });
    body.as_object_mut()
        .unwrap()
        .extend(extra.as_object().unwrap().clone());

    let (status, body) = send(app, "POST", "/api/projects", Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_draft(app: &Router, project_id: &str, actor_id: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        &format!("/api/projects/{}/baselines", project_id),
        Some(json!({ "actorId": actor_id })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["data"]["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_project_crud_over_http() {
    let (app, _db) = setup_app().await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/projects",
        Some(json!({
            "name": "Atlas Migration",
            "description": "Data center move"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], json!(true));
    assert_eq!(body["data"]["code"], json!("AM"));
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(&app, "GET", &format!("/api/projects/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], json!("Atlas Migration"));
    assert_eq!(body["data"]["status"], json!("planning"));

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/projects/{}", id),
        Some(json!({ "status": "active", "priority": "high" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("active"));
    assert_eq!(body["data"]["priority"], json!("high"));

    let (status, body) = send(&app, "GET", "/api/projects/nope", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_project_list_pagination_and_status_filter() {
    let (app, _db) = setup_app().await;

    create_project(&app, "Alpha", json!({})).await;
    create_project(&app, "Beta", json!({ "status": "active" })).await;
    create_project(&app, "Gamma", json!({})).await;

    let (status, body) = send(&app, "GET", "/api/projects", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["totalItems"], json!(3));
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 3);

    let (status, body) = send(&app, "GET", "/api/projects?status=active", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["pagination"]["totalItems"], json!(1));
    assert_eq!(body["data"]["data"][0]["name"], json!("Beta"));

    let (status, body) = send(&app, "GET", "/api/projects?page=2&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["pagination"]["hasPreviousPage"], json!(true));
    assert_eq!(body["data"]["pagination"]["hasNextPage"], json!(false));
}

#[tokio::test]
async fn test_project_validation_and_duplicates() {
    let (app, _db) = setup_app().await;

    let (status, body) = send(&app, "POST", "/api/projects", Some(json!({ "name": "" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], json!(false));

    let (status, _) = send(
        &app,
        "POST",
        "/api/projects",
        Some(json!({ "name": "Codebreaker", "code": "bad-code" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    create_project(&app, "Duplicated", json!({ "code": "DUPA" })).await;
    let (status, body) = send(
        &app,
        "POST",
        "/api/projects",
        Some(json!({ "name": "Duplicated", "code": "DUPB" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_delete_project_requires_capability() {
    let (app, db) = setup_app().await;
    let member = add_user(&db, "member@planline.test", Role::TeamMember).await;
    let project_id = create_project(&app, "Doomed", json!({})).await;

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/projects/{}", project_id),
        Some(json!({ "actorId": member })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/projects/{}", project_id),
        Some(json!({ "actorId": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The migration seeds a bootstrap admin
    let (status, body) = send(
        &app,
        "DELETE",
        &format!("/api/projects/{}", project_id),
        Some(json!({ "actorId": "default-admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], json!(true));

    let (status, _) = send(&app, "GET", &format!("/api/projects/{}", project_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_baseline_lifecycle_over_http() {
    let (app, db) = setup_app().await;
    let lead = add_user(&db, "lead@planline.test", Role::ProjectLead).await;
    let pmo = add_user(&db, "pmo@planline.test", Role::Pmo).await;
    let project_id = create_project(&app, "Orion Rollout", json!({})).await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/projects/{}/baselines", project_id),
        Some(json!({ "actorId": lead, "description": "Initial plan" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["status"], json!("draft"));
    assert_eq!(body["data"]["version"], json!(1));
    assert_eq!(body["data"]["label"], json!("V1.0"));
    assert_eq!(body["data"]["isLocked"], json!(false));
    let baseline_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/baselines/{}/submit", baseline_id),
        Some(json!({ "actorId": lead })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("submitted"));
    assert_eq!(body["data"]["submittedBy"], json!(lead.clone()));

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/baselines/{}/approve", baseline_id),
        Some(json!({ "actorId": pmo })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("approved"));
    assert_eq!(body["data"]["isLocked"], json!(true));
    assert_eq!(body["data"]["approvedBy"], json!(pmo.clone()));

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/projects/{}/baselines/current", project_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], json!(baseline_id.clone()));

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/projects/{}/baselines/next-version", project_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["nextVersion"], json!("V2.0"));
}

#[tokio::test]
async fn test_capability_gates_on_transitions() {
    let (app, db) = setup_app().await;
    let lead = add_user(&db, "lead@planline.test", Role::ProjectLead).await;
    let member = add_user(&db, "member@planline.test", Role::TeamMember).await;
    let project_id = create_project(&app, "Guarded", json!({})).await;
    let baseline_id = create_draft(&app, &project_id, &lead).await;

    // Creating a draft needs edit-scope
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/projects/{}/baselines", project_id),
        Some(json!({ "actorId": member })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/baselines/{}/submit", baseline_id),
        Some(json!({ "actorId": member })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["success"], json!(false));
    assert!(body["error"].as_str().unwrap().contains("not allowed"));

    send(
        &app,
        "POST",
        &format!("/api/baselines/{}/submit", baseline_id),
        Some(json!({ "actorId": lead })),
    )
    .await;

    // Leads submit but cannot validate their own work
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/baselines/{}/approve", baseline_id),
        Some(json!({ "actorId": lead })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/baselines/{}/approve", baseline_id),
        Some(json!({ "actorId": "ghost" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Reads are not gated
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/projects/{}/baselines", project_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_reject_flow_over_http() {
    let (app, db) = setup_app().await;
    let lead = add_user(&db, "lead@planline.test", Role::ProjectLead).await;
    let pmo = add_user(&db, "pmo@planline.test", Role::Pmo).await;
    let project_id = create_project(&app, "Rework", json!({})).await;
    let baseline_id = create_draft(&app, &project_id, &lead).await;

    send(
        &app,
        "POST",
        &format!("/api/baselines/{}/submit", baseline_id),
        Some(json!({ "actorId": lead })),
    )
    .await;

    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/baselines/{}/reject", baseline_id),
        Some(json!({ "actorId": pmo, "reason": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/baselines/{}/reject", baseline_id),
        Some(json!({ "actorId": pmo, "reason": "Scope is missing the cutover plan" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("rejected"));
    assert_eq!(body["data"]["rejectedBy"], json!(pmo.clone()));
    assert_eq!(
        body["data"]["rejectionReason"],
        json!("Scope is missing the cutover plan")
    );

    // Rejected baselines cannot be approved
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/baselines/{}/approve", baseline_id),
        Some(json!({ "actorId": pmo })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_restore_flow_over_http() {
    let (app, db) = setup_app().await;
    let lead = add_user(&db, "lead@planline.test", Role::ProjectLead).await;
    let pmo = add_user(&db, "pmo@planline.test", Role::Pmo).await;
    let project_id = create_project(&app, "Versioned", json!({})).await;

    let first = create_draft(&app, &project_id, &lead).await;
    send(
        &app,
        "POST",
        &format!("/api/baselines/{}/submit", first),
        Some(json!({ "actorId": lead })),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/api/baselines/{}/approve", first),
        Some(json!({ "actorId": pmo })),
    )
    .await;

    let second = create_draft(&app, &project_id, &lead).await;
    send(
        &app,
        "POST",
        &format!("/api/baselines/{}/submit", second),
        Some(json!({ "actorId": lead })),
    )
    .await;
    send(
        &app,
        "POST",
        &format!("/api/baselines/{}/approve", second),
        Some(json!({ "actorId": pmo })),
    )
    .await;

    let (status, body) = send(
        &app,
        "POST",
        &format!("/api/baselines/{}/restore", first),
        Some(json!({ "actorId": pmo })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["isLocked"], json!(true));

    // The superseded one keeps its approval but loses the lock
    let (status, body) = send(&app, "GET", &format!("/api/baselines/{}", second), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], json!("approved"));
    assert_eq!(body["data"]["isLocked"], json!(false));

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/projects/{}/baselines/current", project_id),
        None,
    )
    .await;
    assert_eq!(body["data"]["id"], json!(first.clone()));

    // Restoring the current baseline is a conflict
    let (status, _) = send(
        &app,
        "POST",
        &format!("/api/baselines/{}/restore", first),
        Some(json!({ "actorId": pmo })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_baseline_list_pagination() {
    let (app, db) = setup_app().await;
    let lead = add_user(&db, "lead@planline.test", Role::ProjectLead).await;
    let project_id = create_project(&app, "Paged", json!({})).await;

    for _ in 0..3 {
        create_draft(&app, &project_id, &lead).await;
    }

    let (status, body) = send(
        &app,
        "GET",
        &format!("/api/projects/{}/baselines?page=2&limit=2", project_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"]["pagination"]["totalItems"], json!(3));
    assert_eq!(body["data"]["pagination"]["totalPages"], json!(2));
}

#[tokio::test]
async fn test_baseline_create_for_unknown_project() {
    let (app, db) = setup_app().await;
    let lead = add_user(&db, "lead@planline.test", Role::ProjectLead).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/projects/missing/baselines",
        Some(json!({ "actorId": lead })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], json!(false));
}

#[tokio::test]
async fn test_users_and_capabilities_endpoints() {
    let (app, db) = setup_app().await;
    let member = add_user(&db, "member@planline.test", Role::TeamMember).await;

    let (status, body) = send(&app, "GET", "/api/users", None).await;
    assert_eq!(status, StatusCode::OK);
    let emails: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|u| u["email"].as_str().unwrap())
        .collect();
    assert!(emails.contains(&"admin@planline.local"));

    let (status, body) = send(&app, "GET", "/api/users/default-admin/capabilities", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], json!("admin"));
    let grants = body["data"]["capabilities"].as_array().unwrap();
    assert_eq!(grants.len(), 6);
    assert!(grants.iter().all(|g| g["allowed"] == json!(true)));

    let (_, body) = send(
        &app,
        "GET",
        &format!("/api/users/{}/capabilities", member),
        None,
    )
    .await;
    assert!(body["data"]["capabilities"]
        .as_array()
        .unwrap()
        .iter()
        .all(|g| g["allowed"] == json!(false)));

    let (status, _) = send(&app, "GET", "/api/users/ghost", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_role_change_requires_force_override() {
    let (app, db) = setup_app().await;
    let member = add_user(&db, "member@planline.test", Role::TeamMember).await;

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/api/users/{}/role", member),
        Some(json!({ "actorId": member, "role": "pmo" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/api/users/{}/role", member),
        Some(json!({ "actorId": "default-admin", "role": "pmo" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["role"], json!("pmo"));
}
