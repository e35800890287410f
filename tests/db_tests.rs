//! Tests contra PostgreSQL real
//!
//! `#[sqlx::test]` crea una base nueva por test y aplica `./migrations`;
//! necesitan `DATABASE_URL` apuntando a un servidor donde se puedan crear bases.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::{Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use worksite_tracker::{
    config::EnvironmentConfig,
    controllers::auth_controller::hash_password,
    create_router,
    models::{
        user::{User, UserRole},
        vehicle::VehicleType,
        work_session::{NewWorkSession, WorkSessionStatus},
    },
    repositories::{
        user_repository::UserRepository, vehicle_repository::VehicleRepository,
        work_session_repository::WorkSessionRepository,
    },
    utils::{
        errors::AppError,
        jwt::{verify_token, JwtConfig},
    },
    AppState,
};

const SECRET: &str = "test-secret-for-db-tests";
const PASSWORD: &str = "obra-segura-2025";

fn create_app(pool: &PgPool) -> Router {
    create_router(AppState::new(pool.clone(), EnvironmentConfig::for_tests(SECRET)))
}

async fn seed_user(pool: &PgPool, email: &str, role: UserRole) -> User {
    let hash = hash_password(PASSWORD.to_string()).await.unwrap();
    UserRepository::new(pool.clone())
        .create(email, "Test User", &hash, role)
        .await
        .unwrap()
}

fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": email, "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["token"].as_str().unwrap().to_string()
}

async fn start(app: &Router, token: &str, body: Value) -> (StatusCode, Value) {
    send(app, request(Method::POST, "/api/work-sessions/start", Some(token), Some(body))).await
}

async fn transition(app: &Router, token: &str, id: &str, action: &str, body: Option<Value>) -> (StatusCode, Value) {
    let uri = format!("/api/work-sessions/{}/{}", id, action);
    send(app, request(Method::PUT, &uri, Some(token), body)).await
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_token_matches_stored_user(pool: PgPool) {
    let app = create_app(&pool);
    let admin = seed_user(&pool, "admin@fenix.com", UserRole::Admin).await;

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "admin@fenix.com", "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["id"], admin.id.to_string());
    assert_eq!(body["user"]["role"], "ADMIN");
    assert!(body["user"].get("passwordHash").is_none());

    let claims = verify_token(body["token"].as_str().unwrap(), &JwtConfig::new(SECRET, 86_400)).unwrap();
    assert_eq!(claims.sub, admin.id);
    assert_eq!(claims.role, UserRole::Admin);
    assert_eq!(claims.email, "admin@fenix.com");

    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "email": "admin@fenix.com", "password": "wrong" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_session_lifecycle_over_http(pool: PgPool) {
    let app = create_app(&pool);
    seed_user(&pool, "petre@fenix.com", UserRole::Employee).await;
    let vehicle = VehicleRepository::new(pool.clone())
        .create("Van 1", "ABC-123", VehicleType::Van)
        .await
        .unwrap();
    let token = login(&app, "petre@fenix.com").await;

    let (status, session) = start(
        &app,
        &token,
        json!({
            "vehicleId": vehicle.id,
            "startLocation": "Site A",
            "workDescription": "Framing",
            "startKilometers": 100
        }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{}", session);
    assert_eq!(session["status"], "ACTIVE");
    assert_eq!(session["vehicle"]["plate"], "ABC-123");
    let id = session["id"].as_str().unwrap().to_string();

    // Solo una jornada abierta por usuario
    let (status, body) = start(&app, &token, json!({ "startLocation": "Site B" })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // Sin cuerpo: pausa sin motivo
    let (status, paused) = transition(&app, &token, &id, "pause", None).await;
    assert_eq!(status, StatusCode::OK, "{}", paused);
    assert_eq!(paused["status"], "PAUSED");
    assert_eq!(paused["breaks"].as_array().unwrap().len(), 1);

    let (status, body) = transition(&app, &token, &id, "pause", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");

    let (status, resumed) = transition(&app, &token, &id, "resume", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resumed["status"], "ACTIVE");
    assert!(!resumed["breaks"][0]["endTime"].is_null());

    let (status, body) = transition(&app, &token, &id, "resume", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");

    let (status, completed) = transition(
        &app,
        &token,
        &id,
        "end",
        Some(json!({ "endLocation": "Site A", "endKilometers": 150 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", completed);
    assert_eq!(completed["status"], "COMPLETED");
    assert_eq!(completed["totalKilometers"].as_f64(), Some(50.0));
    assert!(!completed["endTime"].is_null());

    let (status, body) = transition(
        &app,
        &token,
        &id,
        "end",
        Some(json!({ "endLocation": "Site A" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_STATE");

    // Cerrada la anterior, se puede abrir otra
    let (status, _) = start(&app, &token, json!({ "startLocation": "Site B" })).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, own) = send(&app, request(Method::GET, "/api/work-sessions", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    let own = own.as_array().unwrap();
    assert_eq!(own.len(), 2);
    assert_eq!(own[1]["id"], id.as_str());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_end_while_paused_closes_open_break(pool: PgPool) {
    let app = create_app(&pool);
    seed_user(&pool, "petre@fenix.com", UserRole::Employee).await;
    let token = login(&app, "petre@fenix.com").await;

    let (_, session) = start(&app, &token, json!({ "startLocation": "Site A" })).await;
    let id = session["id"].as_str().unwrap().to_string();

    let (status, _) = transition(&app, &token, &id, "pause", Some(json!({ "reason": "lunch" }))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, completed) = transition(
        &app,
        &token,
        &id,
        "end",
        Some(json!({ "endLocation": "Site A", "endKilometers": 20 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{}", completed);
    assert_eq!(completed["status"], "COMPLETED");
    assert!(completed["totalKilometers"].is_null());
    let breaks = completed["breaks"].as_array().unwrap();
    assert_eq!(breaks.len(), 1);
    assert_eq!(breaks[0]["reason"], "lunch");
    assert_eq!(breaks[0]["endTime"], completed["endTime"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_other_users_session_is_not_found(pool: PgPool) {
    let app = create_app(&pool);
    seed_user(&pool, "owner@fenix.com", UserRole::Employee).await;
    seed_user(&pool, "other@fenix.com", UserRole::Employee).await;
    seed_user(&pool, "admin@fenix.com", UserRole::Admin).await;
    let owner = login(&app, "owner@fenix.com").await;
    let other = login(&app, "other@fenix.com").await;
    let admin = login(&app, "admin@fenix.com").await;

    let (_, session) = start(&app, &owner, json!({ "startLocation": "Site A" })).await;
    let id = session["id"].as_str().unwrap().to_string();

    let (status, body) = transition(&app, &other, &id, "pause", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    let (status, body) = transition(&app, &other, &id, "end", Some(json!({ "endLocation": "x" }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    // Los administradores pueden operar cualquier jornada
    let (status, paused) = transition(&app, &admin, &id, "pause", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(paused["status"], "PAUSED");

    // Una posición no puede colgarse de la jornada de otro
    let (status, _) = send(
        &app,
        request(
            Method::POST,
            "/api/location",
            Some(&other),
            Some(json!({ "latitude": 41.99, "longitude": 21.42, "workSessionId": id })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_repository_transitions_at_fixed_times(pool: PgPool) {
    let user = seed_user(&pool, "petre@fenix.com", UserRole::Employee).await;
    let repository = WorkSessionRepository::new(pool.clone());
    let t0 = Utc.timestamp_opt(Utc::now().timestamp() - 6 * 3600, 0).unwrap();

    let session = repository
        .create(
            NewWorkSession {
                user_id: user.id,
                vehicle_id: None,
                start_location: "Site A".to_string(),
                work_description: String::new(),
                start_kilometers: Some(Decimal::from(100)),
            },
            t0,
        )
        .await
        .unwrap();

    let pause = session.plan_pause("lunch".to_string(), t0 + Duration::hours(2)).unwrap();
    let paused = repository.apply_pause(&session, &pause).await.unwrap();
    assert_eq!(paused.status, WorkSessionStatus::Paused);
    assert_eq!(paused.version, 1);

    // Un plan calculado sobre la versión anterior ya no aplica
    let stale = repository.apply_pause(&session, &pause).await;
    assert!(matches!(stale, Err(AppError::Conflict(_))));

    let open_break = repository.find_open_break(session.id).await.unwrap();
    assert!(open_break.is_some());

    let resume = paused.plan_resume(open_break.as_ref(), t0 + Duration::hours(3)).unwrap();
    let resumed = repository.apply_resume(&paused, &resume).await.unwrap();
    assert_eq!(resumed.break_duration, 60);
    assert!(repository.find_open_break(session.id).await.unwrap().is_none());

    let end = resumed
        .plan_end(None, "Site B".to_string(), Some(Decimal::from(150)), t0 + Duration::hours(5))
        .unwrap();
    let completed = repository.apply_end(&resumed, &end).await.unwrap();
    assert_eq!(completed.status, WorkSessionStatus::Completed);
    assert_eq!(completed.total_kilometers, Some(Decimal::from(50)));
    assert_eq!(completed.break_duration, 60);
    assert!((completed.total_hours.unwrap() - 4.0).abs() < 1e-9);
    assert_eq!(completed.version, 3);

    let totals = repository.totals(Some(user.id), None, None).await.unwrap();
    assert_eq!(totals.len(), 1);
    assert_eq!(totals[0].total_kilometers, Some(Decimal::from(50)));
}

#[sqlx::test(migrations = "./migrations")]
async fn test_duplicate_plate_is_conflict(pool: PgPool) {
    let repository = VehicleRepository::new(pool.clone());
    repository.create("Van 1", "ABC-123", VehicleType::Van).await.unwrap();

    // Sin la comprobación previa del controlador, como en dos altas simultáneas
    let duplicate = repository.create("Van 2", "ABC-123", VehicleType::Truck).await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let app = create_app(&pool);
    seed_user(&pool, "admin@fenix.com", UserRole::Admin).await;
    let admin = login(&app, "admin@fenix.com").await;
    let (status, body) = send(
        &app,
        request(
            Method::POST,
            "/api/vehicles",
            Some(&admin),
            Some(json!({ "name": "Van 3", "plate": "abc-123", "type": "VAN" })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_admin_filters_and_latest_locations(pool: PgPool) {
    let app = create_app(&pool);
    let first = seed_user(&pool, "first@fenix.com", UserRole::Employee).await;
    seed_user(&pool, "second@fenix.com", UserRole::Employee).await;
    seed_user(&pool, "admin@fenix.com", UserRole::Admin).await;
    let first_token = login(&app, "first@fenix.com").await;
    let second_token = login(&app, "second@fenix.com").await;
    let admin = login(&app, "admin@fenix.com").await;

    let (_, session) = start(&app, &first_token, json!({ "startLocation": "Site A" })).await;
    start(&app, &second_token, json!({ "startLocation": "Site B" })).await;

    for latitude in [41.10, 41.20] {
        let (status, _) = send(
            &app,
            request(
                Method::POST,
                "/api/location",
                Some(&first_token),
                Some(json!({
                    "latitude": latitude,
                    "longitude": 21.42,
                    "accuracy": 5.0,
                    "workSessionId": session["id"]
                })),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let uri = format!("/api/admin/work-sessions?userId={}", first.id);
    let (status, sessions) = send(&app, request(Method::GET, &uri, Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    let sessions = sessions.as_array().unwrap();
    assert_eq!(sessions.len(), 1);
    assert_eq!(sessions[0]["user"]["email"], "first@fenix.com");

    let (_, all) = send(&app, request(Method::GET, "/api/admin/work-sessions", Some(&admin), None)).await;
    assert_eq!(all.as_array().unwrap().len(), 2);

    let (_, completed) = send(
        &app,
        request(Method::GET, "/api/admin/work-sessions?status=COMPLETED", Some(&admin), None),
    )
    .await;
    assert!(completed.as_array().unwrap().is_empty());

    // Una fila por usuario con la posición más reciente
    let (status, locations) = send(&app, request(Method::GET, "/api/admin/locations", Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    let locations = locations.as_array().unwrap();
    assert_eq!(locations.len(), 1);
    assert_eq!(locations[0]["userId"], first.id.to_string());
    assert_eq!(locations[0]["latitude"].as_f64(), Some(41.20));
    assert_eq!(locations[0]["user"]["email"], "first@fenix.com");

    let (status, stats) = send(&app, request(Method::GET, "/api/admin/stats", Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["activeSessions"], 2);
    assert_eq!(stats["totalUsers"], 2);
}
