use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use fake::{
    faker::internet::en::Username,
    faker::name::en::{FirstName, LastName},
    Fake,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use uuid::Uuid;

use theater_booking::{
    build_router,
    config::Config,
    models::{user::ROLE_ADMIN, User},
    repositories::{Repositories, Repository},
    AppState,
};

struct TestApp {
    router: Router,
    state: Arc<AppState>,
}

impl TestApp {
    fn new() -> Self {
        let state = AppState::with_repositories(Config::in_memory("test-secret"), Repositories::in_memory());
        TestApp { router: build_router(state.clone()), state }
    }

    async fn send(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Option<String>, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let location = response
            .headers()
            .get(header::LOCATION)
            .map(|v| v.to_str().unwrap().to_string());
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));
        (status, location, body)
    }

    async fn register(&self, username: &str, password: &str) -> Uuid {
        let (status, _, body) = self
            .send(
                Method::POST,
                "/api/users",
                None,
                Some(json!({
                    "username": username,
                    "name": FirstName().fake::<String>(),
                    "surname": LastName().fake::<String>(),
                    "phone": "0641234567",
                    "password": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{body}");
        body["id"].as_str().unwrap().parse().unwrap()
    }

    async fn login(&self, username: &str, password: &str) -> String {
        let (status, _, body) = self
            .send(
                Method::POST,
                "/api/users/login",
                None,
                Some(json!({ "username": username, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        body["token"].as_str().unwrap().to_string()
    }

    async fn admin_token(&self) -> String {
        let admin = User {
            id: Uuid::nil(),
            username: "admin".to_string(),
            name: "Admin".to_string(),
            surname: "Admin".to_string(),
            phone: "000".to_string(),
            password_hash: self.state.auth.hash_password("admin-pw").await.unwrap(),
            role: ROLE_ADMIN.to_string(),
            reservation_count: 0,
        };
        self.state.repos.users.create(admin).await.unwrap();
        self.login("admin", "admin-pw").await
    }

    async fn create(&self, uri: &str, token: &str, body: Value) -> Uuid {
        let (status, _, body) = self.send(Method::POST, uri, Some(token), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{uri}: {body}");
        body["id"].as_str().unwrap().parse().unwrap()
    }
}

struct Venue {
    theater: Uuid,
    hall: Uuid,
    show: Uuid,
    performance: Uuid,
}

async fn venue(app: &TestApp, admin: &str) -> Venue {
    let theater = app
        .create("/api/theaters", admin, json!({ "name": "Narodno pozoriste", "city": "Beograd" }))
        .await;
    let hall = app
        .create(
            "/api/halls",
            admin,
            json!({ "name": "Velika scena", "total_seats": 500, "theater_id": theater }),
        )
        .await;
    let show = app
        .create(
            "/api/shows",
            admin,
            json!({ "title": "Hamlet", "genre": "drama", "premiere_date": "2024-03-01T19:30:00" }),
        )
        .await;
    let performance = app
        .create(
            "/api/performances",
            admin,
            json!({
                "starts_at": "2030-03-15T19:30:00",
                "price": 1200,
                "free_seats": 500,
                "show_id": show,
                "hall_id": hall,
            }),
        )
        .await;
    Venue { theater, hall, show, performance }
}

fn reservation_body(performance: Uuid) -> Value {
    json!({
        "seat_count": 2,
        "total_price": 2400,
        "expires_at": "2099-01-01T00:00:00",
        "performance_id": performance,
    })
}

#[tokio::test]
async fn registered_user_can_be_fetched_and_log_in() {
    let app = TestApp::new();
    let id = app.register("ana77", "pw1").await;

    let (status, _, body) = app.send(Method::GET, &format!("/api/users/{id}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ana77");
    assert_eq!(body["phone"], "0641234567");
    assert_eq!(body["role"], "user");
    assert!(body.get("password_hash").is_none());

    let (status, _, body) = app.send(Method::GET, "/api/users/username/ana77", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], id.to_string());

    let token = app.login("ana77", "pw1").await;
    assert!(!token.is_empty());
}

#[tokio::test]
async fn create_returns_location_of_new_resource() {
    let app = TestApp::new();
    let username: String = Username().fake();
    let (status, location, body) = app
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({
                "username": username,
                "name": "Ana",
                "surname": "Ilic",
                "phone": "0641234567",
                "password": "pw1",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(location, Some(format!("/api/users/{}", body["id"].as_str().unwrap())));
    assert_eq!(body["username"], username.as_str());
}

#[tokio::test]
async fn login_failures() {
    let app = TestApp::new();
    app.register("ana77", "pw1").await;

    let (status, _, _) = app
        .send(Method::POST, "/api/users/login", None, Some(json!({ "username": "ana77", "password": "wrong" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = app
        .send(Method::POST, "/api/users/login", None, Some(json!({ "username": "nobody", "password": "pw1" })))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn invalid_registration_is_rejected() {
    let app = TestApp::new();
    let (status, _, _) = app
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({
                "username": "ana77",
                "name": "Ana",
                "surname": "Ilic",
                "phone": "064123456789",
                "password": "pw1",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.register("ana77", "pw1").await;
    let (status, _, _) = app
        .send(
            Method::POST,
            "/api/users",
            None,
            Some(json!({
                "username": "ana77",
                "name": "Ana",
                "surname": "Ilic",
                "phone": "0641234567",
                "password": "pw2",
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn malformed_body_is_bad_request() {
    let app = TestApp::new();
    let (status, _, body) = app
        .send(Method::POST, "/api/users", None, Some(json!({ "username": "ana77" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");

    let (status, _, _) = app
        .send(Method::POST, "/api/users/login", None, Some(json!({ "username": "ana77", "password": 7 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // no content type at all
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users/login")
        .body(Body::from(r#"{"username":"ana77","password":"pw1"}"#))
        .unwrap();
    let response = app.router.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn user_list_is_admin_only() {
    let app = TestApp::new();
    app.register("ana77", "pw1").await;
    let user = app.login("ana77", "pw1").await;

    let (status, _, _) = app.send(Method::GET, "/api/users", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = app.send(Method::GET, "/api/users", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _, _) = app.send(Method::GET, "/api/users", Some(&user), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = app.admin_token().await;
    let (status, _, body) = app.send(Method::GET, "/api/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn empty_collection_is_no_content() {
    let app = TestApp::new();
    let (status, _, _) = app.send(Method::GET, "/api/theaters", None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn user_updates_own_profile_but_not_role() {
    let app = TestApp::new();
    let id = app.register("ana77", "pw1").await;
    let other = app.register("marko", "pw2").await;
    let token = app.login("ana77", "pw1").await;

    let mut update = json!({
        "id": id,
        "username": "ana78",
        "name": "Ana",
        "surname": "Ilic",
        "phone": "0641111111",
        "password": "pw-new",
    });
    let (status, _, body) = app.send(Method::PUT, "/api/users", Some(&token), Some(update.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ana78");
    app.login("ana78", "pw-new").await;

    update["role"] = json!("admin");
    let (status, _, _) = app.send(Method::PUT, "/api/users", Some(&token), Some(update.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    update["id"] = json!(other);
    update.as_object_mut().unwrap().remove("role");
    let (status, _, _) = app.send(Method::PUT, "/api/users", Some(&token), Some(update)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

fn profile(id: Uuid, username: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "name": "Marko",
        "surname": "Markovic",
        "phone": "0642222222",
    })
}

#[tokio::test]
async fn role_comes_from_stored_user_not_token() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let id = app.register("marko", "pw2").await;

    let mut promote = profile(id, "marko");
    promote["role"] = json!("admin");
    let (status, _, _) = app.send(Method::PUT, "/api/users", Some(&admin), Some(promote)).await;
    assert_eq!(status, StatusCode::OK);

    let marko = app.login("marko", "pw2").await;
    let (status, _, _) = app.send(Method::GET, "/api/users", Some(&marko), None).await;
    assert_eq!(status, StatusCode::OK);

    let mut demote = profile(id, "marko");
    demote["role"] = json!("user");
    let (status, _, _) = app.send(Method::PUT, "/api/users", Some(&admin), Some(demote)).await;
    assert_eq!(status, StatusCode::OK);

    // same token, no longer admin
    let (status, _, _) = app.send(Method::GET, "/api/users", Some(&marko), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = app.send(Method::DELETE, &format!("/api/users/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = app
        .send(Method::POST, "/api/reservations", Some(&marko), Some(reservation_body(Uuid::new_v4())))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_cannot_set_own_reservation_count() {
    let app = TestApp::new();
    let id = app.register("marko", "pw2").await;
    let token = app.login("marko", "pw2").await;

    let mut update = profile(id, "marko");
    update["reservation_count"] = json!(40);
    let (status, _, _) = app.send(Method::PUT, "/api/users", Some(&token), Some(update)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, body) = app.send(Method::GET, &format!("/api/users/{id}"), None, None).await;
    assert_eq!(body["reservation_count"], 0);
}

#[tokio::test]
async fn update_of_missing_record_is_not_found() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let (status, _, _) = app
        .send(
            Method::PUT,
            "/api/theaters",
            Some(&admin),
            Some(json!({ "id": Uuid::new_v4(), "name": "Atelje 212", "city": "Beograd" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_missing_record_is_not_found() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    for resource in ["users", "editors", "theaters", "halls", "shows", "performances", "seats"] {
        let (status, _, _) = app
            .send(Method::DELETE, &format!("/api/{resource}/{}", Uuid::new_v4()), Some(&admin), None)
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{resource}");
    }
}

#[tokio::test]
async fn catalog_writes_require_admin() {
    let app = TestApp::new();
    app.register("ana77", "pw1").await;
    let user = app.login("ana77", "pw1").await;

    let (status, _, _) = app
        .send(Method::POST, "/api/theaters", Some(&user), Some(json!({ "name": "Bitef", "city": "Beograd" })))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn deleting_theater_removes_its_halls() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let venue = venue(&app, &admin).await;

    let (status, _, _) = app
        .send(Method::DELETE, &format!("/api/theaters/{}", venue.theater), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = app.send(Method::GET, &format!("/api/halls/{}", venue.hall), None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _, _) = app
        .send(Method::GET, &format!("/api/performances/{}", venue.performance), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_show_cascades_to_performances() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let venue = venue(&app, &admin).await;

    let (status, _, _) = app
        .send(Method::DELETE, &format!("/api/shows/{}", venue.show), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = app
        .send(Method::GET, &format!("/api/performances/{}", venue.performance), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _, _) = app.send(Method::GET, &format!("/api/halls/{}", venue.hall), None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn reserved_performance_cannot_be_deleted() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let venue = venue(&app, &admin).await;
    app.register("ana77", "pw1").await;
    let user = app.login("ana77", "pw1").await;
    let reservation = app.create("/api/reservations", &user, reservation_body(venue.performance)).await;

    let (status, _, _) = app
        .send(Method::DELETE, &format!("/api/performances/{}", venue.performance), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // once the reservation is gone the performance can go
    let (status, _, _) = app
        .send(Method::DELETE, &format!("/api/reservations/{reservation}"), Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _, _) = app
        .send(Method::DELETE, &format!("/api/performances/{}", venue.performance), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn deleting_user_removes_their_reservations() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let venue = venue(&app, &admin).await;
    let id = app.register("ana77", "pw1").await;
    let user = app.login("ana77", "pw1").await;
    let reservation = app.create("/api/reservations", &user, reservation_body(venue.performance)).await;

    let (status, _, body) = app
        .send(Method::GET, &format!("/api/reservations/{reservation}"), Some(&user), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], id.to_string());

    let (status, _, _) = app.send(Method::DELETE, &format!("/api/users/{id}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, _) = app
        .send(Method::GET, &format!("/api/reservations/{reservation}"), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reservations_are_private_to_their_owner() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let venue = venue(&app, &admin).await;
    app.register("ana77", "pw1").await;
    app.register("marko", "pw2").await;
    let ana = app.login("ana77", "pw1").await;
    let marko = app.login("marko", "pw2").await;
    let reservation = app.create("/api/reservations", &ana, reservation_body(venue.performance)).await;

    let (status, _, _) = app
        .send(Method::GET, &format!("/api/reservations/{reservation}"), Some(&marko), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, _) = app
        .send(Method::DELETE, &format!("/api/reservations/{reservation}"), Some(&marko), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn reservation_for_unknown_performance_is_rejected() {
    let app = TestApp::new();
    app.register("ana77", "pw1").await;
    let user = app.login("ana77", "pw1").await;

    let (status, _, _) = app
        .send(Method::POST, "/api/reservations", Some(&user), Some(reservation_body(Uuid::new_v4())))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut expired = reservation_body(Uuid::new_v4());
    expired["expires_at"] = json!("2000-01-01T00:00:00");
    let (status, _, _) = app.send(Method::POST, "/api/reservations", Some(&user), Some(expired)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn editor_delete_detaches_theater() {
    let app = TestApp::new();
    let admin = app.admin_token().await;
    let editor = app
        .create("/api/editors", &admin, json!({ "name": "Jovan", "username": "jovan", "password": "pw" }))
        .await;
    let theater = app
        .create("/api/theaters", &admin, json!({ "name": "Atelje 212", "city": "Beograd", "editor_id": editor }))
        .await;

    let (status, _, body) = app.send(Method::GET, &format!("/api/editors/{editor}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("password_hash").is_none());

    let (status, _, _) = app.send(Method::DELETE, &format!("/api/editors/{editor}"), Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _, body) = app.send(Method::GET, &format!("/api/theaters/{theater}"), None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["editor_id"], Value::Null);
}

#[tokio::test]
async fn health_check() {
    let app = TestApp::new();
    let (status, _, body) = app.send(Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));

    // no pool behind the in-memory store, so always ready
    let (status, _, _) = app.send(Method::GET, "/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
