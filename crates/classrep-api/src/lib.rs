//! JSON REST API for classrep.
//!
//! Exposes an axum [`Router`] backed by any store that implements
//! [`classrep_core::store::AtomicActivation`]. Every route resolves the
//! caller from HTTP Basic credentials; TLS is the caller's responsibility.

pub mod assignments;
pub mod auth;
pub mod error;
pub mod semesters;
pub mod students;
pub mod subjects;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post, put},
};
use classrep_core::store::{AtomicActivation, ClassStore};
use tower_http::trace::TraceLayer;

pub use auth::{AuthConfig, UserCredentials};
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
#[derive(Clone)]
pub struct AppState<S: ClassStore> {
  pub store: Arc<S>,
  pub auth:  Arc<AuthConfig>,
}

impl<S: ClassStore> AppState<S> {
  pub fn new(store: S, auth: AuthConfig) -> Self {
    Self { store: Arc::new(store), auth: Arc::new(auth) }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
  S: AtomicActivation + Clone + 'static,
{
  Router::new()
    // Semesters
    .route(
      "/semesters",
      get(semesters::list::<S>).post(semesters::create::<S>),
    )
    .route("/semesters/active", get(semesters::active::<S>))
    .route("/semesters/{id}", delete(semesters::remove::<S>))
    .route("/semesters/{id}/activate", post(semesters::activate::<S>))
    // Scope and subjects
    .route("/home", get(subjects::home::<S>))
    .route("/subjects", get(subjects::list::<S>).post(subjects::create::<S>))
    .route("/subjects/{id}", delete(subjects::remove::<S>))
    .route(
      "/subjects/{id}/assignments",
      get(subjects::list_assignments::<S>)
        .post(subjects::create_assignment::<S>),
    )
    // Assignments and submissions
    .route("/assignments", get(assignments::active::<S>))
    .route(
      "/assignments/{id}",
      get(assignments::get_one::<S>).delete(assignments::remove::<S>),
    )
    .route("/assignments/{id}/roster", get(assignments::roster::<S>))
    .route(
      "/assignments/{id}/submissions/{student_id}",
      put(assignments::mark::<S>),
    )
    // Students
    .route("/students", get(students::list::<S>).post(students::create::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

#[cfg(test)]
mod tests {
  use argon2::{
    Algorithm, Argon2, Params, PasswordHasher, Version,
    password_hash::SaltString,
  };
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use classrep_core::auth::ensure_profile;
  use classrep_store_sqlite::SqliteStore;
  use rand_core::OsRng;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;
  use uuid::Uuid;

  use super::*;
  use crate::auth::tests::basic;

  // Cheap parameters keep the per-request verification fast in tests.
  fn quick_hash(password: &str) -> String {
    let params = Params::new(1024, 1, 1, None).unwrap();
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  async fn make_state() -> AppState<SqliteStore> {
    let store = SqliteStore::open_in_memory().await.unwrap();
    let user = UserCredentials {
      id:            Uuid::new_v4(),
      name:          "Asha".to_string(),
      username:      "rep".to_string(),
      password_hash: quick_hash("secret"),
    };
    ensure_profile(&store, user.id, &user.name).await.unwrap();
    AppState::new(store, AuthConfig::new(vec![user]))
  }

  async fn send_as(
    state: &AppState<SqliteStore>,
    auth: Option<&str>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
      builder = builder.header(header::AUTHORIZATION, auth);
    }
    let body = match body {
      Some(json) => {
        builder = builder.header(header::CONTENT_TYPE, "application/json");
        Body::from(json.to_string())
      }
      None => Body::empty(),
    };

    let resp = router(state.clone())
      .oneshot(builder.body(body).unwrap())
      .await
      .unwrap();
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  async fn send(
    state: &AppState<SqliteStore>,
    method: &str,
    uri: &str,
    body: Option<Value>,
  ) -> (StatusCode, Value) {
    let auth = basic("rep", "secret");
    send_as(state, Some(&auth), method, uri, body).await
  }

  async fn create_semester(state: &AppState<SqliteStore>, name: &str) -> String {
    let (status, body) =
      send(state, "POST", "/semesters", Some(json!({ "name": name }))).await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
  }

  // ── Auth ────────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn missing_credentials_return_401() {
    let state = make_state().await;
    let auth = basic("rep", "wrong");
    for auth in [None, Some(auth.as_str())] {
      let (status, body) =
        send_as(&state, auth, "GET", "/semesters", None).await;
      assert_eq!(status, StatusCode::UNAUTHORIZED);
      assert!(body["error"].is_string());
    }
  }

  // ── Semesters ───────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn activate_then_home_shows_semester() {
    let state = make_state().await;
    let a = create_semester(&state, "Fall 2024").await;
    let b = create_semester(&state, "Spring 2025").await;

    let (status, _) = send(&state, "GET", "/semesters/active", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) =
      send(&state, "POST", &format!("/semesters/{a}/activate"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["outcome"], "activated");

    let (_, body) =
      send(&state, "POST", &format!("/semesters/{b}/activate"), None).await;
    assert_eq!(body["outcome"], "activated");
    let (_, body) =
      send(&state, "POST", &format!("/semesters/{b}/activate"), None).await;
    assert_eq!(body["outcome"], "already_active");

    let (_, active) = send(&state, "GET", "/semesters/active", None).await;
    assert_eq!(active["id"], b.as_str());

    let (_, list) = send(&state, "GET", "/semesters", None).await;
    let flags: Vec<_> = list
      .as_array()
      .unwrap()
      .iter()
      .map(|s| s["is_active"].as_bool().unwrap())
      .collect();
    assert_eq!(flags, [false, true]);

    let (_, home) = send(&state, "GET", "/home", None).await;
    assert_eq!(home["semester"]["id"], b.as_str());
    assert_eq!(home["profile"]["semester_id"], b.as_str());
  }

  #[tokio::test]
  async fn activate_unknown_semester_is_404() {
    let state = make_state().await;
    let uri = format!("/semesters/{}/activate", Uuid::new_v4());
    let (status, _) = send(&state, "POST", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn blank_semester_name_is_400() {
    let state = make_state().await;
    let (status, _) =
      send(&state, "POST", "/semesters", Some(json!({ "name": "  " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
  }

  #[tokio::test]
  async fn deleting_active_semester_is_refused() {
    let state = make_state().await;
    let a = create_semester(&state, "A").await;
    send(&state, "POST", &format!("/semesters/{a}/activate"), None).await;

    let (status, _) =
      send(&state, "DELETE", &format!("/semesters/{a}"), None).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);

    let (_, list) = send(&state, "GET", "/semesters", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn deleting_idle_semester_succeeds() {
    let state = make_state().await;
    let a = create_semester(&state, "A").await;
    let (status, _) =
      send(&state, "DELETE", &format!("/semesters/{a}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
  }

  // ── Subjects ────────────────────────────────────────────────────────────────

  #[tokio::test]
  async fn subjects_follow_scope() {
    let state = make_state().await;

    let (status, _) =
      send(&state, "POST", "/subjects", Some(json!({ "name": "Optics" }))).await;
    assert_eq!(status, StatusCode::PRECONDITION_FAILED);

    let (_, empty) = send(&state, "GET", "/subjects", None).await;
    assert_eq!(empty["semester_id"], Value::Null);
    assert_eq!(empty["subjects"], json!([]));

    let a = create_semester(&state, "A").await;
    let b = create_semester(&state, "B").await;
    send(&state, "POST", &format!("/semesters/{a}/activate"), None).await;

    for name in ["Optics", "Algebra"] {
      let (status, _) =
        send(&state, "POST", "/subjects", Some(json!({ "name": name }))).await;
      assert_eq!(status, StatusCode::CREATED);
    }
    let body = json!({ "name": "Thermodynamics", "semester_id": b });
    send(&state, "POST", "/subjects", Some(body)).await;

    let (_, own) = send(&state, "GET", "/subjects", None).await;
    let names: Vec<_> = own["subjects"]
      .as_array()
      .unwrap()
      .iter()
      .map(|s| s["name"].as_str().unwrap().to_string())
      .collect();
    assert_eq!(names, ["Algebra", "Optics"]);

    let (_, other) =
      send(&state, "GET", &format!("/subjects?semester_id={b}"), None).await;
    assert_eq!(other["semester_id"], b.as_str());
    assert_eq!(other["subjects"][0]["name"], "Thermodynamics");
  }

  // ── Assignments and roster ──────────────────────────────────────────────────

  #[tokio::test]
  async fn marking_submissions_updates_roster() {
    let state = make_state().await;
    let a = create_semester(&state, "A").await;
    send(&state, "POST", &format!("/semesters/{a}/activate"), None).await;
    let (_, subject) =
      send(&state, "POST", "/subjects", Some(json!({ "name": "Optics" }))).await;
    let subject_id = subject["id"].as_str().unwrap();

    let body = json!({ "title": "Lab 1", "due_date": "2000-01-01" });
    let (status, assignment) = send(
      &state,
      "POST",
      &format!("/subjects/{subject_id}/assignments"),
      Some(body),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(assignment["semester_id"], a.as_str());
    let id = assignment["id"].as_str().unwrap().to_string();

    let mut students = Vec::new();
    for (name, roll) in [("Chen", "03"), ("Asha", "01"), ("Bram", "02")] {
      let body = json!({ "name": name, "roll_no": roll });
      let (_, st) = send(&state, "POST", "/students", Some(body)).await;
      students.push(st["id"].as_str().unwrap().to_string());
    }

    let uri = format!("/assignments/{id}/submissions/{}", students[0]);
    let (status, row) =
      send(&state, "PUT", &uri, Some(json!({ "submitted": true }))).await;
    assert_eq!(status, StatusCode::OK);
    assert!(row["submission_date"].is_string());

    let (_, roster) =
      send(&state, "GET", &format!("/assignments/{id}/roster"), None).await;
    assert_eq!(roster["counts"]["submitted"], 1);
    assert_eq!(roster["counts"]["not_submitted"], 2);
    assert_eq!(roster["submitted"][0]["roll_no"], "03");
    assert_eq!(roster["not_submitted"][0]["roll_no"], "01");

    let (_, active) = send(&state, "GET", "/assignments", None).await;
    assert_eq!(active["assignments"][0]["title"], "Lab 1");
    assert_eq!(active["assignments"][0]["overdue"], true);

    let (_, detail) =
      send(&state, "GET", &format!("/assignments/{id}"), None).await;
    assert_eq!(detail["subject"]["name"], "Optics");
  }

  #[tokio::test]
  async fn marking_unknown_assignment_is_404() {
    let state = make_state().await;
    let uri = format!(
      "/assignments/{}/submissions/{}",
      Uuid::new_v4(),
      Uuid::new_v4()
    );
    let (status, _) =
      send(&state, "PUT", &uri, Some(json!({ "submitted": true }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }

  #[tokio::test]
  async fn marking_unknown_student_is_404() {
    let state = make_state().await;
    let a = create_semester(&state, "A").await;
    let body = json!({ "name": "Optics", "semester_id": a });
    let (_, subject) = send(&state, "POST", "/subjects", Some(body)).await;
    let subject_id = subject["id"].as_str().unwrap().to_string();
    let body = json!({ "title": "Lab", "due_date": "2030-06-01" });
    let (_, assignment) = send(
      &state,
      "POST",
      &format!("/subjects/{subject_id}/assignments"),
      Some(body),
    )
    .await;
    let id = assignment["id"].as_str().unwrap();

    let uri = format!("/assignments/{id}/submissions/{}", Uuid::new_v4());
    let (status, body) =
      send(&state, "PUT", &uri, Some(json!({ "submitted": true }))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().starts_with("student not found"));

    let (_, roster) =
      send(&state, "GET", &format!("/assignments/{id}/roster"), None).await;
    assert_eq!(roster["counts"]["submitted"], 0);
  }

  #[tokio::test]
  async fn deleting_subject_removes_assignments() {
    let state = make_state().await;
    let a = create_semester(&state, "A").await;
    let body = json!({ "name": "Optics", "semester_id": a });
    let (_, subject) = send(&state, "POST", "/subjects", Some(body)).await;
    let subject_id = subject["id"].as_str().unwrap().to_string();
    let body = json!({ "title": "Lab", "due_date": "2030-06-01" });
    let (_, assignment) = send(
      &state,
      "POST",
      &format!("/subjects/{subject_id}/assignments"),
      Some(body),
    )
    .await;
    let id = assignment["id"].as_str().unwrap();

    let (status, _) =
      send(&state, "DELETE", &format!("/subjects/{subject_id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
      send(&state, "GET", &format!("/assignments/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
  }
}
