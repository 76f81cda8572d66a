//! Handlers for the home view and `/subjects` endpoints.
//!
//! Subject listing follows the caller's profile scope unless a
//! `semester_id` is given explicitly, in which case that semester is shown
//! whether or not it is active.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::NaiveDate;
use classrep_core::{
  assignments,
  auth::require_user,
  coursework::Subject,
  scope::{self, HomeView},
  store::ClassStore,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState, assignments::AssignmentItem, auth::Session, error::ApiError,
};

// ─── Home ─────────────────────────────────────────────────────────────────────

/// `GET /home`
pub async fn home<S>(
  State(state): State<AppState<S>>,
  session: Session,
) -> Result<Json<HomeView>, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  let user_id = require_user(&session)?;
  Ok(Json(scope::home(&*state.store, user_id).await?))
}

// ─── List ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub semester_id: Option<Uuid>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SubjectList {
  /// `null` when the caller has no semester in scope.
  pub semester_id: Option<Uuid>,
  pub subjects:    Vec<Subject>,
}

/// `GET /subjects[?semester_id=<uuid>]`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Query(params): Query<ListParams>,
) -> Result<Json<SubjectList>, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  let user_id = require_user(&session)?;
  let store = &*state.store;
  let resolved =
    scope::resolve_scope(store, user_id, params.semester_id).await?;
  let subjects = scope::subjects_in_scope(store, resolved).await?;
  Ok(Json(SubjectList { semester_id: resolved.semester_id(), subjects }))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:        String,
  /// Overrides the caller's profile scope.
  #[serde(default)]
  pub semester_id: Option<Uuid>,
}

/// `POST /subjects`: 412 when no semester is in scope.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  let user_id = require_user(&session)?;
  let subject =
    scope::add_subject(&*state.store, user_id, body.semester_id, &body.name)
      .await?;
  Ok((StatusCode::CREATED, Json(subject)))
}

/// `DELETE /subjects/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  require_user(&session)?;
  scope::delete_subject(&*state.store, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Subject assignments ──────────────────────────────────────────────────────

/// `GET /subjects/{id}/assignments`, due date ascending.
pub async fn list_assignments<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Path(id): Path<Uuid>,
) -> Result<Json<Vec<AssignmentItem>>, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  require_user(&session)?;
  let list = assignments::subject_assignments(&*state.store, id).await?;
  Ok(Json(AssignmentItem::today(list)))
}

#[derive(Debug, Deserialize)]
pub struct NewAssignmentBody {
  pub title:    String,
  /// `YYYY-MM-DD`
  pub due_date: NaiveDate,
}

/// `POST /subjects/{id}/assignments`
pub async fn create_assignment<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Path(id): Path<Uuid>,
  Json(body): Json<NewAssignmentBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  let user_id = require_user(&session)?;
  let assignment = assignments::add_assignment(
    &*state.store,
    user_id,
    id,
    &body.title,
    body.due_date,
  )
  .await?;
  Ok((StatusCode::CREATED, Json(assignment)))
}
