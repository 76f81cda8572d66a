//! Handlers for `/semesters` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/semesters` | Name ascending |
//! | `POST`   | `/semesters` | Body: `{"name":"Fall 2024"}`; created inactive |
//! | `GET`    | `/semesters/active` | 404 when no semester is active |
//! | `POST`   | `/semesters/{id}/activate` | Also points the caller's profile at it |
//! | `DELETE` | `/semesters/{id}` | 412 if active or if it owns subjects |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use classrep_core::{
  activation::{self, Activation},
  auth::require_user,
  semester::Semester,
  store::{AtomicActivation, ClassStore},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::Session, error::ApiError};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /semesters`
pub async fn list<S>(
  State(state): State<AppState<S>>,
  session: Session,
) -> Result<Json<Vec<Semester>>, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  require_user(&session)?;
  Ok(Json(activation::list_semesters(&*state.store).await?))
}

// ─── Create ───────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name: String,
}

/// `POST /semesters`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  require_user(&session)?;
  let semester = activation::create_semester(&*state.store, &body.name).await?;
  Ok((StatusCode::CREATED, Json(semester)))
}

// ─── Active ───────────────────────────────────────────────────────────────────

/// `GET /semesters/active`
pub async fn active<S>(
  State(state): State<AppState<S>>,
  session: Session,
) -> Result<Json<Semester>, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  require_user(&session)?;
  activation::active_semester(&*state.store)
    .await?
    .map(Json)
    .ok_or_else(|| ApiError::NotFound("no semester is active".to_string()))
}

// ─── Activate ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ActivateResponse {
  pub semester_id: Uuid,
  pub outcome:     Activation,
}

/// `POST /semesters/{id}/activate`
pub async fn activate<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Path(id): Path<Uuid>,
) -> Result<Json<ActivateResponse>, ApiError>
where
  S: AtomicActivation + Clone + 'static,
{
  let user_id = require_user(&session)?;
  let outcome = activation::activate_atomic(&*state.store, id, user_id).await?;
  Ok(Json(ActivateResponse { semester_id: id, outcome }))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /semesters/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  require_user(&session)?;
  activation::delete_semester(&*state.store, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
