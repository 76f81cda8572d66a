//! Handlers for `/students` endpoints.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::IntoResponse,
};
use classrep_core::{
  auth::require_user,
  roster::Student,
  store::ClassStore,
  submissions,
};
use serde::Deserialize;

use crate::{AppState, auth::Session, error::ApiError};

/// `GET /students`, roll number ascending.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  session: Session,
) -> Result<Json<Vec<Student>>, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  require_user(&session)?;
  Ok(Json(submissions::list_students(&*state.store).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateBody {
  pub name:    String,
  pub roll_no: String,
}

/// `POST /students`, body: `{"name":"Asha","roll_no":"21CS001"}`
pub async fn create<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Json(body): Json<CreateBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  require_user(&session)?;
  let student =
    submissions::add_student(&*state.store, &body.name, &body.roll_no).await?;
  Ok((StatusCode::CREATED, Json(student)))
}
