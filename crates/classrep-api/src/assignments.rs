//! Handlers for `/assignments` endpoints and the submission roster.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/assignments` | Assignments of the active semester |
//! | `GET`    | `/assignments/{id}` | With the owning subject |
//! | `DELETE` | `/assignments/{id}` | |
//! | `GET`    | `/assignments/{id}/roster` | Submitted / not submitted |
//! | `PUT`    | `/assignments/{id}/submissions/{student_id}` | Body: `{"submitted":true}` |

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
};
use chrono::{NaiveDate, Utc};
use classrep_core::{
  assignments,
  auth::require_user,
  coursework::{Assignment, AssignmentDetail},
  roster::{Roster, RosterCounts, Submission},
  scope,
  semester::Semester,
  store::ClassStore,
  submissions,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{AppState, auth::Session, error::ApiError};

/// An assignment annotated with whether it is past due.
#[derive(Debug, Serialize, Deserialize)]
pub struct AssignmentItem {
  #[serde(flatten)]
  pub assignment: Assignment,
  pub overdue:    bool,
}

impl AssignmentItem {
  pub fn on(assignment: Assignment, today: NaiveDate) -> Self {
    let overdue = assignment.is_overdue(today);
    Self { assignment, overdue }
  }

  /// Annotate against the current UTC date.
  pub fn today(list: Vec<Assignment>) -> Vec<Self> {
    let today = Utc::now().date_naive();
    list.into_iter().map(|a| Self::on(a, today)).collect()
  }
}

// ─── Active semester ──────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct ActiveList {
  /// `null` when no semester is active.
  pub semester:    Option<Semester>,
  pub assignments: Vec<AssignmentItem>,
}

/// `GET /assignments`
pub async fn active<S>(
  State(state): State<AppState<S>>,
  session: Session,
) -> Result<Json<ActiveList>, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  require_user(&session)?;
  let list = match scope::active_assignments(&*state.store).await? {
    Some(found) => ActiveList {
      semester:    Some(found.semester),
      assignments: AssignmentItem::today(found.assignments),
    },
    None => ActiveList { semester: None, assignments: Vec::new() },
  };
  Ok(Json(list))
}

// ─── Single assignment ────────────────────────────────────────────────────────

/// `GET /assignments/{id}`
pub async fn get_one<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Path(id): Path<Uuid>,
) -> Result<Json<AssignmentDetail>, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  require_user(&session)?;
  Ok(Json(assignments::assignment_detail(&*state.store, id).await?))
}

/// `DELETE /assignments/{id}`
pub async fn remove<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  require_user(&session)?;
  assignments::delete_assignment(&*state.store, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Roster ───────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize, Deserialize)]
pub struct RosterResponse {
  #[serde(flatten)]
  pub roster: Roster,
  pub counts: RosterCounts,
}

/// `GET /assignments/{id}/roster`
pub async fn roster<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Path(id): Path<Uuid>,
) -> Result<Json<RosterResponse>, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  require_user(&session)?;
  let roster = submissions::derive_roster(&*state.store, id).await?;
  let counts = roster.counts();
  Ok(Json(RosterResponse { roster, counts }))
}

#[derive(Debug, Deserialize)]
pub struct MarkBody {
  pub submitted: bool,
}

/// `PUT /assignments/{id}/submissions/{student_id}`
pub async fn mark<S>(
  State(state): State<AppState<S>>,
  session: Session,
  Path((id, student_id)): Path<(Uuid, Uuid)>,
  Json(body): Json<MarkBody>,
) -> Result<Json<Submission>, ApiError>
where
  S: ClassStore + Clone + 'static,
{
  require_user(&session)?;
  let store = &*state.store;
  // Surface an unknown assignment as 404 rather than a failed write.
  assignments::assignment_detail(store, id).await?;
  let row =
    submissions::set_submitted(store, student_id, id, body.submitted).await?;
  Ok(Json(row))
}
