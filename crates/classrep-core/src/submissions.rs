//! Roster derivation and submission toggles.

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  error::required,
  roster::{Roster, RosterView, Student, Submission},
  store::ClassStore,
};

/// Split all students into submitted / not submitted for `assignment_id`.
///
/// Two independent reads (students, then this assignment's submission rows);
/// nothing is written.
pub async fn derive_roster<S: ClassStore>(
  store: &S,
  assignment_id: Uuid,
) -> Result<Roster> {
  let (students, rows) = fetch(store, assignment_id).await?;
  let roster = Roster::partition(assignment_id, students, &rows);
  debug!(
    %assignment_id,
    submitted = roster.submitted.len(),
    not_submitted = roster.not_submitted.len(),
    "derived roster"
  );
  Ok(roster)
}

/// Load the interactive per-student view used for marking submissions.
pub async fn roster_view<S: ClassStore>(
  store: &S,
  assignment_id: Uuid,
) -> Result<RosterView> {
  let (students, rows) = fetch(store, assignment_id).await?;
  Ok(RosterView::new(assignment_id, students, &rows))
}

async fn fetch<S: ClassStore>(
  store: &S,
  assignment_id: Uuid,
) -> Result<(Vec<Student>, Vec<Submission>)> {
  let students = store.list_students().await.map_err(Error::read)?;
  let rows = store
    .list_submissions(assignment_id)
    .await
    .map_err(Error::read)?;
  Ok((students, rows))
}

/// Upsert the flag for `(student_id, assignment_id)`. Setting `true` stamps
/// the submission date with the current time; `false` clears it. An unknown
/// student is [`Error::NotFound`] and nothing is written.
pub async fn set_submitted<S: ClassStore>(
  store: &S,
  student_id: Uuid,
  assignment_id: Uuid,
  submitted: bool,
) -> Result<Submission> {
  store
    .get_student(student_id)
    .await
    .map_err(Error::read)?
    .ok_or_else(|| Error::not_found("student", student_id))?;

  let row = Submission::marked(student_id, assignment_id, submitted, Utc::now());
  store
    .upsert_submission(row.clone())
    .await
    .map_err(Error::write)?;
  info!(%student_id, %assignment_id, submitted, "submission updated");
  Ok(row)
}

/// Flip one student's flag in `view` and persist it.
///
/// The local flag changes before the write is issued. If the write fails the
/// flag is put back and the error is returned; on success the new value is
/// returned.
pub async fn toggle_submission<S: ClassStore>(
  store: &S,
  view: &mut RosterView,
  student_id: Uuid,
) -> Result<bool> {
  let pending = view
    .begin_toggle(student_id)
    .ok_or_else(|| Error::not_found("student", student_id))?;

  match set_submitted(store, student_id, pending.assignment_id, pending.next)
    .await
  {
    Ok(_) => {
      view.confirm(pending);
      Ok(pending.next)
    }
    Err(e) => {
      warn!(%student_id, error = %e, "submission write failed; reverting local flag");
      view.revert(pending);
      Err(e)
    }
  }
}

// ─── Students ────────────────────────────────────────────────────────────────

pub async fn list_students<S: ClassStore>(store: &S) -> Result<Vec<Student>> {
  store.list_students().await.map_err(Error::read)
}

pub async fn add_student<S: ClassStore>(
  store: &S,
  name: &str,
  roll_no: &str,
) -> Result<Student> {
  let name = required(name, "student name")?;
  let roll_no = required(roll_no, "roll number")?;
  let student = store
    .insert_student(name, roll_no)
    .await
    .map_err(Error::write)?;
  info!(student_id = %student.id, roll_no = %student.roll_no, "student added");
  Ok(student)
}
