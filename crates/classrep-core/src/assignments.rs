//! Assignment reads and writes under a subject.

use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::{
  Error, Result,
  coursework::{Assignment, AssignmentDetail, NewAssignment, Subject},
  error::required,
  store::ClassStore,
};

async fn subject<S: ClassStore>(store: &S, subject_id: Uuid) -> Result<Subject> {
  store
    .get_subject(subject_id)
    .await
    .map_err(Error::read)?
    .ok_or_else(|| Error::not_found("subject", subject_id))
}

/// Assignments for one subject, due date ascending.
pub async fn subject_assignments<S: ClassStore>(
  store: &S,
  subject_id: Uuid,
) -> Result<Vec<Assignment>> {
  subject(store, subject_id).await?;
  store
    .list_subject_assignments(subject_id)
    .await
    .map_err(Error::read)
}

/// Create an assignment under `subject_id`, recorded as created by
/// `user_id`. The semester is copied from the subject.
pub async fn add_assignment<S: ClassStore>(
  store: &S,
  user_id: Uuid,
  subject_id: Uuid,
  title: &str,
  due_date: NaiveDate,
) -> Result<Assignment> {
  let title = required(title, "assignment title")?;
  let owner = subject(store, subject_id).await?;

  let assignment = store
    .insert_assignment(NewAssignment {
      title,
      due_date,
      subject_id,
      semester_id: owner.semester_id,
      created_by: user_id,
    })
    .await
    .map_err(Error::write)?;

  info!(assignment_id = %assignment.id, %subject_id, %due_date, "assignment added");
  Ok(assignment)
}

pub async fn assignment_detail<S: ClassStore>(
  store: &S,
  assignment_id: Uuid,
) -> Result<AssignmentDetail> {
  let assignment = store
    .get_assignment(assignment_id)
    .await
    .map_err(Error::read)?
    .ok_or_else(|| Error::not_found("assignment", assignment_id))?;
  let subject = subject(store, assignment.subject_id).await?;
  Ok(AssignmentDetail { assignment, subject })
}

pub async fn delete_assignment<S: ClassStore>(
  store: &S,
  assignment_id: Uuid,
) -> Result<()> {
  let deleted = store
    .delete_assignment(assignment_id)
    .await
    .map_err(Error::write)?;
  if !deleted {
    return Err(Error::not_found("assignment", assignment_id));
  }
  info!(%assignment_id, "assignment deleted");
  Ok(())
}
