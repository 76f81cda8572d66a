//! The semester activation rule.
//!
//! This module is the only writer of `semesters.is_active`. Activation is
//! three writes:
//!
//! 1. every other semester is deactivated;
//! 2. the target semester is activated;
//! 3. the caller's profile is pointed at the target semester.
//!
//! [`activate_atomic`] hands all three to a backend that runs them in one
//! transaction. [`activate`] issues them one at a time for backends that
//! cannot; if a later step fails after an earlier one committed, the error is
//! [`Error::PartialSequenceFailure`] and the caller must reload.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
  Error, Result,
  error::{ActivationStep, Precondition, required},
  semester::Semester,
  store::{AtomicActivation, ClassStore},
};

/// What an activation call did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Activation {
  /// The writes were issued.
  Activated,
  /// The semester was already active and already the caller's scope; no
  /// writes were issued.
  AlreadyActive,
}

/// Look up the target and the caller's profile before any write. Returns
/// `Some` when there is nothing to do.
async fn precheck<S: ClassStore>(
  store: &S,
  semester_id: Uuid,
  user_id: Uuid,
) -> Result<Option<Activation>> {
  let semester = store
    .get_semester(semester_id)
    .await
    .map_err(Error::read)?
    .ok_or_else(|| Error::not_found("semester", semester_id))?;

  let profile = store
    .get_profile(user_id)
    .await
    .map_err(Error::read)?
    .ok_or_else(|| Error::not_found("profile", user_id))?;

  if semester.is_active && profile.semester_id == Some(semester_id) {
    debug!(%semester_id, %user_id, "semester already active; skipping writes");
    return Ok(Some(Activation::AlreadyActive));
  }
  Ok(None)
}

/// Activate `semester_id` for `user_id` using one backend transaction.
///
/// A failure leaves the store as it was and is reported as
/// [`Error::RemoteWriteFailed`].
pub async fn activate_atomic<S: AtomicActivation>(
  store: &S,
  semester_id: Uuid,
  user_id: Uuid,
) -> Result<Activation> {
  if let Some(done) = precheck(store, semester_id, user_id).await? {
    return Ok(done);
  }

  store
    .activate_semester(semester_id, user_id)
    .await
    .map_err(Error::write)?;

  info!(%semester_id, %user_id, "semester activated");
  Ok(Activation::Activated)
}

/// Activate `semester_id` for `user_id` one write at a time.
pub async fn activate<S: ClassStore>(
  store: &S,
  semester_id: Uuid,
  user_id: Uuid,
) -> Result<Activation> {
  if let Some(done) = precheck(store, semester_id, user_id).await? {
    return Ok(done);
  }

  // Nothing has committed yet if the first write fails.
  store
    .deactivate_semesters_except(semester_id)
    .await
    .map_err(Error::write)?;

  // From here on a missing row means it was deleted after the precheck.
  let marked = store
    .mark_semester_active(semester_id)
    .await
    .map_err(|e| partial(ActivationStep::MarkActive, e))?;
  if !marked {
    return Err(partial(
      ActivationStep::MarkActive,
      Error::not_found("semester", semester_id),
    ));
  }

  let bound = store
    .set_profile_semester(user_id, semester_id)
    .await
    .map_err(|e| partial(ActivationStep::BindProfile, e))?;
  if !bound {
    return Err(partial(
      ActivationStep::BindProfile,
      Error::not_found("profile", user_id),
    ));
  }

  info!(%semester_id, %user_id, "semester activated");
  Ok(Activation::Activated)
}

fn partial<E>(step: ActivationStep, e: E) -> Error
where
  E: std::error::Error + Send + Sync + 'static,
{
  warn!(%step, error = %e, "activation stopped part-way; active flags must be reloaded");
  Error::PartialSequenceFailure { step, source: Box::new(e) }
}

// ─── Semester lifecycle ──────────────────────────────────────────────────────

/// Create an inactive semester.
pub async fn create_semester<S: ClassStore>(
  store: &S,
  name: &str,
) -> Result<Semester> {
  let name = required(name, "semester name")?;
  let semester = store.insert_semester(name).await.map_err(Error::write)?;
  info!(semester_id = %semester.id, name = %semester.name, "semester created");
  Ok(semester)
}

/// All semesters, name ascending.
pub async fn list_semesters<S: ClassStore>(store: &S) -> Result<Vec<Semester>> {
  store.list_semesters().await.map_err(Error::read)
}

/// The campus-wide active semester, if one is set.
pub async fn active_semester<S: ClassStore>(
  store: &S,
) -> Result<Option<Semester>> {
  store.find_active_semester().await.map_err(Error::read)
}

/// Delete an inactive semester that owns no subjects.
///
/// Both guards are evaluated before the delete is attempted.
pub async fn delete_semester<S: ClassStore>(
  store: &S,
  semester_id: Uuid,
) -> Result<()> {
  let semester = store
    .get_semester(semester_id)
    .await
    .map_err(Error::read)?
    .ok_or_else(|| Error::not_found("semester", semester_id))?;

  if semester.is_active {
    return Err(Error::PreconditionFailed(Precondition::SemesterIsActive));
  }

  let has_subjects = store
    .semester_has_subjects(semester_id)
    .await
    .map_err(Error::read)?;
  if has_subjects {
    return Err(Error::PreconditionFailed(Precondition::SemesterHasSubjects));
  }

  let deleted = store
    .delete_semester(semester_id)
    .await
    .map_err(Error::write)?;
  if !deleted {
    return Err(Error::not_found("semester", semester_id));
  }

  info!(%semester_id, "semester deleted");
  Ok(())
}
