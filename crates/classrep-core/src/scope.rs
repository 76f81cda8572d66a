//! Scope resolution: which semester a view lists subjects and assignments for.
//!
//! Subject views follow the caller's [`Scope`]: an explicit semester the user
//! drilled into, or else their profile pointer. Assignment views follow the
//! campus-wide **active** semester instead; see [`active_assignments`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::{
  Error, Result,
  coursework::{Assignment, Subject},
  error::{Precondition, required},
  semester::{Profile, Semester},
  store::ClassStore,
};

/// The semester a subject view is filtered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "semester_id", rename_all = "snake_case")]
pub enum Scope {
  /// No explicit semester and no profile pointer: render a prompt, query
  /// nothing.
  None,
  Semester(Uuid),
}

impl Scope {
  pub fn semester_id(&self) -> Option<Uuid> {
    match self {
      Self::None => None,
      Self::Semester(id) => Some(*id),
    }
  }
}

/// Decide the scope for `user_id`. An `explicit` semester wins and is used
/// as-is, whether or not it is active.
pub async fn resolve_scope<S: ClassStore>(
  store: &S,
  user_id: Uuid,
  explicit: Option<Uuid>,
) -> Result<Scope> {
  if let Some(id) = explicit {
    return Ok(Scope::Semester(id));
  }

  let profile = store.get_profile(user_id).await.map_err(Error::read)?;
  Ok(match profile.and_then(|p| p.semester_id) {
    Some(id) => Scope::Semester(id),
    None => Scope::None,
  })
}

/// Subjects in `scope`, name ascending. [`Scope::None`] yields an empty list
/// without touching the store.
pub async fn subjects_in_scope<S: ClassStore>(
  store: &S,
  scope: Scope,
) -> Result<Vec<Subject>> {
  let Some(semester_id) = scope.semester_id() else {
    return Ok(Vec::new());
  };
  let subjects = store
    .list_subjects(semester_id)
    .await
    .map_err(Error::read)?;
  debug!(%semester_id, count = subjects.len(), "listed subjects in scope");
  Ok(subjects)
}

// ─── Active-semester assignments ─────────────────────────────────────────────

/// The active semester with its assignments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveAssignments {
  pub semester:    Semester,
  /// Due date ascending.
  pub assignments: Vec<Assignment>,
}

/// Assignments of the campus-wide active semester. This deliberately ignores
/// the caller's profile pointer. `None` when no semester is active.
pub async fn active_assignments<S: ClassStore>(
  store: &S,
) -> Result<Option<ActiveAssignments>> {
  let Some(semester) = store.find_active_semester().await.map_err(Error::read)?
  else {
    return Ok(None);
  };

  let assignments = store
    .list_semester_assignments(semester.id)
    .await
    .map_err(Error::read)?;

  Ok(Some(ActiveAssignments { semester, assignments }))
}

// ─── Home ────────────────────────────────────────────────────────────────────

/// What the home screen shows: the caller, the semester in their profile
/// scope, and its subjects.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HomeView {
  pub profile:  Profile,
  pub semester: Option<Semester>,
  pub subjects: Vec<Subject>,
}

pub async fn home<S: ClassStore>(store: &S, user_id: Uuid) -> Result<HomeView> {
  let profile = store
    .get_profile(user_id)
    .await
    .map_err(Error::read)?
    .ok_or_else(|| Error::not_found("profile", user_id))?;

  let Some(semester_id) = profile.semester_id else {
    return Ok(HomeView { profile, semester: None, subjects: Vec::new() });
  };

  let semester = store
    .get_semester(semester_id)
    .await
    .map_err(Error::read)?;
  let subjects = match &semester {
    Some(_) => subjects_in_scope(store, Scope::Semester(semester_id)).await?,
    None => Vec::new(),
  };

  Ok(HomeView { profile, semester, subjects })
}

// ─── Subject writes ──────────────────────────────────────────────────────────

/// Add a subject to the resolved scope.
pub async fn add_subject<S: ClassStore>(
  store: &S,
  user_id: Uuid,
  explicit: Option<Uuid>,
  name: &str,
) -> Result<Subject> {
  let name = required(name, "subject name")?;

  let Some(semester_id) =
    resolve_scope(store, user_id, explicit).await?.semester_id()
  else {
    return Err(Error::PreconditionFailed(Precondition::NoSemesterSelected));
  };

  store
    .get_semester(semester_id)
    .await
    .map_err(Error::read)?
    .ok_or_else(|| Error::not_found("semester", semester_id))?;

  let subject = store
    .insert_subject(semester_id, name)
    .await
    .map_err(Error::write)?;
  info!(subject_id = %subject.id, %semester_id, "subject added");
  Ok(subject)
}

pub async fn delete_subject<S: ClassStore>(
  store: &S,
  subject_id: Uuid,
) -> Result<()> {
  let deleted = store
    .delete_subject(subject_id)
    .await
    .map_err(Error::write)?;
  if !deleted {
    return Err(Error::not_found("subject", subject_id));
  }
  info!(%subject_id, "subject deleted");
  Ok(())
}
