//! Error types for `classrep-core`.

use std::fmt;

use thiserror::Error;
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Why a guarded operation was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Precondition {
  /// The active semester cannot be deleted.
  SemesterIsActive,
  /// A semester that still owns subjects cannot be deleted.
  SemesterHasSubjects,
  /// The caller has neither an explicit semester nor a profile scope.
  NoSemesterSelected,
}

impl fmt::Display for Precondition {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::SemesterIsActive => "the active semester cannot be deleted",
      Self::SemesterHasSubjects => "the semester still has subjects",
      Self::NoSemesterSelected => "no semester selected; activate or open one first",
    })
  }
}

/// A write of the activation sequence that runs after an earlier write has
/// already committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationStep {
  MarkActive,
  BindProfile,
}

impl fmt::Display for ActivationStep {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::MarkActive => "mark semester active",
      Self::BindProfile => "bind profile to semester",
    })
  }
}

#[derive(Debug, Error)]
pub enum Error {
  #[error("{entity} not found: {id}")]
  NotFound { entity: &'static str, id: Uuid },

  #[error("precondition failed: {0}")]
  PreconditionFailed(Precondition),

  #[error("no signed-in user")]
  Unauthenticated,

  #[error("invalid {field}: must not be blank")]
  Invalid { field: &'static str },

  #[error("store read failed: {0}")]
  Store(#[source] BoxError),

  #[error("remote write failed: {0}")]
  RemoteWriteFailed(#[source] BoxError),

  /// Earlier steps of the activation already committed; the active flags
  /// must be reloaded before they are trusted again.
  #[error("activation stopped at step \"{step}\": {source}")]
  PartialSequenceFailure {
    step:   ActivationStep,
    #[source]
    source: BoxError,
  },
}

impl Error {
  pub(crate) fn not_found(entity: &'static str, id: Uuid) -> Self {
    Self::NotFound { entity, id }
  }

  pub(crate) fn read<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::Store(Box::new(e))
  }

  pub(crate) fn write<E>(e: E) -> Self
  where
    E: std::error::Error + Send + Sync + 'static,
  {
    Self::RemoteWriteFailed(Box::new(e))
  }

  /// `true` when the caller should re-fetch authoritative state before
  /// trusting any cached `is_active` flags.
  pub fn requires_reload(&self) -> bool {
    matches!(self, Self::PartialSequenceFailure { .. })
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Trim `value` and reject it if nothing is left.
pub(crate) fn required(value: &str, field: &'static str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::Invalid { field });
  }
  Ok(trimmed.to_owned())
}
