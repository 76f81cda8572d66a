//! Semesters and user profiles.
//!
//! Two distinct notions of "current semester" live here and are never
//! collapsed:
//!
//! - the **active semester**: the single [`Semester`] with `is_active`,
//!   campus-wide;
//! - the **profile scope**: [`Profile::semester_id`], the semester one user is
//!   currently working in.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An academic term. At most one semester is active at any time; the flag is
/// written only by [`crate::activation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Semester {
  pub id:        Uuid,
  pub name:      String,
  pub is_active: bool,
}

/// Per-user state. `id` equals the authenticated user id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub id:          Uuid,
  pub name:        String,
  /// The semester this user is viewing, if any.
  pub semester_id: Option<Uuid>,
}
