//! The authentication collaborator.

use tracing::debug;
use uuid::Uuid;

use crate::{Error, Result, semester::Profile, store::ClassStore};

/// Anything that can name the signed-in user.
pub trait Identity {
  fn current_user(&self) -> Option<Uuid>;
}

impl Identity for Option<Uuid> {
  fn current_user(&self) -> Option<Uuid> { *self }
}

/// The signed-in user's id, or [`Error::Unauthenticated`].
pub fn require_user(identity: &impl Identity) -> Result<Uuid> {
  identity.current_user().ok_or(Error::Unauthenticated)
}

/// Make sure a profile row exists for a user who can sign in.
pub async fn ensure_profile<S: ClassStore>(
  store: &S,
  user_id: Uuid,
  name: &str,
) -> Result<Profile> {
  let profile = store
    .ensure_profile(user_id, name.to_owned())
    .await
    .map_err(Error::write)?;
  debug!(%user_id, semester = ?profile.semester_id, "profile ready");
  Ok(profile)
}
