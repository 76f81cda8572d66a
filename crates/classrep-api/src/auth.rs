//! HTTP Basic auth resolving the signed-in class rep.
//!
//! The [`Session`] extractor never rejects a request by itself. Handlers ask
//! it for the current user through [`Identity`], and a missing or wrong
//! credential surfaces as [`classrep_core::Error::Unauthenticated`].

use std::convert::Infallible;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use base64::{Engine as _, engine::general_purpose::STANDARD as B64};
use classrep_core::{auth::Identity, store::ClassStore};
use serde::Deserialize;
use uuid::Uuid;

use crate::AppState;

/// One account allowed to sign in.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCredentials {
  /// Stable user id; also the id of the user's profile row.
  pub id:            Uuid,
  pub name:          String,
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Credentials accepted as valid for this server instance.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
  pub users: Vec<UserCredentials>,
}

impl AuthConfig {
  pub fn new(users: Vec<UserCredentials>) -> Self { Self { users } }

  /// Check a Basic `Authorization` header against the configured users.
  pub fn verify(&self, headers: &HeaderMap) -> Option<&UserCredentials> {
    let encoded = headers
      .get(header::AUTHORIZATION)
      .and_then(|v| v.to_str().ok())?
      .strip_prefix("Basic ")?;

    let decoded = B64.decode(encoded).ok()?;
    let creds = std::str::from_utf8(&decoded).ok()?;
    let (username, password) = creds.split_once(':')?;

    let user = self.users.iter().find(|u| u.username == username)?;
    let parsed = PasswordHash::new(&user.password_hash).ok()?;
    Argon2::default()
      .verify_password(password.as_bytes(), &parsed)
      .ok()?;
    Some(user)
  }
}

/// The caller as resolved from the request headers.
#[derive(Debug, Clone, Copy)]
pub struct Session(pub Option<Uuid>);

impl Identity for Session {
  fn current_user(&self) -> Option<Uuid> { self.0 }
}

impl<S> FromRequestParts<AppState<S>> for Session
where
  S: ClassStore + Clone + 'static,
{
  type Rejection = Infallible;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let user = state.auth.verify(&parts.headers).map(|u| u.id);
    if user.is_none() {
      tracing::debug!(uri = %parts.uri, "request without valid credentials");
    }
    Ok(Session(user))
  }
}

#[cfg(test)]
pub(crate) mod tests {
  use argon2::{PasswordHasher, password_hash::SaltString};
  use axum::http::HeaderValue;
  use rand_core::OsRng;

  use super::*;

  pub(crate) fn hash(password: &str) -> String {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string()
  }

  pub(crate) fn basic(user: &str, pass: &str) -> String {
    format!("Basic {}", B64.encode(format!("{user}:{pass}")))
  }

  fn config() -> (AuthConfig, Uuid) {
    let id = Uuid::new_v4();
    let config = AuthConfig::new(vec![UserCredentials {
      id,
      name: "Asha".to_string(),
      username: "asha".to_string(),
      password_hash: hash("secret"),
    }]);
    (config, id)
  }

  fn headers(value: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    headers
  }

  #[test]
  fn correct_credentials() {
    let (config, id) = config();
    let user = config.verify(&headers(&basic("asha", "secret")));
    assert_eq!(user.map(|u| u.id), Some(id));
  }

  #[test]
  fn wrong_password() {
    let (config, _) = config();
    assert!(config.verify(&headers(&basic("asha", "wrong"))).is_none());
  }

  #[test]
  fn unknown_user() {
    let (config, _) = config();
    assert!(config.verify(&headers(&basic("bram", "secret"))).is_none());
  }

  #[test]
  fn missing_or_malformed_header() {
    let (config, _) = config();
    assert!(config.verify(&HeaderMap::new()).is_none());
    assert!(config.verify(&headers("Basic !!!not-base64!!!")).is_none());
    assert!(config.verify(&headers("Bearer abc")).is_none());
  }
}
