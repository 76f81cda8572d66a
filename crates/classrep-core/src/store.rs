//! The `ClassStore` trait.
//!
//! The trait is implemented by storage backends (e.g.
//! `classrep-store-sqlite`). It mirrors the table-level primitives the
//! workflows need (select / insert / update / upsert / delete) as one typed
//! method per use, so the workflows never build queries themselves.
//!
//! Writers of `semesters.is_active` ([`ClassStore::deactivate_semesters_except`],
//! [`ClassStore::mark_semester_active`], [`AtomicActivation`]) must only be
//! called from [`crate::activation`].

use std::future::Future;

use uuid::Uuid;

use crate::{
  coursework::{Assignment, NewAssignment, Subject},
  roster::{Student, Submission},
  semester::{Profile, Semester},
};

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a classrep storage backend.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`).
pub trait ClassStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Semesters ─────────────────────────────────────────────────────────

  /// Insert a new, inactive semester.
  fn insert_semester(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Semester, Self::Error>> + Send + '_;

  fn get_semester(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Semester>, Self::Error>> + Send + '_;

  /// All semesters ordered by name ascending.
  fn list_semesters(
    &self,
  ) -> impl Future<Output = Result<Vec<Semester>, Self::Error>> + Send + '_;

  /// The semester with `is_active = true`, if any.
  fn find_active_semester(
    &self,
  ) -> impl Future<Output = Result<Option<Semester>, Self::Error>> + Send + '_;

  /// `UPDATE semesters SET is_active = false WHERE id != keep`.
  fn deactivate_semesters_except(
    &self,
    keep: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  /// `UPDATE semesters SET is_active = true WHERE id = id`. Returns `false`
  /// if no row matched.
  fn mark_semester_active(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  /// Returns `false` if no row was deleted.
  fn delete_semester(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Profiles ──────────────────────────────────────────────────────────

  /// Create the profile for `id` if it does not exist, and return it.
  fn ensure_profile(
    &self,
    id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<Profile, Self::Error>> + Send + '_;

  fn get_profile(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Profile>, Self::Error>> + Send + '_;

  /// `UPDATE profiles SET semester_id = semester_id WHERE id = user_id`.
  /// Returns `false` if no row matched.
  fn set_profile_semester(
    &self,
    user_id: Uuid,
    semester_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Subjects ──────────────────────────────────────────────────────────

  fn insert_subject(
    &self,
    semester_id: Uuid,
    name: String,
  ) -> impl Future<Output = Result<Subject, Self::Error>> + Send + '_;

  fn get_subject(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Subject>, Self::Error>> + Send + '_;

  /// Subjects of one semester ordered by name ascending.
  fn list_subjects(
    &self,
    semester_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Subject>, Self::Error>> + Send + '_;

  /// Existence check: at least one subject references `semester_id`.
  fn semester_has_subjects(
    &self,
    semester_id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  fn delete_subject(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Assignments ───────────────────────────────────────────────────────

  fn insert_assignment(
    &self,
    input: NewAssignment,
  ) -> impl Future<Output = Result<Assignment, Self::Error>> + Send + '_;

  fn get_assignment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Assignment>, Self::Error>> + Send + '_;

  /// Assignments of one subject ordered by due date ascending.
  fn list_subject_assignments(
    &self,
    subject_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  /// Assignments whose denormalised `semester_id` matches, ordered by due
  /// date ascending.
  fn list_semester_assignments(
    &self,
    semester_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Assignment>, Self::Error>> + Send + '_;

  fn delete_assignment(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool, Self::Error>> + Send + '_;

  // ── Students & submissions ────────────────────────────────────────────

  fn insert_student(
    &self,
    name: String,
    roll_no: String,
  ) -> impl Future<Output = Result<Student, Self::Error>> + Send + '_;

  fn get_student(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Student>, Self::Error>> + Send + '_;

  /// All students ordered by roll number ascending.
  fn list_students(
    &self,
  ) -> impl Future<Output = Result<Vec<Student>, Self::Error>> + Send + '_;

  /// Every submission row for one assignment.
  fn list_submissions(
    &self,
    assignment_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Submission>, Self::Error>> + Send + '_;

  /// Insert or replace the row keyed by `(student_id, assignment_id)`.
  fn upsert_submission(
    &self,
    row: Submission,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}

/// Backends that can run the whole activation as one transaction.
pub trait AtomicActivation: ClassStore {
  /// Deactivate every other semester, activate `semester_id`, and point
  /// `user_id`'s profile at it. Either all three writes commit or none do.
  fn activate_semester(
    &self,
    semester_id: Uuid,
    user_id: Uuid,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
