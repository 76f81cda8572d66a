//! Students, submission flags, and the computed roster.
//!
//! Submission rows are sparse: a student with no row for an assignment has
//! not submitted it. The roster is always derived at read time and never
//! stored.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Records ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
  pub id:      Uuid,
  pub name:    String,
  /// Sortable roll number, e.g. `"21CS014"`. Unique.
  pub roll_no: String,
}

/// One student's flag for one assignment. Identity is
/// `(student_id, assignment_id)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
  pub student_id:      Uuid,
  pub assignment_id:   Uuid,
  pub submitted:       bool,
  pub submission_date: Option<DateTime<Utc>>,
}

impl Submission {
  /// Build the row for setting `submitted`; a `true` flag is stamped with
  /// `now`, a `false` flag carries no date.
  pub fn marked(
    student_id: Uuid,
    assignment_id: Uuid,
    submitted: bool,
    now: DateTime<Utc>,
  ) -> Self {
    Self {
      student_id,
      assignment_id,
      submitted,
      submission_date: submitted.then_some(now),
    }
  }
}

// ─── Roster ──────────────────────────────────────────────────────────────────

/// All students split by whether they submitted one assignment. Both lists
/// are ordered by roll number.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
  pub assignment_id: Uuid,
  pub submitted:     Vec<Student>,
  pub not_submitted: Vec<Student>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterCounts {
  pub submitted:     usize,
  pub not_submitted: usize,
}

impl Roster {
  /// Partition `students` by membership in the set of ids whose submission
  /// row says `submitted = true`.
  pub fn partition(
    assignment_id: Uuid,
    mut students: Vec<Student>,
    submissions: &[Submission],
  ) -> Self {
    let done: HashSet<Uuid> = submissions
      .iter()
      .filter(|s| s.assignment_id == assignment_id && s.submitted)
      .map(|s| s.student_id)
      .collect();

    students.sort_by(|a, b| a.roll_no.cmp(&b.roll_no));
    let (submitted, not_submitted) =
      students.into_iter().partition(|s| done.contains(&s.id));

    Self { assignment_id, submitted, not_submitted }
  }

  pub fn counts(&self) -> RosterCounts {
    RosterCounts {
      submitted:     self.submitted.len(),
      not_submitted: self.not_submitted.len(),
    }
  }
}

// ─── Local view with optimistic toggles ──────────────────────────────────────

/// One row of a [`RosterView`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
  pub student:   Student,
  pub submitted: bool,
  /// A local flip is waiting for the store to confirm it.
  pub pending:   bool,
}

/// The interactive, per-student form of a roster.
///
/// Flips are two-phase: [`RosterView::begin_toggle`] changes the flag locally
/// and hands back a [`PendingToggle`], which must later be passed to either
/// [`RosterView::confirm`] or [`RosterView::revert`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterView {
  pub assignment_id: Uuid,
  pub entries:       Vec<RosterEntry>,
}

/// A local flip that has not been persisted yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a pending toggle must be confirmed or reverted"]
pub struct PendingToggle {
  pub student_id:    Uuid,
  pub assignment_id: Uuid,
  pub previous:      bool,
  pub next:          bool,
}

impl RosterView {
  pub fn new(
    assignment_id: Uuid,
    students: Vec<Student>,
    submissions: &[Submission],
  ) -> Self {
    let roster = Roster::partition(assignment_id, students, submissions);
    let mut entries: Vec<RosterEntry> = roster
      .submitted
      .into_iter()
      .map(|student| RosterEntry { student, submitted: true, pending: false })
      .chain(roster.not_submitted.into_iter().map(|student| RosterEntry {
        student,
        submitted: false,
        pending: false,
      }))
      .collect();
    entries.sort_by(|a, b| a.student.roll_no.cmp(&b.student.roll_no));
    Self { assignment_id, entries }
  }

  pub fn is_submitted(&self, student_id: Uuid) -> Option<bool> {
    self.entry(student_id).map(|e| e.submitted)
  }

  /// Flip a student's flag locally. Returns `None` for an unknown student.
  pub fn begin_toggle(&mut self, student_id: Uuid) -> Option<PendingToggle> {
    let assignment_id = self.assignment_id;
    let entry = self.entry_mut(student_id)?;
    let previous = entry.submitted;
    entry.submitted = !previous;
    entry.pending = true;
    Some(PendingToggle {
      student_id,
      assignment_id,
      previous,
      next: !previous,
    })
  }

  /// The store accepted the flip; keep the new value.
  pub fn confirm(&mut self, pending: PendingToggle) {
    if let Some(entry) = self.entry_mut(pending.student_id) {
      entry.pending = false;
    }
  }

  /// The store rejected the flip; restore the previous value.
  pub fn revert(&mut self, pending: PendingToggle) {
    if let Some(entry) = self.entry_mut(pending.student_id) {
      entry.submitted = pending.previous;
      entry.pending = false;
    }
  }

  /// Collapse back into a [`Roster`], treating pending flips at their local
  /// value.
  pub fn to_roster(&self) -> Roster {
    let (submitted, not_submitted): (Vec<_>, Vec<_>) =
      self.entries.iter().partition(|e| e.submitted);
    Roster {
      assignment_id: self.assignment_id,
      submitted:     submitted.into_iter().map(|e| e.student.clone()).collect(),
      not_submitted: not_submitted
        .into_iter()
        .map(|e| e.student.clone())
        .collect(),
    }
  }

  fn entry(&self, student_id: Uuid) -> Option<&RosterEntry> {
    self.entries.iter().find(|e| e.student.id == student_id)
  }

  fn entry_mut(&mut self, student_id: Uuid) -> Option<&mut RosterEntry> {
    self.entries.iter_mut().find(|e| e.student.id == student_id)
  }
}
