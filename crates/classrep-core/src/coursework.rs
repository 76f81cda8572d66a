//! Subjects and the assignments set for them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A course taught in one semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
  pub id:          Uuid,
  pub name:        String,
  pub semester_id: Uuid,
}

/// A piece of coursework owned by a subject.
///
/// `semester_id` duplicates the owning subject's semester so that "due this
/// semester" can be listed without a join.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
  pub id:          Uuid,
  pub title:       String,
  pub due_date:    NaiveDate,
  pub subject_id:  Uuid,
  pub semester_id: Uuid,
  pub created_by:  Uuid,
}

impl Assignment {
  /// Due strictly before `today`.
  pub fn is_overdue(&self, today: NaiveDate) -> bool { self.due_date < today }
}

/// Input to [`crate::store::ClassStore::insert_assignment`].
#[derive(Debug, Clone)]
pub struct NewAssignment {
  pub title:       String,
  pub due_date:    NaiveDate,
  pub subject_id:  Uuid,
  pub semester_id: Uuid,
  pub created_by:  Uuid,
}

/// An assignment together with the subject it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentDetail {
  pub assignment: Assignment,
  pub subject:    Subject,
}

#[cfg(test)]
mod tests {
  use super::*;

  fn due(date: NaiveDate) -> Assignment {
    Assignment {
      id:          Uuid::new_v4(),
      title:       "Lab report".into(),
      due_date:    date,
      subject_id:  Uuid::new_v4(),
      semester_id: Uuid::new_v4(),
      created_by:  Uuid::new_v4(),
    }
  }

  #[test]
  fn overdue_only_after_the_due_date() {
    let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
    let a = due(day);
    assert!(!a.is_overdue(day));
    assert!(!a.is_overdue(day.pred_opt().unwrap()));
    assert!(a.is_overdue(day.succ_opt().unwrap()));
  }
}
