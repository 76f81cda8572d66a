//! Encoding and decoding helpers between domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! UUIDs are stored as hyphenated lowercase strings, due dates as
//! `YYYY-MM-DD` (so text ordering is date ordering), and timestamps as
//! RFC 3339 strings.

use chrono::{DateTime, NaiveDate, Utc};
use classrep_core::{
  coursework::{Assignment, Subject},
  roster::{Student, Submission},
  semester::{Profile, Semester},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Scalars ─────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

pub fn encode_date(d: NaiveDate) -> String { d.format("%Y-%m-%d").to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, "%Y-%m-%d")
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw values read directly from a `semesters` row.
pub struct RawSemester {
  pub id:        String,
  pub name:      String,
  pub is_active: bool,
}

impl RawSemester {
  pub fn into_semester(self) -> Result<Semester> {
    Ok(Semester {
      id:        decode_uuid(&self.id)?,
      name:      self.name,
      is_active: self.is_active,
    })
  }
}

pub struct RawProfile {
  pub id:          String,
  pub name:        String,
  pub semester_id: Option<String>,
}

impl RawProfile {
  pub fn into_profile(self) -> Result<Profile> {
    Ok(Profile {
      id:          decode_uuid(&self.id)?,
      name:        self.name,
      semester_id: self.semester_id.as_deref().map(decode_uuid).transpose()?,
    })
  }
}

pub struct RawSubject {
  pub id:          String,
  pub name:        String,
  pub semester_id: String,
}

impl RawSubject {
  pub fn into_subject(self) -> Result<Subject> {
    Ok(Subject {
      id:          decode_uuid(&self.id)?,
      name:        self.name,
      semester_id: decode_uuid(&self.semester_id)?,
    })
  }
}

pub struct RawAssignment {
  pub id:          String,
  pub title:       String,
  pub due_date:    String,
  pub subject_id:  String,
  pub semester_id: String,
  pub created_by:  String,
}

impl RawAssignment {
  pub fn into_assignment(self) -> Result<Assignment> {
    Ok(Assignment {
      id:          decode_uuid(&self.id)?,
      title:       self.title,
      due_date:    decode_date(&self.due_date)?,
      subject_id:  decode_uuid(&self.subject_id)?,
      semester_id: decode_uuid(&self.semester_id)?,
      created_by:  decode_uuid(&self.created_by)?,
    })
  }
}

pub struct RawStudent {
  pub id:      String,
  pub name:    String,
  pub roll_no: String,
}

impl RawStudent {
  pub fn into_student(self) -> Result<Student> {
    Ok(Student {
      id:      decode_uuid(&self.id)?,
      name:    self.name,
      roll_no: self.roll_no,
    })
  }
}

pub struct RawSubmission {
  pub student_id:      String,
  pub assignment_id:   String,
  pub submitted:       bool,
  pub submission_date: Option<String>,
}

impl RawSubmission {
  pub fn into_submission(self) -> Result<Submission> {
    Ok(Submission {
      student_id:      decode_uuid(&self.student_id)?,
      assignment_id:   decode_uuid(&self.assignment_id)?,
      submitted:       self.submitted,
      submission_date: self
        .submission_date
        .as_deref()
        .map(decode_dt)
        .transpose()?,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn due_dates_sort_as_text() {
    let early = encode_date(NaiveDate::from_ymd_opt(2025, 2, 9).unwrap());
    let late = encode_date(NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
    assert!(early < late);
    assert_eq!(decode_date(&early).unwrap().to_string(), "2025-02-09");
  }

  #[test]
  fn bad_date_is_reported() {
    assert!(matches!(decode_date("09/02/2025"), Err(Error::DateParse(_))));
  }
}
