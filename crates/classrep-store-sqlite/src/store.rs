//! [`SqliteStore`]: the SQLite implementation of [`ClassStore`].

use std::path::Path;

use rusqlite::OptionalExtension as _;
use tracing::debug;
use uuid::Uuid;

use classrep_core::{
  coursework::{Assignment, NewAssignment, Subject},
  roster::{Student, Submission},
  semester::{Profile, Semester},
  store::{AtomicActivation, ClassStore},
};

use crate::{
  Result,
  encode::{
    RawAssignment, RawProfile, RawSemester, RawStudent, RawSubject,
    RawSubmission, encode_date, encode_dt, encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row mappers ─────────────────────────────────────────────────────────────

const SEMESTER_COLS: &str = "id, name, is_active";
const ASSIGNMENT_COLS: &str =
  "id, title, due_date, subject_id, semester_id, created_by";

fn semester_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSemester> {
  Ok(RawSemester {
    id:        row.get(0)?,
    name:      row.get(1)?,
    is_active: row.get(2)?,
  })
}

fn profile_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawProfile> {
  Ok(RawProfile {
    id:          row.get(0)?,
    name:        row.get(1)?,
    semester_id: row.get(2)?,
  })
}

fn subject_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSubject> {
  Ok(RawSubject {
    id:          row.get(0)?,
    name:        row.get(1)?,
    semester_id: row.get(2)?,
  })
}

fn assignment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAssignment> {
  Ok(RawAssignment {
    id:          row.get(0)?,
    title:       row.get(1)?,
    due_date:    row.get(2)?,
    subject_id:  row.get(3)?,
    semester_id: row.get(4)?,
    created_by:  row.get(5)?,
  })
}

fn student_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawStudent> {
  Ok(RawStudent {
    id:      row.get(0)?,
    name:    row.get(1)?,
    roll_no: row.get(2)?,
  })
}

fn submission_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSubmission> {
  Ok(RawSubmission {
    student_id:      row.get(0)?,
    assignment_id:   row.get(1)?,
    submitted:       row.get(2)?,
    submission_date: row.get(3)?,
  })
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A classrep store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref().to_path_buf();
    let conn = tokio_rusqlite::Connection::open(&path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    debug!(path = %path.display(), "opened sqlite store");
    Ok(store)
  }

  /// Open an in-memory store, useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Run a statement that affects rows by id; `true` if any row changed.
  async fn execute_by_id(&self, sql: &'static str, id: Uuid) -> Result<bool> {
    let id_str = encode_uuid(id);
    let changed = self
      .conn
      .call(move |conn| Ok(conn.execute(sql, rusqlite::params![id_str])?))
      .await?;
    Ok(changed > 0)
  }
}

// ─── ClassStore impl ─────────────────────────────────────────────────────────

impl ClassStore for SqliteStore {
  type Error = crate::Error;

  // ── Semesters ─────────────────────────────────────────────────────────────

  async fn insert_semester(&self, name: String) -> Result<Semester> {
    let semester = Semester { id: Uuid::new_v4(), name, is_active: false };

    let id_str = encode_uuid(semester.id);
    let name = semester.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO semesters (id, name, is_active) VALUES (?1, ?2, 0)",
          rusqlite::params![id_str, name],
        )?;
        Ok(())
      })
      .await?;

    Ok(semester)
  }

  async fn get_semester(&self, id: Uuid) -> Result<Option<Semester>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSemester> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {SEMESTER_COLS} FROM semesters WHERE id = ?1"),
              rusqlite::params![id_str],
              semester_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSemester::into_semester).transpose()
  }

  async fn list_semesters(&self) -> Result<Vec<Semester>> {
    let raws: Vec<RawSemester> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SEMESTER_COLS} FROM semesters ORDER BY name ASC"
        ))?;
        let rows = stmt
          .query_map([], semester_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSemester::into_semester).collect()
  }

  async fn find_active_semester(&self) -> Result<Option<Semester>> {
    let raw: Option<RawSemester> = self
      .conn
      .call(|conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SEMESTER_COLS} FROM semesters WHERE is_active = 1 LIMIT 1"
              ),
              [],
              semester_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSemester::into_semester).transpose()
  }

  async fn deactivate_semesters_except(&self, keep: Uuid) -> Result<()> {
    self
      .execute_by_id(
        "UPDATE semesters SET is_active = 0 WHERE id != ?1 AND is_active = 1",
        keep,
      )
      .await?;
    Ok(())
  }

  async fn mark_semester_active(&self, id: Uuid) -> Result<bool> {
    self
      .execute_by_id("UPDATE semesters SET is_active = 1 WHERE id = ?1", id)
      .await
  }

  async fn delete_semester(&self, id: Uuid) -> Result<bool> {
    self
      .execute_by_id("DELETE FROM semesters WHERE id = ?1", id)
      .await
  }

  // ── Profiles ──────────────────────────────────────────────────────────────

  async fn ensure_profile(&self, id: Uuid, name: String) -> Result<Profile> {
    let id_str = encode_uuid(id);

    let raw: RawProfile = self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO profiles (id, name) VALUES (?1, ?2)
           ON CONFLICT (id) DO NOTHING",
          rusqlite::params![id_str, name],
        )?;
        Ok(conn.query_row(
          "SELECT id, name, semester_id FROM profiles WHERE id = ?1",
          rusqlite::params![id_str],
          profile_row,
        )?)
      })
      .await?;

    raw.into_profile()
  }

  async fn get_profile(&self, id: Uuid) -> Result<Option<Profile>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawProfile> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, semester_id FROM profiles WHERE id = ?1",
              rusqlite::params![id_str],
              profile_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawProfile::into_profile).transpose()
  }

  async fn set_profile_semester(
    &self,
    user_id:     Uuid,
    semester_id: Uuid,
  ) -> Result<bool> {
    let user_str = encode_uuid(user_id);
    let sem_str  = encode_uuid(semester_id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE profiles SET semester_id = ?1 WHERE id = ?2",
          rusqlite::params![sem_str, user_str],
        )?)
      })
      .await?;
    Ok(changed > 0)
  }

  // ── Subjects ──────────────────────────────────────────────────────────────

  async fn insert_subject(&self, semester_id: Uuid, name: String) -> Result<Subject> {
    let subject = Subject { id: Uuid::new_v4(), name, semester_id };

    let id_str  = encode_uuid(subject.id);
    let sem_str = encode_uuid(semester_id);
    let name    = subject.name.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO subjects (id, name, semester_id) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, sem_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(subject)
  }

  async fn get_subject(&self, id: Uuid) -> Result<Option<Subject>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawSubject> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, semester_id FROM subjects WHERE id = ?1",
              rusqlite::params![id_str],
              subject_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawSubject::into_subject).transpose()
  }

  async fn list_subjects(&self, semester_id: Uuid) -> Result<Vec<Subject>> {
    let sem_str = encode_uuid(semester_id);

    let raws: Vec<RawSubject> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, semester_id FROM subjects
           WHERE semester_id = ?1
           ORDER BY name ASC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![sem_str], subject_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubject::into_subject).collect()
  }

  async fn semester_has_subjects(&self, semester_id: Uuid) -> Result<bool> {
    let sem_str = encode_uuid(semester_id);

    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM subjects WHERE semester_id = ?1 LIMIT 1",
              rusqlite::params![sem_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;

    Ok(exists)
  }

  async fn delete_subject(&self, id: Uuid) -> Result<bool> {
    self
      .execute_by_id("DELETE FROM subjects WHERE id = ?1", id)
      .await
  }

  // ── Assignments ───────────────────────────────────────────────────────────

  async fn insert_assignment(&self, input: NewAssignment) -> Result<Assignment> {
    let assignment = Assignment {
      id:          Uuid::new_v4(),
      title:       input.title,
      due_date:    input.due_date,
      subject_id:  input.subject_id,
      semester_id: input.semester_id,
      created_by:  input.created_by,
    };

    let id_str      = encode_uuid(assignment.id);
    let title       = assignment.title.clone();
    let due_str     = encode_date(assignment.due_date);
    let subject_str = encode_uuid(assignment.subject_id);
    let sem_str     = encode_uuid(assignment.semester_id);
    let by_str      = encode_uuid(assignment.created_by);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO assignments (
             id, title, due_date, subject_id, semester_id, created_by
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![id_str, title, due_str, subject_str, sem_str, by_str],
        )?;
        Ok(())
      })
      .await?;

    Ok(assignment)
  }

  async fn get_assignment(&self, id: Uuid) -> Result<Option<Assignment>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAssignment> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {ASSIGNMENT_COLS} FROM assignments WHERE id = ?1"),
              rusqlite::params![id_str],
              assignment_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawAssignment::into_assignment).transpose()
  }

  async fn list_subject_assignments(&self, subject_id: Uuid) -> Result<Vec<Assignment>> {
    let subject_str = encode_uuid(subject_id);

    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ASSIGNMENT_COLS} FROM assignments
           WHERE subject_id = ?1
           ORDER BY due_date ASC, title ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![subject_str], assignment_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }

  async fn list_semester_assignments(
    &self,
    semester_id: Uuid,
  ) -> Result<Vec<Assignment>> {
    let sem_str = encode_uuid(semester_id);

    let raws: Vec<RawAssignment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {ASSIGNMENT_COLS} FROM assignments
           WHERE semester_id = ?1
           ORDER BY due_date ASC, title ASC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![sem_str], assignment_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawAssignment::into_assignment).collect()
  }

  async fn delete_assignment(&self, id: Uuid) -> Result<bool> {
    self
      .execute_by_id("DELETE FROM assignments WHERE id = ?1", id)
      .await
  }

  // ── Students & submissions ────────────────────────────────────────────────

  async fn insert_student(&self, name: String, roll_no: String) -> Result<Student> {
    let student = Student { id: Uuid::new_v4(), name, roll_no };

    let id_str  = encode_uuid(student.id);
    let name    = student.name.clone();
    let roll_no = student.roll_no.clone();

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO students (id, name, roll_no) VALUES (?1, ?2, ?3)",
          rusqlite::params![id_str, name, roll_no],
        )?;
        Ok(())
      })
      .await?;

    Ok(student)
  }

  async fn get_student(&self, id: Uuid) -> Result<Option<Student>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawStudent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, roll_no FROM students WHERE id = ?1",
              rusqlite::params![id_str],
              student_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawStudent::into_student).transpose()
  }

  async fn list_students(&self) -> Result<Vec<Student>> {
    let raws: Vec<RawStudent> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT id, name, roll_no FROM students ORDER BY roll_no ASC")?;
        let rows = stmt
          .query_map([], student_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawStudent::into_student).collect()
  }

  async fn list_submissions(&self, assignment_id: Uuid) -> Result<Vec<Submission>> {
    let assignment_str = encode_uuid(assignment_id);

    let raws: Vec<RawSubmission> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT student_id, assignment_id, submitted, submission_date
           FROM submissions
           WHERE assignment_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![assignment_str], submission_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawSubmission::into_submission).collect()
  }

  async fn upsert_submission(&self, row: Submission) -> Result<()> {
    let student_str    = encode_uuid(row.student_id);
    let assignment_str = encode_uuid(row.assignment_id);
    let date_str       = row.submission_date.map(encode_dt);
    let submitted      = row.submitted;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO submissions (student_id, assignment_id, submitted, submission_date)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (student_id, assignment_id) DO UPDATE SET
             submitted       = excluded.submitted,
             submission_date = excluded.submission_date",
          rusqlite::params![student_str, assignment_str, submitted, date_str],
        )?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── AtomicActivation impl ───────────────────────────────────────────────────

impl AtomicActivation for SqliteStore {
  async fn activate_semester(&self, semester_id: Uuid, user_id: Uuid) -> Result<()> {
    let sem_str  = encode_uuid(semester_id);
    let user_str = encode_uuid(user_id);

    self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        tx.execute(
          "UPDATE semesters SET is_active = 0 WHERE id != ?1 AND is_active = 1",
          rusqlite::params![sem_str],
        )?;

        // A zero-row update means the target vanished; dropping `tx` rolls
        // back the deactivation above.
        let marked = tx.execute(
          "UPDATE semesters SET is_active = 1 WHERE id = ?1",
          rusqlite::params![sem_str],
        )?;
        if marked == 0 {
          return Err(rusqlite::Error::QueryReturnedNoRows.into());
        }

        let bound = tx.execute(
          "UPDATE profiles SET semester_id = ?1 WHERE id = ?2",
          rusqlite::params![sem_str, user_str],
        )?;
        if bound == 0 {
          return Err(rusqlite::Error::QueryReturnedNoRows.into());
        }

        tx.commit()?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}
