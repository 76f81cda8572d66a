//! SQL schema for the classrep SQLite store.
//!
//! Executed once at connection startup. Table and column names are the
//! externally fixed contract shared with other clients of the same data.

/// Full schema DDL; idempotent thanks to `IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS semesters (
    id         TEXT PRIMARY KEY,
    name       TEXT NOT NULL,
    is_active  INTEGER NOT NULL DEFAULT 0
);

-- At most one active semester, enforced by the database as well.
CREATE UNIQUE INDEX IF NOT EXISTS semesters_one_active
    ON semesters(is_active) WHERE is_active = 1;

CREATE TABLE IF NOT EXISTS profiles (
    id           TEXT PRIMARY KEY,   -- the authenticated user id
    name         TEXT NOT NULL,
    semester_id  TEXT REFERENCES semesters(id) ON DELETE SET NULL
);

CREATE TABLE IF NOT EXISTS subjects (
    id           TEXT PRIMARY KEY,
    name         TEXT NOT NULL,
    semester_id  TEXT NOT NULL REFERENCES semesters(id)
);

CREATE TABLE IF NOT EXISTS assignments (
    id           TEXT PRIMARY KEY,
    title        TEXT NOT NULL,
    due_date     TEXT NOT NULL,      -- YYYY-MM-DD
    subject_id   TEXT NOT NULL REFERENCES subjects(id) ON DELETE CASCADE,
    semester_id  TEXT NOT NULL REFERENCES semesters(id),
    created_by   TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS students (
    id       TEXT PRIMARY KEY,
    name     TEXT NOT NULL,
    roll_no  TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS submissions (
    student_id       TEXT NOT NULL REFERENCES students(id) ON DELETE CASCADE,
    assignment_id    TEXT NOT NULL REFERENCES assignments(id) ON DELETE CASCADE,
    submitted        INTEGER NOT NULL DEFAULT 0,
    submission_date  TEXT,           -- RFC 3339 UTC or NULL
    PRIMARY KEY (student_id, assignment_id)
);

CREATE INDEX IF NOT EXISTS subjects_semester_idx     ON subjects(semester_id);
CREATE INDEX IF NOT EXISTS assignments_subject_idx   ON assignments(subject_id);
CREATE INDEX IF NOT EXISTS assignments_semester_idx  ON assignments(semester_id);
CREATE INDEX IF NOT EXISTS submissions_assignment_idx ON submissions(assignment_id);

PRAGMA user_version = 1;
";
