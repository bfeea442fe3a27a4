//! Record store for rollbook.
//!
//! [`RecordStore`] is the persistence contract the HTTP service is written
//! against. [`Storage`] implements it on top of `SQLite`; every mutation is
//! committed with `synchronous=FULL` before the call returns.

pub mod migrations;
pub mod schema;

use std::path::{Path, PathBuf};

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::student::{Student, StudentFields, StudentId};

/// Persistence contract for the student collection.
///
/// Absence is never an error: `update` returns `None` and `delete` returns
/// `false` when no record carries the given id.
pub trait RecordStore: Send {
    /// Every stored record, in the store's natural order.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn list(&self) -> Result<Vec<Student>>;

    /// Look up a single record.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn get(&self, id: StudentId) -> Result<Option<Student>>;

    /// Store a new record under a freshly generated id.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed fields, or a store error.
    fn create(&self, fields: &StudentFields) -> Result<Student>;

    /// Replace the fields of an existing record.
    ///
    /// # Errors
    ///
    /// Returns a validation error for malformed fields, or a store error.
    fn update(&self, id: StudentId, fields: &StudentFields) -> Result<Option<Student>>;

    /// Remove a record. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be written.
    fn delete(&self, id: StudentId) -> Result<bool>;

    /// Number of stored records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn count(&self) -> Result<u64>;
}

/// `SQLite`-backed record store.
#[derive(Debug)]
pub struct Storage {
    /// Path to the database file.
    path: PathBuf,
    /// Database connection.
    conn: Connection,
}

impl Storage {
    /// Open or create a store at the given path.
    ///
    /// Creates the parent directories and database file if they don't exist
    /// and brings the schema up to date.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or schema initialization fails.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|source| Error::DirectoryCreate {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        debug!("Opening database at {}", path.display());
        let conn = Connection::open(&path).map_err(|source| Error::DatabaseOpen {
            path: path.clone(),
            source,
        })?;

        // FULL sync: a mutation is on disk before the HTTP response goes out.
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=FULL;")?;

        migrations::initialize_schema(&conn)?;

        info!("Database opened successfully at {}", path.display());
        Ok(Self { path, conn })
    }

    /// Create an in-memory store for testing.
    ///
    /// # Errors
    ///
    /// Returns an error if the in-memory database cannot be created.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(|source| Error::DatabaseOpen {
            path: PathBuf::from(":memory:"),
            source,
        })?;

        migrations::initialize_schema(&conn)?;

        Ok(Self {
            path: PathBuf::from(":memory:"),
            conn,
        })
    }

    /// Get the path to the database file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn row_to_student(row: &rusqlite::Row) -> rusqlite::Result<Student> {
        let id: String = row.get(0)?;
        let id = Uuid::parse_str(&id)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?;

        Ok(Student {
            id: StudentId::from(id),
            name: row.get(1)?,
            age: row.get(2)?,
            course: row.get(3)?,
        })
    }
}

impl RecordStore for Storage {
    fn list(&self) -> Result<Vec<Student>> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, name, age, course FROM students ORDER BY seq")?;

        let students = stmt
            .query_map([], Self::row_to_student)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        debug!("Listed {} students", students.len());
        Ok(students)
    }

    fn get(&self, id: StudentId) -> Result<Option<Student>> {
        let student = self
            .conn
            .query_row(
                "SELECT id, name, age, course FROM students WHERE id = ?1",
                [id.to_string()],
                Self::row_to_student,
            )
            .optional()?;
        Ok(student)
    }

    fn create(&self, fields: &StudentFields) -> Result<Student> {
        fields.validate()?;

        let id = StudentId::generate();
        self.conn.execute(
            "INSERT INTO students (id, name, age, course) VALUES (?1, ?2, ?3, ?4)",
            params![id.to_string(), fields.name, fields.age, fields.course],
        )?;

        info!("Created student {}", id);
        Ok(Student::from_fields(id, fields.clone()))
    }

    fn update(&self, id: StudentId, fields: &StudentFields) -> Result<Option<Student>> {
        fields.validate()?;

        let affected = self.conn.execute(
            r"
            UPDATE students
            SET name = ?2, age = ?3, course = ?4, updated_at = datetime('now')
            WHERE id = ?1
            ",
            params![id.to_string(), fields.name, fields.age, fields.course],
        )?;

        if affected == 0 {
            debug!("Update skipped, no student {}", id);
            return Ok(None);
        }

        info!("Updated student {}", id);
        Ok(Some(Student::from_fields(id, fields.clone())))
    }

    fn delete(&self, id: StudentId) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM students WHERE id = ?1", [id.to_string()])?;

        if affected > 0 {
            info!("Deleted student {}", id);
        } else {
            debug!("Delete skipped, no student {}", id);
        }
        Ok(affected > 0)
    }

    fn count(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM students", [], |row| row.get(0))?;
        Ok(u64::try_from(count).unwrap_or(0))
    }
}
