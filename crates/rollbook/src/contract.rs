//! Wire contract shared by the HTTP service and the client.
//!
//! Both sides serialize through these types, so the list envelope, the
//! delete acknowledgement and the error body cannot drift apart.
//!
//! | Method | Path | Body | Response |
//! |---|---|---|---|
//! | GET | `/students` | | [`StudentList`] |
//! | GET | `/students/{id}` | | [`Student`] |
//! | POST | `/students` | [`StudentFields`] | [`Student`] |
//! | PUT | `/students/{id}` | [`StudentFields`] | [`Student`] or `null` |
//! | DELETE | `/students/{id}` | | [`DeleteAck`] |
//! | GET | `/health` | | [`Health`] |
//!
//! Failures carry an [`ErrorBody`].
//!
//! [`StudentFields`]: crate::student::StudentFields

use serde::{Deserialize, Serialize};

use crate::error::{Error, ErrorKind};
use crate::student::{Student, StudentId};

/// Collection route.
pub const STUDENTS_PATH: &str = "/students";

/// Health route.
pub const HEALTH_PATH: &str = "/health";

/// Message returned by every delete.
pub const DELETE_MESSAGE: &str = "Student deleted";

/// Route of a single record, relative to the service root.
#[must_use]
pub fn student_path(id: StudentId) -> String {
    format!("{STUDENTS_PATH}/{id}")
}

/// Envelope of the list response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentList {
    /// Every stored record.
    pub students: Vec<Student>,
}

/// Fixed acknowledgement returned by delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    /// Always [`DELETE_MESSAGE`].
    pub message: String,
}

impl Default for DeleteAck {
    fn default() -> Self {
        Self {
            message: DELETE_MESSAGE.to_string(),
        }
    }
}

/// Health probe body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Always true when the service answers.
    pub ok: bool,
    /// Number of stored records.
    pub students: u64,
}

/// Body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    /// Error classification.
    pub error: ErrorKind,
    /// Human-readable detail.
    pub message: String,
}

impl From<&Error> for ErrorBody {
    fn from(err: &Error) -> Self {
        Self {
            error: err.kind(),
            message: err.to_string(),
        }
    }
}
