//! Core record types for rollbook.
//!
//! A [`Student`] is the only entity. Its [`StudentId`] is assigned by the
//! record store and never changes; the remaining fields travel together as
//! [`StudentFields`] on create and update.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Upper bound accepted for `age`.
pub const MAX_AGE: u32 = 150;

/// Opaque, store-generated identifier of a student record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(Uuid);

impl StudentId {
    /// Generate a fresh identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

impl From<Uuid> for StudentId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl fmt::Display for StudentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl FromStr for StudentId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|_| Error::InvalidId { id: s.to_string() })
    }
}

/// The mutable part of a student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StudentFields {
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Enrolled course.
    pub course: String,
}

impl StudentFields {
    /// Build a field set.
    #[must_use]
    pub fn new(name: impl Into<String>, age: u32, course: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            age,
            course: course.into(),
        }
    }

    /// Structural validation applied before anything is stored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if `name` or `course` is blank or `age`
    /// exceeds [`MAX_AGE`].
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::validation("name must not be empty"));
        }
        if self.course.trim().is_empty() {
            return Err(Error::validation("course must not be empty"));
        }
        if self.age > MAX_AGE {
            return Err(Error::validation(format!(
                "age must be at most {MAX_AGE}, got {}",
                self.age
            )));
        }
        Ok(())
    }
}

/// A stored student record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    /// Store-assigned identifier.
    pub id: StudentId,
    /// Full name.
    pub name: String,
    /// Age in years.
    pub age: u32,
    /// Enrolled course.
    pub course: String,
}

impl Student {
    /// Combine an identifier with a field set.
    #[must_use]
    pub fn from_fields(id: StudentId, fields: StudentFields) -> Self {
        Self {
            id,
            name: fields.name,
            age: fields.age,
            course: fields.course,
        }
    }

    /// Copy out the mutable fields.
    #[must_use]
    pub fn fields(&self) -> StudentFields {
        StudentFields::new(self.name.clone(), self.age, self.course.clone())
    }
}
