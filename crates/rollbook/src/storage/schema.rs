//! `SQLite` schema definitions for rollbook.
//!
//! The student collection is a single table. `seq` only exists to give
//! listings a stable natural order; records are addressed by `id`.

/// SQL statement to create the students table.
pub const CREATE_STUDENTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS students (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    age INTEGER NOT NULL CHECK (age >= 0),
    course TEXT NOT NULL,
    created_at TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
)
";

/// SQL statement to create the metadata table for storing key-value pairs.
pub const CREATE_METADATA_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS metadata (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
)
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_STUDENTS_TABLE, CREATE_METADATA_TABLE];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_statements_not_empty() {
        assert!(!SCHEMA_STATEMENTS.is_empty());
        for stmt in SCHEMA_STATEMENTS {
            assert!(!stmt.trim().is_empty());
        }
    }

    #[test]
    fn test_create_students_table_contains_required_columns() {
        assert!(CREATE_STUDENTS_TABLE.contains("id TEXT NOT NULL UNIQUE"));
        assert!(CREATE_STUDENTS_TABLE.contains("name TEXT NOT NULL"));
        assert!(CREATE_STUDENTS_TABLE.contains("age INTEGER NOT NULL"));
        assert!(CREATE_STUDENTS_TABLE.contains("course TEXT NOT NULL"));
    }
}
