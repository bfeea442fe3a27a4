//! Plain-text rendering of the student list.

use std::fmt::Write;

use crate::student::Student;

/// Shown instead of a table when there is nothing to list.
pub const EMPTY_MESSAGE: &str = "No students found";

const HEADERS: [&str; 4] = ["Name", "Age", "Course", "Id"];

/// Render `students` as an aligned table.
#[must_use]
pub fn render_table(students: &[Student]) -> String {
    if students.is_empty() {
        return format!("{EMPTY_MESSAGE}\n");
    }

    let rows: Vec<[String; 4]> = students
        .iter()
        .map(|s| {
            [
                s.name.clone(),
                s.age.to_string(),
                s.course.clone(),
                s.id.to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADERS.map(String::from), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    let _ = writeln!(out, "{}", rule.join("-+-"));
    for row in &rows {
        write_row(&mut out, row, &widths);
    }
    out
}

fn write_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join(" | ").trim_end());
}
