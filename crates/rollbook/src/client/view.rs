//! Client view model.
//!
//! A [`ViewModel`] is an immutable snapshot of what the user sees: the last
//! fetched list, the form as typed, and whether the next submit creates or
//! updates. Every user action is a function from one snapshot to the next.

use crate::error::{Error, Result};
use crate::student::{Student, StudentFields, StudentId};

/// Form field values, kept as typed text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    /// Name input.
    pub name: String,
    /// Age input.
    pub age: String,
    /// Course input.
    pub course: String,
}

impl Form {
    /// Pre-fill from a stored record.
    #[must_use]
    pub fn from_student(student: &Student) -> Self {
        Self {
            name: student.name.clone(),
            age: student.age.to_string(),
            course: student.course.clone(),
        }
    }

    /// Parse the inputs into a field set.
    ///
    /// # Errors
    ///
    /// Returns a validation error for a non-numeric age or blank text fields.
    pub fn parse(&self) -> Result<StudentFields> {
        let age = self.age.trim().parse::<u32>().map_err(|_| {
            Error::validation(format!("age must be a whole number, got {:?}", self.age))
        })?;
        let fields = StudentFields::new(self.name.trim(), age, self.course.trim());
        fields.validate()?;
        Ok(fields)
    }
}

/// One input of the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// `name`
    Name,
    /// `age`
    Age,
    /// `course`
    Course,
}

/// What the next submit does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    /// Submit creates a new record.
    #[default]
    Creating,
    /// Submit updates the record with this id.
    Editing(StudentId),
}

/// The remote call a submit turns into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    /// `POST /students`
    Create(StudentFields),
    /// `PUT /students/{id}`
    Update(StudentId, StudentFields),
}

/// Snapshot of the client state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewModel {
    students: Vec<Student>,
    form: Form,
    mode: Mode,
}

impl ViewModel {
    /// Records from the last successful fetch.
    #[must_use]
    pub fn students(&self) -> &[Student] {
        &self.students
    }

    /// Current form contents.
    #[must_use]
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Find a record in the local list.
    #[must_use]
    pub fn find(&self, id: StudentId) -> Option<&Student> {
        self.students.iter().find(|s| s.id == id)
    }

    /// Label of the submit action.
    #[must_use]
    pub fn submit_label(&self) -> &'static str {
        match self.mode {
            Mode::Creating => "Add",
            Mode::Editing(_) => "Update",
        }
    }

    /// Replace the local list with a fresh fetch.
    #[must_use]
    pub fn with_students(self, students: Vec<Student>) -> Self {
        Self { students, ..self }
    }

    /// A fetch failed: show nothing rather than stale data.
    #[must_use]
    pub fn fetch_failed(self) -> Self {
        Self {
            students: Vec::new(),
            ..self
        }
    }

    /// Change one form input.
    #[must_use]
    pub fn set_field(mut self, field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        match field {
            Field::Name => self.form.name = value,
            Field::Age => self.form.age = value,
            Field::Course => self.form.course = value,
        }
        self
    }

    /// Start editing `student`: the form is pre-filled from it.
    #[must_use]
    pub fn select_for_edit(self, student: &Student) -> Self {
        Self {
            form: Form::from_student(student),
            mode: Mode::Editing(student.id),
            ..self
        }
    }

    /// Abandon an edit.
    #[must_use]
    pub fn cancel_edit(self) -> Self {
        Self {
            form: Form::default(),
            mode: Mode::Creating,
            ..self
        }
    }

    /// Turn the form into a mutation.
    ///
    /// Returns the call to issue and the snapshot to adopt once it succeeds:
    /// form cleared, back in [`Mode::Creating`].
    ///
    /// # Errors
    ///
    /// Returns a validation error if the form does not parse; `self` is untouched.
    pub fn submit(&self) -> Result<(Mutation, Self)> {
        let fields = self.form.parse()?;
        let mutation = match self.mode {
            Mode::Creating => Mutation::Create(fields),
            Mode::Editing(id) => Mutation::Update(id, fields),
        };

        let next = Self {
            students: self.students.clone(),
            form: Form::default(),
            mode: Mode::Creating,
        };
        Ok((mutation, next))
    }
}
