//! Client application driver.
//!
//! [`ClientApp`] owns the current [`ViewModel`] snapshot and the API client.
//! The local list is never patched by hand: every mutation is followed by a
//! full re-fetch, so what is shown is always what the service confirmed.

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::student::{Student, StudentId};

use super::api::StudentsApi;
use super::view::{Field, Mutation, ViewModel};

/// Stateful client over one students collection.
#[derive(Debug)]
pub struct ClientApp {
    api: StudentsApi,
    view: ViewModel,
}

impl ClientApp {
    /// Start with an empty view.
    #[must_use]
    pub fn new(api: StudentsApi) -> Self {
        Self {
            api,
            view: ViewModel::default(),
        }
    }

    /// The current snapshot.
    #[must_use]
    pub fn view(&self) -> &ViewModel {
        &self.view
    }

    fn transition(&mut self, f: impl FnOnce(ViewModel) -> ViewModel) {
        self.view = f(std::mem::take(&mut self.view));
    }

    /// Re-fetch the full list.
    ///
    /// On failure the local list is emptied rather than left stale.
    ///
    /// # Errors
    ///
    /// Returns the fetch error after logging it.
    pub async fn refresh(&mut self) -> Result<()> {
        match self.api.list().await {
            Ok(students) => {
                debug!("Fetched {} students", students.len());
                self.transition(|view| view.with_students(students));
                Ok(())
            }
            Err(e) => {
                warn!("Failed to fetch students: {e}");
                self.transition(ViewModel::fetch_failed);
                Err(e)
            }
        }
    }

    /// Edit one form input.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        self.transition(|view| view.set_field(field, value));
    }

    /// Switch to editing the record with `id` from the local list.
    ///
    /// # Errors
    ///
    /// Returns a not-found error if the record is not in the last fetch.
    pub fn select_for_edit(&mut self, id: StudentId) -> Result<()> {
        let student = self.view.find(id).cloned().ok_or_else(|| Error::not_found(id))?;
        self.transition(|view| view.select_for_edit(&student));
        Ok(())
    }

    /// Abandon an edit in progress.
    pub fn cancel_edit(&mut self) {
        self.transition(ViewModel::cancel_edit);
    }

    /// Submit the form as a create or an update, then re-fetch.
    ///
    /// Returns the record the service stored, or `None` if an update hit an
    /// id the service no longer knows. If the call fails the snapshot is
    /// left as it was, form included.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an unparsable form, or the call's error.
    pub async fn submit(&mut self) -> Result<Option<Student>> {
        let (mutation, next) = self.view.submit()?;

        let saved = match mutation {
            Mutation::Create(fields) => self.api.create(&fields).await.map(Some),
            Mutation::Update(id, fields) => self.api.update(id, &fields).await,
        }
        .map_err(|e| {
            warn!("Failed to save student: {e}");
            e
        })?;

        self.view = next;
        self.resync().await;
        Ok(saved)
    }

    /// Delete a record, then re-fetch. Independent of the form mode.
    ///
    /// # Errors
    ///
    /// Returns the call's error after logging it.
    pub async fn delete(&mut self, id: StudentId) -> Result<()> {
        self.api
            .delete(id)
            .await
            .map_err(|e| {
                warn!("Failed to delete student {id}: {e}");
                e
            })?;
        self.resync().await;
        Ok(())
    }

    /// Refresh after a successful mutation. The mutation stands even if this fails.
    async fn resync(&mut self) {
        if self.refresh().await.is_err() {
            debug!("Showing an empty list until the next successful fetch");
        }
    }
}
