//! HTTP client for the students collection.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::contract::{DeleteAck, ErrorBody, StudentList};
use crate::error::{Error, ErrorKind, Result};
use crate::student::{Student, StudentFields, StudentId};

/// Typed access to one students collection URL, e.g. `http://localhost:5000/students`.
#[derive(Debug, Clone)]
pub struct StudentsApi {
    http: Client,
    base: String,
}

impl StudentsApi {
    /// Create a client for the collection at `api_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(api_url: impl Into<String>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http: builder.build()?,
            base: api_url.into().trim_end_matches('/').to_string(),
        })
    }

    /// The collection URL this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn record_url(&self, id: StudentId) -> String {
        format!("{}/{id}", self.base)
    }

    /// Fetch every record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service reports one.
    pub async fn list(&self) -> Result<Vec<Student>> {
        debug!("GET {}", self.base);
        let response = self.http.get(&self.base).send().await?;
        let list: StudentList = decode(response).await?;
        Ok(list.students)
    }

    /// Fetch one record.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Api`] with kind `NotFound` if the id is unknown.
    pub async fn get(&self, id: StudentId) -> Result<Student> {
        let url = self.record_url(id);
        debug!("GET {url}");
        decode(self.http.get(url).send().await?).await
    }

    /// Create a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects the fields.
    pub async fn create(&self, fields: &StudentFields) -> Result<Student> {
        debug!("POST {}", self.base);
        let response = self.http.post(&self.base).json(fields).send().await?;
        decode(response).await
    }

    /// Update a record. `None` means the id is unknown to the service.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the service rejects the fields.
    pub async fn update(&self, id: StudentId, fields: &StudentFields) -> Result<Option<Student>> {
        let url = self.record_url(id);
        debug!("PUT {url}");
        let response = self.http.put(url).json(fields).send().await?;
        decode(response).await
    }

    /// Delete a record. Succeeds whether or not it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    pub async fn delete(&self, id: StudentId) -> Result<()> {
        let url = self.record_url(id);
        debug!("DELETE {url}");
        let _ack: DeleteAck = decode(self.http.delete(url).send().await?).await?;
        Ok(())
    }
}

/// Decode a success body, or turn an error body into [`Error::Api`].
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await.unwrap_or_default();
    let (kind, message) = match serde_json::from_str::<ErrorBody>(&text) {
        Ok(body) => (body.error, body.message),
        Err(_) => (
            ErrorKind::Internal,
            if text.is_empty() {
                status.to_string()
            } else {
                text
            },
        ),
    };

    Err(Error::Api {
        status: status.as_u16(),
        kind,
        message,
    })
}
