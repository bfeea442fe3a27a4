//! HTTP collection service.
//!
//! Maps each route of the wire contract onto one [`RecordStore`] call. The
//! store sits behind a mutex and is driven from the blocking thread pool, so
//! `SQLite` work never stalls the async runtime.
//!
//! ## Routes
//!
//! - `GET /students`: `{ "students": [...] }`
//! - `GET /students/:id`: one record, 404 if absent
//! - `POST /students`: create, returns the stored record
//! - `PUT /students/:id`: update, returns the record or `null`
//! - `DELETE /students/:id`: `{ "message": "Student deleted" }`
//! - `GET /health`: `{ "ok": true, "students": n }`

pub mod cors;

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::middleware;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tokio::net::TcpListener;
use tracing::{debug, error, info};

use crate::contract::{DeleteAck, ErrorBody, Health, StudentList, HEALTH_PATH, STUDENTS_PATH};
use crate::error::{Error, ErrorKind, Result};
use crate::storage::RecordStore;
use crate::student::{Student, StudentFields, StudentId};

pub use cors::AllowedOrigins;

/// Shared handler state: the record store behind a mutex.
#[derive(Debug)]
pub struct AppState<S> {
    store: Arc<Mutex<S>>,
}

impl<S> Clone for AppState<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: RecordStore + 'static> AppState<S> {
    /// Wrap a store for use by the router.
    #[must_use]
    pub fn new(store: S) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
        }
    }

    /// Run one store operation on the blocking pool.
    async fn with_store<T, F>(&self, op: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&S) -> Result<T> + Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || {
            let guard = store.lock().map_err(|_| Error::StorePoisoned)?;
            op(&guard)
        })
        .await
        .map_err(|e| Error::internal(format!("store task failed: {e}")))?
    }
}

/// Build the service router.
pub fn router<S: RecordStore + 'static>(store: S, allowed: AllowedOrigins) -> Router {
    let student_route = format!("{STUDENTS_PATH}/:id");

    Router::new()
        .route(HEALTH_PATH, get(health_handler::<S>))
        .route(
            STUDENTS_PATH,
            get(list_handler::<S>).post(create_handler::<S>),
        )
        .route(
            &student_route,
            get(get_handler::<S>)
                .put(update_handler::<S>)
                .delete(delete_handler::<S>),
        )
        .layer(middleware::from_fn_with_state(allowed, cors::enforce))
        .with_state(AppState::new(store))
}

/// Serve the router on an already bound listener until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the listener fails.
pub async fn serve<S: RecordStore + 'static>(
    listener: TcpListener,
    store: S,
    allowed: AllowedOrigins,
) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Serving students on http://{addr}{STUDENTS_PATH}");

    axum::serve(listener, router(store, allowed))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Bind `addr` and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the address cannot be bound or the listener fails.
pub async fn bind_and_serve<S: RecordStore + 'static>(
    addr: SocketAddr,
    store: S,
    allowed: AllowedOrigins,
) -> Result<()> {
    let listener = TcpListener::bind(addr).await?;
    serve(listener, store, allowed).await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let kind = self.kind();
        match kind {
            ErrorKind::StoreUnavailable | ErrorKind::Internal => error!("Request failed: {self}"),
            _ => debug!("Request rejected: {self}"),
        }

        let status =
            StatusCode::from_u16(kind.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(ErrorBody::from(&self))).into_response()
    }
}

fn parse_id(raw: &str) -> Result<StudentId> {
    raw.parse()
}

fn parse_body(
    payload: std::result::Result<Json<StudentFields>, JsonRejection>,
) -> Result<StudentFields> {
    let Json(fields) = payload.map_err(|rejection| Error::validation(rejection.body_text()))?;
    fields.validate()?;
    Ok(fields)
}

/// `GET /health`
async fn health_handler<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<Health>> {
    let students = state.with_store(RecordStore::count).await?;
    Ok(Json(Health { ok: true, students }))
}

/// `GET /students`
async fn list_handler<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
) -> Result<Json<StudentList>> {
    let students = state.with_store(RecordStore::list).await?;
    Ok(Json(StudentList { students }))
}

/// `GET /students/:id`
async fn get_handler<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<Student>> {
    let id = parse_id(&id)?;
    state
        .with_store(move |store| store.get(id))
        .await?
        .map(Json)
        .ok_or_else(|| Error::not_found(id))
}

/// `POST /students`
async fn create_handler<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    payload: std::result::Result<Json<StudentFields>, JsonRejection>,
) -> Result<Json<Student>> {
    let fields = parse_body(payload)?;
    let student = state.with_store(move |store| store.create(&fields)).await?;
    Ok(Json(student))
}

/// `PUT /students/:id`: unknown ids answer `null`.
async fn update_handler<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<StudentFields>, JsonRejection>,
) -> Result<Json<Option<Student>>> {
    let id = parse_id(&id)?;
    let fields = parse_body(payload)?;
    let student = state
        .with_store(move |store| store.update(id, &fields))
        .await?;
    Ok(Json(student))
}

/// `DELETE /students/:id`: acknowledged whether or not the record existed.
async fn delete_handler<S: RecordStore + 'static>(
    State(state): State<AppState<S>>,
    Path(id): Path<String>,
) -> Result<Json<DeleteAck>> {
    let id = parse_id(&id)?;
    state.with_store(move |store| store.delete(id)).await?;
    Ok(Json(DeleteAck::default()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Storage;

    #[test]
    fn test_error_into_response_status() {
        let response = Error::validation("bad").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = Error::not_found("x").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = Error::StorePoisoned.into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn test_parse_body_rejects_blank_fields() {
        let payload = Ok(Json(StudentFields::new("", 3, "Math")));
        assert!(parse_body(payload).unwrap_err().is_validation());
    }

    #[tokio::test]
    async fn test_with_store_runs_operation() {
        let state = AppState::new(Storage::open_in_memory().unwrap());
        let created = state
            .with_store(|store| store.create(&StudentFields::new("Ann", 21, "Math")))
            .await
            .unwrap();

        let listed = state.with_store(RecordStore::list).await.unwrap();
        assert_eq!(listed, vec![created]);
    }

    #[tokio::test]
    async fn test_with_store_reports_poisoned_lock() {
        let state = AppState::new(Storage::open_in_memory().unwrap());
        let store = Arc::clone(&state.store);
        let _ = std::thread::spawn(move || {
            let _guard = store.lock().unwrap();
            panic!("poison the store lock");
        })
        .join();

        let err = state.with_store(RecordStore::count).await.unwrap_err();
        assert!(matches!(err, Error::StorePoisoned));
    }
}
