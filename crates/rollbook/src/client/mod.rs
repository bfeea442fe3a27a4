//! Client application for the students service.
//!
//! - [`api`]: typed HTTP calls.
//! - [`view`]: the immutable view model and its transitions.
//! - [`app`]: drives a view model against the service.
//! - [`table`]: text rendering of the list.

pub mod api;
pub mod app;
pub mod table;
pub mod view;

pub use api::StudentsApi;
pub use app::ClientApp;
pub use table::render_table;
pub use view::{Field, Form, Mode, Mutation, ViewModel};
