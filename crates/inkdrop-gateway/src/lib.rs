//! HTTP surface of inkdrop.
//!
//! [`App::router`] builds the axum router over any
//! [`Pastebin`](inkdrop_service::Pastebin) implementation held in
//! [`AppState`].

pub mod app;
pub mod error;
pub mod handlers;
pub mod model;
pub mod state;

pub use app::App;
pub use error::{AppError, Result};
pub use state::AppState;
