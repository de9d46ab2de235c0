//! HTTP API for importing blog posts from web pages.
//!
//! Routes:
//!
//! - `POST /api/extract` takes `{ "url": "..." }` and answers with
//!   `{ title, content, thumbnailUrl }`
//! - `POST /api/drafts/import` answers with a post draft built from the same extraction
//! - `GET /health`
//!
//! Failures answer with `{ error, kind, details? }` and a status derived from
//! the error kind.

pub mod config;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use config::Config;
pub use error::ApiError;
pub use routes::app;
pub use state::AppState;
