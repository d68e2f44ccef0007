//! Blog Service Library
//! Re-exports modules for the binary and integration tests

pub mod app;
pub mod config;
pub mod error;
pub mod images;
pub mod middleware;
pub mod models;
pub mod repository;
pub mod rest_api;
pub mod schema;
pub mod security;
pub mod services;
pub mod validators;

pub use app::AppState;
pub use error::{BlogError, Result};
