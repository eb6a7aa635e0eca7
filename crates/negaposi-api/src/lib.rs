//! HTTP layer: router, handlers, and the error → response mapping.

mod error;
pub use error::ApiError;

mod server;
pub use server::{AppState, router, serve};
