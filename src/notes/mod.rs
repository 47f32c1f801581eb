pub mod api_types;
pub mod client;
pub mod error;
#[cfg(test)]
pub mod fake;
pub mod types;

pub use client::{NotesApi, NotesClient};
pub use error::ApiError;
