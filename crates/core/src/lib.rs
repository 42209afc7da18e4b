//! Core business logic for videotube.
//!
//! Each resource has a service that validates input, looks records up,
//! enforces ownership and assembles the read models handed to the API.

pub mod services;
pub mod validation;
pub mod views;

pub use services::*;
