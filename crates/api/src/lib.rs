//! HTTP API layer for videotube.
//!
//! This crate provides the REST API mounted under `/api/v1`:
//!
//! - **Endpoints**: health, tweets, playlists, likes, comments, videos,
//!   subscriptions and the channel dashboard
//! - **Extractors**: Authentication, JSON bodies, query strings and paths
//!   that reject with the error envelope
//! - **Middleware**: Bearer token resolution and panic recovery
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;

pub use endpoints::{route_not_found, router};
