//! Common utilities and shared types for videotube.
//!
//! This crate provides foundational components used across all videotube crates:
//!
//! - **Configuration**: Application settings via [`Config`]
//! - **Error handling**: Unified error types via [`AppError`] and [`AppResult`]
//! - **ID Generation**: ULID-based identifiers via [`IdGenerator`], plus format checks
//! - **Pagination**: `page`/`limit` requests and [`Paginated`] results
//! - **Storage**: Media storage backends (local filesystem)
//!
//! # Example
//!
//! ```no_run
//! use videotube_common::{Config, IdGenerator, AppResult};
//!
//! fn example() -> AppResult<()> {
//!     let config = Config::load()?;
//!     let id_gen = IdGenerator::new();
//!     let id = id_gen.generate();
//!     println!("Generated ID: {}", id);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod id;
pub mod pagination;
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use id::{IdGenerator, ensure_valid_id, is_valid_id};
pub use pagination::{PageQuery, PageRequest, Paginated};
pub use storage::{LocalStorage, StorageBackend, UploadedFile, generate_storage_key};
