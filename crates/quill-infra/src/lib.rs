//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory and file storage only
//! - `redis` - Redis-backed durable storage

pub mod clock;
pub mod remote;
pub mod storage;

// Re-exports
pub use clock::TokioClock;
pub use remote::{HttpPostSource, RemoteConfig};
pub use storage::{FileStore, InMemoryStore};

#[cfg(feature = "redis")]
pub use storage::{RedisConfig, RedisStore};
