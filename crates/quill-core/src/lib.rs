//! # Quill Core
//!
//! The data layer of the Quill blog client.
//! Domain records, the ports infrastructure must implement, and the
//! auth/posts state services built on top of them.

pub mod domain;
pub mod error;
pub mod filter;
pub mod persistence;
pub mod ports;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;

pub use error::DomainError;
pub use persistence::JsonStore;
