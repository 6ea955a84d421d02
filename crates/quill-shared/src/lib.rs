//! # Quill Shared
//!
//! Types shared between the data layer and any front end that drives it.
//! Nothing in here performs I/O.

pub mod dto;
pub mod response;
pub mod routes;

pub use response::ActionResult;
pub use routes::Route;
