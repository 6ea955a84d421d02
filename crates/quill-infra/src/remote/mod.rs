//! Remote post sources.

mod http;

pub use http::{DEFAULT_REMOTE_URL, HttpPostSource, RemoteConfig};
