//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod clock;
mod remote;
mod storage;

pub use clock::{Clock, InstantClock};
pub use remote::{RemoteError, RemotePost, RemotePostSource};
pub use storage::{KeyValueStore, StorageScope, StoreError};
