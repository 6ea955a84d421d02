//! Application state services, accessed only through their actions.

mod auth;
mod posts;

pub use auth::{AuthConfig, AuthService, AuthStatus};
pub use posts::{PostsConfig, PostsService, PostsState};
