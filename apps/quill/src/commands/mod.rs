//! Command implementations.

pub mod auth;
pub mod open;
pub mod posts;

pub use posts::PostsCommand;

use quill_shared::{ActionResult, Route};

use crate::state::AppState;

/// Turn a failed action into a command error.
fn finish<T>(result: ActionResult<T>) -> anyhow::Result<Option<T>> {
    result.into_result().map_err(anyhow::Error::msg)
}

/// Apply the route guard before a command that needs a session.
async fn require_access(state: &AppState, route: Route) -> anyhow::Result<()> {
    let authenticated = state.auth.is_authenticated().await;
    if route.resolve(authenticated) == Route::Login {
        anyhow::bail!("Login required for {route}. Run `quill login` first.");
    }
    Ok(())
}
