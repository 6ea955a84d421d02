//! Session commands.

use quill_core::services::AuthStatus;

use super::finish;
use crate::output;
use crate::state::AppState;

pub async fn login(state: &AppState, email: &str, password: &str) -> anyhow::Result<()> {
    if let Some(user) = finish(state.auth.login(email, password).await)? {
        println!("Logged in as {} <{}>", user.full_name, user.email);
    }
    Ok(())
}

pub async fn register(
    state: &AppState,
    email: &str,
    password: &str,
    name: Option<&str>,
) -> anyhow::Result<()> {
    if let Some(user) = finish(state.auth.register(email, password, name).await)? {
        println!("Welcome, {}! Your account id is {}", user.full_name, user.id);
    }
    Ok(())
}

pub async fn logout(state: &AppState) -> anyhow::Result<()> {
    finish(state.auth.logout().await)?;
    println!("Logged out");
    Ok(())
}

pub async fn whoami(state: &AppState, json: bool) -> anyhow::Result<()> {
    match state.auth.status().await {
        AuthStatus::Authenticated(user) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                output::print_user(&user);
            }
        }
        AuthStatus::Error(message) => anyhow::bail!(message),
        AuthStatus::Anonymous | AuthStatus::Loading => println!("Not logged in"),
    }
    Ok(())
}
