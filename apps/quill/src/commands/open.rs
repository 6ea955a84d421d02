//! Route rendering: resolve a path through the guard and print that page.

use anyhow::anyhow;
use quill_shared::Route;
use quill_shared::dto::PostQuery;

use super::finish;
use crate::output;
use crate::state::AppState;

pub async fn run(state: &AppState, path: &str) -> anyhow::Result<()> {
    let route = Route::parse(path).ok_or_else(|| anyhow!("No page at {path}"))?;
    let authenticated = state.auth.is_authenticated().await;

    let resolved = route.resolve(authenticated);
    if resolved != route {
        tracing::debug!(from = %route, to = %resolved, "Redirected");
        println!("-> {resolved}");
    }

    match resolved {
        Route::Login => println!("Log in with: quill login --email <EMAIL> --password <PASSWORD>"),
        Route::Register => println!(
            "Create an account with: quill register --email <EMAIL> --password <PASSWORD> [--name <NAME>]"
        ),
        Route::Root | Route::Dashboard => dashboard(state).await?,
        Route::NewPost => println!(
            "Write a post with: quill posts add --title <TITLE> --content <CONTENT> [--category <CATEGORY>] [--tags <a,b>]"
        ),
        Route::EditPost(id) | Route::ViewPost(id) => {
            finish(state.posts.fetch_posts().await)?;
            let post = state
                .posts
                .get_post(id)
                .await
                .ok_or_else(|| anyhow!("Post not found: {id}"))?;
            output::print_post(&post);
            if matches!(resolved, Route::EditPost(_)) {
                println!();
                println!("Edit with: quill posts edit {id} [--title ..] [--content ..]");
            }
        }
    }

    Ok(())
}

async fn dashboard(state: &AppState) -> anyhow::Result<()> {
    finish(state.posts.fetch_posts().await)?;

    match state.auth.current_user().await {
        Some(user) => println!("Welcome back, {}", user.email),
        None => println!("Browsing as guest"),
    }

    let posts = state.posts.visible_posts(&PostQuery::default()).await;
    let noun = if posts.len() == 1 { "post" } else { "posts" };
    println!("{} {noun}", posts.len());
    println!();

    if posts.is_empty() {
        println!("No posts yet. Create your first blog post to get started.");
    } else {
        output::print_post_table(&posts);
    }
    Ok(())
}
