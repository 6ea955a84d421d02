//! Post commands.

use clap::Subcommand;
use quill_core::domain::{Category, PostDraft, PostId, PostPatch, parse_tags};
use quill_shared::Route;
use quill_shared::dto::{ALL_CATEGORIES, PostQuery};

use super::{finish, require_access};
use crate::output;
use crate::state::AppState;

#[derive(Subcommand)]
pub enum PostsCommand {
    /// List posts, optionally filtered
    List {
        /// Case-insensitive text to look for in title, content, excerpt, or tags
        #[arg(long, default_value = "")]
        search: String,
        /// Exact category, or "all"
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show a single post
    Show {
        id: PostId,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Write a new post
    Add {
        #[arg(long)]
        title: String,
        #[arg(long)]
        content: String,
        #[arg(long)]
        excerpt: Option<String>,
        #[arg(long, default_value = "general")]
        category: String,
        /// Comma-separated tags
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        published: bool,
    },
    /// Change fields of an existing post
    Edit {
        id: PostId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        content: Option<String>,
        /// New excerpt; an empty value clears it
        #[arg(long)]
        excerpt: Option<String>,
        #[arg(long)]
        category: Option<String>,
        /// Comma-separated tags, replacing the current ones
        #[arg(long)]
        tags: Option<String>,
        #[arg(long)]
        published: Option<bool>,
    },
    /// Delete a post
    Delete { id: PostId },
}

pub async fn run(state: &AppState, command: PostsCommand) -> anyhow::Result<()> {
    // Every view starts from the loaded collection, as the dashboard does.
    finish(state.posts.fetch_posts().await)?;

    match command {
        PostsCommand::List {
            search,
            category,
            json,
        } => {
            let posts = state
                .posts
                .visible_posts(&PostQuery { search, category })
                .await;
            if json {
                println!("{}", serde_json::to_string_pretty(&posts)?);
            } else {
                output::print_post_table(&posts);
            }
        }
        PostsCommand::Show { id, json } => {
            let post = state
                .posts
                .get_post(id)
                .await
                .ok_or_else(|| anyhow::anyhow!("Post not found: {id}"))?;
            if json {
                println!("{}", serde_json::to_string_pretty(&post)?);
            } else {
                output::print_post(&post);
            }
        }
        PostsCommand::Add {
            title,
            content,
            excerpt,
            category,
            tags,
            published,
        } => {
            require_access(state, Route::NewPost).await?;
            warn_unknown_category(&category);

            let mut draft = PostDraft::new(title, content)
                .with_category(category)
                .with_tags(tags.as_deref().map(parse_tags).unwrap_or_default())
                .published(published);
            if let Some(excerpt) = excerpt {
                draft = draft.with_excerpt(excerpt);
            }

            if let Some(post) = finish(state.posts.add_post(draft).await)? {
                println!("Created post {}", post.id);
            }
        }
        PostsCommand::Edit {
            id,
            title,
            content,
            excerpt,
            category,
            tags,
            published,
        } => {
            require_access(state, Route::EditPost(id)).await?;
            if let Some(category) = &category {
                warn_unknown_category(category);
            }

            let patch = PostPatch {
                title,
                content,
                excerpt: excerpt.map(|e| Some(e).filter(|e| !e.trim().is_empty())),
                category,
                tags: tags.as_deref().map(parse_tags),
                published,
            };
            if patch.is_empty() {
                println!("Nothing to change");
                return Ok(());
            }

            if let Some(post) = finish(state.posts.update_post(id, patch).await)? {
                println!("Updated post {}", post.id);
            }
        }
        PostsCommand::Delete { id } => {
            require_access(state, Route::EditPost(id)).await?;
            finish(state.posts.delete_post(id).await)?;
            println!("Deleted post {id}");
        }
    }

    Ok(())
}

pub async fn categories(state: &AppState) -> anyhow::Result<()> {
    finish(state.posts.fetch_posts().await)?;
    for option in state.posts.category_options().await {
        let label = match option.parse::<Category>() {
            Ok(category) => category.label(),
            Err(_) if option == ALL_CATEGORIES => "All categories",
            Err(_) => "",
        };
        println!("{option:<12} {label}");
    }
    Ok(())
}

fn warn_unknown_category(category: &str) {
    if let Err(e) = category.parse::<Category>() {
        tracing::warn!(category = %category, "{e}; storing it anyway");
    }
}
