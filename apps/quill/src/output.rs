//! Output formatting utilities.

use chrono::{DateTime, Utc};
use quill_core::domain::{Post, User};

/// Long date, e.g. "March 4, 2024".
pub fn format_date(date: &DateTime<Utc>) -> String {
    date.format("%B %-d, %Y").to_string()
}

pub fn format_table_row(post: &Post) -> String {
    format!(
        "{:<15} {:<12} {:<5} {:<20} {}",
        post.id,
        truncate(&post.category, 12),
        if post.published { "yes" } else { "no" },
        format_date(&post.created_at),
        truncate(&post.title, 60)
    )
}

#[allow(clippy::print_literal)]
pub fn print_post_table(posts: &[Post]) {
    println!(
        "{:<15} {:<12} {:<5} {:<20} {}",
        "ID", "CATEGORY", "PUB", "CREATED", "TITLE"
    );
    println!("{}", "-".repeat(100));
    for post in posts {
        println!("{}", format_table_row(post));
    }
}

pub fn print_post(post: &Post) {
    println!("{}", post.title);
    println!(
        "{} | {} | by {} <{}>",
        post.category,
        format_date(&post.created_at),
        post.profiles.full_name,
        post.profiles.email
    );
    if !post.tags.is_empty() {
        println!("tags: {}", post.tags.join(", "));
    }
    if !post.published {
        println!("(draft)");
    }
    println!();
    println!("{}", post.content);
}

pub fn print_user(user: &User) {
    println!("{} <{}>", user.full_name, user.email);
    println!("id: {}", user.id);
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{kept}...")
    }
}
