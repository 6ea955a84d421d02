//! Domain entities - the records the blog client stores.

mod category;
mod post;
mod user;

pub use category::Category;
pub use post::{MAX_TITLE_LEN, Post, PostDraft, PostId, PostPatch, Profile, parse_tags};
pub use user::{User, UserId};
