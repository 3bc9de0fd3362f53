//! Domain entities - the core business objects.

mod category;
mod comment;
mod post;
mod tag;
mod user;

pub use category::{Category, CategoryCount, CategoryInput};
pub use comment::{Comment, CommentInput, CommentSubmission};
pub use post::{Post, PostInput, PostStatus};
pub use tag::{Tag, TagCount, TagInput};
pub use user::User;
