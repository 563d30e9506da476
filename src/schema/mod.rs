//! Rows of the database and the queries that read or write them.
mod comment;
mod karma;
mod like;
mod post;
mod user;

pub use comment::{Comment, CommentView, InsertComment};
pub use karma::{InsertKarma, KarmaTotal, KarmaTransaction};
pub use like::{Like, LikeTarget};
pub use post::{Post, PostView};
pub use user::User;
