//! Operations of the feed. Each one is a struct holding its input with
//! a `perform` method; the acting user, if any, is passed explicitly.
pub mod comment_tree;
pub mod comments;
pub mod leaderboard;
pub mod likes;
pub mod posts;
pub mod users;

pub use comment_tree::build_comment_tree;
pub use comments::CreateComment;
pub use leaderboard::{GetLeaderboard, LeaderboardAllTime, LeaderboardRecent};
pub use likes::{LikeOutcome, ToggleLike};
pub use posts::{CreatePost, GetPost, ListPosts};
pub use users::{GetUser, LoginUser, RegisterUser, ResolveGuest};
