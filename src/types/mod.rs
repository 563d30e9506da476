pub mod comment;
pub mod error;
pub mod form;
pub mod id;
pub mod leaderboard;
pub mod like;
pub mod post;
pub mod user;
pub mod validation;

pub use error::Error;
