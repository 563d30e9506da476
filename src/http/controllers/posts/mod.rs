mod create;
mod get;
mod like;
mod list;

pub use create::create;
pub use get::get;
pub use like::like;
pub use list::list;
