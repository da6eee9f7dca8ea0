mod friendship;
mod message;
mod post;
mod project;
mod story;
mod user;

pub use friendship::*;
pub use message::*;
pub use post::*;
pub use project::*;
pub use story::*;
pub use user::*;

/// current time in milliseconds, the timestamp format every record stores
pub fn timestamp() -> i64 {
    chrono::Utc::now().timestamp_millis()
}
