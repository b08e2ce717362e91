//! Request extractors

mod auth;
mod pagination;
mod path;
mod validated;

pub use auth::AuthUser;
pub use pagination::{MessageCursor, Page};
pub use path::parse_snowflake;
pub use validated::ValidatedJson;
