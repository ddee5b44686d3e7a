mod chats;
mod contacts;
mod context;
mod error;
mod messages;
mod rows;
mod schema;
mod select;
mod sender;
mod store;
mod timestamp;

#[cfg(test)]
mod fixtures;

pub use chats::ChatQuery;
pub use context::ContextWindow;
pub use error::{DbError, Result};
pub use messages::{MessageFilter, StoreStats};
pub use schema::BRIDGE_SCHEMA;
pub use select::Page;
pub use store::Store;
pub use timestamp::{format_display, parse_timestamp};
