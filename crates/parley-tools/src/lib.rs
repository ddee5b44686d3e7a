mod config;
mod error;
mod format;
mod service;

pub use config::Config;
pub use error::{Result, ToolError};
pub use format::{SenderNames, format_message, format_messages};
pub use service::ToolService;

pub use parley_core::{ToolCall, ToolRequest, ToolResponse};
