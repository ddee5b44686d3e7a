mod audio;
mod client;
mod error;

pub use audio::{convert_to_opus, convert_to_opus_temp, needs_conversion};
pub use client::{BridgeClient, DEFAULT_BRIDGE_URL, DownloadOutcome, SendOutcome};
pub use error::{BridgeError, Result};
