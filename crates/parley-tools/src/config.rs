use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use parley_bridge::DEFAULT_BRIDGE_URL;

use crate::error::{Result, ToolError};

pub const STORE_PATH_ENV: &str = "PARLEY_STORE_PATH";
pub const BRIDGE_URL_ENV: &str = "PARLEY_BRIDGE_URL";

/// Where the bridge keeps its SQLite store, relative to a checkout.
const BRIDGE_STORE: &str = "whatsapp-bridge/store/messages.db";

/// Settings fixed at startup and handed to every component that needs them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub store_path: PathBuf,
    pub bridge_url: String,
}

impl Config {
    pub fn new(store_path: impl Into<PathBuf>, bridge_url: impl Into<String>) -> Self {
        Self {
            store_path: store_path.into(),
            bridge_url: bridge_url.into(),
        }
    }

    pub fn from_env() -> Result<Self> {
        let store_path = match std::env::var_os(STORE_PATH_ENV).filter(|v| !v.is_empty()) {
            Some(path) => PathBuf::from(path),
            None => {
                let exe = std::env::current_exe().ok();
                let cwd = std::env::current_dir().ok();
                find_bridge_store(exe.as_deref().and_then(Path::parent), cwd.as_deref())
                    .or_else(default_store_path)
                    .ok_or_else(|| ToolError::Config("could not determine a message store path".into()))?
            }
        };

        let bridge_url = std::env::var(BRIDGE_URL_ENV)
            .ok()
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_BRIDGE_URL.to_string());

        tracing::debug!(store = %store_path.display(), bridge = %bridge_url, "Resolved configuration");
        Ok(Self { store_path, bridge_url })
    }
}

/// Walk up from `start`, then try `cwd`, looking for the bridge's store.
fn find_bridge_store(start: Option<&Path>, cwd: Option<&Path>) -> Option<PathBuf> {
    let mut current = start;
    while let Some(dir) = current {
        let candidate = dir.join(BRIDGE_STORE);
        if candidate.is_file() {
            return Some(candidate);
        }
        current = dir.parent();
    }

    cwd.map(|dir| dir.join(BRIDGE_STORE))
        .filter(|candidate| candidate.is_file())
}

fn default_store_path() -> Option<PathBuf> {
    ProjectDirs::from("dev", "parley", "parley").map(|dirs| dirs.data_dir().join("messages.db"))
}
