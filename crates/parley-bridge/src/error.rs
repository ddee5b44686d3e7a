use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Error: HTTP {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Media file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error(
        "Error converting file to opus ogg. You likely need to install ffmpeg: {0}. \
         Use send_file to send it as a regular file instead"
    )]
    Conversion(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Rejected(String),
}

pub type Result<T> = std::result::Result<T, BridgeError>;
