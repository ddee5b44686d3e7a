use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::audio::{convert_to_opus_temp, needs_conversion};
use crate::error::{BridgeError, Result};

pub const DEFAULT_BRIDGE_URL: &str = "http://localhost:8080/api";

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    recipient: &'a str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    media_path: Option<&'a str>,
}

#[derive(Debug, Serialize)]
struct DownloadRequest<'a> {
    message_id: &'a str,
    chat_jid: &'a str,
}

#[derive(Debug, Deserialize)]
struct DownloadResponse {
    success: bool,
    #[serde(default)]
    message: String,
    #[serde(default)]
    path: Option<String>,
}

/// What the bridge said about a send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendOutcome {
    pub success: bool,
    pub message: String,
}

impl SendOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DownloadOutcome {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl DownloadOutcome {
    pub fn downloaded(file_path: String) -> Self {
        Self {
            success: true,
            message: "Media downloaded successfully".to_string(),
            file_path: Some(file_path),
        }
    }

    pub fn failed() -> Self {
        Self {
            success: false,
            message: "Failed to download media".to_string(),
            file_path: None,
        }
    }
}

/// HTTP client for the bridge's REST API.
#[derive(Debug, Clone)]
pub struct BridgeClient {
    base_url: String,
    http: reqwest::Client,
}

impl BridgeClient {
    /// The bridge runs next to us, so system proxies are bypassed.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let http = reqwest::Client::builder().no_proxy().build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    pub async fn send_message(&self, recipient: &str, message: &str) -> Result<SendOutcome> {
        require_recipient(recipient)?;
        self.post_send(&SendRequest {
            recipient,
            message,
            media_path: None,
        })
        .await
    }

    pub async fn send_file(&self, recipient: &str, media_path: &Path) -> Result<SendOutcome> {
        require_recipient(recipient)?;
        require_file(media_path)?;
        self.post_send(&SendRequest {
            recipient,
            message: "",
            media_path: Some(&*media_path.to_string_lossy()),
        })
        .await
    }

    /// Send a voice note, converting to Opus first unless the file is
    /// already `.ogg`.
    pub async fn send_audio_message(&self, recipient: &str, media_path: &Path) -> Result<SendOutcome> {
        require_recipient(recipient)?;
        require_file(media_path)?;

        let converted = if needs_conversion(media_path) {
            Some(convert_to_opus_temp(media_path).await?)
        } else {
            None
        };
        let path = converted.as_deref().unwrap_or(media_path);

        self.post_send(&SendRequest {
            recipient,
            message: "",
            media_path: Some(&*path.to_string_lossy()),
        })
        .await
    }

    /// Ask the bridge to fetch and decrypt a message's media. Returns the
    /// local path of the downloaded file.
    pub async fn download_media(&self, message_id: &str, chat_jid: &str) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint("download"))
            .json(&DownloadRequest { message_id, chat_jid })
            .send()
            .await?;
        let body: DownloadResponse = read_json(response).await?;

        match body.path.filter(|path| !path.is_empty()) {
            Some(path) if body.success => {
                tracing::info!(message_id, %path, "Media downloaded");
                Ok(path)
            }
            _ => Err(BridgeError::Rejected(body.message)),
        }
    }

    async fn post_send(&self, request: &SendRequest<'_>) -> Result<SendOutcome> {
        tracing::debug!(recipient = request.recipient, media = ?request.media_path, "Posting send");
        let response = self
            .http
            .post(self.endpoint("send"))
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(BridgeError::Status {
            status: status.as_u16(),
            body,
        });
    }
    Ok(response.json().await?)
}

fn require_recipient(recipient: &str) -> Result<()> {
    if recipient.trim().is_empty() {
        return Err(BridgeError::Rejected("Recipient must be provided".to_string()));
    }
    Ok(())
}

fn require_file(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(BridgeError::Rejected("Media path must be provided".to_string()));
    }
    if !path.is_file() {
        return Err(BridgeError::MissingFile(path.to_path_buf()));
    }
    Ok(())
}
