use std::path::{Path, PathBuf};

use parley_bridge::{BridgeClient, DownloadOutcome, SendOutcome};
use parley_core::{ToolCall, ToolRequest, ToolResponse};
use parley_db::{ChatQuery, ContextWindow, MessageFilter, Page, Store};
use serde::Serialize;
use tokio::sync::OnceCell;

use crate::config::Config;
use crate::error::{Result, ToolError};
use crate::format::{SenderNames, format_message, format_messages};

/// Executes tool calls against the message store and the bridge.
///
/// The store is opened on first use. A failed open is reported to that call
/// and retried on the next one.
pub struct ToolService {
    store_path: PathBuf,
    store: OnceCell<Store>,
    bridge: BridgeClient,
}

fn required<'a>(name: &'static str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() {
        return Err(ToolError::MissingArgument(name));
    }
    Ok(value)
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?)
}

fn json_or_null<T: Serialize>(value: Option<T>) -> Result<String> {
    match value {
        Some(value) => to_json(&value),
        None => Ok("null".to_string()),
    }
}

fn send_result(result: parley_bridge::Result<SendOutcome>) -> Result<String> {
    let outcome = result.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Send failed");
        SendOutcome::failed(e.to_string())
    });
    to_json(&outcome)
}

impl ToolService {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            store_path: config.store_path.clone(),
            store: OnceCell::new(),
            bridge: BridgeClient::new(config.bridge_url.as_str())?,
        })
    }

    pub fn store_path(&self) -> &Path {
        &self.store_path
    }

    async fn store(&self) -> Result<&Store> {
        Ok(self
            .store
            .get_or_try_init(|| Store::open(&self.store_path))
            .await?)
    }

    pub async fn close(&self) {
        if let Some(store) = self.store.get() {
            store.close().await;
        }
    }

    /// Decode one protocol line and answer it. Never fails: every problem
    /// becomes an error response.
    pub async fn handle_line(&self, line: &str) -> ToolResponse {
        match ToolRequest::from_line(line) {
            Ok(request) => self.call(request).await,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed request line");
                ToolResponse::error(serde_json::Value::Null, ToolError::MalformedRequest(e).to_string())
            }
        }
    }

    pub async fn call(&self, request: ToolRequest) -> ToolResponse {
        let ToolRequest { id, tool, arguments } = request;

        let result = match ToolCall::parse(&tool, arguments) {
            Ok(call) => self.dispatch(call).await,
            Err(e) => Err(e.into()),
        };

        match result {
            Ok(content) => {
                tracing::debug!(%tool, "Tool call succeeded");
                ToolResponse::text(id, content)
            }
            Err(e) => {
                tracing::warn!(%tool, error = %e, "Tool call failed");
                ToolResponse::error(id, e.to_string())
            }
        }
    }

    pub async fn dispatch(&self, call: ToolCall) -> Result<String> {
        match call {
            ToolCall::SearchContacts(args) => {
                let query = required("query", &args.query)?;
                to_json(&self.store().await?.search_contacts(query).await?)
            }
            ToolCall::ListMessages(args) => {
                let filter = MessageFilter {
                    after: args.after,
                    before: args.before,
                    sender: args.sender_phone_number,
                    chat_jid: args.chat_jid,
                    text: args.query,
                    page: Page::new(args.limit, args.page),
                    context: args.include_context.then_some(ContextWindow {
                        before: args.context_before,
                        after: args.context_after,
                    }),
                };
                let store = self.store().await.map_err(messages_error)?;
                let messages = store.list_messages(&filter).await.map_err(ToolError::Messages)?;
                Ok(format_messages(store, &messages, true).await)
            }
            ToolCall::ListChats(args) => {
                let query = ChatQuery {
                    query: args.query,
                    page: Page::new(args.limit, args.page),
                    include_last_message: args.include_last_message,
                    sort_by: args.sort_by,
                };
                to_json(&self.store().await?.list_chats(&query).await?)
            }
            ToolCall::GetChat(args) => {
                let jid = required("chat_jid", &args.chat_jid)?;
                json_or_null(self.store().await?.get_chat(jid, args.include_last_message).await?)
            }
            ToolCall::GetDirectChatByContact(args) => {
                let phone = required("sender_phone_number", &args.sender_phone_number)?;
                json_or_null(self.store().await?.direct_chat_by_contact(phone).await?)
            }
            ToolCall::GetContactChats(args) => {
                let jid = required("jid", &args.jid)?;
                let page = Page::new(args.limit, args.page);
                to_json(&self.store().await?.contact_chats(jid, page).await?)
            }
            ToolCall::GetLastInteraction(args) => {
                let jid = required("jid", &args.jid)?;
                let store = self.store().await?;
                match store.last_interaction(jid).await? {
                    Some(message) => {
                        let sender = SenderNames::new(store).name_for(&message).await;
                        Ok(format_message(&message, false, &sender))
                    }
                    None => Ok("null".to_string()),
                }
            }
            ToolCall::GetMessageContext(args) => {
                let id = required("message_id", &args.message_id)?;
                let window = ContextWindow {
                    before: args.before,
                    after: args.after,
                };
                let store = self.store().await.map_err(messages_error)?;
                let context = store
                    .message_context(id, window)
                    .await
                    .map_err(ToolError::Messages)?;
                to_json(&context)
            }
            ToolCall::SendMessage(args) => {
                let recipient = required("recipient", &args.recipient)?;
                let message = required("message", &args.message)?;
                send_result(self.bridge.send_message(recipient, message).await)
            }
            ToolCall::SendFile(args) => {
                let recipient = required("recipient", &args.recipient)?;
                let path = required("media_path", &args.media_path)?;
                send_result(self.bridge.send_file(recipient, Path::new(path)).await)
            }
            ToolCall::SendAudioMessage(args) => {
                let recipient = required("recipient", &args.recipient)?;
                let path = required("media_path", &args.media_path)?;
                send_result(self.bridge.send_audio_message(recipient, Path::new(path)).await)
            }
            ToolCall::DownloadMedia(args) => {
                let message_id = required("message_id", &args.message_id)?;
                let chat_jid = required("chat_jid", &args.chat_jid)?;
                let outcome = match self.bridge.download_media(message_id, chat_jid).await {
                    Ok(path) => DownloadOutcome::downloaded(path),
                    Err(e) => {
                        tracing::warn!(message_id, error = %e, "Download failed");
                        DownloadOutcome::failed()
                    }
                };
                to_json(&outcome)
            }
        }
    }
}

fn messages_error(error: ToolError) -> ToolError {
    match error {
        ToolError::Db(e) => ToolError::Messages(e),
        other => other,
    }
}
