use serde::{Deserialize, Deserializer};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::models::SortBy;

#[derive(Error, Debug)]
pub enum ToolCallError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A tool invocation with its arguments decoded and defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolCall {
    SearchContacts(SearchContactsArgs),
    ListMessages(ListMessagesArgs),
    ListChats(ListChatsArgs),
    GetChat(GetChatArgs),
    GetDirectChatByContact(DirectChatArgs),
    GetContactChats(ContactChatsArgs),
    GetLastInteraction(JidArgs),
    GetMessageContext(MessageContextArgs),
    SendMessage(SendMessageArgs),
    SendFile(SendMediaArgs),
    SendAudioMessage(SendMediaArgs),
    DownloadMedia(DownloadMediaArgs),
}

impl ToolCall {
    pub fn parse(tool: &str, arguments: serde_json::Value) -> Result<Self, ToolCallError> {
        Ok(match tool {
            "search_contacts" => ToolCall::SearchContacts(decode("search_contacts", arguments)?),
            "list_messages" => ToolCall::ListMessages(decode("list_messages", arguments)?),
            "list_chats" => ToolCall::ListChats(decode("list_chats", arguments)?),
            "get_chat" => ToolCall::GetChat(decode("get_chat", arguments)?),
            "get_direct_chat_by_contact" => {
                ToolCall::GetDirectChatByContact(decode("get_direct_chat_by_contact", arguments)?)
            }
            "get_contact_chats" => ToolCall::GetContactChats(decode("get_contact_chats", arguments)?),
            "get_last_interaction" => {
                ToolCall::GetLastInteraction(decode("get_last_interaction", arguments)?)
            }
            "get_message_context" => {
                ToolCall::GetMessageContext(decode("get_message_context", arguments)?)
            }
            "send_message" => ToolCall::SendMessage(decode("send_message", arguments)?),
            "send_file" => ToolCall::SendFile(decode("send_file", arguments)?),
            "send_audio_message" => ToolCall::SendAudioMessage(decode("send_audio_message", arguments)?),
            "download_media" => ToolCall::DownloadMedia(decode("download_media", arguments)?),
            other => return Err(ToolCallError::UnknownTool(other.to_string())),
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            ToolCall::SearchContacts(_) => "search_contacts",
            ToolCall::ListMessages(_) => "list_messages",
            ToolCall::ListChats(_) => "list_chats",
            ToolCall::GetChat(_) => "get_chat",
            ToolCall::GetDirectChatByContact(_) => "get_direct_chat_by_contact",
            ToolCall::GetContactChats(_) => "get_contact_chats",
            ToolCall::GetLastInteraction(_) => "get_last_interaction",
            ToolCall::GetMessageContext(_) => "get_message_context",
            ToolCall::SendMessage(_) => "send_message",
            ToolCall::SendFile(_) => "send_file",
            ToolCall::SendAudioMessage(_) => "send_audio_message",
            ToolCall::DownloadMedia(_) => "download_media",
        }
    }
}

fn decode<T: DeserializeOwned>(
    tool: &'static str,
    arguments: serde_json::Value,
) -> Result<T, ToolCallError> {
    let arguments = if arguments.is_null() {
        serde_json::Value::Object(Default::default())
    } else {
        arguments
    };
    serde_json::from_value(arguments).map_err(|source| ToolCallError::InvalidArguments { tool, source })
}

/// Optional text arguments treat `""` the same as an absent value.
fn empty_as_none<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

fn default_limit() -> u32 {
    20
}

fn default_true() -> bool {
    true
}

fn default_one() -> u32 {
    1
}

fn default_five() -> u32 {
    5
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SearchContactsArgs {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListMessagesArgs {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub after: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub before: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub sender_phone_number: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub chat_jid: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub query: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_true")]
    pub include_context: bool,
    #[serde(default = "default_one")]
    pub context_before: u32,
    #[serde(default = "default_one")]
    pub context_after: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ListChatsArgs {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub query: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub page: u32,
    #[serde(default = "default_true")]
    pub include_last_message: bool,
    #[serde(default)]
    pub sort_by: SortBy,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GetChatArgs {
    #[serde(default)]
    pub chat_jid: String,
    #[serde(default = "default_true")]
    pub include_last_message: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DirectChatArgs {
    #[serde(default)]
    pub sender_phone_number: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ContactChatsArgs {
    #[serde(default)]
    pub jid: String,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JidArgs {
    #[serde(default)]
    pub jid: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MessageContextArgs {
    #[serde(default)]
    pub message_id: String,
    #[serde(default = "default_five")]
    pub before: u32,
    #[serde(default = "default_five")]
    pub after: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SendMessageArgs {
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SendMediaArgs {
    #[serde(default)]
    pub recipient: String,
    #[serde(default)]
    pub media_path: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DownloadMediaArgs {
    #[serde(default)]
    pub message_id: String,
    #[serde(default)]
    pub chat_jid: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const TOOL_NAMES: &[&str] = &[
        "search_contacts",
        "list_messages",
        "list_chats",
        "get_chat",
        "get_direct_chat_by_contact",
        "get_contact_chats",
        "get_last_interaction",
        "get_message_context",
        "send_message",
        "send_file",
        "send_audio_message",
        "download_media",
    ];

    #[test]
    fn test_list_messages_defaults() {
        let call = ToolCall::parse("list_messages", json!({})).unwrap();
        let ToolCall::ListMessages(args) = call else {
            panic!("wrong variant");
        };
        assert_eq!(args.limit, 20);
        assert_eq!(args.page, 0);
        assert!(args.include_context);
        assert_eq!(args.context_before, 1);
        assert_eq!(args.context_after, 1);
        assert_eq!(args.after, None);
    }

    #[test]
    fn test_empty_optional_strings_are_absent() {
        let call = ToolCall::parse(
            "list_messages",
            json!({ "chat_jid": "", "query": "lunch", "limit": 5 }),
        )
        .unwrap();
        let ToolCall::ListMessages(args) = call else {
            panic!("wrong variant");
        };
        assert_eq!(args.chat_jid, None);
        assert_eq!(args.query.as_deref(), Some("lunch"));
        assert_eq!(args.limit, 5);
    }

    #[test]
    fn test_null_arguments_use_defaults() {
        let call = ToolCall::parse("get_message_context", serde_json::Value::Null).unwrap();
        assert_eq!(
            call,
            ToolCall::GetMessageContext(MessageContextArgs {
                message_id: String::new(),
                before: 5,
                after: 5,
            })
        );
    }

    #[test]
    fn test_list_chats_sort_by() {
        let call = ToolCall::parse("list_chats", json!({ "sort_by": "name" })).unwrap();
        let ToolCall::ListChats(args) = call else {
            panic!("wrong variant");
        };
        assert_eq!(args.sort_by, SortBy::Name);
        assert!(args.include_last_message);
    }

    #[test]
    fn test_unknown_tool() {
        let err = ToolCall::parse("delete_everything", json!({})).unwrap_err();
        assert!(matches!(err, ToolCallError::UnknownTool(name) if name == "delete_everything"));
    }

    #[test]
    fn test_negative_limit_is_rejected() {
        let err = ToolCall::parse("list_chats", json!({ "limit": -1 })).unwrap_err();
        assert!(matches!(err, ToolCallError::InvalidArguments { tool: "list_chats", .. }));
    }

    #[test]
    fn test_names_round_trip() {
        for name in TOOL_NAMES {
            let call = ToolCall::parse(name, json!({})).unwrap();
            assert_eq!(call.name(), *name);
        }
    }
}
