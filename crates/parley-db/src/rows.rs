use parley_core::{Chat, Message};

use crate::error::Result;
use crate::timestamp::parse_timestamp;

/// Columns every message query selects, in the shape [`MessageRow`] decodes.
pub(crate) const MESSAGE_SELECT: &str = r#"
SELECT
    m.timestamp AS timestamp,
    m.sender AS sender,
    c.name AS chat_name,
    m.content AS content,
    m.is_from_me AS is_from_me,
    m.chat_jid AS chat_jid,
    m.id AS id,
    m.media_type AS media_type
FROM messages m
JOIN chats c ON m.chat_jid = c.jid
"#;

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct MessageRow {
    pub timestamp: Option<String>,
    pub sender: Option<String>,
    pub chat_name: Option<String>,
    pub content: Option<String>,
    pub is_from_me: Option<bool>,
    pub chat_jid: String,
    pub id: String,
    pub media_type: Option<String>,
}

impl MessageRow {
    pub fn into_message(self) -> Result<Message> {
        let timestamp = parse_timestamp(self.timestamp.as_deref().unwrap_or_default())?;
        Ok(Message {
            timestamp,
            sender: self.sender.unwrap_or_default(),
            content: self.content.unwrap_or_default(),
            is_from_me: self.is_from_me.unwrap_or(false),
            chat_jid: self.chat_jid,
            id: self.id,
            chat_name: self.chat_name,
            media_type: self.media_type.filter(|kind| !kind.is_empty()),
        })
    }
}

/// Decode rows, dropping any whose timestamp does not parse.
pub(crate) fn decode_messages(rows: Vec<MessageRow>) -> Vec<Message> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id.clone();
            match row.into_message() {
                Ok(message) => Some(message),
                Err(e) => {
                    tracing::warn!(message_id = %id, error = %e, "Skipping message row");
                    None
                }
            }
        })
        .collect()
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ChatRow {
    pub jid: String,
    pub name: Option<String>,
    pub last_message_time: Option<String>,
    pub last_message: Option<String>,
    pub last_sender: Option<String>,
    pub last_is_from_me: Option<bool>,
}

impl From<ChatRow> for Chat {
    fn from(row: ChatRow) -> Self {
        let last_message_time = row.last_message_time.as_deref().and_then(|raw| {
            parse_timestamp(raw)
                .inspect_err(|e| tracing::debug!(jid = %row.jid, error = %e, "Ignoring chat timestamp"))
                .ok()
        });

        Chat {
            jid: row.jid,
            name: row.name,
            last_message_time,
            last_message: row.last_message,
            last_sender: row.last_sender,
            last_is_from_me: row.last_is_from_me,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
pub(crate) struct ContactRow {
    pub jid: String,
    pub name: Option<String>,
}
