use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Deserializer, Serialize};

use crate::jid::{is_group_jid, local_part};

/// A stored message joined with the name of its chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub timestamp: DateTime<FixedOffset>,
    pub sender: String,
    pub content: String,
    pub is_from_me: bool,
    pub chat_jid: String,
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
}

/// A chat, optionally joined with its most recent message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chat {
    pub jid: String,
    pub name: Option<String>,
    pub last_message_time: Option<DateTime<FixedOffset>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_sender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_is_from_me: Option<bool>,
}

impl Chat {
    pub fn is_group(&self) -> bool {
        is_group_jid(&self.jid)
    }
}

/// Projection of a direct chat used for contact search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub phone_number: String,
    pub name: Option<String>,
    pub jid: String,
}

impl Contact {
    pub fn from_chat(jid: String, name: Option<String>) -> Self {
        Self {
            phone_number: local_part(&jid).to_string(),
            name,
            jid,
        }
    }
}

/// A target message with its chronological neighbours in the same chat.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageContext {
    pub message: Message,
    pub before: Vec<Message>,
    pub after: Vec<Message>,
}

impl MessageContext {
    /// `before ++ [message] ++ after`, oldest first.
    pub fn into_sequence(self) -> Vec<Message> {
        let mut sequence = self.before;
        sequence.reserve(self.after.len() + 1);
        sequence.push(self.message);
        sequence.extend(self.after);
        sequence
    }
}

/// Ordering for chat listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    LastActive,
    Name,
}

impl SortBy {
    /// Unknown values fall back to `LastActive`.
    pub fn from_param(value: &str) -> Self {
        match value {
            "name" => SortBy::Name,
            _ => SortBy::LastActive,
        }
    }
}

impl<'de> Deserialize<'de> for SortBy {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        Ok(value.as_deref().map(SortBy::from_param).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(id: &str) -> Message {
        Message {
            timestamp: DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z").unwrap(),
            sender: "5511999999999@s.whatsapp.net".into(),
            content: "hi".into(),
            is_from_me: false,
            chat_jid: "5511999999999@s.whatsapp.net".into(),
            id: id.into(),
            chat_name: None,
            media_type: None,
        }
    }

    #[test]
    fn test_message_json_omits_absent_optionals() {
        let json = serde_json::to_value(message("A1")).unwrap();
        assert!(json.get("chat_name").is_none());
        assert!(json.get("media_type").is_none());
        assert_eq!(json["timestamp"], "2024-05-01T10:00:00+00:00");
    }

    #[test]
    fn test_chat_json_keeps_nullable_name() {
        let chat = Chat {
            jid: "123@g.us".into(),
            name: None,
            last_message_time: None,
            last_message: None,
            last_sender: None,
            last_is_from_me: None,
        };
        assert!(chat.is_group());
        let json = serde_json::to_value(&chat).unwrap();
        assert!(json["name"].is_null());
        assert!(json["last_message_time"].is_null());
        assert!(json.get("last_message").is_none());
    }

    #[test]
    fn test_contact_phone_number_is_local_part() {
        let contact = Contact::from_chat("5511999999999@s.whatsapp.net".into(), Some("Ana".into()));
        assert_eq!(contact.phone_number, "5511999999999");
    }

    #[test]
    fn test_context_sequence_order() {
        let context = MessageContext {
            message: message("B"),
            before: vec![message("A")],
            after: vec![message("C"), message("D")],
        };
        let ids: Vec<_> = context.into_sequence().into_iter().map(|m| m.id).collect();
        assert_eq!(ids, ["A", "B", "C", "D"]);
    }

    #[test]
    fn test_sort_by_falls_back_to_last_active() {
        assert_eq!(SortBy::from_param("name"), SortBy::Name);
        assert_eq!(SortBy::from_param("newest"), SortBy::LastActive);
        let parsed: SortBy = serde_json::from_str("null").unwrap();
        assert_eq!(parsed, SortBy::LastActive);
    }
}
