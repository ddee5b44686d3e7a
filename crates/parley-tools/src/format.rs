use std::collections::HashMap;
use std::fmt::Write;

use parley_core::Message;
use parley_db::{Store, format_display};

pub const NO_MESSAGES: &str = "No messages to display.";

/// Render one message as a single line, newline included.
///
/// `[ts] Chat: <name> From: <sender>: [<media> - Message ID: <id> - Chat JID: <jid>] <content>`
///
/// The chat segment appears only with `show_chat_info` and a known chat name;
/// the media segment only for messages carrying media.
pub fn format_message(message: &Message, show_chat_info: bool, sender_name: &str) -> String {
    let mut line = format!("[{}] ", format_display(&message.timestamp));

    if show_chat_info {
        if let Some(name) = message.chat_name.as_deref().filter(|name| !name.is_empty()) {
            let _ = write!(line, "Chat: {name} ");
        }
    }

    let _ = write!(line, "From: {sender_name}: ");

    if let Some(kind) = &message.media_type {
        let _ = write!(
            line,
            "[{kind} - Message ID: {} - Chat JID: {}] ",
            message.id, message.chat_jid
        );
    }

    line.push_str(&message.content);
    line.push('\n');
    line
}

/// Resolves display names for senders, asking the store at most once per
/// sender for the lifetime of the value.
pub struct SenderNames<'a> {
    store: &'a Store,
    cache: HashMap<String, String>,
}

impl<'a> SenderNames<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self {
            store,
            cache: HashMap::new(),
        }
    }

    pub async fn name_for(&mut self, message: &Message) -> String {
        if message.is_from_me {
            return "Me".to_string();
        }
        if let Some(name) = self.cache.get(&message.sender) {
            return name.clone();
        }
        let name = self.store.resolve_sender(&message.sender).await;
        self.cache.insert(message.sender.clone(), name.clone());
        name
    }
}

/// Render a list of messages, or a placeholder when there are none.
pub async fn format_messages(store: &Store, messages: &[Message], show_chat_info: bool) -> String {
    if messages.is_empty() {
        return NO_MESSAGES.to_string();
    }

    let mut names = SenderNames::new(store);
    let mut output = String::new();
    for message in messages {
        let sender = names.name_for(message).await;
        output.push_str(&format_message(message, show_chat_info, &sender));
    }
    output
}
