use parley_core::MessageContext;

use crate::error::{DbError, Result};
use crate::messages::DECODABLE_TIME;
use crate::rows::{MESSAGE_SELECT, MessageRow, decode_messages};
use crate::select::{Bind, Select};
use crate::store::Store;

/// How many neighbours to fetch on each side of a target message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextWindow {
    pub before: u32,
    pub after: u32,
}

impl Default for ContextWindow {
    fn default() -> Self {
        Self { before: 5, after: 5 }
    }
}

impl Store {
    /// A message and its neighbours in the same chat.
    ///
    /// `before` holds up to `window.before` messages with strictly earlier
    /// timestamps and `after` up to `window.after` with strictly later ones,
    /// both oldest first. Short windows at the edges of a chat are normal.
    pub async fn message_context(&self, message_id: &str, window: ContextWindow) -> Result<MessageContext> {
        self.context_for(message_id, None, window).await
    }

    /// Same as [`Store::message_context`], optionally pinned to one chat for
    /// stores where message ids repeat across chats.
    pub(crate) async fn context_for(
        &self,
        message_id: &str,
        chat_jid: Option<&str>,
        window: ContextWindow,
    ) -> Result<MessageContext> {
        let mut conn = self.acquire().await?;

        let mut target = Select::new(MESSAGE_SELECT).filter("m.id = ?", [Bind::text(message_id)]);
        if let Some(chat_jid) = chat_jid {
            target = target.filter("m.chat_jid = ?", [Bind::text(chat_jid)]);
        }
        let row: MessageRow = target
            .order_by("m.rowid")
            .limit(1)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| DbError::MessageNotFound(message_id.to_string()))?;

        let stamp = row.timestamp.clone().unwrap_or_default();
        let message = row.into_message()?;

        let before = if window.before == 0 {
            Vec::new()
        } else {
            let rows: Vec<MessageRow> = Select::new(MESSAGE_SELECT)
                .filter("m.chat_jid = ?", [Bind::text(&message.chat_jid)])
                .require(DECODABLE_TIME)
                .filter("julianday(m.timestamp) < julianday(?)", [Bind::text(&stamp)])
                .order_by("julianday(m.timestamp) DESC, m.rowid DESC")
                .limit(window.before)
                .fetch_all(&mut *conn)
                .await?;
            let mut before = decode_messages(rows);
            before.reverse();
            before
        };

        let after = if window.after == 0 {
            Vec::new()
        } else {
            let rows: Vec<MessageRow> = Select::new(MESSAGE_SELECT)
                .filter("m.chat_jid = ?", [Bind::text(&message.chat_jid)])
                .require(DECODABLE_TIME)
                .filter("julianday(m.timestamp) > julianday(?)", [Bind::text(&stamp)])
                .order_by("julianday(m.timestamp) ASC, m.rowid ASC")
                .limit(window.after)
                .fetch_all(&mut *conn)
                .await?;
            decode_messages(rows)
        };

        Ok(MessageContext { message, before, after })
    }
}
