use parley_core::Message;
use serde::Serialize;

use crate::context::ContextWindow;
use crate::error::{DbError, Result};
use crate::rows::{MESSAGE_SELECT, MessageRow, decode_messages};
use crate::select::{Bind, Page, Select};
use crate::store::Store;
use crate::timestamp::{decodable_message_time, parse_bound};

/// Newest first; rows the codec cannot decode are filtered out in SQL so
/// pages stay full.
const NEWEST_FIRST: &str = "julianday(m.timestamp) DESC, m.rowid DESC";
pub(crate) const DECODABLE_TIME: &str = decodable_message_time!();

/// Strict lookups put undecodable rows first so they are reported instead
/// of skipped, then order the rest by instant.
const NEWEST_FIRST_STRICT: &str = concat!(
    decodable_message_time!(),
    " ASC, julianday(m.timestamp) DESC, m.rowid DESC"
);

/// Criteria for [`Store::list_messages`]. All predicates are ANDed.
#[derive(Debug, Clone, Default)]
pub struct MessageFilter {
    /// Exclusive lower bound, ISO-8601.
    pub after: Option<String>,
    /// Exclusive upper bound, ISO-8601.
    pub before: Option<String>,
    pub sender: Option<String>,
    pub chat_jid: Option<String>,
    /// Case-insensitive substring of the content.
    pub text: Option<String>,
    pub page: Page,
    /// Expand every match into its surrounding conversation.
    pub context: Option<ContextWindow>,
}

impl MessageFilter {
    fn select(&self) -> Result<Select> {
        let mut select = Select::new(MESSAGE_SELECT).require(DECODABLE_TIME);

        if let Some(after) = &self.after {
            let after = parse_bound("after", after)?;
            select = select.filter("julianday(m.timestamp) > julianday(?)", [Bind::Text(after)]);
        }
        if let Some(before) = &self.before {
            let before = parse_bound("before", before)?;
            select = select.filter("julianday(m.timestamp) < julianday(?)", [Bind::Text(before)]);
        }
        if let Some(sender) = &self.sender {
            select = select.filter("m.sender = ?", [Bind::text(sender)]);
        }
        if let Some(chat_jid) = &self.chat_jid {
            select = select.filter("m.chat_jid = ?", [Bind::text(chat_jid)]);
        }
        if let Some(text) = &self.text {
            select = select.filter("instr(lower(m.content), lower(?)) > 0", [Bind::text(text)]);
        }

        Ok(select.order_by(NEWEST_FIRST).paginate(self.page))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub messages: i64,
    pub chats: i64,
}

impl Store {
    /// One page of matching messages, newest first.
    ///
    /// With `filter.context` set, each match is replaced by its context
    /// window (oldest first) and the windows are concatenated in match
    /// order. Windows are not de-duplicated against each other.
    pub async fn list_messages(&self, filter: &MessageFilter) -> Result<Vec<Message>> {
        let select = filter.select()?;

        let rows: Vec<MessageRow> = {
            let mut conn = self.acquire().await?;
            select.fetch_all(&mut *conn).await?
        };
        let matches = decode_messages(rows);

        tracing::debug!(count = matches.len(), page = filter.page.page, "Listed messages");

        let Some(window) = filter.context else {
            return Ok(matches);
        };

        let mut expanded = Vec::with_capacity(matches.len());
        for matched in &matches {
            match self.context_for(&matched.id, Some(&matched.chat_jid), window).await {
                Ok(context) => expanded.extend(context.into_sequence()),
                Err(DbError::MessageNotFound(id)) => {
                    tracing::warn!(message_id = %id, "Matched message disappeared before context lookup");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(expanded)
    }

    /// The most recent message sent by `jid` or posted in the chat `jid`.
    pub async fn last_interaction(&self, jid: &str) -> Result<Option<Message>> {
        let select = Select::new(MESSAGE_SELECT)
            .filter("(m.sender = ? OR m.chat_jid = ?)", [Bind::text(jid), Bind::text(jid)])
            .order_by(NEWEST_FIRST_STRICT)
            .limit(1);
        self.fetch_strict(select).await
    }

    /// The newest message in any chat.
    pub async fn latest_message(&self) -> Result<Option<Message>> {
        let select = Select::new(MESSAGE_SELECT).order_by(NEWEST_FIRST_STRICT).limit(1);
        self.fetch_strict(select).await
    }

    /// The newest `count` messages across all chats.
    pub async fn recent_messages(&self, count: u32) -> Result<Vec<Message>> {
        let select = Select::new(MESSAGE_SELECT)
            .require(DECODABLE_TIME)
            .order_by(NEWEST_FIRST)
            .limit(count);
        let mut conn = self.acquire().await?;
        let rows: Vec<MessageRow> = select.fetch_all(&mut *conn).await?;
        Ok(decode_messages(rows))
    }

    pub async fn stats(&self) -> Result<StoreStats> {
        let mut conn = self.acquire().await?;
        let messages: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM messages")
            .fetch_one(&mut *conn)
            .await?;
        let chats: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chats")
            .fetch_one(&mut *conn)
            .await?;
        Ok(StoreStats { messages, chats })
    }

    async fn fetch_strict(&self, select: Select) -> Result<Option<Message>> {
        let mut conn = self.acquire().await?;
        let row: Option<MessageRow> = select.fetch_optional(&mut *conn).await?;
        row.map(MessageRow::into_message).transpose()
    }
}
