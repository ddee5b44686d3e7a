use parley_core::{Chat, SortBy};

use crate::error::Result;
use crate::rows::ChatRow;
use crate::select::{Bind, Page, Select};
use crate::store::Store;

/// Chats joined with the single message whose timestamp equals the chat's
/// `last_message_time`. Ties go to the lowest rowid so a chat appears once.
const CHAT_WITH_LAST_MESSAGE: &str = r#"
SELECT
    c.jid AS jid,
    c.name AS name,
    c.last_message_time AS last_message_time,
    lm.content AS last_message,
    lm.sender AS last_sender,
    lm.is_from_me AS last_is_from_me
FROM chats c
LEFT JOIN messages lm ON lm.rowid = (
    SELECT x.rowid FROM messages x
    WHERE x.chat_jid = c.jid AND x.timestamp = c.last_message_time
    ORDER BY x.rowid
    LIMIT 1
)
"#;

const CHAT_ONLY: &str = r#"
SELECT
    c.jid AS jid,
    c.name AS name,
    c.last_message_time AS last_message_time,
    NULL AS last_message,
    NULL AS last_sender,
    NULL AS last_is_from_me
FROM chats c
"#;

const LAST_ACTIVE_FIRST: &str = "julianday(c.last_message_time) DESC, c.jid";
const BY_NAME: &str = "c.name IS NULL, c.name, c.jid";
const NOT_GROUP: &str = "c.jid NOT LIKE '%@g.us'";

/// Criteria for [`Store::list_chats`].
#[derive(Debug, Clone)]
pub struct ChatQuery {
    /// Case-insensitive substring of the chat name or JID.
    pub query: Option<String>,
    pub page: Page,
    pub include_last_message: bool,
    pub sort_by: SortBy,
}

impl Default for ChatQuery {
    fn default() -> Self {
        Self {
            query: None,
            page: Page::default(),
            include_last_message: true,
            sort_by: SortBy::LastActive,
        }
    }
}

fn base(include_last_message: bool) -> Select {
    Select::new(if include_last_message {
        CHAT_WITH_LAST_MESSAGE
    } else {
        CHAT_ONLY
    })
}

impl Store {
    pub async fn list_chats(&self, query: &ChatQuery) -> Result<Vec<Chat>> {
        let mut select = base(query.include_last_message);

        if let Some(text) = &query.query {
            select = select.filter(
                "(instr(lower(coalesce(c.name, '')), lower(?)) > 0 OR instr(lower(c.jid), lower(?)) > 0)",
                [Bind::text(text), Bind::text(text)],
            );
        }

        let ordering = match query.sort_by {
            SortBy::LastActive => LAST_ACTIVE_FIRST,
            SortBy::Name => BY_NAME,
        };

        let mut conn = self.acquire().await?;
        let rows: Vec<ChatRow> = select
            .order_by(ordering)
            .paginate(query.page)
            .fetch_all(&mut *conn)
            .await?;

        tracing::debug!(count = rows.len(), sort_by = ?query.sort_by, "Listed chats");
        Ok(rows.into_iter().map(Chat::from).collect())
    }

    pub async fn get_chat(&self, chat_jid: &str, include_last_message: bool) -> Result<Option<Chat>> {
        let mut conn = self.acquire().await?;
        let row: Option<ChatRow> = base(include_last_message)
            .filter("c.jid = ?", [Bind::text(chat_jid)])
            .limit(1)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.map(Chat::from))
    }

    /// The first direct (non-group) chat whose JID contains `phone`, in
    /// store row order.
    pub async fn direct_chat_by_contact(&self, phone: &str) -> Result<Option<Chat>> {
        let mut conn = self.acquire().await?;
        let row: Option<ChatRow> = base(true)
            .filter("instr(c.jid, ?) > 0", [Bind::text(phone)])
            .require(NOT_GROUP)
            .order_by("c.rowid")
            .limit(1)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(row.map(Chat::from))
    }

    /// Every chat that either is `jid` or contains a message sent by `jid`,
    /// most recently active first. Each chat appears once.
    pub async fn contact_chats(&self, jid: &str, page: Page) -> Result<Vec<Chat>> {
        let mut conn = self.acquire().await?;
        let rows: Vec<ChatRow> = base(true)
            .filter(
                "(c.jid = ? OR EXISTS (SELECT 1 FROM messages s WHERE s.chat_jid = c.jid AND s.sender = ?))",
                [Bind::text(jid), Bind::text(jid)],
            )
            .order_by(LAST_ACTIVE_FIRST)
            .paginate(page)
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows.into_iter().map(Chat::from).collect())
    }
}
