use parley_core::local_part;

use crate::error::Result;
use crate::store::Store;

impl Store {
    /// Display name for a sender JID. Never fails: lookup errors and misses
    /// both return `sender` unchanged.
    ///
    /// Tries an exact chat JID match first, then any chat whose JID contains
    /// the sender's local part. When several chats match the second stage
    /// the oldest row wins.
    pub async fn resolve_sender(&self, sender: &str) -> String {
        match self.lookup_sender_name(sender).await {
            Ok(Some(name)) => name,
            Ok(None) => sender.to_string(),
            Err(e) => {
                tracing::warn!(sender, error = %e, "Database error while resolving sender name");
                sender.to_string()
            }
        }
    }

    async fn lookup_sender_name(&self, sender: &str) -> Result<Option<String>> {
        if sender.is_empty() {
            return Ok(None);
        }

        let mut conn = self.acquire().await?;

        let exact: Option<Option<String>> =
            sqlx::query_scalar("SELECT name FROM chats WHERE jid = ? LIMIT 1")
                .bind(sender)
                .fetch_optional(&mut *conn)
                .await?;
        if let Some(name) = exact.flatten().filter(|name| !name.is_empty()) {
            return Ok(Some(name));
        }

        let phone = local_part(sender);
        if phone.is_empty() {
            return Ok(None);
        }

        let partial: Option<Option<String>> = sqlx::query_scalar(
            "SELECT name FROM chats
             WHERE instr(jid, ?) > 0 AND coalesce(name, '') <> ''
             ORDER BY rowid
             LIMIT 1",
        )
        .bind(phone)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(partial.flatten())
    }
}

#[cfg(test)]
mod tests {
    use crate::fixtures::{ALICE, GROUP, empty_store, insert_chat, seeded_store};

    #[tokio::test]
    async fn test_exact_match() {
        let store = seeded_store().await;
        assert_eq!(store.resolve_sender(ALICE).await, "Alice");
        assert_eq!(store.resolve_sender(GROUP).await, "Weekend Crew");
    }

    #[tokio::test]
    async fn test_partial_match_on_local_part() {
        let store = seeded_store().await;
        assert_eq!(store.resolve_sender("5511111111111@lid").await, "Alice");
        assert_eq!(store.resolve_sender("5511111111111").await, "Alice");
    }

    #[tokio::test]
    async fn test_unknown_sender_is_returned_unchanged() {
        let store = seeded_store().await;
        assert_eq!(store.resolve_sender("999@s.whatsapp.net").await, "999@s.whatsapp.net");
        assert_eq!(store.resolve_sender("").await, "");
        assert_eq!(store.resolve_sender("@s.whatsapp.net").await, "@s.whatsapp.net");
    }

    #[tokio::test]
    async fn test_empty_name_falls_through() {
        let store = empty_store().await;
        insert_chat(&store, "5533@s.whatsapp.net", Some(""), None).await;
        assert_eq!(store.resolve_sender("5533@s.whatsapp.net").await, "5533@s.whatsapp.net");
    }

    #[tokio::test]
    async fn test_store_errors_are_swallowed() {
        let store = empty_store().await;
        store.close().await;
        assert_eq!(store.resolve_sender(ALICE).await, ALICE);
    }
}
