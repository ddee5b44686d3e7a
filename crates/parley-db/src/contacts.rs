use parley_core::Contact;

use crate::error::Result;
use crate::rows::ContactRow;
use crate::select::{Bind, Select};
use crate::store::Store;

const CONTACT_SELECT: &str = "SELECT c.jid AS jid, c.name AS name FROM chats c";

const MAX_CONTACTS: u32 = 50;

impl Store {
    /// Direct chats whose name or JID contains `query`, ignoring case.
    pub async fn search_contacts(&self, query: &str) -> Result<Vec<Contact>> {
        let mut conn = self.acquire().await?;
        let rows: Vec<ContactRow> = Select::new(CONTACT_SELECT)
            .filter(
                "(instr(lower(coalesce(c.name, '')), lower(?)) > 0 OR instr(lower(c.jid), lower(?)) > 0)",
                [Bind::text(query), Bind::text(query)],
            )
            .require("c.jid NOT LIKE '%@g.us'")
            .order_by("c.name, c.jid")
            .limit(MAX_CONTACTS)
            .fetch_all(&mut *conn)
            .await?;

        tracing::debug!(query, count = rows.len(), "Searched contacts");
        Ok(rows
            .into_iter()
            .map(|row| Contact::from_chat(row.jid, row.name))
            .collect())
    }
}
