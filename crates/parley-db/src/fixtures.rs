//! In-memory stores shaped like the bridge's, for tests.

use sqlx::sqlite::SqlitePoolOptions;

use crate::schema::BRIDGE_SCHEMA;
use crate::store::Store;

pub(crate) async fn empty_store() -> Store {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    sqlx::raw_sql(BRIDGE_SCHEMA)
        .execute(&pool)
        .await
        .expect("bridge schema");
    Store::from_pool(pool)
}

pub(crate) async fn insert_chat(store: &Store, jid: &str, name: Option<&str>, last_message_time: Option<&str>) {
    let mut conn = store.acquire().await.unwrap();
    sqlx::query("INSERT INTO chats (jid, name, last_message_time) VALUES (?, ?, ?)")
        .bind(jid)
        .bind(name)
        .bind(last_message_time)
        .execute(&mut *conn)
        .await
        .unwrap();
}

/// A message row; `media_type` and `is_from_me` default to none/false.
pub(crate) struct Row<'a> {
    pub id: &'a str,
    pub chat_jid: &'a str,
    pub sender: &'a str,
    pub content: &'a str,
    pub timestamp: &'a str,
    pub is_from_me: bool,
    pub media_type: Option<&'a str>,
}

impl<'a> Row<'a> {
    pub fn new(id: &'a str, chat_jid: &'a str, sender: &'a str, timestamp: &'a str, content: &'a str) -> Self {
        Self {
            id,
            chat_jid,
            sender,
            content,
            timestamp,
            is_from_me: false,
            media_type: None,
        }
    }

    pub fn from_me(mut self) -> Self {
        self.is_from_me = true;
        self
    }

    pub fn media(mut self, kind: &'a str) -> Self {
        self.media_type = Some(kind);
        self
    }

    pub async fn insert(self, store: &Store) {
        let mut conn = store.acquire().await.unwrap();
        sqlx::query(
            "INSERT INTO messages (id, chat_jid, sender, content, timestamp, is_from_me, media_type)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(self.id)
        .bind(self.chat_jid)
        .bind(self.sender)
        .bind(self.content)
        .bind(self.timestamp)
        .bind(self.is_from_me)
        .bind(self.media_type)
        .execute(&mut *conn)
        .await
        .unwrap();
    }
}

pub(crate) const ALICE: &str = "5511111111111@s.whatsapp.net";
pub(crate) const BOB: &str = "5522222222222@s.whatsapp.net";
pub(crate) const GROUP: &str = "120363000000000001@g.us";

/// Alice and Bob as direct chats, plus one group both post in.
///
/// Messages (oldest first):
/// a1 Alice 09:00 "good morning", a2 me 09:05 "morning!", g1 Bob 09:10 in
/// group "lunch today?", a3 Alice 09:20 "see the photo" (image),
/// g2 Alice 09:30 in group "Lunch sounds great", b1 Bob 09:40 "ping",
/// a4 me 10:00 "thanks".
pub(crate) async fn seeded_store() -> Store {
    let store = empty_store().await;

    insert_chat(&store, ALICE, Some("Alice"), Some("2024-05-01T10:00:00Z")).await;
    insert_chat(&store, BOB, Some("Bob"), Some("2024-05-01T09:40:00Z")).await;
    insert_chat(&store, GROUP, Some("Weekend Crew"), Some("2024-05-01T09:30:00Z")).await;

    Row::new("a1", ALICE, ALICE, "2024-05-01T09:00:00Z", "good morning").insert(&store).await;
    Row::new("a2", ALICE, "me@s.whatsapp.net", "2024-05-01T09:05:00Z", "morning!")
        .from_me()
        .insert(&store)
        .await;
    Row::new("g1", GROUP, BOB, "2024-05-01T09:10:00Z", "lunch today?").insert(&store).await;
    Row::new("a3", ALICE, ALICE, "2024-05-01T09:20:00Z", "see the photo")
        .media("image")
        .insert(&store)
        .await;
    Row::new("g2", GROUP, ALICE, "2024-05-01T09:30:00Z", "Lunch sounds great").insert(&store).await;
    Row::new("b1", BOB, BOB, "2024-05-01T09:40:00Z", "ping").insert(&store).await;
    Row::new("a4", ALICE, "me@s.whatsapp.net", "2024-05-01T10:00:00Z", "thanks")
        .from_me()
        .insert(&store)
        .await;

    store
}
