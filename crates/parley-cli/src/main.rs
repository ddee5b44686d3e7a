use std::io::{self, Write};

use color_eyre::eyre::{Context, Result};
use owo_colors::OwoColorize;
use parley_core::Chat;
use parley_db::{ChatQuery, ContextWindow, Page, Store, format_display};
use parley_tools::{Config, SenderNames, format_message, format_messages};

const REPORT_SIZE: u32 = 5;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .from_env_lossy()
                .add_directive("parley_cli=info".parse()?)
                .add_directive("parley_tools=warn".parse()?)
                .add_directive("parley_db=warn".parse()?),
        )
        .init();

    let config = Config::from_env().wrap_err("Failed to resolve configuration")?;
    let store = Store::open(&config.store_path)
        .await
        .wrap_err_with(|| format!("Cannot open message store at {}", config.store_path.display()))?;

    println!("📁 Message store: {}", store.path().display().bright_black());

    let batch = std::env::args().nth(1).is_some_and(|arg| arg == "report");
    let outcome = if batch { report(&store).await } else { interactive(&store).await };

    store.close().await;
    outcome
}

async fn report(store: &Store) -> Result<()> {
    latest_message(store).await?;
    recent_messages(store).await?;
    active_chats(store).await?;
    stats(store).await?;
    Ok(())
}

async fn interactive(store: &Store) -> Result<()> {
    loop {
        print_menu();
        let choice = read_line("Choice: ")?;

        let result = match choice.as_str() {
            "1" => latest_message(store).await,
            "2" => recent_messages(store).await,
            "3" => active_chats(store).await,
            "4" => stats(store).await,
            "5" => search_contacts(store).await,
            "6" => chat_lookup(store).await,
            "7" => message_context(store).await,
            "0" => {
                println!("👋 Bye");
                break;
            }
            _ => {
                println!("{}", "❌ Invalid choice".red());
                continue;
            }
        };

        // Query failures are shown and the menu keeps going.
        if let Err(e) = result {
            println!("{} {e:#}", "❌".red());
        }
    }
    Ok(())
}

fn print_menu() {
    println!();
    println!("╔════════════════════════════════════╗");
    println!("║       PARLEY - Message Store       ║");
    println!("╠════════════════════════════════════╣");
    println!("║  1. Latest Message                 ║");
    println!("║  2. Recent Messages                ║");
    println!("║  3. Active Chats                   ║");
    println!("║  4. Store Stats                    ║");
    println!("║  5. Search Contacts                ║");
    println!("║  6. Chat Lookup                    ║");
    println!("║  7. Message Context                ║");
    println!("║  0. Exit                           ║");
    println!("╚════════════════════════════════════╝");
}

fn heading(title: &str) {
    println!("\n{}", title.bold().bright_green());
}

async fn latest_message(store: &Store) -> Result<()> {
    heading("🕑 Latest message");
    match store.latest_message().await.wrap_err("Failed to read latest message")? {
        Some(message) => print!("{}", format_messages(store, &[message], true).await),
        None => println!("📭 No messages found"),
    }
    Ok(())
}

async fn recent_messages(store: &Store) -> Result<()> {
    heading(&format!("💬 Last {REPORT_SIZE} messages"));
    let messages = store
        .recent_messages(REPORT_SIZE)
        .await
        .wrap_err("Failed to read recent messages")?;
    let rendered = format_messages(store, &messages, true).await;
    println!("{}", rendered.trim_end());
    Ok(())
}

async fn active_chats(store: &Store) -> Result<()> {
    heading(&format!("🔥 {REPORT_SIZE} most active chats"));
    let query = ChatQuery {
        page: Page::first(REPORT_SIZE),
        ..Default::default()
    };
    let chats = store.list_chats(&query).await.wrap_err("Failed to list chats")?;
    if chats.is_empty() {
        println!("📭 No chats found");
    }
    for (i, chat) in chats.iter().enumerate() {
        println!("  {}. {}", i + 1, describe_chat(chat));
    }
    Ok(())
}

async fn stats(store: &Store) -> Result<()> {
    heading("📊 Store stats");
    let stats = store.stats().await.wrap_err("Failed to count rows")?;
    println!("  messages: {}", stats.messages.bright_cyan());
    println!("  chats:    {}", stats.chats.bright_cyan());
    Ok(())
}

async fn search_contacts(store: &Store) -> Result<()> {
    let query = read_line("Name or number: ")?;
    if query.is_empty() {
        return Ok(());
    }

    let contacts = store.search_contacts(&query).await?;
    if contacts.is_empty() {
        println!("📭 No contacts found");
        return Ok(());
    }

    println!("\n📇 Contacts ({}):", contacts.len());
    for contact in contacts {
        println!(
            "  📱 {} - {} ({})",
            contact.phone_number,
            contact.name.as_deref().unwrap_or("?"),
            contact.jid.bright_black()
        );
    }
    Ok(())
}

async fn chat_lookup(store: &Store) -> Result<()> {
    let jid = read_line("Chat JID: ")?;
    if jid.is_empty() {
        return Ok(());
    }

    match store.get_chat(&jid, true).await? {
        Some(chat) => {
            println!("\n{}", describe_chat(&chat));
            if let Some(last) = &chat.last_message {
                let who = if chat.last_is_from_me == Some(true) {
                    "Me".to_string()
                } else {
                    store.resolve_sender(chat.last_sender.as_deref().unwrap_or_default()).await
                };
                println!("  last: {who}: {last}");
            }
        }
        None => println!("📭 No chat with JID {jid}"),
    }
    Ok(())
}

async fn message_context(store: &Store) -> Result<()> {
    let id = read_line("Message ID: ")?;
    if id.is_empty() {
        return Ok(());
    }

    let context = store.message_context(&id, ContextWindow::default()).await?;
    let target = context.message.id.clone();

    let mut names = SenderNames::new(store);
    for message in context.into_sequence() {
        let sender = names.name_for(&message).await;
        let line = format_message(&message, false, &sender);
        if message.id == target {
            print!("{}", line.bold());
        } else {
            print!("{}", line.bright_black());
        }
    }
    Ok(())
}

fn describe_chat(chat: &Chat) -> String {
    let kind = if chat.is_group() { "👥" } else { "👤" };
    let when = chat
        .last_message_time
        .as_ref()
        .map(format_display)
        .unwrap_or_else(|| "never".to_string());
    format!(
        "{kind} {} {} (last active {when})",
        chat.name.as_deref().unwrap_or(&chat.jid),
        chat.jid.bright_black()
    )
}

fn read_line(prompt: &str) -> Result<String> {
    print!("{}", prompt);
    io::stdout().flush()?;
    let mut input = String::new();
    io::stdin().read_line(&mut input)?;
    Ok(input.trim().to_string())
}
