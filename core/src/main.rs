/// Chatlink diagnostic CLI - fetch and print the conversation list
use chatlink_core::{Config, ConversationEngine, EmptyReason, HttpTransport, Tab};
use colored::*;
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    let base_url = match args.get(1) {
        Some(url) => url.clone(),
        None => {
            eprintln!(
                "{}",
                format!(
                    "Usage: {} <base_url> [bearer_token]",
                    args.first().map(String::as_str).unwrap_or("chatlink")
                )
                .yellow()
            );
            std::process::exit(2);
        }
    };

    let config = Config::with_base_url(base_url);
    let mut transport = HttpTransport::new(&config)
        .map_err(|e| anyhow::anyhow!("Transport error: {}", e))?;
    if let Some(token) = args.get(2) {
        transport = transport.with_token(token);
    }

    let engine = ConversationEngine::new(transport, config);
    engine.refresh().await;

    let counts = engine.tab_counts().await;
    println!("{}", "Chatlink conversations".bright_cyan().bold());
    println!();

    for (tab, label, count) in [
        (Tab::Inbox, "Inbox", counts.inbox),
        (Tab::Archived, "Archived", counts.archived),
    ] {
        engine.set_tab(tab).await;
        println!("{} ({})", label.bright_white().bold(), count);
        let list = engine.visible().await;
        if list.is_empty() {
            let copy = match engine.empty_reason().await {
                EmptyReason::NoMatches => "no conversations matched",
                EmptyReason::NoConversations => "no conversations yet",
            };
            println!("  {}", copy.dimmed());
        }
        for c in list {
            let online = if c.user.is_online {
                "●".green()
            } else {
                "○".dimmed()
            };
            let unread = if c.unread_count > 0 {
                format!(" [{}]", c.unread_count).yellow().to_string()
            } else {
                String::new()
            };
            let preview = c
                .last_message
                .as_ref()
                .map(|m| m.content.as_str())
                .unwrap_or("")
                .to_string();
            println!(
                "  {} @{}{}  {}",
                online,
                c.user.username.cyan(),
                unread,
                preview.dimmed()
            );
        }
        println!();
    }

    Ok(())
}
