use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;

use gabay_chat::chat::ChatSession;
use gabay_chat::client::BackendClient;
use gabay_chat::config::Config;
use gabay_chat::i18n::{LanguageRegistry, LanguageStore};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("gabay_chat=info".parse()?),
        )
        .init();

    let config = Config::from_env()?;
    info!(
        "Connecting to translation backend at {}",
        config.backend_base_url
    );

    let language = Arc::new(
        LanguageStore::open(config.locales_dir.clone(), config.language_file.clone()).await,
    );
    let client = BackendClient::new(reqwest::Client::new(), config.backend_base_url.clone());
    let session = ChatSession::with_refresh_delays(
        client,
        Arc::clone(&language),
        Duration::from_millis(config.refresh_delay_short_ms),
        Duration::from_millis(config.refresh_delay_long_ms),
    );

    println!(
        "{} [{}]",
        language.text("send_message", "Send Message"),
        language.locale()
    );
    print_help();

    // Pick up whatever history exists for the restored locale
    session.refresh().await;
    render(&session, &language);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    prompt();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim().to_string();

        match line.split_whitespace().next() {
            Some("/quit") | Some("/exit") => break,
            Some("/help") => print_help(),
            Some("/lang") => {
                match line.split_whitespace().nth(1) {
                    Some(code) => {
                        language.set_locale(code).await;
                        let label = LanguageRegistry::get()
                            .get_by_code(code)
                            .map(|lang| lang.native_name)
                            .unwrap_or(code);
                        println!("{}: {}", language.text("language", "Language"), label);
                        // The chat history is per-language; re-fetch it
                        session.refresh().await;
                        render(&session, &language);
                    }
                    None => {
                        for lang in LanguageRegistry::get().list_enabled() {
                            println!("  {}  {} ({})", lang.code, lang.name, lang.native_name);
                        }
                    }
                }
            }
            Some("/languages") => {
                for lang in LanguageRegistry::get().list_enabled() {
                    println!("  {}  {} ({})", lang.code, lang.name, lang.native_name);
                }
            }
            Some("/refresh") => {
                session.refresh().await;
                render(&session, &language);
            }
            Some("/original") => {
                if let Some(id) = line.split_whitespace().nth(1) {
                    session.toggle_original(id);
                    render(&session, &language);
                } else {
                    println!("usage: /original <message-id>");
                }
            }
            Some("/clear") => {
                session.clear();
                render(&session, &language);
            }
            Some("/test") => {
                let status = session.test_connection().await;
                if status.success {
                    println!(
                        "{}: {}",
                        language.text("connected", "Connected"),
                        status.message.unwrap_or_default()
                    );
                } else {
                    println!(
                        "{}: {}",
                        language.text("connection_failed", "Connection Failed"),
                        status.error.unwrap_or_default()
                    );
                    if let Some(suggestion) = status.suggestion {
                        println!("  {}", suggestion);
                    }
                }
            }
            Some(_) => {
                session.send(&line).await;
                render(&session, &language);
            }
            None => {}
        }

        prompt();
    }

    session.close();
    language.close();
    Ok(())
}

fn prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

fn print_help() {
    println!(
        "commands: /lang <code>, /languages, /refresh, /original <id>, /clear, /test, /quit"
    );
}

fn render(session: &ChatSession, language: &LanguageStore) {
    let messages = session.messages();
    if messages.is_empty() {
        println!("  {}", language.text("no_messages", "No messages yet."));
    }
    for message in &messages {
        let mut line = format!("  [{}] {}", message.id, session.display_text(message));
        if message.pending {
            line.push_str(&format!(" ({})", language.text("sending", "Sending...")));
        } else if message.translation.is_none() && session.has_live_translation(&message.id) {
            line.push_str(" (live translation)");
        }
        println!("{}", line);
    }
    if let Some(error) = session.last_error() {
        println!("  ! {}", error);
    }
}
