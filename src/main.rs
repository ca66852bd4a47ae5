use std::sync::Arc;

use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use field_collector::adapters::ai::ConfiguredProviderFactory;
use field_collector::adapters::catalog::FileTargetSource;
use field_collector::adapters::storage::FileStateStorage;
use field_collector::application::{CollectorAgent, ConversationStore, FieldStatus, TargetCatalog};
use field_collector::config::AppConfig;
use field_collector::domain::collection::Message;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let config = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(err) => {
            eprintln!("failed to load configuration: {err}");
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = config.validate() {
        error!("invalid configuration: {err}");
        std::process::exit(1);
    }

    let catalog = Arc::new(TargetCatalog::new(Arc::new(FileTargetSource::new(
        config.storage.target_path(),
    ))));
    if let Err(err) = catalog.load().await {
        error!("{err}");
        std::process::exit(1);
    }

    let store = Arc::new(ConversationStore::new(Arc::new(FileStateStorage::new(
        config.storage.state_path(),
    ))));
    let providers = Arc::new(ConfiguredProviderFactory::new(&config.ai));
    let agent = CollectorAgent::new(catalog, store, providers);
    let model = config.ai.model_config();

    info!(state = %config.storage.state_path().display(), "field collector starting");

    let outcome = agent.initialize_chat(model.clone()).await;
    for message in outcome.messages.iter().filter(|m| m.role.is_visible()) {
        print_message(message);
    }
    println!("(commands: /status, /reset, /quit)");

    let mut lines = BufReader::new(io::stdin()).lines();
    loop {
        prompt().await;
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(err) => {
                error!("failed to read input: {err}");
                break;
            }
        };

        match line.trim() {
            "/quit" => break,
            "/status" => match agent.status().await {
                Ok(status) => print_status(&status),
                Err(err) => error!("{err}"),
            },
            "/reset" => {
                if !agent.reset().await {
                    error!("state file could not be deleted");
                }
                let outcome = agent.initialize_chat(model.clone()).await;
                outcome.new_messages.iter().for_each(print_message);
            }
            input => {
                let outcome = agent.add_user_message(input).await;
                outcome.new_messages.iter().for_each(print_message);
            }
        }
    }

    info!("field collector stopped");
}

async fn prompt() {
    let mut stdout = io::stdout();
    let _ = stdout.write_all(b"> ").await;
    let _ = stdout.flush().await;
}

fn print_message(message: &Message) {
    println!("[{}] {}\n", message.role.as_str(), message.content);
}

fn print_status(status: &[FieldStatus]) {
    for field in status {
        let mark = if field.collected { "x" } else { " " };
        let kind = if field.required { "required" } else { "optional" };
        println!("[{}] {} ({}, {})", mark, field.name, field.id, kind);
    }
}
