use poise::serenity_prelude as serenity;
use std::env;
use chrono::{DateTime, Utc};
use tracing::info;

mod challenge;
mod commands;
mod economy;
mod games;
mod interactions;

use challenge::ChallengeBook;
use economy::Ledger;

type Error = Box<dyn std::error::Error + Send + Sync>;
type Context<'a> = poise::Context<'a, Data, Error>;

pub struct Data {
    pub ledger: Ledger,
    pub challenges: ChallengeBook,
    pub started_at: DateTime<Utc>,
}

async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, Data, Error>,
    data: &Data,
) -> Result<(), Error> {
    if let serenity::FullEvent::InteractionCreate {
        interaction: serenity::Interaction::Component(component),
    } = event
    {
        interactions::handle_fight_button(ctx, component, data).await?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv::dotenv().ok();

    // Initialize the logger
    tracing_subscriber::fmt::init();

    // Get the Discord token from environment
    let token = env::var("DISCORD_TOKEN")
        .expect("Expected DISCORD_TOKEN in environment");

    // Get ledger file path from environment or use default
    let economy_file = env::var("ECONOMY_FILE")
        .unwrap_or_else(|_| "data/economy.json".to_string());

    // Load the economy ledger
    let ledger = Ledger::load(&economy_file)
        .expect("Failed to load economy ledger");

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::economy::balance(),
                commands::economy::daily(),
                commands::economy::work(),
                commands::economy::pay(),
                commands::games::cf(),
                commands::games::slots(),
                commands::games::bet(),
                commands::games::fight(),
                commands::utility::help(),
                commands::utility::ping(),
                commands::utility::uptime(),
            ],
            prefix_options: poise::PrefixFrameworkOptions {
                prefix: Some("$".into()),
                ..Default::default()
            },
            event_handler: |ctx, event, framework, data| {
                Box::pin(event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(Data {
                    ledger,
                    challenges: ChallengeBook::new(),
                    started_at: Utc::now(),
                })
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged() | serenity::GatewayIntents::MESSAGE_CONTENT;

    let client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await;

    info!("Starting bot...");

    client.unwrap().start().await.unwrap();
}
