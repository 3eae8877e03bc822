use chrono::Utc;
use poise::serenity_prelude as serenity;

use super::COLOR_INFO;
use crate::{Context, Error};

/// Displays a list of all available commands.
#[poise::command(prefix_command, slash_command)]
pub async fn help(ctx: Context<'_>) -> Result<(), Error> {
    let embed = serenity::CreateEmbed::new()
        .title("Bot Commands")
        .description("Every command works as `$name ...` or as a slash command.")
        .color(COLOR_INFO)
        .field("$balance", "Check your current balance.", false)
        .field("$daily", "Claim your daily coins.", false)
        .field("$work", "Work to earn some coins.", false)
        .field("$cf <amount> <heads|tails>", "Coinflip. Bet on heads or tails.", false)
        .field("$slots <amount>", "Play the slot machine.", false)
        .field("$bet <amount> <1-10>", "Bet on a number between 1 and 10.", false)
        .field("$pay <user> <amount>", "Pay another user.", false)
        .field(
            "$fight <user> <amount>",
            "Challenge another user to a coin fight.",
            false,
        )
        .field("$ping", "Check the bot's latency.", false)
        .field("$uptime", "How long the bot has been online.", false);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Check the bot's latency.
#[poise::command(prefix_command, slash_command)]
pub async fn ping(ctx: Context<'_>) -> Result<(), Error> {
    let started = std::time::Instant::now();
    let reply = ctx.say("Pinging...").await?;
    let latency = started.elapsed().as_millis();

    reply
        .edit(
            ctx,
            poise::CreateReply::default().content(format!("Pong! Round trip took {}ms.", latency)),
        )
        .await?;

    Ok(())
}

/// How long the bot has been online.
#[poise::command(prefix_command, slash_command)]
pub async fn uptime(ctx: Context<'_>) -> Result<(), Error> {
    let secs = Utc::now()
        .signed_duration_since(ctx.data().started_at)
        .num_seconds()
        .max(0);

    let days = secs / 86_400;
    let hours = (secs % 86_400) / 3_600;
    let minutes = (secs % 3_600) / 60;
    let seconds = secs % 60;

    ctx.say(format!(
        "Online for {}d {}h {}m {}s.",
        days, hours, minutes, seconds
    ))
    .await?;

    Ok(())
}
