use chrono::Utc;
use poise::serenity_prelude as serenity;
use rand::Rng;
use tracing::error;

use super::{format_cooldown, COLOR_INFO, COLOR_SUCCESS, COLOR_WORK};
use crate::economy::{EconomyError, WORK_REWARD_MAX, WORK_REWARD_MIN};
use crate::{Context, Error};

/// Check your current balance.
#[poise::command(prefix_command, slash_command)]
pub async fn balance(ctx: Context<'_>) -> Result<(), Error> {
    let user = ctx.author();
    let balance = ctx.data().ledger.balance(&user.id.to_string()).await;

    let embed = serenity::CreateEmbed::new()
        .title(format!("{}'s Balance", user.name))
        .description(format!("You currently have **{}** coins.", balance))
        .color(COLOR_INFO);
    ctx.send(poise::CreateReply::default().embed(embed)).await?;

    Ok(())
}

/// Claim your daily coins.
#[poise::command(prefix_command, slash_command)]
pub async fn daily(ctx: Context<'_>) -> Result<(), Error> {
    let user_id = ctx.author().id.to_string();
    let now = Utc::now().timestamp();

    match ctx.data().ledger.claim_daily(&user_id, now).await {
        Ok(claim) => {
            let embed = serenity::CreateEmbed::new()
                .title("Daily Reward Claimed")
                .description(format!(
                    "You have claimed your daily reward of **{}** coins! Your new balance is **{}** coins.",
                    claim.reward, claim.new_balance
                ))
                .color(COLOR_SUCCESS);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(EconomyError::CooldownActive { remaining }) => {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!(
                        "You have already claimed your daily reward. Come back in {}.",
                        format_cooldown(remaining)
                    ))
                    .ephemeral(true),
            )
            .await?;
        }
        Err(e) => {
            error!("Daily claim failed for {}: {}", user_id, e);
            ctx.say("Something went wrong claiming your reward.").await?;
        }
    }

    Ok(())
}

/// Work to earn some coins.
#[poise::command(prefix_command, slash_command)]
pub async fn work(ctx: Context<'_>) -> Result<(), Error> {
    let user_id = ctx.author().id.to_string();
    let now = Utc::now().timestamp();
    let reward = rand::thread_rng().gen_range(WORK_REWARD_MIN..=WORK_REWARD_MAX);

    match ctx.data().ledger.claim_work(&user_id, now, reward).await {
        Ok(claim) => {
            let embed = serenity::CreateEmbed::new()
                .title("Work Complete")
                .description(format!(
                    "You worked hard and earned **{}** coins! Your new balance is **{}** coins.",
                    claim.reward, claim.new_balance
                ))
                .color(COLOR_WORK);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(EconomyError::CooldownActive { remaining }) => {
            ctx.send(
                poise::CreateReply::default()
                    .content(format!(
                        "You have worked recently. Try again in {}.",
                        format_cooldown(remaining)
                    ))
                    .ephemeral(true),
            )
            .await?;
        }
        Err(e) => {
            error!("Work claim failed for {}: {}", user_id, e);
            ctx.say("Something went wrong claiming your earnings.").await?;
        }
    }

    Ok(())
}

/// Pay another user.
#[poise::command(prefix_command, slash_command)]
pub async fn pay(
    ctx: Context<'_>,
    #[description = "The user to pay."] user: serenity::User,
    #[description = "The amount to pay."]
    #[min = 1]
    amount: i64,
) -> Result<(), Error> {
    let sender = ctx.author();

    if user.id == sender.id {
        ctx.send(
            poise::CreateReply::default()
                .content("You cannot pay yourself.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let result = ctx
        .data()
        .ledger
        .transfer(&sender.id.to_string(), &user.id.to_string(), amount)
        .await;

    match result {
        Ok(_) => {
            let embed = serenity::CreateEmbed::new()
                .title("Payment Complete")
                .description(format!(
                    "<@{}> has successfully paid **{}** coins to <@{}>.",
                    sender.id, amount, user.id
                ))
                .color(COLOR_INFO);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(EconomyError::NonPositiveAmount(_)) => {
            ctx.send(
                poise::CreateReply::default()
                    .content("Please specify a valid amount to pay.")
                    .ephemeral(true),
            )
            .await?;
        }
        Err(EconomyError::InsufficientBalance { .. }) => {
            ctx.send(
                poise::CreateReply::default()
                    .content("You do not have enough coins to make that payment.")
                    .ephemeral(true),
            )
            .await?;
        }
        Err(e) => {
            error!("Payment from {} to {} failed: {}", sender.id, user.id, e);
            ctx.say("Something went wrong processing the payment.").await?;
        }
    }

    Ok(())
}
