use poise::serenity_prelude as serenity;
use tracing::error;

use super::{COLOR_ERROR, COLOR_GOLD, COLOR_INFO, COLOR_SUCCESS};
use crate::economy::EconomyError;
use crate::games::{
    coinflip_payout, draw_winning_number, number_bet_payout, CoinSide, SlotOutcome, SlotSpin,
    NUMBER_BET_MAX, NUMBER_BET_MIN,
};
use crate::{Context, Error};

async fn reject_bet(ctx: Context<'_>, err: &EconomyError) -> Result<(), Error> {
    let content = match err {
        EconomyError::NonPositiveAmount(_) => "Please specify a valid bet amount.",
        EconomyError::InsufficientBalance { .. } => {
            "You do not have enough coins to place that bet."
        }
        other => {
            error!("Wager for {} failed: {}", ctx.author().id, other);
            "Something went wrong placing that bet."
        }
    };
    ctx.send(
        poise::CreateReply::default()
            .content(content)
            .ephemeral(true),
    )
    .await?;
    Ok(())
}

/// Coinflip. Bet on heads or tails.
#[poise::command(prefix_command, slash_command)]
pub async fn cf(
    ctx: Context<'_>,
    #[description = "The amount of coins to bet."]
    #[min = 1]
    amount: i64,
    #[description = "Your choice of heads or tails."] choice: CoinSide,
) -> Result<(), Error> {
    let outcome = CoinSide::flip(&mut rand::thread_rng());
    let payout = coinflip_payout(choice, outcome, amount);

    let result = ctx
        .data()
        .ledger
        .settle_bet(&ctx.author().id.to_string(), amount, payout)
        .await;

    match result {
        Ok(new_balance) => {
            let embed = if payout > 0 {
                serenity::CreateEmbed::new()
                    .title("You Won!")
                    .description(format!(
                        "The coin landed on **{}**. You won **{}** coins. Your new balance is {}.",
                        outcome, amount, new_balance
                    ))
                    .color(COLOR_SUCCESS)
            } else {
                serenity::CreateEmbed::new()
                    .title("You Lost!")
                    .description(format!(
                        "The coin landed on **{}**. You lost **{}** coins. Your new balance is {}.",
                        outcome, amount, new_balance
                    ))
                    .color(COLOR_ERROR)
            };
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => reject_bet(ctx, &e).await?,
    }

    Ok(())
}

/// Play the slot machine.
#[poise::command(prefix_command, slash_command)]
pub async fn slots(
    ctx: Context<'_>,
    #[description = "The amount of coins to bet."]
    #[min = 1]
    amount: i64,
) -> Result<(), Error> {
    let spin = SlotSpin::spin(&mut rand::thread_rng());
    let payout = spin.payout(amount);

    let result = ctx
        .data()
        .ledger
        .settle_bet(&ctx.author().id.to_string(), amount, payout)
        .await;

    match result {
        Ok(new_balance) => {
            let (verdict, color) = match spin.outcome() {
                SlotOutcome::Jackpot => (
                    format!("**JACKPOT!** You won **{}** coins!", payout),
                    COLOR_GOLD,
                ),
                SlotOutcome::Pair => (
                    format!("**You won!** You won **{}** coins!", payout),
                    COLOR_SUCCESS,
                ),
                SlotOutcome::Bust => (
                    format!("**You lost.** You lost **{}** coins.", amount),
                    COLOR_ERROR,
                ),
            };
            let embed = serenity::CreateEmbed::new()
                .title("Slot Machine")
                .description(format!(
                    "{}\n\n{} Your new balance is {}.",
                    spin, verdict, new_balance
                ))
                .color(color);
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => reject_bet(ctx, &e).await?,
    }

    Ok(())
}

/// Bet on a number between 1 and 10.
#[poise::command(prefix_command, slash_command)]
pub async fn bet(
    ctx: Context<'_>,
    #[description = "The amount of coins to bet."]
    #[min = 1]
    amount: i64,
    #[description = "The number to bet on."]
    #[min = 1]
    #[max = 10]
    number: i64,
) -> Result<(), Error> {
    // Slash options carry the bounds; the prefix form arrives unchecked.
    if !(NUMBER_BET_MIN..=NUMBER_BET_MAX).contains(&number) {
        ctx.send(
            poise::CreateReply::default()
                .content("Please bet on a number between 1 and 10.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    let winning = draw_winning_number(&mut rand::thread_rng());
    let payout = number_bet_payout(number, winning, amount);

    let result = ctx
        .data()
        .ledger
        .settle_bet(&ctx.author().id.to_string(), amount, payout)
        .await;

    match result {
        Ok(new_balance) => {
            let embed = if payout > 0 {
                serenity::CreateEmbed::new()
                    .title("You Won!")
                    .description(format!(
                        "The winning number was **{}**. You won **{}** coins! Your new balance is {}.",
                        winning, payout, new_balance
                    ))
                    .color(COLOR_SUCCESS)
            } else {
                serenity::CreateEmbed::new()
                    .title("You Lost!")
                    .description(format!(
                        "The winning number was **{}**. You lost **{}** coins. Your new balance is {}.",
                        winning, amount, new_balance
                    ))
                    .color(COLOR_ERROR)
            };
            ctx.send(poise::CreateReply::default().embed(embed)).await?;
        }
        Err(e) => reject_bet(ctx, &e).await?,
    }

    Ok(())
}

/// Challenge another user to a coin fight.
#[poise::command(prefix_command, slash_command)]
pub async fn fight(
    ctx: Context<'_>,
    #[description = "The user to challenge."] user: serenity::User,
    #[description = "The amount of coins to bet."]
    #[min = 1]
    amount: i64,
) -> Result<(), Error> {
    let data = ctx.data();
    let challenger = ctx.author();

    if user.id == challenger.id {
        ctx.send(
            poise::CreateReply::default()
                .content("You cannot fight yourself!")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }
    if amount <= 0 {
        ctx.send(
            poise::CreateReply::default()
                .content("Please specify a valid amount to bet.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }
    if !data.ledger.can_cover(&challenger.id.to_string(), amount).await {
        ctx.send(
            poise::CreateReply::default()
                .content("You do not have enough coins to make that bet.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }
    if !data.ledger.can_cover(&user.id.to_string(), amount).await {
        ctx.send(
            poise::CreateReply::default()
                .content("The user you are challenging does not have enough coins.")
                .ephemeral(true),
        )
        .await?;
        return Ok(());
    }

    data.challenges.propose(challenger.id, user.id, amount).await;

    let buttons = serenity::CreateActionRow::Buttons(vec![
        serenity::CreateButton::new(format!("fight_accept_{}_{}", challenger.id, user.id))
            .label("Accept")
            .style(serenity::ButtonStyle::Success),
        serenity::CreateButton::new(format!("fight_decline_{}_{}", challenger.id, user.id))
            .label("Decline")
            .style(serenity::ButtonStyle::Danger),
    ]);

    let embed = serenity::CreateEmbed::new()
        .title("Fight Challenge")
        .description(format!(
            "<@{}> has challenged <@{}> to a fight for **{}** coins!",
            challenger.id, user.id, amount
        ))
        .color(COLOR_INFO);

    ctx.send(
        poise::CreateReply::default()
            .content(format!("<@{}>", user.id))
            .embed(embed)
            .components(vec![buttons]),
    )
    .await?;

    Ok(())
}
