use poise::serenity_prelude as serenity;
use rand::Rng;
use tracing::error;

use crate::commands::{COLOR_ERROR, COLOR_SUCCESS};
use crate::economy::EconomyError;
use crate::{Data, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FightButton {
    Accept,
    Decline,
}

// Custom ids look like "fight_accept_<challenger>_<challenged>".
fn parse_fight_button(custom_id: &str) -> Option<(FightButton, serenity::UserId, serenity::UserId)> {
    let rest = custom_id.strip_prefix("fight_")?;
    let (button, rest) = if let Some(rest) = rest.strip_prefix("accept_") {
        (FightButton::Accept, rest)
    } else if let Some(rest) = rest.strip_prefix("decline_") {
        (FightButton::Decline, rest)
    } else {
        return None;
    };

    let (challenger, challenged) = rest.split_once('_')?;
    let challenger = challenger.parse::<u64>().ok().filter(|&id| id != 0)?;
    let challenged = challenged.parse::<u64>().ok().filter(|&id| id != 0)?;
    Some((
        button,
        serenity::UserId::new(challenger),
        serenity::UserId::new(challenged),
    ))
}

/// Resolves a press on a fight challenge's Accept/Decline buttons.
///
/// Non-fight components pass through untouched so other interaction
/// sources can coexist with this handler.
pub async fn handle_fight_button(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &Data,
) -> Result<(), Error> {
    let Some((button, challenger_id, challenged_id)) =
        parse_fight_button(&component.data.custom_id)
    else {
        return Ok(());
    };

    // Only the challenged user may answer the challenge.
    if component.user.id != challenged_id {
        component
            .create_response(
                &ctx.http,
                serenity::CreateInteractionResponse::Message(
                    serenity::CreateInteractionResponseMessage::new()
                        .content("You are not the user being challenged!")
                        .ephemeral(true),
                ),
            )
            .await?;
        return Ok(());
    }

    // Superseded, already resolved, or past its expiry window.
    let Some(challenge) = data.challenges.take(challenger_id, challenged_id).await else {
        component
            .create_response(
                &ctx.http,
                serenity::CreateInteractionResponse::UpdateMessage(
                    serenity::CreateInteractionResponseMessage::new()
                        .content("This fight challenge has expired.")
                        .embeds(vec![])
                        .components(vec![]),
                ),
            )
            .await?;
        return Ok(());
    };

    match button {
        FightButton::Decline => {
            let embed = serenity::CreateEmbed::new()
                .title("Fight Declined")
                .description(format!(
                    "<@{}> has declined the fight with <@{}>.",
                    challenged_id, challenger_id
                ))
                .color(COLOR_ERROR);
            component
                .create_response(
                    &ctx.http,
                    serenity::CreateInteractionResponse::UpdateMessage(
                        serenity::CreateInteractionResponseMessage::new()
                            .embed(embed)
                            .components(vec![]),
                    ),
                )
                .await?;
        }
        FightButton::Accept => {
            let challenger_wins = rand::thread_rng().gen_bool(0.5);
            let (winner, loser) = if challenger_wins {
                (challenger_id, challenged_id)
            } else {
                (challenged_id, challenger_id)
            };

            let result = data
                .ledger
                .settle_duel(&winner.to_string(), &loser.to_string(), challenge.stake)
                .await;

            let response = match result {
                Ok(_) => {
                    let embed = serenity::CreateEmbed::new()
                        .title("Fight Result")
                        .description(format!(
                            "<@{}> has won the fight against <@{}>! They won **{}** coins.",
                            winner, loser, challenge.stake
                        ))
                        .color(COLOR_SUCCESS);
                    serenity::CreateInteractionResponseMessage::new()
                        .embed(embed)
                        .components(vec![])
                }
                // Either side may have spent down since the proposal.
                Err(EconomyError::InsufficientBalance { .. }) => {
                    serenity::CreateInteractionResponseMessage::new()
                        .content("One of the users no longer has enough coins to fight!")
                        .embeds(vec![])
                        .components(vec![])
                }
                Err(e) => {
                    error!(
                        "Failed to settle fight between {} and {}: {}",
                        challenger_id, challenged_id, e
                    );
                    serenity::CreateInteractionResponseMessage::new()
                        .content("Something went wrong settling the fight.")
                        .embeds(vec![])
                        .components(vec![])
                }
            };

            component
                .create_response(
                    &ctx.http,
                    serenity::CreateInteractionResponse::UpdateMessage(response),
                )
                .await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fight_button_ids_round_trip() {
        let (button, challenger, challenged) =
            parse_fight_button("fight_accept_111_222").unwrap();
        assert_eq!(button, FightButton::Accept);
        assert_eq!(challenger, serenity::UserId::new(111));
        assert_eq!(challenged, serenity::UserId::new(222));

        let (button, ..) = parse_fight_button("fight_decline_111_222").unwrap();
        assert_eq!(button, FightButton::Decline);
    }

    #[test]
    fn foreign_custom_ids_are_ignored() {
        assert!(parse_fight_button("help_menu").is_none());
        assert!(parse_fight_button("fight_accept_111").is_none());
        assert!(parse_fight_button("fight_accept_abc_222").is_none());
        assert!(parse_fight_button("fight_accept_0_222").is_none());
        assert!(parse_fight_button("fight_poke_111_222").is_none());
    }
}
