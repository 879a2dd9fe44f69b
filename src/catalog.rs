//! Sample card capabilities
//!
//! A handful of cards written against the ability builder. They drive the
//! binary, the benches and the end-to-end tests.

use crate::core::{
    AbilityBuilder, AbilityContext, AbilityId, AbilityLimit, CardId, CardType, Cost, PlayType,
    PlayerId,
};
use crate::game::{Engine, EventData, EventName, MessageArg, PlayWindow};
use crate::zones::Location;
use crate::{Result, RulesError};
use smallvec::SmallVec;
use std::rc::Rc;

pub const ALLIE_HENSMAN: &str = "Allie Hensman";
pub const CHEATIN_VARMINT: &str = "Cheatin' Varmint";
pub const PEARLYS_PALACE: &str = "Pearly's Palace";
pub const MORTIMER_PARSONS: &str = "Mortimer Parsons";

/// Card titles this catalog knows how to build
pub const TITLES: [&str; 4] = [ALLIE_HENSMAN, CHEATIN_VARMINT, PEARLYS_PALACE, MORTIMER_PARSONS];

/// A card put on the board together with its abilities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleCard {
    pub card: CardId,
    pub abilities: SmallVec<[AbilityId; 2]>,
}

impl SampleCard {
    pub fn ability(&self) -> AbilityId {
        self.abilities[0]
    }
}

/// Create a catalog card by title
pub fn create(
    engine: &mut Engine,
    title: &str,
    owner: PlayerId,
    location: Location,
) -> Result<SampleCard> {
    match title {
        ALLIE_HENSMAN => allie_hensman(engine, owner, location),
        CHEATIN_VARMINT => cheatin_varmint(engine, owner, location),
        PEARLYS_PALACE => pearlys_palace(engine, owner, location),
        MORTIMER_PARSONS => mortimer_parsons(engine, owner, location),
        other => Err(RulesError::InvalidAction(format!("unknown card '{other}'"))),
    }
}

/// Noon: boot to gain a permanent control point, only while in town square
pub fn allie_hensman(
    engine: &mut Engine,
    owner: PlayerId,
    location: Location,
) -> Result<SampleCard> {
    let card = engine
        .state
        .create_card(owner, ALLIE_HENSMAN, CardType::Dude, location);
    engine.state.cards.get_mut(card)?.influence = 1;

    let ability = engine.add_ability(
        card,
        AbilityBuilder::action()
            .title(ALLIE_HENSMAN)
            .play_type(PlayType::Noon)
            .cost(Cost::BootSelf)
            .limit(AbilityLimit::per_round(1))
            .if_condition(|state, ctx| {
                state
                    .cards
                    .get(ctx.source)
                    .is_ok_and(|card| card.in_town_square)
            })
            .if_fail_message(
                "{0} uses {1} but does not gain any control point because she is not in Town Square",
            )
            .message("{0} uses {1} to gain permanent control point")
            .message_args(|_, ctx| vec![ctx.player.into(), ctx.source.into()])
            .handler(|engine, ctx| {
                engine.state.cards.get_mut(ctx.source)?.control += 1;
                Ok(())
            }),
    )?;

    Ok(SampleCard {
        card,
        abilities: SmallVec::from_slice(&[ability]),
    })
}

/// Two resolution plays lowering a chosen player's hand by two ranks: a
/// paid one and a free one against a cheatin' hand
pub fn cheatin_varmint(
    engine: &mut Engine,
    owner: PlayerId,
    location: Location,
) -> Result<SampleCard> {
    let card = engine
        .state
        .create_card(owner, CHEATIN_VARMINT, CardType::Action, location);

    let lower_rank = |engine: &mut Engine, ctx: &AbilityContext| -> Result<(PlayerId, i32)> {
        let player = ctx
            .chosen_player()
            .ok_or_else(|| RulesError::InvalidAction("no player chosen".to_string()))?;
        let chosen = engine.state.get_player_mut(player)?;
        chosen.modify_rank(-2);
        Ok((player, chosen.total_rank()))
    };

    let paid = engine.add_ability(
        card,
        AbilityBuilder::action()
            .title("Resolution: Lower hand by 2 ranks")
            .play_type(PlayType::Resolution)
            .target_player("player", None)
            .cost(Cost::PayGhostRock(5))
            .handler(move |engine, ctx| {
                let (chosen, rank) = lower_rank(engine, ctx)?;
                engine.add_message(
                    "{0} uses {1} and pays 5 ghost rock to lower {2}'s draw hand by 2 ranks. Current rank is {3}",
                    &[
                        ctx.player.into(),
                        ctx.source.into(),
                        chosen.into(),
                        MessageArg::Number(rank.into()),
                    ],
                );
                Ok(())
            }),
    )?;

    let cheatin = engine.add_ability(
        card,
        AbilityBuilder::action()
            .title("Cheatin' Resolution: Lower hand by 2 ranks")
            .play_type(PlayType::CheatinResolution)
            .target_player("player", None)
            .handler(move |engine, ctx| {
                let (chosen, rank) = lower_rank(engine, ctx)?;
                engine.add_message(
                    "{0} uses {1} to lower {2}'s draw hand by 2 ranks. Current rank is {3}",
                    &[
                        ctx.player.into(),
                        ctx.source.into(),
                        chosen.into(),
                        MessageArg::Number(rank.into()),
                    ],
                );
                Ok(())
            }),
    )?;

    Ok(SampleCard {
        card,
        abilities: SmallVec::from_slice(&[paid, cheatin]),
    })
}

/// React when shootout plays open: boot to make a shootout play first
pub fn pearlys_palace(
    engine: &mut Engine,
    owner: PlayerId,
    location: Location,
) -> Result<SampleCard> {
    let card = engine
        .state
        .create_card(owner, PEARLYS_PALACE, CardType::Deed, location);

    let ability = engine.add_ability(
        card,
        AbilityBuilder::reaction()
            .when(EventName::PlayWindowOpened, |_, event| {
                matches!(
                    event.data,
                    EventData::PlayWindowOpened {
                        window: PlayWindow::ShootoutPlays
                    }
                )
            })
            .cost(Cost::BootSelf)
            .message("{player} uses {source} to make shootout play before any player")
            .handler(|engine, ctx| {
                engine.prompt(
                    ctx.player,
                    "Make shootout play",
                    vec!["Done".to_string()],
                    Some(ctx.source),
                    Rc::new(|_, _| Ok(())),
                )?;
                Ok(())
            }),
    )?;

    Ok(SampleCard {
        card,
        abilities: SmallVec::from_slice(&[ability]),
    })
}

/// Forced: a cheatin' hand in a shootout sends him home booted with no
/// influence, ending the shootout if his posse is now empty
pub fn mortimer_parsons(
    engine: &mut Engine,
    owner: PlayerId,
    location: Location,
) -> Result<SampleCard> {
    let card = engine
        .state
        .create_card(owner, MORTIMER_PARSONS, CardType::Dude, location);
    engine.state.cards.get_mut(card)?.influence = 1;

    let ability = engine.add_ability(
        card,
        AbilityBuilder::forced()
            .when(EventName::DrawHandsRevealed, move |state, event| {
                let in_shootout =
                    matches!(event.data, EventData::DrawHandsRevealed { shootout: true });
                let controller_cheatin = state
                    .cards
                    .get(card)
                    .and_then(|c| state.get_player(c.controller))
                    .is_ok_and(|player| player.is_cheatin());
                in_shootout && state.is_participating(card) && controller_cheatin
            })
            .message(
                "{player}'s cheatin' hand sends {source} home booted and reduces his influence to 0",
            )
            .handler(|engine, ctx| {
                engine.state.cards.get_mut(ctx.source)?.influence = 0;
                engine.state.send_home(ctx.source)?;

                let pending = engine
                    .state
                    .shootout
                    .as_ref()
                    .filter(|shootout| shootout.check_end_condition())
                    .and_then(|shootout| shootout.pending_step);
                if let Some(step) = pending {
                    engine.cancel_step(step);
                }
                Ok(())
            }),
    )?;

    Ok(SampleCard {
        card,
        abilities: SmallVec::from_slice(&[ability]),
    })
}
