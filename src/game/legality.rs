//! Legality pipeline
//!
//! Checks run in a fixed order and stop at the first failure; later checks
//! assume earlier ones passed (cost checks assume the card is where it can
//! be used). Nothing here mutates the board or the usage counters.

use crate::core::{
    can_pay_all, Ability, AbilityContext, CardType, Keyword, PlayType, PlayerId, UsageTracker,
};
use crate::game::GameState;
use serde::{Deserialize, Serialize};

/// First legality check that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Illegal {
    PlayType,
    Location,
    Headline,
    PlayerRestricted,
    UsedUp,
    NotAllowedPlayer,
    Blank,
    DefaultCondition,
    Condition,
    UnresolvablePlayer,
    Unaffordable,
    NoTargets,
    EffectDisallowed,
}

pub fn check(
    state: &GameState,
    usage: &UsageTracker,
    ability: &Ability,
    context: &AbilityContext,
) -> Result<(), Illegal> {
    let card = state.cards.get(ability.source).map_err(|_| Illegal::Location)?;

    if ability.is_action() {
        let window = state.round.play_window.ok_or(Illegal::PlayType)?;
        if !ability.play_types.iter().any(|pt| pt.allowed_in(window)) {
            return Err(Illegal::PlayType);
        }
    }

    let location_ok = if card.is_type(CardType::Action) && ability.card_ability {
        state.is_card_in_playable_location(card.id, context.player)
    } else {
        ability.listens_in(card.location)
    };
    if !location_ok {
        return Err(Illegal::Location);
    }

    if card.has_keyword(&Keyword::new("headline")) && state.round.headline_used {
        return Err(Illegal::Headline);
    }

    let player = state
        .get_player(context.player)
        .map_err(|_| Illegal::UnresolvablePlayer)?;
    if ability.card_ability && !player.can_trigger(ability.kind, ability.source) {
        return Err(Illegal::PlayerRestricted);
    }

    if !ability.allow_used && usage.is_used(ability.id) {
        return Err(Illegal::UsedUp);
    }

    if !is_allowed_player(state, ability, card.controller, context) {
        return Err(Illegal::NotAllowedPlayer);
    }

    if card.is_any_blank() {
        return Err(Illegal::Blank);
    }

    if !default_condition(state, ability, context) {
        return Err(Illegal::DefaultCondition);
    }

    if let Some(condition) = &ability.condition {
        if !condition(state, context) {
            return Err(Illegal::Condition);
        }
    }

    if !can_resolve_player(state, ability, context) {
        return Err(Illegal::UnresolvablePlayer);
    }
    if !can_pay_all(&ability.costs, state, context) {
        return Err(Illegal::Unaffordable);
    }
    if !ability.can_resolve_targets(state, context) {
        return Err(Illegal::NoTargets);
    }
    if let Some(allow) = &ability.allow {
        if !allow(state, context) {
            return Err(Illegal::EffectDisallowed);
        }
    }

    Ok(())
}

pub fn meets_requirements(
    state: &GameState,
    usage: &UsageTracker,
    ability: &Ability,
    context: &AbilityContext,
) -> bool {
    check(state, usage, ability, context).is_ok()
}

/// Actions belong to the card's controller unless opened to any player;
/// triggered abilities belong to whoever resolves them for the event
fn is_allowed_player(
    state: &GameState,
    ability: &Ability,
    controller: PlayerId,
    context: &AbilityContext,
) -> bool {
    match (ability.is_action(), &context.event) {
        (false, Some(event)) => ability.responsible_player(state, event) == Some(context.player),
        _ => controller == context.player || ability.any_player,
    }
}

/// Phase-specific gate for actions: cheatin' resolutions need a cheatin'
/// opponent, and shootout plays on dudes, goods and spells need the card in
/// the shootout unless the play lets it join
fn default_condition(state: &GameState, ability: &Ability, context: &AbilityContext) -> bool {
    if !ability.is_action() {
        return true;
    }
    let Ok(card) = state.cards.get(ability.source) else {
        return false;
    };
    if ability.play_types.contains(&PlayType::CheatinResolution) {
        return state.can_play_cheatin_resolution(card.controller);
    }
    if state.is_shootout_play_window()
        && !ability.play_types.contains(&PlayType::ShootoutJoin)
        && card.card_type.is_shootout_participant_type()
    {
        return state.is_participating(context.source);
    }
    true
}

/// The activating player exists, and a triggered ability with a player
/// override still resolves to someone for its event
fn can_resolve_player(state: &GameState, ability: &Ability, context: &AbilityContext) -> bool {
    if state.get_player(context.player).is_err() {
        return false;
    }
    match (&ability.player, &context.event) {
        (Some(selector), Some(event)) => selector(state, event).is_some(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AbilityBuilder, AbilityId, AbilityLimit, ContextId, Cost, TriggerRestriction};
    use crate::game::{EventData, EventName, GameEvent, PlayWindow, Shootout};
    use std::rc::Rc;
    use crate::zones::Location;

    struct Fixture {
        game: GameState,
        usage: UsageTracker,
        alice: PlayerId,
        bob: PlayerId,
    }

    fn fixture() -> Fixture {
        let mut game = GameState::new_two_player("Alice", "Bob", 5);
        game.round.play_window = Some(PlayWindow::Noon);
        let alice = game.players[0].id;
        let bob = game.players[1].id;
        Fixture {
            game,
            usage: UsageTracker::new(),
            alice,
            bob,
        }
    }

    fn context(ability: &Ability, player: PlayerId) -> AbilityContext {
        AbilityContext::new(ContextId::new(0), ability.id, ability.source, player, None)
    }

    fn boot_action(f: &mut Fixture, card_type: CardType) -> Ability {
        let card = f.game.create_card(f.alice, "Dude", card_type, Location::PlayArea);
        AbilityBuilder::action()
            .cost(Cost::BootSelf)
            .limit(AbilityLimit::per_round(1))
            .handler(|_, _| Ok(()))
            .build(AbilityId::new(1), f.game.cards.get(card).unwrap())
            .unwrap()
    }

    #[test]
    fn test_legal_noon_action() {
        let mut f = fixture();
        let ability = boot_action(&mut f, CardType::Dude);
        assert_eq!(check(&f.game, &f.usage, &ability, &context(&ability, f.alice)), Ok(()));
    }

    #[test]
    fn test_failures_in_pipeline_order() {
        let mut f = fixture();
        let ability = boot_action(&mut f, CardType::Dude);

        // Wrong window and wrong player: the play type is reported first
        f.game.round.play_window = Some(PlayWindow::Resolution);
        assert_eq!(
            check(&f.game, &f.usage, &ability, &context(&ability, f.bob)),
            Err(Illegal::PlayType)
        );

        f.game.round.play_window = Some(PlayWindow::Noon);
        assert_eq!(
            check(&f.game, &f.usage, &ability, &context(&ability, f.bob)),
            Err(Illegal::NotAllowedPlayer)
        );

        f.game.cards.get_mut(ability.source).unwrap().blank = true;
        assert_eq!(
            check(&f.game, &f.usage, &ability, &context(&ability, f.alice)),
            Err(Illegal::Blank)
        );

        f.game.cards.get_mut(ability.source).unwrap().blank = false;
        f.game.boot_card(ability.source).unwrap();
        assert_eq!(
            check(&f.game, &f.usage, &ability, &context(&ability, f.alice)),
            Err(Illegal::Unaffordable)
        );
    }

    #[test]
    fn test_usage_limit_and_override() {
        let mut f = fixture();
        let ability = boot_action(&mut f, CardType::Deed);
        f.usage.track(ability.id, AbilityLimit::per_round(1));
        f.usage.increment(ability.id);

        let ctx = context(&ability, f.alice);
        assert_eq!(check(&f.game, &f.usage, &ability, &ctx), Err(Illegal::UsedUp));

        let mut reusable = ability;
        reusable.allow_used = true;
        assert!(meets_requirements(&f.game, &f.usage, &reusable, &ctx));
    }

    #[test]
    fn test_restrictions_and_headline() {
        let mut f = fixture();
        let ability = boot_action(&mut f, CardType::Dude);
        let ctx = context(&ability, f.alice);

        f.game
            .get_player_mut(f.alice)
            .unwrap()
            .restrictions
            .push(TriggerRestriction::CardAbilities);
        assert_eq!(check(&f.game, &f.usage, &ability, &ctx), Err(Illegal::PlayerRestricted));
        f.game.get_player_mut(f.alice).unwrap().restrictions.clear();

        f.game.cards.get_mut(ability.source).unwrap().keywords.push(Keyword::new("Headline"));
        f.game.round.headline_used = true;
        assert_eq!(check(&f.game, &f.usage, &ability, &ctx), Err(Illegal::Headline));
    }

    #[test]
    fn test_shootout_participation_gate() {
        let mut f = fixture();
        let card = f.game.create_card(f.alice, "Gunslinger", CardType::Dude, Location::PlayArea);
        let mark = f.game.create_card(f.bob, "Mark", CardType::Dude, Location::PlayArea);
        let build = |join: bool, game: &GameState| {
            let mut builder = AbilityBuilder::action().handler(|_, _| Ok(()));
            let play_type = if join {
                PlayType::ShootoutJoin
            } else {
                PlayType::Shootout
            };
            builder = builder.play_type(play_type);
            builder.build(AbilityId::new(1), game.cards.get(card).unwrap()).unwrap()
        };
        let shootout_play = build(false, &f.game);
        let join_play = build(true, &f.game);

        let leader = f.game.create_card(f.alice, "Leader", CardType::Dude, Location::PlayArea);
        f.game.shootout = Some(Shootout::new(leader, f.alice, mark, f.bob));
        f.game.round.play_window = Some(PlayWindow::ShootoutPlays);

        let ctx = context(&shootout_play, f.alice);
        assert_eq!(check(&f.game, &f.usage, &shootout_play, &ctx), Err(Illegal::DefaultCondition));
        assert!(meets_requirements(&f.game, &f.usage, &join_play, &ctx));

        f.game.shootout.as_mut().unwrap().join(f.alice, card);
        assert!(meets_requirements(&f.game, &f.usage, &shootout_play, &ctx));
    }

    #[test]
    fn test_action_card_needs_owner_hand() {
        let mut f = fixture();
        let card =
            f.game.create_card(f.alice, "Cheatin' Varmint", CardType::Action, Location::Hand);
        let ability = AbilityBuilder::action()
            .play_type(PlayType::CheatinResolution)
            .handler(|_, _| Ok(()))
            .build(AbilityId::new(1), f.game.cards.get(card).unwrap())
            .unwrap();
        f.game.round.play_window = Some(PlayWindow::Resolution);

        let ctx = context(&ability, f.alice);
        assert_eq!(check(&f.game, &f.usage, &ability, &ctx), Err(Illegal::DefaultCondition));

        f.game.get_player_mut(f.bob).unwrap().cheatin = true;
        assert!(meets_requirements(&f.game, &f.usage, &ability, &ctx));

        f.game.move_card(card, Location::DiscardPile).unwrap();
        assert_eq!(check(&f.game, &f.usage, &ability, &ctx), Err(Illegal::Location));
    }

    #[test]
    fn test_trigger_belongs_to_responsible_player() {
        let mut f = fixture();
        let card = f.game.create_card(f.alice, "Flop House", CardType::Deed, Location::PlayArea);
        let bob = f.bob;
        let ability = AbilityBuilder::prompted()
            .when(EventName::BeginRound, |_, _| true)
            .player(move |_, _| Some(bob))
            .handler(|_, _| Ok(()))
            .build(AbilityId::new(1), f.game.cards.get(card).unwrap())
            .unwrap();
        let event = Rc::new(GameEvent::new(0, EventData::BeginRound { round: 2 }));
        let offer = |player| {
            AbilityContext::new(ContextId::new(0), ability.id, card, player, Some(event.clone()))
        };

        assert!(meets_requirements(&f.game, &f.usage, &ability, &offer(f.bob)));
        assert_eq!(
            check(&f.game, &f.usage, &ability, &offer(f.alice)),
            Err(Illegal::NotAllowedPlayer)
        );
    }
}
