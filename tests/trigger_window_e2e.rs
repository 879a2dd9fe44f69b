//! End-to-end tests for trigger windows
//!
//! Reactions and forced abilities collected for one event are offered in
//! seat order starting with the active player, re-checked right before each
//! offer, and can open further prompts or cancel queued steps from their
//! handlers.

use dtr_engine::{
    catalog,
    core::{AbilityBuilder, AbilityLimit, CardType, PlayerId},
    game::{
        DecisionMaker, Engine, EventData, EventName, GameState, Phase, PlayWindow, QueueStatus,
        ScriptedController, Shootout, StepFn, StepId,
    },
    zones::Location,
    Result,
};
use similar_asserts::assert_eq;
use std::rc::Rc;

fn setup() -> (Engine, PlayerId, PlayerId) {
    let mut state = GameState::new_two_player("Alice", "Bob", 0);
    state.logger.enable_capture();
    let alice = state.players[0].id;
    let bob = state.players[1].id;
    (Engine::new(state), alice, bob)
}

fn phase_started() -> EventData {
    EventData::PhaseStarted {
        phase: Phase::Upkeep,
    }
}

#[test]
fn test_active_player_is_offered_first() -> Result<()> {
    let (mut engine, alice, bob) = setup();
    // Bob's ability subscribes first; Alice is still asked first
    for (owner, title) in [(bob, "Bob's Deed"), (alice, "Alice's Deed")] {
        let card = engine
            .state
            .create_card(owner, title, CardType::Deed, Location::PlayArea);
        engine.add_ability(
            card,
            AbilityBuilder::prompted()
                .when(EventName::PhaseStarted, |_, _| true)
                .message("{player} collects from {source}")
                .handler(|engine, ctx| engine.state.gain_ghost_rock(ctx.player, 2)),
        )?;
    }

    engine.raise_event(phase_started())?;
    assert_eq!(engine.status(), QueueStatus::AwaitingPrompt { player: alice });
    assert_eq!(
        engine.pending_prompt().map(|p| p.title.clone()),
        Some("Trigger Alice's Deed?".to_string())
    );

    // Alice passes, Bob accepts
    assert!(engine.respond(alice, 1)?);
    assert_eq!(engine.status(), QueueStatus::AwaitingPrompt { player: bob });
    assert!(engine.respond(bob, 0)?);
    assert_eq!(engine.status(), QueueStatus::Idle);

    assert_eq!(engine.state.get_player(alice)?.ghost_rock, 0);
    assert_eq!(engine.state.get_player(bob)?.ghost_rock, 2);
    assert_eq!(
        engine.state.logger.messages(),
        vec!["Bob collects from Bob's Deed".to_string()]
    );
    Ok(())
}

#[test]
fn test_player_override_offers_to_opponent() -> Result<()> {
    let (mut engine, alice, bob) = setup();
    let card = engine
        .state
        .create_card(alice, "Flop House", CardType::Deed, Location::PlayArea);
    engine.add_ability(
        card,
        AbilityBuilder::prompted()
            .when(EventName::PhaseStarted, |_, _| true)
            .player(move |_, _| Some(bob))
            .prompt_title(|state, ctx| {
                let name = state
                    .get_player(ctx.player)
                    .map(|p| p.name.to_string())
                    .unwrap_or_default();
                format!("{name}, rest at the Flop House?")
            })
            .message("{player} rests at {source}")
            .handler(|engine, ctx| engine.state.gain_ghost_rock(ctx.player, 2)),
    )?;

    engine.raise_event(phase_started())?;
    assert_eq!(engine.status(), QueueStatus::AwaitingPrompt { player: bob });
    assert_eq!(
        engine.pending_prompt().map(|p| p.title.clone()),
        Some("Bob, rest at the Flop House?".to_string())
    );

    // The controller cannot answer for the opponent
    assert!(!engine.respond(alice, 0)?);
    assert!(engine.respond(bob, 0)?);
    assert_eq!(engine.status(), QueueStatus::Idle);
    assert_eq!(engine.state.get_player(bob)?.ghost_rock, 2);
    assert_eq!(engine.state.get_player(alice)?.ghost_rock, 0);
    assert_eq!(
        engine.state.logger.messages(),
        vec!["Bob rests at Flop House".to_string()]
    );
    Ok(())
}

#[test]
fn test_forced_trigger_skipped_once_source_leaves_play() -> Result<()> {
    let (mut engine, alice, bob) = setup();
    let bounty = engine
        .state
        .create_card(bob, "Wanted Dude", CardType::Dude, Location::PlayArea);
    let hunter = engine
        .state
        .create_card(alice, "Bounty Hunter", CardType::Dude, Location::PlayArea);

    engine.add_ability(
        hunter,
        AbilityBuilder::forced()
            .when(EventName::PhaseStarted, |_, _| true)
            .message("{player}'s {source} discards the wanted dude")
            .handler(move |engine, _| engine.move_card(bounty, Location::DiscardPile)),
    )?;
    engine.add_ability(
        bounty,
        AbilityBuilder::forced()
            .when(EventName::PhaseStarted, |_, _| true)
            .message("{player} collects the bounty")
            .handler(|engine, ctx| engine.state.gain_ghost_rock(ctx.player, 5)),
    )?;

    engine.raise_event(phase_started())?;

    assert_eq!(engine.status(), QueueStatus::Idle);
    assert_eq!(engine.state.cards.get(bounty)?.location, Location::DiscardPile);
    assert_eq!(engine.state.get_player(bob)?.ghost_rock, 0);
    assert_eq!(
        engine.state.logger.messages(),
        vec!["Alice's Bounty Hunter discards the wanted dude".to_string()]
    );
    Ok(())
}

#[test]
fn test_choices_offer_labels_and_pass() -> Result<()> {
    let (mut engine, alice, _) = setup();
    let card = engine
        .state
        .create_card(alice, "General Store", CardType::Deed, Location::PlayArea);
    let ability = engine.add_ability(
        card,
        AbilityBuilder::prompted()
            .when(EventName::PhaseStarted, |_, _| true)
            .limit(AbilityLimit::per_round(1))
            .choice("Take 1", |engine, ctx| engine.state.gain_ghost_rock(ctx.player, 1))
            .choice("Take 3", |engine, ctx| engine.state.gain_ghost_rock(ctx.player, 3)),
    )?;

    engine.raise_event(phase_started())?;
    assert_eq!(
        engine.pending_prompt().map(|p| p.buttons.clone()),
        Some(vec!["Take 1".to_string(), "Take 3".to_string(), "Pass".to_string()])
    );
    assert!(engine.respond(alice, 1)?);
    assert_eq!(engine.state.get_player(alice)?.ghost_rock, 3);
    assert_eq!(engine.usage_count(ability), Some(1));

    // Used up for this round: the next window offers nothing
    engine.raise_event(phase_started())?;
    assert_eq!(engine.status(), QueueStatus::Idle);

    engine.begin_round()?;
    engine.raise_event(phase_started())?;
    assert_eq!(engine.status(), QueueStatus::AwaitingPrompt { player: alice });
    assert!(engine.respond(alice, 2)?);
    assert_eq!(engine.state.get_player(alice)?.ghost_rock, 3);
    assert_eq!(engine.usage_count(ability), Some(0));
    Ok(())
}

#[test]
fn test_per_shootout_limit_resets_when_shootout_ends() -> Result<()> {
    let (mut engine, alice, _) = setup();
    let card = engine
        .state
        .create_card(alice, "Hideout", CardType::Deed, Location::PlayArea);
    let ability = engine.add_ability(
        card,
        AbilityBuilder::forced()
            .when(EventName::PhaseStarted, |_, _| true)
            .limit(AbilityLimit::per_shootout(1))
            .handler(|engine, ctx| engine.state.gain_ghost_rock(ctx.player, 1)),
    )?;

    engine.raise_event(phase_started())?;
    engine.raise_event(phase_started())?;
    assert_eq!(engine.state.get_player(alice)?.ghost_rock, 1);

    // A new round does not reset a per-shootout limit
    engine.begin_round()?;
    assert!(engine.is_used(ability));

    engine.raise_event(EventData::ShootoutFinished)?;
    assert!(!engine.is_used(ability));
    engine.raise_event(phase_started())?;
    assert_eq!(engine.state.get_player(alice)?.ghost_rock, 2);
    Ok(())
}

#[test]
fn test_pearlys_palace_opens_shootout_menu() -> Result<()> {
    let (mut engine, alice, bob) = setup();
    let pearlys = catalog::pearlys_palace(&mut engine, alice, Location::PlayArea)?;

    // Noon plays do not interest the palace
    engine.state.round.play_window = Some(PlayWindow::Noon);
    engine.raise_event(EventData::PlayWindowOpened {
        window: PlayWindow::Noon,
    })?;
    assert_eq!(engine.status(), QueueStatus::Idle);

    engine.state.round.play_window = Some(PlayWindow::ShootoutPlays);
    engine.raise_event(EventData::PlayWindowOpened {
        window: PlayWindow::ShootoutPlays,
    })?;
    assert_eq!(
        engine.pending_prompt().map(|p| p.title.clone()),
        Some("Use Pearly's Palace?".to_string())
    );

    let mut alice_controller = ScriptedController::new(alice, [0, 0]);
    let mut bob_controller = ScriptedController::new(bob, []);
    let mut controllers: [&mut dyn DecisionMaker; 2] = [&mut alice_controller, &mut bob_controller];
    engine.run_with(&mut controllers)?;

    assert_eq!(
        alice_controller.seen_prompts().to_vec(),
        vec!["Use Pearly's Palace?".to_string(), "Make shootout play".to_string()]
    );
    assert!(bob_controller.seen_prompts().is_empty());
    assert!(engine.state.cards.get(pearlys.card)?.booted);
    assert_eq!(
        engine.state.logger.messages(),
        vec!["Alice uses Pearly's Palace to make shootout play before any player".to_string()]
    );
    Ok(())
}

#[test]
fn test_booted_palace_is_not_offered() -> Result<()> {
    let (mut engine, alice, _) = setup();
    let pearlys = catalog::pearlys_palace(&mut engine, alice, Location::PlayArea)?;
    engine.state.boot_card(pearlys.card)?;

    engine.raise_event(EventData::PlayWindowOpened {
        window: PlayWindow::ShootoutPlays,
    })?;
    assert_eq!(engine.status(), QueueStatus::Idle);
    Ok(())
}

/// Allie calls out Mortimer; returns the id of the queued "resolve shootout" step
fn mortimer_shootout(
    engine: &mut Engine,
    alice: PlayerId,
    bob: PlayerId,
) -> Result<(catalog::SampleCard, StepId)> {
    let allie = catalog::allie_hensman(engine, alice, Location::PlayArea)?;
    let mortimer = catalog::mortimer_parsons(engine, bob, Location::PlayArea)?;
    engine.state.shootout = Some(Shootout::new(allie.card, alice, mortimer.card, bob));

    engine.queue_simple_step("reveal draw hands", |engine| {
        engine.raise_event(EventData::DrawHandsRevealed { shootout: true })
    });
    let resolve = engine.queue_simple_step("resolve shootout", |engine| {
        engine.add_message("The shootout resolves", &[]);
        Ok(())
    });
    if let Some(shootout) = engine.state.shootout.as_mut() {
        shootout.pending_step = Some(resolve);
    }
    Ok((mortimer, resolve))
}

#[test]
fn test_mortimer_cancels_shootout_step() -> Result<()> {
    let (mut engine, alice, bob) = setup();
    engine.state.get_player_mut(bob)?.cheatin = true;
    let (mortimer, resolve) = mortimer_shootout(&mut engine, alice, bob)?;

    assert_eq!(engine.continue_queue()?, QueueStatus::Idle);

    assert!(!engine.is_step_pending(resolve));
    let card = engine.state.cards.get(mortimer.card)?;
    assert!(card.booted);
    assert_eq!(card.influence, 0);
    assert!(!engine.state.is_participating(mortimer.card));
    assert_eq!(
        engine.state.logger.messages(),
        vec!["Bob's cheatin' hand sends Mortimer Parsons home booted and reduces his influence to 0"
            .to_string()]
    );
    Ok(())
}

#[test]
fn test_honest_hand_lets_shootout_resolve() -> Result<()> {
    let (mut engine, alice, bob) = setup();
    let (mortimer, _) = mortimer_shootout(&mut engine, alice, bob)?;

    assert_eq!(engine.continue_queue()?, QueueStatus::Idle);

    assert!(engine.state.is_participating(mortimer.card));
    assert_eq!(engine.state.cards.get(mortimer.card)?.influence, 1);
    assert_eq!(
        engine.state.logger.messages(),
        vec!["The shootout resolves".to_string()]
    );
    Ok(())
}

#[test]
fn test_event_handler_runs_before_reactions() -> Result<()> {
    let (mut engine, alice, _) = setup();
    let card = engine
        .state
        .create_card(alice, "Bank", CardType::Deed, Location::PlayArea);
    engine.add_ability(
        card,
        AbilityBuilder::forced()
            .when(EventName::PhaseStarted, |state, _| state.round.phase == Phase::Sundown)
            .handler(|engine, ctx| engine.state.gain_ghost_rock(ctx.player, 1)),
    )?;

    let enter_sundown: StepFn = Rc::new(|engine: &mut Engine| -> Result<()> {
        engine.state.round.phase = Phase::Sundown;
        Ok(())
    });
    engine.raise_event_with(
        EventData::PhaseStarted {
            phase: Phase::Sundown,
        },
        Some(enter_sundown),
    )?;
    assert_eq!(engine.state.get_player(alice)?.ghost_rock, 1);
    Ok(())
}
