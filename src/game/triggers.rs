//! Trigger windows
//!
//! Every fired event opens one window holding the triggered abilities whose
//! `when` predicate accepted it. The window is one ordered sequence: the
//! active player's abilities first, then the other players' in seat order,
//! ties kept in subscription order. Each entry is re-checked for legality
//! right before it is offered, so an earlier resolution can invalidate a
//! later one.

use crate::core::{AbilityId, ActivationStage, ContextId, PlayerId};
use crate::game::{
    legality, Engine, GameEvent, Listener, Prompt, ResolutionStage, StepFn, StepKind,
};
use crate::Result;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerCandidate {
    pub ability: AbilityId,
    pub player: PlayerId,
}

/// Abilities still to be offered for one event
#[derive(Debug, Clone)]
pub struct TriggerWindow {
    pub event: Rc<GameEvent>,
    pending: VecDeque<TriggerCandidate>,
}

impl TriggerWindow {
    pub fn new(
        event: Rc<GameEvent>,
        candidates: impl IntoIterator<Item = TriggerCandidate>,
    ) -> Self {
        TriggerWindow {
            event,
            pending: candidates.into_iter().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn candidates(&self) -> impl Iterator<Item = &TriggerCandidate> {
        self.pending.iter()
    }

    fn next(&mut self) -> Option<TriggerCandidate> {
        self.pending.pop_front()
    }
}

impl Engine {
    /// Run the event's mutation, notify bookkeeping listeners and open the
    /// event's trigger window
    pub(crate) fn fire_event(
        &mut self,
        event: Rc<GameEvent>,
        handler: Option<StepFn>,
    ) -> Result<()> {
        if let Some(handler) = handler {
            handler(self)?;
        }

        let listeners = self.registrar.listeners_for(event.name());
        for subscription in &listeners {
            self.dispatch_listener(subscription.ability, subscription.listener);
        }

        let window = self.collect_window(event);
        if window.is_empty() {
            return Ok(());
        }
        self.state.logger.engine(&format!(
            "trigger window for {:?} opened with {} abilities",
            window.event.name(),
            window.len()
        ));
        self.queue.queue_step(StepKind::Window(window));
        Ok(())
    }

    /// Triggered abilities whose `when` accepts the event, in offer order
    pub fn collect_window(&self, event: Rc<GameEvent>) -> TriggerWindow {
        let mut candidates: Vec<(usize, TriggerCandidate)> = self
            .registrar
            .listeners_for(event.name())
            .into_iter()
            .filter(|subscription| subscription.listener == Listener::Trigger)
            .filter_map(|subscription| {
                let ability = self.abilities.get(&subscription.ability)?;
                if !ability.is_triggered() || !ability.matches_event(&self.state, &event) {
                    return None;
                }
                let player = ability.responsible_player(&self.state, &event)?;
                Some((
                    self.state.seat_order(player),
                    TriggerCandidate {
                        ability: ability.id,
                        player,
                    },
                ))
            })
            .collect();

        // Stable: subscription order survives within a seat
        candidates.sort_by_key(|(seat, _)| *seat);
        TriggerWindow::new(event, candidates.into_iter().map(|(_, c)| c))
    }

    /// Offer the next ability of a window, then requeue the rest behind it
    pub(crate) fn advance_window(&mut self, mut window: TriggerWindow) -> Result<()> {
        let Some(candidate) = window.next() else {
            self.state
                .logger
                .engine(&format!("trigger window for {:?} closed", window.event.name()));
            return Ok(());
        };

        self.offer(candidate, &window.event)?;

        if window.is_empty() {
            self.state
                .logger
                .engine(&format!("trigger window for {:?} closed", window.event.name()));
        } else {
            self.queue.queue_step(StepKind::Window(window));
        }
        Ok(())
    }

    fn offer(&mut self, candidate: TriggerCandidate, event: &Rc<GameEvent>) -> Result<()> {
        let Ok(ability) = self.ability(candidate.ability) else {
            return Ok(());
        };
        let mut context = self.new_context(&ability, candidate.player, Some(event.clone()));

        if let Err(reason) = legality::check(&self.state, &self.usage, &ability, &context) {
            self.state.logger.engine(&format!(
                "skipping '{}' for {:?}: {reason:?}",
                ability.title,
                event.name()
            ));
            return Ok(());
        }

        if ability.kind.is_forced() {
            context.stage = ActivationStage::LegalityChecked;
            let context_id = context.id;
            self.contexts.insert(context_id, context);
            self.queue.queue_step(StepKind::Resolve {
                context: context_id,
                stage: ResolutionStage::PayCosts,
            });
            return Ok(());
        }

        let mut buttons: Vec<String> = if ability.choices.is_empty() {
            vec!["Yes".to_string(), "No".to_string()]
        } else {
            ability.choices.iter().map(|(label, _)| label.clone()).collect()
        };
        if !ability.choices.is_empty() {
            buttons.push("Pass".to_string());
        }
        let decline = buttons.len() - 1;
        let title = ability.title_for(&self.state, &context);
        let has_choices = !ability.choices.is_empty();
        let context_id = context.id;
        self.contexts.insert(context_id, context);

        self.queue.queue_step(StepKind::Prompt(Prompt {
            player: candidate.player,
            title,
            buttons,
            source: Some(ability.source),
            on_answer: Rc::new(move |engine: &mut Engine, choice: usize| {
                if choice == decline {
                    engine.contexts.remove(&context_id);
                    return Ok(());
                }
                engine.accept_offer(context_id, has_choices.then_some(choice))
            }),
        }));
        Ok(())
    }

    /// The player said yes: re-check and start resolution
    fn accept_offer(&mut self, context_id: ContextId, choice: Option<usize>) -> Result<()> {
        let Some(context) = self.contexts.get(&context_id) else {
            return Ok(());
        };
        let ability = self.ability(context.ability)?;
        if !legality::meets_requirements(&self.state, &self.usage, &ability, context) {
            self.contexts.remove(&context_id);
            return Ok(());
        }
        if let Some(context) = self.contexts.get_mut(&context_id) {
            context.selected_choice = choice;
            context.stage = ActivationStage::LegalityChecked;
        }
        self.queue.queue_step(StepKind::Resolve {
            context: context_id,
            stage: ResolutionStage::PayCosts,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AbilityBuilder, CardType};
    use crate::game::{EventData, EventName, GameState, QueueStatus};
    use crate::zones::Location;

    #[test]
    fn test_active_player_collected_first() {
        let mut state = GameState::new_two_player("Alice", "Bob", 0);
        state.logger.enable_capture();
        let alice = state.players[0].id;
        let bob = state.players[1].id;
        let bob_card = state.create_card(bob, "Bob's Deed", CardType::Deed, Location::PlayArea);
        let alice_card =
            state.create_card(alice, "Alice's Deed", CardType::Deed, Location::PlayArea);
        let mut engine = Engine::new(state);

        let trigger = || {
            AbilityBuilder::prompted()
                .when(EventName::PhaseStarted, |_, _| true)
                .handler(|_, _| Ok(()))
        };
        let bob_ability = engine.add_ability(bob_card, trigger()).unwrap();
        let alice_ability = engine.add_ability(alice_card, trigger()).unwrap();

        let event = Rc::new(GameEvent::new(
            1,
            EventData::PhaseStarted {
                phase: crate::game::Phase::HighNoon,
            },
        ));
        let window = engine.collect_window(event);
        let order: Vec<_> = window.candidates().map(|c| c.ability).collect();
        assert_eq!(order, vec![alice_ability, bob_ability]);

        engine.state.round.active_player = bob;
        let event = Rc::new(GameEvent::new(
            2,
            EventData::PhaseStarted {
                phase: crate::game::Phase::HighNoon,
            },
        ));
        let order: Vec<_> = engine.collect_window(event).candidates().map(|c| c.ability).collect();
        assert_eq!(order, vec![bob_ability, alice_ability]);
    }

    #[test]
    fn test_when_predicate_filters_window() {
        let mut state = GameState::new_two_player("Alice", "Bob", 0);
        state.logger.enable_capture();
        let alice = state.players[0].id;
        let card = state.create_card(alice, "Deed", CardType::Deed, Location::PlayArea);
        let mut engine = Engine::new(state);
        engine
            .add_ability(
                card,
                AbilityBuilder::forced()
                    .when(EventName::BeginRound, |_, event| {
                        matches!(event.data, EventData::BeginRound { round } if round > 1)
                    })
                    .handler(|engine, ctx| {
                        engine.state.gain_ghost_rock(ctx.player, 1)
                    }),
            )
            .unwrap();

        engine.begin_round().unwrap();
        assert_eq!(engine.state.get_player(alice).unwrap().ghost_rock, 0);
        engine.begin_round().unwrap();
        assert_eq!(engine.state.get_player(alice).unwrap().ghost_rock, 1);
        assert_eq!(engine.status(), QueueStatus::Idle);
    }
}
