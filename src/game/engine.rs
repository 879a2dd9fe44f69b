//! Rules engine entry points
//!
//! The [`Engine`] owns the board, every registered ability, the event
//! registrar, the usage tracker, the activation contexts and the step queue.
//! Collaborators call `execute`, `meets_requirements`, `get_menu_item`,
//! `deactivate` and the lifecycle hooks; the engine drives the step queue
//! until it is empty or a prompt is waiting for a player.

use crate::core::{
    can_unpay_all, unpay_all, Ability, AbilityBuilder, AbilityContext, AbilityId, ActivationStage,
    CardId, ContextId, PlayerId, UsageTracker,
};
use crate::game::controller::{DecisionMaker, GameStateView, PromptView};
use crate::game::{
    legality, AnswerFn, EventData, EventName, EventRegistrar, GameEvent, GameState, GameStep,
    Listener, MessageArg, Prompt, QueueStatus, ResolutionStage, StepFn, StepId, StepKind, StepQueue,
};
use crate::zones::Location;
use crate::{Result, RulesError};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::rc::Rc;

/// Abstract menu entry for an action ability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuItem {
    pub text: String,
    pub method: String,
    pub arg: String,
    pub any_player: bool,
    pub disabled: bool,
}

pub struct Engine {
    pub state: GameState,
    pub(crate) abilities: FxHashMap<AbilityId, Rc<Ability>>,
    card_abilities: FxHashMap<CardId, SmallVec<[AbilityId; 2]>>,
    pub(crate) registrar: EventRegistrar,
    pub(crate) usage: UsageTracker,
    pub(crate) contexts: FxHashMap<ContextId, AbilityContext>,

    /// Contexts that may still be deactivated, most recent last
    pub(crate) activations: FxHashMap<AbilityId, Vec<ContextId>>,

    pub(crate) queue: StepQueue,
    next_ability_id: u32,
    next_context_id: u32,
}

impl Engine {
    pub fn new(state: GameState) -> Self {
        Engine {
            state,
            abilities: FxHashMap::default(),
            card_abilities: FxHashMap::default(),
            registrar: EventRegistrar::new(),
            usage: UsageTracker::new(),
            contexts: FxHashMap::default(),
            activations: FxHashMap::default(),
            queue: StepQueue::new(),
            next_ability_id: 0,
            next_context_id: 0,
        }
    }

    /// Attach an ability to a card; registers its events if the card is
    /// already somewhere the ability listens
    pub fn add_ability(&mut self, card: CardId, builder: AbilityBuilder) -> Result<AbilityId> {
        let id = AbilityId::new(self.next_ability_id);
        let ability = builder.build(id, self.state.cards.get(card)?)?;
        self.next_ability_id += 1;

        let location = self.state.cards.get(card)?.location;
        let listening = ability.listens_in(location);
        self.state
            .logger
            .engine(&format!("ability {id} '{}' added to card {card}", ability.title));

        self.abilities.insert(id, Rc::new(ability));
        self.card_abilities.entry(card).or_default().push(id);
        if listening {
            self.register_events(id)?;
        }
        Ok(id)
    }

    pub fn ability(&self, id: AbilityId) -> Result<Rc<Ability>> {
        self.abilities
            .get(&id)
            .cloned()
            .ok_or(RulesError::EntityNotFound(id.as_u32()))
    }

    pub fn abilities_of(&self, card: CardId) -> &[AbilityId] {
        self.card_abilities
            .get(&card)
            .map(|ids| ids.as_slice())
            .unwrap_or(&[])
    }

    /// Subscribe the ability's listeners; a no-op if already registered
    pub fn register_events(&mut self, id: AbilityId) -> Result<()> {
        if self.registrar.is_registered(id) {
            return Ok(());
        }
        let ability = self.ability(id)?;

        if let Some(limit) = ability.limit {
            self.usage.track(id, limit);
            self.registrar
                .register(id, limit.period.reset_event(), Listener::ResetUsage);
        }
        if ability.is_action() {
            self.registrar
                .register(id, EventName::BeginRound, Listener::ClearActivations);
        }
        for (event, _) in &ability.when {
            self.registrar.register(id, *event, Listener::Trigger);
        }
        self.state
            .logger
            .engine(&format!("registered events for ability {id}"));
        Ok(())
    }

    /// Drop every subscription and the usage counter of an ability
    pub fn unregister_events(&mut self, id: AbilityId) {
        let dropped = self.registrar.unregister_all(id);
        self.usage.untrack(id);
        self.activations.remove(&id);
        if dropped > 0 {
            self.state
                .logger
                .engine(&format!("unregistered {dropped} listeners for ability {id}"));
        }
    }

    pub fn is_registered(&self, id: AbilityId) -> bool {
        self.registrar.is_registered(id)
    }

    /// Register or unregister each ability of a card for its current location
    pub fn refresh_card_registration(&mut self, card: CardId) -> Result<()> {
        let location = self.state.cards.get(card)?.location;
        let ids: SmallVec<[AbilityId; 2]> = self.abilities_of(card).iter().copied().collect();
        for id in ids {
            if self.ability(id)?.listens_in(location) {
                self.register_events(id)?;
            } else {
                self.unregister_events(id);
            }
        }
        Ok(())
    }

    /// Move a card, keep its abilities' registration in step with the new
    /// location and raise the matching play-area event
    pub fn move_card(&mut self, card: CardId, to: Location) -> Result<()> {
        let from = self.state.move_card(card, to)?;
        self.after_card_moved(card, from, to)
    }

    pub(crate) fn after_card_moved(
        &mut self,
        card: CardId,
        from: Location,
        to: Location,
    ) -> Result<()> {
        self.refresh_card_registration(card)?;
        if from != Location::PlayArea && to == Location::PlayArea {
            self.raise_event(EventData::CardEnteredPlay { card, from })?;
        } else if from == Location::PlayArea && to != Location::PlayArea {
            self.raise_event(EventData::CardLeftPlay { card, to })?;
        }
        Ok(())
    }

    pub(crate) fn new_context(
        &mut self,
        ability: &Ability,
        player: PlayerId,
        event: Option<Rc<GameEvent>>,
    ) -> AbilityContext {
        let id = ContextId::new(self.next_context_id);
        self.next_context_id += 1;
        AbilityContext::new(id, ability.id, ability.source, player, event)
    }

    /// Side-effect-free legality check for a player-initiated activation
    pub fn meets_requirements(&self, ability: AbilityId, player: PlayerId) -> bool {
        let Some(ability) = self.abilities.get(&ability) else {
            return false;
        };
        // Triggered abilities only resolve from their trigger window
        if !ability.is_action() {
            return false;
        }
        // Peek the next id without consuming it
        let context = AbilityContext::new(
            ContextId::new(self.next_context_id),
            ability.id,
            ability.source,
            player,
            None,
        );
        legality::meets_requirements(&self.state, &self.usage, ability, &context)
    }

    /// Activate an action; false if it is not legal right now
    pub fn execute(&mut self, ability_id: AbilityId, player: PlayerId) -> Result<bool> {
        let ability = self.ability(ability_id)?;
        if !ability.is_action() {
            self.state.logger.engine(&format!(
                "ability {ability_id} '{}' is not an action and cannot be activated",
                ability.title
            ));
            return Ok(false);
        }
        let mut context = self.new_context(&ability, player, None);

        if let Err(reason) = legality::check(&self.state, &self.usage, &ability, &context) {
            self.state.logger.engine(&format!(
                "ability {ability_id} '{}' not legal for player {player}: {reason:?}",
                ability.title
            ));
            return Ok(false);
        }
        context.stage = ActivationStage::LegalityChecked;

        let context_id = context.id;
        self.contexts.insert(context_id, context);
        self.activations.entry(ability_id).or_default().push(context_id);
        self.queue.queue_next(StepKind::Resolve {
            context: context_id,
            stage: ResolutionStage::PayCosts,
        });
        self.drive()?;
        Ok(true)
    }

    /// Menu entry for an action; triggered abilities always show disabled
    pub fn get_menu_item(
        &self,
        ability_id: AbilityId,
        arg: &str,
        player: PlayerId,
    ) -> Result<MenuItem> {
        let ability = self.ability(ability_id)?;
        Ok(MenuItem {
            text: ability.title.clone(),
            method: "doAction".to_string(),
            arg: arg.to_string(),
            any_player: ability.any_player,
            disabled: !self.meets_requirements(ability_id, player),
        })
    }

    /// The card's click-to-activate action, if the player can use it now
    pub fn click_action(&self, card: CardId, player: PlayerId) -> Option<AbilityId> {
        self.abilities_of(card).iter().copied().find(|id| {
            self.abilities
                .get(id)
                .is_some_and(|ability| ability.is_click_to_activate())
                && self.meets_requirements(*id, player)
        })
    }

    /// A click on the card itself runs its click-to-activate action
    pub fn click_card(&mut self, card: CardId, player: PlayerId) -> Result<bool> {
        match self.click_action(card, player) {
            Some(ability) => self.execute(ability, player),
            None => Ok(false),
        }
    }

    /// Retract the most recent activation of an ability while its costs are
    /// paid and its targets are still being chosen
    pub fn deactivate(&mut self, ability_id: AbilityId, player: PlayerId) -> Result<bool> {
        let Some(context_id) = self
            .activations
            .get(&ability_id)
            .and_then(|stack| stack.last().copied())
        else {
            return Ok(false);
        };
        let Some(context) = self.contexts.get(&context_id) else {
            return Ok(false);
        };
        if context.player != player
            || context.stage != ActivationStage::CostsPaid
            || !can_unpay_all(&context.receipts, &self.state)
        {
            return Ok(false);
        }

        let receipts = context.receipts.clone();
        unpay_all(&receipts, &mut self.state)?;

        let pending = match self.contexts.get_mut(&context_id) {
            Some(context) => {
                context.stage = ActivationStage::Deactivated;
                context.ability_deactivated = true;
                context.pending_prompt.take()
            }
            None => None,
        };
        if let Some(step) = pending {
            self.queue.cancel_step(step);
        }
        if let Some(stack) = self.activations.get_mut(&ability_id) {
            stack.pop();
        }

        self.state
            .logger
            .engine(&format!("context {context_id} of ability {ability_id} deactivated"));
        self.drive()?;
        Ok(true)
    }

    /// Round-boundary hook for one ability: forget its deactivatable contexts
    pub fn on_begin_round(&mut self, ability: AbilityId) {
        if let Some(stack) = self.activations.remove(&ability) {
            for id in stack {
                if self.contexts.get(&id).is_some_and(|c| c.stage.is_terminal()) {
                    self.contexts.remove(&id);
                }
            }
        }
    }

    /// Start a new round and raise the round-begin event
    pub fn begin_round(&mut self) -> Result<()> {
        let round = self.state.round.begin_round();
        self.state.logger.minimal(&format!("Round {round}"));
        self.raise_event(EventData::BeginRound { round })
    }

    pub fn raise_event(&mut self, data: EventData) -> Result<()> {
        self.raise_event_with(data, None)
    }

    /// Queue an event whose handler performs the underlying mutation before
    /// reactions are collected
    pub fn raise_event_with(&mut self, data: EventData, handler: Option<StepFn>) -> Result<()> {
        let event = Rc::new(GameEvent::new(self.state.next_timestamp(), data));
        self.queue.queue_step(StepKind::Event { event, handler });
        self.drive()
    }

    /// Queue an arbitrary step
    pub fn queue_simple_step(
        &mut self,
        label: impl Into<String>,
        run: impl Fn(&mut Engine) -> Result<()> + 'static,
    ) -> StepId {
        self.queue.queue_step(StepKind::Simple {
            label: label.into(),
            run: Rc::new(run),
        })
    }

    /// Queue a menu prompt for a player
    pub fn prompt(
        &mut self,
        player: PlayerId,
        title: impl Into<String>,
        buttons: Vec<String>,
        source: Option<CardId>,
        on_answer: AnswerFn,
    ) -> Result<StepId> {
        let id = self.queue.queue_step(StepKind::Prompt(Prompt {
            player,
            title: title.into(),
            buttons,
            source,
            on_answer,
        }));
        self.drive()?;
        Ok(id)
    }

    /// Withdraw a step that has not started yet
    pub fn cancel_step(&mut self, id: StepId) -> bool {
        let cancelled = self.queue.cancel_step(id);
        if cancelled {
            self.state.logger.engine(&format!("step {id} cancelled"));
        }
        cancelled
    }

    pub fn is_step_pending(&self, id: StepId) -> bool {
        self.queue.contains(id)
    }

    fn drive(&mut self) -> Result<()> {
        if !self.queue.is_executing() {
            self.continue_queue()?;
        }
        Ok(())
    }

    /// Run steps until the queue is empty or a prompt is at the front
    pub fn continue_queue(&mut self) -> Result<QueueStatus> {
        loop {
            if let Some(prompt) = self.queue.front_prompt() {
                let player = prompt.player;
                self.state
                    .logger
                    .engine(&format!("waiting on player {player}: {}", prompt.title));
                return Ok(QueueStatus::AwaitingPrompt { player });
            }
            let Some(step) = self.queue.begin() else {
                return Ok(QueueStatus::Idle);
            };
            let result = self.run_step(step);
            self.queue.finish();
            result?;
        }
    }

    pub fn status(&self) -> QueueStatus {
        match self.queue.front_prompt() {
            Some(prompt) => QueueStatus::AwaitingPrompt {
                player: prompt.player,
            },
            None => QueueStatus::Idle,
        }
    }

    pub fn pending_prompt(&self) -> Option<&Prompt> {
        self.queue.front_prompt()
    }

    /// Answer the open prompt; false if it is not this player's prompt or
    /// the choice is out of range
    pub fn respond(&mut self, player: PlayerId, choice: usize) -> Result<bool> {
        match self.queue.front_prompt() {
            Some(prompt) if prompt.player == player && choice < prompt.buttons.len() => {}
            _ => return Ok(false),
        }
        let Some((_, prompt)) = self.queue.begin_answer() else {
            return Ok(false);
        };

        let name = self
            .state
            .get_player(player)
            .map(|p| p.name.to_string())
            .unwrap_or_else(|_| format!("player {player}"));
        self.state.logger.choice(&name, &prompt.buttons[choice]);

        let on_answer = prompt.on_answer.clone();
        let result = on_answer(self, choice);
        self.queue.finish();
        result?;
        self.continue_queue()?;
        Ok(true)
    }

    /// Drive the queue to idle, routing every prompt to its player's decision maker
    pub fn run_with(&mut self, controllers: &mut [&mut dyn DecisionMaker]) -> Result<()> {
        loop {
            let player = match self.continue_queue()? {
                QueueStatus::Idle => return Ok(()),
                QueueStatus::AwaitingPrompt { player } => player,
            };
            let controller = controllers
                .iter_mut()
                .find(|c| c.player_id() == player)
                .ok_or_else(|| {
                    RulesError::InvalidAction(format!("no decision maker for player {player}"))
                })?;
            let prompt = self
                .queue
                .front_prompt()
                .map(PromptView::from)
                .ok_or_else(|| RulesError::InvalidAction("prompt vanished".to_string()))?;

            let choice = controller.make_choice(&GameStateView::new(&self.state, player), &prompt);
            if !self.respond(player, choice)? {
                return Err(RulesError::InvalidAction(format!(
                    "player {player} picked invalid option {choice} for '{}'",
                    prompt.title
                )));
            }
        }
    }

    fn run_step(&mut self, step: GameStep) -> Result<()> {
        self.state
            .logger
            .engine(&format!("step {}: {:?}", step.id, step.kind));
        match step.kind {
            StepKind::Simple { run, .. } => run(self),
            StepKind::Resolve { context, stage } => self.resolve_stage(context, stage),
            StepKind::Event { event, handler } => self.fire_event(event, handler),
            StepKind::Window(window) => self.advance_window(window),
            StepKind::Prompt(_) => Err(RulesError::InvalidAction(
                "prompt steps are answered, not run".to_string(),
            )),
        }
    }

    pub(crate) fn dispatch_listener(&mut self, ability: AbilityId, listener: Listener) {
        match listener {
            Listener::ResetUsage => self.usage.reset(ability),
            Listener::ClearActivations => self.on_begin_round(ability),
            Listener::Trigger => {}
        }
    }

    pub fn usage_count(&self, ability: AbilityId) -> Option<u32> {
        self.usage.count(ability)
    }

    pub fn is_used(&self, ability: AbilityId) -> bool {
        self.usage.is_used(ability)
    }

    pub fn context(&self, id: ContextId) -> Option<&AbilityContext> {
        self.contexts.get(&id)
    }

    /// Most recently created context of an ability
    pub fn latest_context(&self, ability: AbilityId) -> Option<&AbilityContext> {
        self.contexts
            .values()
            .filter(|context| context.ability == ability)
            .max_by_key(|context| context.id)
    }

    pub fn add_message(&self, template: &str, args: &[MessageArg]) {
        self.state.add_message(template, args);
    }
}
