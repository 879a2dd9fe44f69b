//! Activation state machine
//!
//! `LegalityChecked -> CostsPaid -> TargetsResolved -> Executed ->
//! EventEmitted -> Completed`, one queued stage at a time. A context that
//! was cancelled or deactivated is skipped by every later stage.

use crate::core::{
    pay_all, Ability, AbilityContext, AbilityKind, ActivationStage, CardType, ChosenTarget,
    ContextId, CostReceipt, Keyword,
};
use crate::game::{
    message, Engine, EventData, GameEvent, MessageArg, Prompt, ResolutionStage, StepKind,
};
use crate::zones::Location;
use crate::{Result, RulesError};
use std::rc::Rc;

impl Engine {
    pub(crate) fn resolve_stage(
        &mut self,
        context_id: ContextId,
        stage: ResolutionStage,
    ) -> Result<()> {
        let Some(context) = self.contexts.get(&context_id) else {
            return Ok(());
        };
        if !context.is_live() {
            self.state
                .logger
                .engine(&format!("context {context_id} no longer live, skipping {stage:?}"));
            return Ok(());
        }
        let ability = self.ability(context.ability)?;

        match stage {
            ResolutionStage::PayCosts => self.pay_costs(&ability, context_id),
            ResolutionStage::ChooseTargets => self.choose_targets(&ability, context_id),
            ResolutionStage::Execute => self.execute_effect(&ability, context_id),
        }
    }

    fn context_snapshot(&self, context_id: ContextId) -> Result<AbilityContext> {
        self.contexts
            .get(&context_id)
            .cloned()
            .ok_or(RulesError::EntityNotFound(context_id.as_u32()))
    }

    fn update_context(&mut self, context_id: ContextId, f: impl FnOnce(&mut AbilityContext)) {
        if let Some(context) = self.contexts.get_mut(&context_id) {
            f(context);
        }
    }

    fn pay_costs(&mut self, ability: &Ability, context_id: ContextId) -> Result<()> {
        let context = self.context_snapshot(context_id)?;

        let receipts = match pay_all(&ability.costs, &mut self.state, &context, &ability.title) {
            Ok(receipts) => receipts,
            Err(err @ RulesError::CostInvariant { .. }) => {
                self.update_context(context_id, |c| c.cancelled = true);
                return Err(err);
            }
            Err(err) => {
                // Board changed since the legality check; abandon quietly
                self.state
                    .logger
                    .engine(&format!("context {context_id} cancelled: {err}"));
                self.update_context(context_id, |c| c.cancelled = true);
                return Ok(());
            }
        };

        let moved: Vec<_> = receipts
            .iter()
            .filter_map(|receipt| match receipt {
                CostReceipt::Moved { card, from, to } => Some((*card, *from, *to)),
                _ => None,
            })
            .collect();

        self.update_context(context_id, |c| {
            c.receipts = receipts;
            c.stage = ActivationStage::CostsPaid;
        });
        for (card, from, to) in moved {
            self.after_card_moved(card, from, to)?;
        }

        self.queue.queue_step(StepKind::Resolve {
            context: context_id,
            stage: ResolutionStage::ChooseTargets,
        });
        Ok(())
    }

    /// Fill target slots in declaration order: one legal choice is taken
    /// automatically, several open a prompt, none cancels the activation
    fn choose_targets(&mut self, ability: &Ability, context_id: ContextId) -> Result<()> {
        let context = self.context_snapshot(context_id)?;

        for slot_def in &ability.targets {
            if context.has_target(&slot_def.name) {
                continue;
            }
            let choices = slot_def.legal_choices(&self.state, &context);
            match choices.len() {
                0 => {
                    let text = message::render(
                        &self.state,
                        "{player} uses {source} but there is no legal target",
                        &[],
                        &base_named_args(&context),
                    );
                    self.state.logger.message(&text);
                    self.update_context(context_id, |c| c.cancelled = true);
                    return Ok(());
                }
                1 => {
                    let name = slot_def.name.clone();
                    let target = choices[0];
                    self.update_context(context_id, |c| c.targets.push((name, target)));
                }
                _ => {
                    let buttons = choices
                        .iter()
                        .map(|target| self.describe_target(*target))
                        .collect();
                    let slot = slot_def.name.clone();
                    let step = self.queue.queue_step(StepKind::Prompt(Prompt {
                        player: context.player,
                        title: format!("Select {slot} for {}", ability.title),
                        buttons,
                        source: Some(ability.source),
                        on_answer: Rc::new(move |engine: &mut Engine, choice: usize| {
                            let target = choices[choice];
                            let slot = slot.clone();
                            engine.update_context(context_id, |c| {
                                c.pending_prompt = None;
                                c.targets.push((slot, target));
                            });
                            engine.queue.queue_step(StepKind::Resolve {
                                context: context_id,
                                stage: ResolutionStage::ChooseTargets,
                            });
                            Ok(())
                        }),
                    }));
                    self.update_context(context_id, |c| c.pending_prompt = Some(step));
                    return Ok(());
                }
            }
        }

        self.update_context(context_id, |c| c.stage = ActivationStage::TargetsResolved);
        self.queue.queue_step(StepKind::Resolve {
            context: context_id,
            stage: ResolutionStage::Execute,
        });
        Ok(())
    }

    fn describe_target(&self, target: ChosenTarget) -> String {
        match target {
            ChosenTarget::Player(id) => self
                .state
                .get_player(id)
                .map(|p| p.name.to_string())
                .unwrap_or_else(|_| format!("player {id}")),
            ChosenTarget::Card(id) => self
                .state
                .cards
                .get(id)
                .map(|c| c.title.to_string())
                .unwrap_or_else(|_| format!("card {id}")),
        }
    }

    /// Run the effect (or the fizzle message), count the use and emit the
    /// resolution event
    fn execute_effect(&mut self, ability: &Ability, context_id: ContextId) -> Result<()> {
        let context = self.context_snapshot(context_id)?;

        let fizzled = ability.kind == AbilityKind::Action
            && ability
                .if_condition
                .as_ref()
                .is_some_and(|condition| !condition(&self.state, &context));

        if fizzled {
            self.render_ability_message(ability, &context, &ability.if_fail_message);
        } else {
            if let Some(template) = &ability.message {
                self.render_ability_message(ability, &context, template);
            }
            if let Some(handler) = ability.effect_handler(&context) {
                handler(self, &context)?;
            }
        }

        self.usage.increment(ability.id);
        if self
            .state
            .cards
            .get(ability.source)
            .is_ok_and(|card| card.has_keyword(&Keyword::new("headline")))
        {
            self.state.round.headline_used = true;
        }
        self.update_context(context_id, |c| c.stage = ActivationStage::Executed);

        // A played action card goes to its owner's discard pile once resolved
        let played_action = self.state.cards.get(ability.source).is_ok_and(|card| {
            card.is_type(CardType::Action) && card.location == Location::BeingPlayed
        });
        if played_action {
            self.move_card(ability.source, Location::DiscardPile)?;
        }

        let ts = self.state.next_timestamp();
        self.queue.queue_step(StepKind::Event {
            event: Rc::new(GameEvent::new(
                ts,
                EventData::AbilityResolved {
                    ability: ability.id,
                    source: ability.source,
                    player: context.player,
                },
            )),
            handler: Some(Rc::new(move |engine: &mut Engine| {
                engine.update_context(context_id, |c| c.stage = ActivationStage::EventEmitted);
                Ok(())
            })),
        });
        // Runs once the resolved event's trigger window has been worked through
        self.queue.queue_step(StepKind::Simple {
            label: "complete activation".to_string(),
            run: Rc::new(move |engine: &mut Engine| {
                engine.update_context(context_id, |c| c.stage = ActivationStage::Completed);
                Ok(())
            }),
        });
        Ok(())
    }

    fn render_ability_message(&self, ability: &Ability, context: &AbilityContext, template: &str) {
        let positional = ability
            .message_args
            .as_ref()
            .map(|args| args(&self.state, context))
            .unwrap_or_default();
        let mut named = base_named_args(context);
        if let Some((_, first)) = context.targets.first() {
            named.push(("target", target_arg(*first)));
        }
        for (slot, target) in &context.targets {
            named.push((slot.as_str(), target_arg(*target)));
        }
        let text = message::render(&self.state, template, &positional, &named);
        self.state.logger.message(&text);
    }
}

fn base_named_args(context: &AbilityContext) -> Vec<(&str, MessageArg)> {
    vec![
        ("player", MessageArg::Player(context.player)),
        ("source", MessageArg::Card(context.source)),
    ]
}

fn target_arg(target: ChosenTarget) -> MessageArg {
    match target {
        ChosenTarget::Player(id) => MessageArg::Player(id),
        ChosenTarget::Card(id) => MessageArg::Card(id),
    }
}
