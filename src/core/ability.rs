//! Card-granted capabilities
//!
//! An [`Ability`] is a data-driven descriptor: the timing model is a single
//! [`AbilityKind`] tag, and every card-authored behavior (conditions,
//! handlers, target filters, prompt titles) is an explicit callback field.
//! The engine dispatches on the tag in one resolver instead of through a
//! class hierarchy.

use crate::core::{
    AbilityContext, AbilityId, AbilityLimit, Card, CardId, CardType, ChosenTarget, Cost, Keyword,
    Player, PlayerId,
};
use crate::game::{Engine, EventName, GameEvent, GameState, MessageArg, PlayWindow};
use crate::zones::Location;
use crate::{Result, RulesError};
use serde::{Deserialize, Serialize};
use smallvec::{smallvec, SmallVec};
use std::fmt;
use std::rc::Rc;

pub type Condition = Rc<dyn Fn(&GameState, &AbilityContext) -> bool>;
pub type EventCondition = Rc<dyn Fn(&GameState, &GameEvent) -> bool>;
pub type Handler = Rc<dyn Fn(&mut Engine, &AbilityContext) -> Result<()>>;
pub type TitleFn = Rc<dyn Fn(&GameState, &AbilityContext) -> String>;
pub type PlayerSelector = Rc<dyn Fn(&GameState, &GameEvent) -> Option<PlayerId>>;
pub type MessageArgsFn = Rc<dyn Fn(&GameState, &AbilityContext) -> Vec<MessageArg>>;
pub type PlayerFilter = Rc<dyn Fn(&GameState, &AbilityContext, &Player) -> bool>;
pub type CardFilter = Rc<dyn Fn(&GameState, &AbilityContext, &Card) -> bool>;

pub const DEFAULT_FAIL_MESSAGE: &str = "{player} uses {source} but fails to meet requirements";

/// Timing model of an ability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Player-initiated from a menu
    Action,
    /// Optional response to an event, subject to "no reactions" effects
    Reaction,
    /// Resolves automatically whenever its event fires
    ForcedTrigger,
    /// Offered to its responsible player when its event fires
    PromptedTrigger,
}

impl AbilityKind {
    pub fn is_triggered(&self) -> bool {
        !matches!(self, AbilityKind::Action)
    }

    pub fn is_forced(&self) -> bool {
        matches!(self, AbilityKind::ForcedTrigger)
    }

    pub fn is_prompted(&self) -> bool {
        matches!(self, AbilityKind::Reaction | AbilityKind::PromptedTrigger)
    }
}

/// Windows in which an action may be played
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayType {
    Noon,
    Shootout,
    /// Shootout play that may be used by cards not yet in the shootout
    ShootoutJoin,
    Resolution,
    /// Resolution play only legal against a cheatin' opponent
    CheatinResolution,
    Any,
}

impl PlayType {
    pub fn allowed_in(&self, window: PlayWindow) -> bool {
        match self {
            PlayType::Noon => window == PlayWindow::Noon,
            PlayType::Shootout | PlayType::ShootoutJoin => window == PlayWindow::ShootoutPlays,
            PlayType::Resolution | PlayType::CheatinResolution => window == PlayWindow::Resolution,
            PlayType::Any => true,
        }
    }
}

#[derive(Clone)]
pub enum TargetKind {
    Player(Option<PlayerFilter>),
    Card {
        location: Location,
        filter: Option<CardFilter>,
    },
}

/// A named target slot
#[derive(Clone)]
pub struct TargetSpec {
    pub name: String,
    pub kind: TargetKind,
}

impl TargetSpec {
    /// Every legal choice for this slot, in board order
    pub fn legal_choices(&self, state: &GameState, context: &AbilityContext) -> Vec<ChosenTarget> {
        match &self.kind {
            TargetKind::Player(filter) => state
                .players
                .iter()
                .filter(|player| filter.as_ref().is_none_or(|f| f(state, context, player)))
                .map(|player| ChosenTarget::Player(player.id))
                .collect(),
            TargetKind::Card { location, filter } => state
                .cards_in(*location)
                .into_iter()
                .filter(|card_id| {
                    state.cards.get(*card_id).is_ok_and(|card| {
                        filter.as_ref().is_none_or(|f| f(state, context, card))
                    })
                })
                .map(ChosenTarget::Card)
                .collect(),
        }
    }

    pub fn can_resolve(&self, state: &GameState, context: &AbilityContext) -> bool {
        !self.legal_choices(state, context).is_empty()
    }
}

pub struct Ability {
    pub id: AbilityId,
    pub source: CardId,
    pub source_type: CardType,
    pub title: String,
    pub kind: AbilityKind,
    pub play_types: SmallVec<[PlayType; 2]>,

    /// Zones the source card must be in for the ability to be used
    pub locations: SmallVec<[Location; 2]>,

    pub costs: Vec<Cost>,
    pub limit: Option<AbilityLimit>,
    pub any_player: bool,

    /// Skip the usage-limit legality check
    pub allow_used: bool,

    /// Subject to the controller's trigger restrictions
    pub card_ability: bool,

    /// Activated by clicking the card rather than from its menu
    pub click_to_activate: bool,

    pub condition: Option<Condition>,
    pub if_condition: Option<Condition>,
    pub if_fail_message: String,
    pub message: Option<String>,
    pub message_args: Option<MessageArgsFn>,

    /// Events this ability reacts to (triggered kinds only)
    pub when: Vec<(EventName, EventCondition)>,

    pub targets: Vec<TargetSpec>,

    /// Responsible player override for triggered abilities
    pub player: Option<PlayerSelector>,

    pub prompt_title: Option<TitleFn>,
    pub handler: Option<Handler>,

    /// Labelled alternatives offered when a prompted trigger is offered
    pub choices: Vec<(String, Handler)>,

    /// Effect-level permission checked last in the legality pipeline
    pub allow: Option<Condition>,
}

impl Ability {
    pub fn is_action(&self) -> bool {
        self.kind == AbilityKind::Action
    }

    pub fn is_click_to_activate(&self) -> bool {
        self.is_action() && self.click_to_activate
    }

    pub fn is_triggered(&self) -> bool {
        self.kind.is_triggered()
    }

    /// An action printed on an action card, played from hand
    pub fn is_playable_action_ability(&self) -> bool {
        self.is_action()
            && self.source_type == CardType::Action
            && self.locations.contains(&Location::Hand)
    }

    pub fn listens_in(&self, location: Location) -> bool {
        self.locations.contains(&location)
    }

    pub fn listens_to(&self, event: EventName) -> bool {
        self.when.iter().any(|(name, _)| *name == event)
    }

    /// Whether the event's `when` predicate accepts this firing
    pub fn matches_event(&self, state: &GameState, event: &GameEvent) -> bool {
        self.when
            .iter()
            .any(|(name, predicate)| *name == event.name() && predicate(state, event))
    }

    /// Player who resolves this ability for the given event
    pub fn responsible_player(&self, state: &GameState, event: &GameEvent) -> Option<PlayerId> {
        match &self.player {
            Some(selector) => selector(state, event),
            None => state.cards.get(self.source).ok().map(|card| card.controller),
        }
    }

    pub fn title_for(&self, state: &GameState, context: &AbilityContext) -> String {
        if let Some(title) = &self.prompt_title {
            return title(state, context);
        }
        let card = state
            .cards
            .get(self.source)
            .map(|card| card.title.to_string())
            .unwrap_or_else(|_| self.title.clone());
        match self.kind {
            AbilityKind::Reaction => format!("Use {card}?"),
            _ => format!("Trigger {card}?"),
        }
    }

    /// Handler to run on resolution: the picked choice, else the main handler
    pub fn effect_handler(&self, context: &AbilityContext) -> Option<Handler> {
        match context.selected_choice {
            Some(index) => self.choices.get(index).map(|(_, handler)| handler.clone()),
            None => self.handler.clone(),
        }
    }

    pub fn can_resolve_targets(&self, state: &GameState, context: &AbilityContext) -> bool {
        self.targets
            .iter()
            .all(|target| target.can_resolve(state, context))
    }
}

impl fmt::Debug for Ability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ability")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("title", &self.title)
            .field("kind", &self.kind)
            .field("play_types", &self.play_types)
            .field("locations", &self.locations)
            .field("costs", &self.costs)
            .field("limit", &self.limit)
            .field("when", &self.when.iter().map(|(name, _)| *name).collect::<Vec<_>>())
            .field("targets", &self.targets.iter().map(|t| &t.name).collect::<Vec<_>>())
            .field("choices", &self.choices.iter().map(|(label, _)| label).collect::<Vec<_>>())
            .finish()
    }
}

/// Builder for [`Ability`]; `build` applies card-type defaults and
/// rejects capabilities with nothing to run
pub struct AbilityBuilder {
    kind: AbilityKind,
    title: Option<String>,
    play_types: SmallVec<[PlayType; 2]>,
    locations: SmallVec<[Location; 2]>,
    costs: Vec<Cost>,
    limit: Option<AbilityLimit>,
    any_player: bool,
    allow_used: bool,
    card_ability: bool,
    click_to_activate: bool,
    condition: Option<Condition>,
    if_condition: Option<Condition>,
    if_fail_message: Option<String>,
    message: Option<String>,
    message_args: Option<MessageArgsFn>,
    when: Vec<(EventName, EventCondition)>,
    targets: Vec<TargetSpec>,
    player: Option<PlayerSelector>,
    prompt_title: Option<TitleFn>,
    handler: Option<Handler>,
    choices: Vec<(String, Handler)>,
    allow: Option<Condition>,
}

impl AbilityBuilder {
    fn new(kind: AbilityKind) -> Self {
        AbilityBuilder {
            kind,
            title: None,
            play_types: SmallVec::new(),
            locations: SmallVec::new(),
            costs: Vec::new(),
            limit: None,
            any_player: false,
            allow_used: false,
            card_ability: true,
            click_to_activate: false,
            condition: None,
            if_condition: None,
            if_fail_message: None,
            message: None,
            message_args: None,
            when: Vec::new(),
            targets: Vec::new(),
            player: None,
            prompt_title: None,
            handler: None,
            choices: Vec::new(),
            allow: None,
        }
    }

    pub fn action() -> Self {
        Self::new(AbilityKind::Action)
    }

    pub fn reaction() -> Self {
        Self::new(AbilityKind::Reaction)
    }

    pub fn forced() -> Self {
        Self::new(AbilityKind::ForcedTrigger)
    }

    pub fn prompted() -> Self {
        Self::new(AbilityKind::PromptedTrigger)
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn play_type(mut self, play_type: PlayType) -> Self {
        self.play_types.push(play_type);
        self
    }

    pub fn location(mut self, location: Location) -> Self {
        self.locations.push(location);
        self
    }

    pub fn cost(mut self, cost: Cost) -> Self {
        self.costs.push(cost);
        self
    }

    pub fn limit(mut self, limit: AbilityLimit) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn any_player(mut self) -> Self {
        self.any_player = true;
        self
    }

    pub fn allow_used(mut self) -> Self {
        self.allow_used = true;
        self
    }

    /// Not a card ability: ignores the controller's trigger restrictions
    pub fn not_card_ability(mut self) -> Self {
        self.card_ability = false;
        self
    }

    pub fn click_to_activate(mut self) -> Self {
        self.click_to_activate = true;
        self
    }

    pub fn condition(
        mut self,
        condition: impl Fn(&GameState, &AbilityContext) -> bool + 'static,
    ) -> Self {
        self.condition = Some(Rc::new(condition));
        self
    }

    pub fn if_condition(
        mut self,
        condition: impl Fn(&GameState, &AbilityContext) -> bool + 'static,
    ) -> Self {
        self.if_condition = Some(Rc::new(condition));
        self
    }

    pub fn if_fail_message(mut self, template: impl Into<String>) -> Self {
        self.if_fail_message = Some(template.into());
        self
    }

    pub fn message(mut self, template: impl Into<String>) -> Self {
        self.message = Some(template.into());
        self
    }

    pub fn message_args(
        mut self,
        args: impl Fn(&GameState, &AbilityContext) -> Vec<MessageArg> + 'static,
    ) -> Self {
        self.message_args = Some(Rc::new(args));
        self
    }

    pub fn when(
        mut self,
        event: EventName,
        predicate: impl Fn(&GameState, &GameEvent) -> bool + 'static,
    ) -> Self {
        self.when.push((event, Rc::new(predicate)));
        self
    }

    pub fn target_player(
        mut self,
        name: impl Into<String>,
        filter: Option<PlayerFilter>,
    ) -> Self {
        self.targets.push(TargetSpec {
            name: name.into(),
            kind: TargetKind::Player(filter),
        });
        self
    }

    pub fn target_card(
        mut self,
        name: impl Into<String>,
        location: Location,
        filter: impl Fn(&GameState, &AbilityContext, &Card) -> bool + 'static,
    ) -> Self {
        self.targets.push(TargetSpec {
            name: name.into(),
            kind: TargetKind::Card {
                location,
                filter: Some(Rc::new(filter)),
            },
        });
        self
    }

    pub fn player(
        mut self,
        selector: impl Fn(&GameState, &GameEvent) -> Option<PlayerId> + 'static,
    ) -> Self {
        self.player = Some(Rc::new(selector));
        self
    }

    pub fn prompt_title(
        mut self,
        title: impl Fn(&GameState, &AbilityContext) -> String + 'static,
    ) -> Self {
        self.prompt_title = Some(Rc::new(title));
        self
    }

    pub fn handler(
        mut self,
        handler: impl Fn(&mut Engine, &AbilityContext) -> Result<()> + 'static,
    ) -> Self {
        self.handler = Some(Rc::new(handler));
        self
    }

    pub fn choice(
        mut self,
        label: impl Into<String>,
        handler: impl Fn(&mut Engine, &AbilityContext) -> Result<()> + 'static,
    ) -> Self {
        self.choices.push((label.into(), Rc::new(handler)));
        self
    }

    pub fn allow(
        mut self,
        condition: impl Fn(&GameState, &AbilityContext) -> bool + 'static,
    ) -> Self {
        self.allow = Some(Rc::new(condition));
        self
    }

    pub fn build(self, id: AbilityId, card: &Card) -> Result<Ability> {
        let title = self.title.unwrap_or_else(|| card.title.to_string());

        if self.kind.is_triggered() && self.when.is_empty() {
            return Err(RulesError::InvalidAction(format!(
                "triggered ability '{title}' listens to no event"
            )));
        }

        let handler = match self.handler {
            Some(handler) => Some(handler),
            None if !self.choices.is_empty() => None,
            // Spells and jobs resolve through their own follow-up rules
            None if card.is_type(CardType::Spell) || card.has_keyword(&Keyword::new("job")) => {
                let noop: Handler = Rc::new(|_, _| Ok(()));
                Some(noop)
            }
            None => return Err(RulesError::MissingEffect(title)),
        };

        let locations = if self.locations.is_empty() {
            smallvec![card.card_type.natural_location()]
        } else {
            self.locations
        };

        let play_types = if self.play_types.is_empty() && self.kind == AbilityKind::Action {
            smallvec![PlayType::Noon]
        } else {
            self.play_types
        };

        let mut costs = self.costs;
        if self.card_ability && card.is_type(CardType::Action) {
            costs.push(Cost::PlayAction);
        }

        Ok(Ability {
            id,
            source: card.id,
            source_type: card.card_type,
            title,
            kind: self.kind,
            play_types,
            locations,
            costs,
            limit: self.limit,
            any_player: self.any_player,
            allow_used: self.allow_used,
            card_ability: self.card_ability,
            click_to_activate: self.click_to_activate,
            condition: self.condition,
            if_condition: self.if_condition,
            if_fail_message: self
                .if_fail_message
                .unwrap_or_else(|| DEFAULT_FAIL_MESSAGE.to_string()),
            message: self.message,
            message_args: self.message_args,
            when: self.when,
            targets: self.targets,
            player: self.player,
            prompt_title: self.prompt_title,
            handler,
            choices: self.choices,
            allow: self.allow,
        })
    }
}
