//! Activation context: the record of one resolution attempt

use crate::core::{AbilityId, CardId, ContextId, CostReceipt, PlayerId};
use crate::game::{GameEvent, StepId};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::rc::Rc;

/// Where an activation is in its lifecycle
///
/// `Idle -> LegalityChecked -> CostsPaid -> TargetsResolved -> Executed ->
/// EventEmitted -> Completed`, with `Deactivated` reachable only from
/// `CostsPaid`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ActivationStage {
    Idle,
    LegalityChecked,
    CostsPaid,
    Deactivated,
    TargetsResolved,
    Executed,
    EventEmitted,
    Completed,
}

impl ActivationStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ActivationStage::Completed | ActivationStage::Deactivated)
    }
}

/// A chosen target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChosenTarget {
    Player(PlayerId),
    Card(CardId),
}

#[derive(Debug, Clone)]
pub struct AbilityContext {
    pub id: ContextId,
    pub ability: AbilityId,
    pub source: CardId,
    pub player: PlayerId,

    /// The event that triggered the ability (triggered abilities only)
    pub event: Option<Rc<GameEvent>>,

    /// Chosen targets in declaration order, keyed by target slot name
    pub targets: SmallVec<[(String, ChosenTarget); 2]>,

    pub receipts: SmallVec<[CostReceipt; 2]>,

    /// Index into the ability's `choices` picked at the trigger offer
    pub selected_choice: Option<usize>,

    pub stage: ActivationStage,

    /// Resolution stopped without running the effect (e.g. targets vanished)
    pub cancelled: bool,

    /// Costs were refunded through deactivation
    pub ability_deactivated: bool,

    /// Target prompt currently waiting on the activating player
    pub pending_prompt: Option<StepId>,
}

impl AbilityContext {
    pub fn new(
        id: ContextId,
        ability: AbilityId,
        source: CardId,
        player: PlayerId,
        event: Option<Rc<GameEvent>>,
    ) -> Self {
        AbilityContext {
            id,
            ability,
            source,
            player,
            event,
            targets: SmallVec::new(),
            receipts: SmallVec::new(),
            selected_choice: None,
            stage: ActivationStage::Idle,
            cancelled: false,
            ability_deactivated: false,
            pending_prompt: None,
        }
    }

    pub fn target(&self, name: &str) -> Option<ChosenTarget> {
        self.targets
            .iter()
            .find(|(slot, _)| slot == name)
            .map(|(_, target)| *target)
    }

    pub fn target_card(&self, name: &str) -> Option<CardId> {
        match self.target(name)? {
            ChosenTarget::Card(card) => Some(card),
            ChosenTarget::Player(_) => None,
        }
    }

    pub fn target_player(&self, name: &str) -> Option<PlayerId> {
        match self.target(name)? {
            ChosenTarget::Player(player) => Some(player),
            ChosenTarget::Card(_) => None,
        }
    }

    /// First chosen player target, whatever its slot name
    pub fn chosen_player(&self) -> Option<PlayerId> {
        self.targets.iter().find_map(|(_, target)| match target {
            ChosenTarget::Player(player) => Some(*player),
            ChosenTarget::Card(_) => None,
        })
    }

    pub fn has_target(&self, name: &str) -> bool {
        self.target(name).is_some()
    }

    /// Still able to move forward through resolution
    pub fn is_live(&self) -> bool {
        !self.cancelled && !self.ability_deactivated && !self.stage.is_terminal()
    }
}
