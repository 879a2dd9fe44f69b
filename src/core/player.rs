//! Player representation

use crate::core::{AbilityKind, CardId, GameEntity, PlayerId, PlayerName};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Effects that stop a player from using abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TriggerRestriction {
    /// Cannot use any card ability
    CardAbilities,
    /// Cannot use reactions
    Reactions,
    /// Cannot use abilities printed on this card
    AbilitiesOf(CardId),
}

/// Represents a player in the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,

    pub name: PlayerName,

    /// Ghost rock (the game currency)
    pub ghost_rock: u32,

    /// Whether the player's current draw hand is cheatin'
    pub cheatin: bool,

    /// Rank of the current draw hand before modifiers
    pub hand_rank: i32,

    /// Sum of rank modifiers applied this shootout/lowball
    pub rank_modifier: i32,

    pub restrictions: SmallVec<[TriggerRestriction; 2]>,
}

impl Player {
    pub fn new(id: PlayerId, name: impl Into<PlayerName>, starting_ghost_rock: u32) -> Self {
        Player {
            id,
            name: name.into(),
            ghost_rock: starting_ghost_rock,
            cheatin: false,
            hand_rank: 0,
            rank_modifier: 0,
            restrictions: SmallVec::new(),
        }
    }

    pub fn can_spend(&self, amount: u32) -> bool {
        self.ghost_rock >= amount
    }

    /// Spend ghost rock; returns false (and spends nothing) when short
    pub fn spend(&mut self, amount: u32) -> bool {
        if !self.can_spend(amount) {
            return false;
        }
        self.ghost_rock -= amount;
        true
    }

    pub fn gain(&mut self, amount: u32) {
        self.ghost_rock += amount;
    }

    pub fn modify_rank(&mut self, amount: i32) {
        self.rank_modifier += amount;
    }

    pub fn total_rank(&self) -> i32 {
        (self.hand_rank + self.rank_modifier).max(1)
    }

    pub fn is_cheatin(&self) -> bool {
        self.cheatin
    }

    /// Permission predicate consulted before any card ability is used
    pub fn can_trigger(&self, kind: AbilityKind, source: CardId) -> bool {
        !self.restrictions.iter().any(|restriction| match restriction {
            TriggerRestriction::CardAbilities => true,
            TriggerRestriction::Reactions => kind == AbilityKind::Reaction,
            TriggerRestriction::AbilitiesOf(card) => *card == source,
        })
    }
}

impl GameEntity<Player> for Player {
    fn id(&self) -> PlayerId {
        self.id
    }

    fn name(&self) -> &str {
        self.name.as_str()
    }
}
