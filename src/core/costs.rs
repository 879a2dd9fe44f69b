//! Cost system for card abilities
//!
//! Each cost is a pay / can-pay / unpay triple over a piece of board state.
//! Paying produces a receipt; only receipts for locally reversible mutations
//! (booting) can be unpaid by the player.

use crate::core::{AbilityContext, CardId, PlayerId};
use crate::game::GameState;
use crate::zones::Location;
use crate::{Result, RulesError};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// A cost that must be paid to use an ability
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cost {
    /// Boot the ability's own card
    BootSelf,

    /// Boot a specific card in play
    BootCard(CardId),

    /// Pay ghost rock from the activating player's stash
    PayGhostRock(u32),

    /// Discard the ability's own card
    DiscardSelf,

    /// Ace the ability's own card (move it to the dead pile)
    AceSelf,

    /// Move an action card from hand to "being played"
    PlayAction,
}

/// Proof of a paid cost, carrying what is needed to undo it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CostReceipt {
    Booted { card: CardId },
    GhostRockSpent { player: PlayerId, amount: u32 },
    Moved { card: CardId, from: Location, to: Location },
}

impl Cost {
    /// Side-effect-free affordability check
    pub fn can_pay(&self, state: &GameState, context: &AbilityContext) -> bool {
        match self {
            Cost::BootSelf => can_boot(state, context.source),
            Cost::BootCard(card) => can_boot(state, *card),
            Cost::PayGhostRock(amount) => state
                .get_player(context.player)
                .is_ok_and(|player| player.can_spend(*amount)),
            Cost::DiscardSelf => state
                .cards
                .get(context.source)
                .is_ok_and(|card| card.location != Location::DiscardPile),
            Cost::AceSelf => state
                .cards
                .get(context.source)
                .is_ok_and(|card| card.location != Location::DeadPile),
            Cost::PlayAction => state
                .cards
                .get(context.source)
                .is_ok_and(|card| card.location == Location::Hand),
        }
    }

    pub fn pay(&self, state: &mut GameState, context: &AbilityContext) -> Result<CostReceipt> {
        if !self.can_pay(state, context) {
            return Err(RulesError::InvalidAction(format!("{} cannot be paid", self.describe())));
        }
        match self {
            Cost::BootSelf => {
                state.boot_card(context.source)?;
                Ok(CostReceipt::Booted {
                    card: context.source,
                })
            }
            Cost::BootCard(card) => {
                state.boot_card(*card)?;
                Ok(CostReceipt::Booted { card: *card })
            }
            Cost::PayGhostRock(amount) => {
                state.spend_ghost_rock(context.player, *amount)?;
                Ok(CostReceipt::GhostRockSpent {
                    player: context.player,
                    amount: *amount,
                })
            }
            Cost::DiscardSelf => move_receipt(state, context.source, Location::DiscardPile),
            Cost::AceSelf => move_receipt(state, context.source, Location::DeadPile),
            Cost::PlayAction => move_receipt(state, context.source, Location::BeingPlayed),
        }
    }

    /// Whether paying this cost can later be undone by deactivation
    pub fn is_reversible(&self) -> bool {
        matches!(self, Cost::BootSelf | Cost::BootCard(_))
    }

    pub fn describe(&self) -> String {
        match self {
            Cost::BootSelf => "boot self".to_string(),
            Cost::BootCard(card) => format!("boot card {card}"),
            Cost::PayGhostRock(amount) => format!("pay {amount} ghost rock"),
            Cost::DiscardSelf => "discard self".to_string(),
            Cost::AceSelf => "ace self".to_string(),
            Cost::PlayAction => "play action".to_string(),
        }
    }
}

fn can_boot(state: &GameState, card: CardId) -> bool {
    state
        .cards
        .get(card)
        .is_ok_and(|card| !card.booted && card.location == Location::PlayArea)
}

fn move_receipt(state: &mut GameState, card: CardId, to: Location) -> Result<CostReceipt> {
    let from = state.move_card(card, to)?;
    Ok(CostReceipt::Moved { card, from, to })
}

impl CostReceipt {
    pub fn is_reversible(&self) -> bool {
        matches!(self, CostReceipt::Booted { .. })
    }

    pub fn can_unpay(&self, state: &GameState) -> bool {
        match self {
            CostReceipt::Booted { card } => state.cards.get(*card).is_ok_and(|card| card.booted),
            CostReceipt::GhostRockSpent { .. } | CostReceipt::Moved { .. } => false,
        }
    }

    /// Exact inverse of the payment; refuses irreversible receipts
    pub fn unpay(&self, state: &mut GameState) -> Result<()> {
        if !self.can_unpay(state) {
            return Err(RulesError::InvalidAction(format!("{self:?} cannot be unpaid")));
        }
        self.revert(state)
    }

    /// Undo the mutation regardless of reversibility (invariant rollback only)
    pub(crate) fn revert(&self, state: &mut GameState) -> Result<()> {
        match self {
            CostReceipt::Booted { card } => state.unboot_card(*card),
            CostReceipt::GhostRockSpent { player, amount } => {
                state.gain_ghost_rock(*player, *amount)
            }
            CostReceipt::Moved { card, from, .. } => state.move_card(*card, *from).map(|_| ()),
        }
    }
}

/// All-or-nothing affordability: every cost must individually pass
pub fn can_pay_all(costs: &[Cost], state: &GameState, context: &AbilityContext) -> bool {
    costs.iter().all(|cost| cost.can_pay(state, context))
}

/// Pay every cost in order, rolling back already-paid costs in reverse
/// order if any payment fails after the affordability check passed
pub fn pay_all(
    costs: &[Cost],
    state: &mut GameState,
    context: &AbilityContext,
    ability_title: &str,
) -> Result<SmallVec<[CostReceipt; 2]>> {
    if !can_pay_all(costs, state, context) {
        return Err(RulesError::InvalidAction(format!(
            "costs for '{ability_title}' are not affordable"
        )));
    }

    let mut receipts: SmallVec<[CostReceipt; 2]> = SmallVec::new();
    for cost in costs {
        match cost.pay(state, context) {
            Ok(receipt) => receipts.push(receipt),
            Err(err) => {
                for receipt in receipts.iter().rev() {
                    receipt.revert(state)?;
                }
                return Err(RulesError::CostInvariant {
                    ability: ability_title.to_string(),
                    reason: err.to_string(),
                });
            }
        }
    }
    Ok(receipts)
}

pub fn can_unpay_all(receipts: &[CostReceipt], state: &GameState) -> bool {
    receipts.iter().all(|receipt| receipt.can_unpay(state))
}

/// Unpay in reverse order of payment
pub fn unpay_all(receipts: &[CostReceipt], state: &mut GameState) -> Result<()> {
    for receipt in receipts.iter().rev() {
        receipt.unpay(state)?;
    }
    Ok(())
}
