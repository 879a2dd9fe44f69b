//! Shootout bookkeeping
//!
//! The duel subsystem itself is an external collaborator; the engine only
//! needs to know who is in the shootout and which pending step decides it.

use crate::core::{CardId, PlayerId};
use crate::game::StepId;
use serde::{Deserialize, Serialize};

/// One side of a shootout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Posse {
    pub player: PlayerId,
    pub dudes: Vec<CardId>,
}

impl Posse {
    pub fn new(player: PlayerId) -> Self {
        Posse {
            player,
            dudes: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shootout {
    pub leader: CardId,
    pub mark: CardId,
    pub leader_posse: Posse,
    pub mark_posse: Posse,

    /// Queued step that would decide an undecided shootout
    pub pending_step: Option<StepId>,

    /// Extra cards (goods, spells) attached to participating dudes
    pub attachments: Vec<CardId>,
}

impl Shootout {
    pub fn new(
        leader: CardId,
        leader_player: PlayerId,
        mark: CardId,
        mark_player: PlayerId,
    ) -> Self {
        let mut leader_posse = Posse::new(leader_player);
        leader_posse.dudes.push(leader);
        let mut mark_posse = Posse::new(mark_player);
        mark_posse.dudes.push(mark);
        Shootout {
            leader,
            mark,
            leader_posse,
            mark_posse,
            pending_step: None,
            attachments: Vec::new(),
        }
    }

    pub fn is_in_shootout(&self, card: CardId) -> bool {
        self.leader_posse.dudes.contains(&card)
            || self.mark_posse.dudes.contains(&card)
            || self.attachments.contains(&card)
    }

    pub fn join(&mut self, player: PlayerId, dude: CardId) {
        if self.leader_posse.player == player {
            self.leader_posse.dudes.push(dude);
        } else if self.mark_posse.player == player {
            self.mark_posse.dudes.push(dude);
        }
    }

    /// Take a card out of the shootout (sent home, aced, discarded)
    pub fn remove(&mut self, card: CardId) {
        self.leader_posse.dudes.retain(|&id| id != card);
        self.mark_posse.dudes.retain(|&id| id != card);
        self.attachments.retain(|&id| id != card);
    }

    /// The shootout ends once either posse is empty
    pub fn check_end_condition(&self) -> bool {
        self.leader_posse.dudes.is_empty() || self.mark_posse.dudes.is_empty()
    }

    pub fn opponent_of(&self, player: PlayerId) -> Option<PlayerId> {
        if self.leader_posse.player == player {
            Some(self.mark_posse.player)
        } else if self.mark_posse.player == player {
            Some(self.leader_posse.player)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shootout_membership() {
        let p1 = PlayerId::new(0);
        let p2 = PlayerId::new(1);
        let mut shootout = Shootout::new(CardId::new(1), p1, CardId::new(2), p2);

        shootout.join(p1, CardId::new(3));
        assert!(shootout.is_in_shootout(CardId::new(3)));
        assert!(!shootout.is_in_shootout(CardId::new(4)));
        assert_eq!(shootout.opponent_of(p2), Some(p1));

        shootout.remove(CardId::new(2));
        assert!(shootout.check_end_condition());
    }
}
