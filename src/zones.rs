//! Card locations (hand, play area, discard pile, etc.)

use crate::core::{CardId, PlayerId};
use serde::{Deserialize, Serialize};

/// Locations a card can occupy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Location {
    DrawDeck,
    Hand,
    PlayArea,
    DiscardPile,
    DeadPile,
    DrawHand,
    /// An action card between being announced and resolving
    BeingPlayed,
}

impl Location {
    pub fn as_str(&self) -> &'static str {
        match self {
            Location::DrawDeck => "draw deck",
            Location::Hand => "hand",
            Location::PlayArea => "play area",
            Location::DiscardPile => "discard pile",
            Location::DeadPile => "dead pile",
            Location::DrawHand => "draw hand",
            Location::BeingPlayed => "being played",
        }
    }
}

/// A zone containing cards (ordered for the draw deck and discard pile)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardZone {
    pub location: Location,

    /// Owner of this zone (the play area is shared and owned by nobody in particular)
    pub owner: PlayerId,

    pub cards: Vec<CardId>,
}

impl CardZone {
    pub fn new(location: Location, owner: PlayerId) -> Self {
        CardZone {
            location,
            owner,
            cards: Vec::new(),
        }
    }

    pub fn add(&mut self, card_id: CardId) {
        self.cards.push(card_id);
    }

    pub fn remove(&mut self, card_id: CardId) -> bool {
        if let Some(pos) = self.cards.iter().position(|&id| id == card_id) {
            // remove() rather than swap_remove(): iteration order feeds menus and prompts
            self.cards.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, card_id: CardId) -> bool {
        self.cards.contains(&card_id)
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Draw from top (for the draw deck)
    pub fn draw_top(&mut self) -> Option<CardId> {
        self.cards.pop()
    }
}

/// Collection of all private zones for a player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerZones {
    pub draw_deck: CardZone,
    pub hand: CardZone,
    pub discard_pile: CardZone,
    pub dead_pile: CardZone,
    pub draw_hand: CardZone,
    pub being_played: CardZone,
}

impl PlayerZones {
    pub fn new(player_id: PlayerId) -> Self {
        PlayerZones {
            draw_deck: CardZone::new(Location::DrawDeck, player_id),
            hand: CardZone::new(Location::Hand, player_id),
            discard_pile: CardZone::new(Location::DiscardPile, player_id),
            dead_pile: CardZone::new(Location::DeadPile, player_id),
            draw_hand: CardZone::new(Location::DrawHand, player_id),
            being_played: CardZone::new(Location::BeingPlayed, player_id),
        }
    }

    pub fn get_zone(&self, location: Location) -> Option<&CardZone> {
        match location {
            Location::DrawDeck => Some(&self.draw_deck),
            Location::Hand => Some(&self.hand),
            Location::DiscardPile => Some(&self.discard_pile),
            Location::DeadPile => Some(&self.dead_pile),
            Location::DrawHand => Some(&self.draw_hand),
            Location::BeingPlayed => Some(&self.being_played),
            Location::PlayArea => None,
        }
    }

    pub fn get_zone_mut(&mut self, location: Location) -> Option<&mut CardZone> {
        match location {
            Location::DrawDeck => Some(&mut self.draw_deck),
            Location::Hand => Some(&mut self.hand),
            Location::DiscardPile => Some(&mut self.discard_pile),
            Location::DeadPile => Some(&mut self.dead_pile),
            Location::DrawHand => Some(&mut self.draw_hand),
            Location::BeingPlayed => Some(&mut self.being_played),
            Location::PlayArea => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_zone() {
        let player_id = PlayerId::new(1);
        let mut zone = CardZone::new(Location::Hand, player_id);

        assert!(zone.is_empty());

        let card1 = CardId::new(10);
        let card2 = CardId::new(11);

        zone.add(card1);
        zone.add(card2);

        assert_eq!(zone.len(), 2);
        assert!(zone.contains(card1));

        assert!(zone.remove(card1));
        assert!(!zone.remove(card1));
        assert_eq!(zone.cards, vec![card2]);
    }

    #[test]
    fn test_player_zones_lookup() {
        let zones = PlayerZones::new(PlayerId::new(1));

        assert_eq!(zones.get_zone(Location::Hand).unwrap().location, Location::Hand);
        assert_eq!(
            zones.get_zone(Location::DeadPile).unwrap().location,
            Location::DeadPile
        );
        assert!(zones.get_zone(Location::PlayArea).is_none());
    }
}
