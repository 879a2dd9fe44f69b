//! Board state consumed by the rules engine

use crate::core::{
    Card, CardId, CardTitle, CardType, EntityId, EntityStore, Player, PlayerId, PlayerName,
};
use crate::game::{message, GameLogger, MessageArg, PlayWindow, RoundState, Shootout};
use crate::zones::{CardZone, Location, PlayerZones};
use crate::{Result, RulesError};
use serde::{Deserialize, Serialize};

/// Complete board state
///
/// Zone membership, player resources, round flags and the current shootout.
/// The engine queries and mutates it only through these accessors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// All cards in the game
    pub cards: EntityStore<Card>,

    /// All players (Vec for stable ordering, small count)
    pub players: Vec<Player>,

    /// Private zones for each player
    pub player_zones: Vec<(PlayerId, PlayerZones)>,

    /// Shared play area (all players)
    pub play_area: CardZone,

    pub round: RoundState,

    /// Shootout in progress, if any
    pub shootout: Option<Shootout>,

    /// Unified entity ID generator (shared across all entity types)
    next_entity_id: u32,

    next_timestamp: u64,

    /// Centralized logger for game messages
    pub logger: GameLogger,
}

impl GameState {
    /// Create a new game with two players; the first player is active
    pub fn new_two_player(
        player1_name: impl Into<PlayerName>,
        player2_name: impl Into<PlayerName>,
        starting_ghost_rock: u32,
    ) -> Self {
        let p1_id = PlayerId::new(0);
        let p2_id = PlayerId::new(1);
        // Shared zones still need an owner id; it never names a real player
        let shared_id = PlayerId::new(2);

        GameState {
            cards: EntityStore::new(),
            players: vec![
                Player::new(p1_id, player1_name, starting_ghost_rock),
                Player::new(p2_id, player2_name, starting_ghost_rock),
            ],
            player_zones: vec![(p1_id, PlayerZones::new(p1_id)), (p2_id, PlayerZones::new(p2_id))],
            play_area: CardZone::new(Location::PlayArea, shared_id),
            round: RoundState::new(p1_id),
            shootout: None,
            next_entity_id: 3,
            next_timestamp: 0,
            logger: GameLogger::new(),
        }
    }

    /// Get next entity ID (unified across all entity types)
    pub fn next_id<T>(&mut self) -> EntityId<T> {
        let id = EntityId::new(self.next_entity_id);
        self.next_entity_id += 1;
        id
    }

    pub fn next_timestamp(&mut self) -> u64 {
        self.next_timestamp += 1;
        self.next_timestamp
    }

    /// Create a card directly in a location (setup only; raises no events)
    pub fn create_card(
        &mut self,
        owner: PlayerId,
        title: impl Into<CardTitle>,
        card_type: CardType,
        location: Location,
    ) -> CardId {
        let id = self.next_id();
        let mut card = Card::new(id, title, card_type, owner);
        card.location = location;
        self.cards.insert(id, card);
        if let Some(zone) = self.zone_mut(owner, location) {
            zone.add(id);
        }
        id
    }

    pub fn get_player_zones(&self, player_id: PlayerId) -> Option<&PlayerZones> {
        self.player_zones
            .iter()
            .find(|(id, _)| *id == player_id)
            .map(|(_, zones)| zones)
    }

    pub fn get_player_zones_mut(&mut self, player_id: PlayerId) -> Option<&mut PlayerZones> {
        self.player_zones
            .iter_mut()
            .find(|(id, _)| *id == player_id)
            .map(|(_, zones)| zones)
    }

    fn zone_mut(&mut self, owner: PlayerId, location: Location) -> Option<&mut CardZone> {
        match location {
            Location::PlayArea => Some(&mut self.play_area),
            _ => self.get_player_zones_mut(owner)?.get_zone_mut(location),
        }
    }

    pub fn get_player(&self, id: PlayerId) -> Result<&Player> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(RulesError::EntityNotFound(id.as_u32()))
    }

    pub fn get_player_mut(&mut self, id: PlayerId) -> Result<&mut Player> {
        self.players
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or(RulesError::EntityNotFound(id.as_u32()))
    }

    /// Get the index of a player by ID
    pub fn get_player_idx(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    pub fn opponents_of(&self, player: PlayerId) -> impl Iterator<Item = &Player> {
        self.players.iter().filter(move |p| p.id != player)
    }

    pub fn active_player(&self) -> PlayerId {
        self.round.active_player
    }

    /// Seat distance from the active player (0 for the active player)
    pub fn seat_order(&self, player: PlayerId) -> usize {
        let count = self.players.len().max(1);
        match (self.get_player_idx(self.active_player()), self.get_player_idx(player)) {
            (Some(active), Some(idx)) => (idx + count - active) % count,
            _ => count,
        }
    }

    /// Move a card to a new location; returns the location it left
    pub fn move_card(&mut self, card_id: CardId, to: Location) -> Result<Location> {
        let (from, owner) = {
            let card = self.cards.get(card_id)?;
            (card.location, card.owner)
        };

        let removed = self
            .zone_mut(owner, from)
            .is_some_and(|zone| zone.remove(card_id));
        if !removed {
            return Err(RulesError::InvalidAction(format!(
                "Card {card_id} not found in {}",
                from.as_str()
            )));
        }

        if let Some(zone) = self.zone_mut(owner, to) {
            zone.add(card_id);
        }
        self.cards.get_mut(card_id)?.location = to;

        if from == Location::PlayArea && to != Location::PlayArea {
            if let Some(shootout) = self.shootout.as_mut() {
                shootout.remove(card_id);
            }
            self.cards.get_mut(card_id)?.in_town_square = false;
        }

        self.logger.engine(&format!(
            "card {card_id} moved from {} to {}",
            from.as_str(),
            to.as_str()
        ));
        Ok(from)
    }

    /// Cards currently in a location, in zone order (player order for private zones)
    pub fn cards_in(&self, location: Location) -> Vec<CardId> {
        match location {
            Location::PlayArea => self.play_area.cards.clone(),
            _ => self
                .player_zones
                .iter()
                .filter_map(|(_, zones)| zones.get_zone(location))
                .flat_map(|zone| zone.cards.iter().copied())
                .collect(),
        }
    }

    pub fn boot_card(&mut self, card_id: CardId) -> Result<()> {
        self.cards.get_mut(card_id)?.boot();
        Ok(())
    }

    pub fn unboot_card(&mut self, card_id: CardId) -> Result<()> {
        self.cards.get_mut(card_id)?.unboot();
        Ok(())
    }

    pub fn spend_ghost_rock(&mut self, player: PlayerId, amount: u32) -> Result<()> {
        if self.get_player_mut(player)?.spend(amount) {
            Ok(())
        } else {
            Err(RulesError::InvalidAction(format!(
                "player {player} cannot pay {amount} ghost rock"
            )))
        }
    }

    pub fn gain_ghost_rock(&mut self, player: PlayerId, amount: u32) -> Result<()> {
        self.get_player_mut(player)?.gain(amount);
        Ok(())
    }

    /// Action cards can only be played by their owner from hand
    pub fn is_card_in_playable_location(&self, card_id: CardId, player: PlayerId) -> bool {
        self.cards
            .get(card_id)
            .is_ok_and(|card| card.location == Location::Hand && card.owner == player)
    }

    /// Some opponent of the player has a cheatin' hand
    pub fn can_play_cheatin_resolution(&self, player: PlayerId) -> bool {
        self.opponents_of(player).any(Player::is_cheatin)
    }

    pub fn is_shootout_play_window(&self) -> bool {
        self.shootout.is_some() && self.round.is_window_open(PlayWindow::ShootoutPlays)
    }

    pub fn is_participating(&self, card_id: CardId) -> bool {
        self.shootout
            .as_ref()
            .is_some_and(|shootout| shootout.is_in_shootout(card_id))
    }

    /// Send a dude home booted, taking it out of any shootout
    pub fn send_home(&mut self, card_id: CardId) -> Result<()> {
        if let Some(shootout) = self.shootout.as_mut() {
            shootout.remove(card_id);
        }
        let card = self.cards.get_mut(card_id)?;
        card.in_town_square = false;
        card.boot();
        Ok(())
    }

    /// Render a positional template and log it as a game message
    pub fn add_message(&self, template: &str, args: &[MessageArg]) {
        let text = message::render(self, template, args, &[]);
        self.logger.message(&text);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_game() {
        let game = GameState::new_two_player("Alice", "Bob", 10);

        assert_eq!(game.players.len(), 2);
        assert_eq!(game.players[0].name.as_str(), "Alice");
        assert_eq!(game.active_player(), game.players[0].id);
        assert!(game.play_area.is_empty());
    }

    #[test]
    fn test_move_card_tracks_location() {
        let mut game = GameState::new_two_player("Alice", "Bob", 0);
        let alice = game.players[0].id;
        let card = game.create_card(alice, "Allie Hensman", CardType::Dude, Location::Hand);

        assert_eq!(game.move_card(card, Location::PlayArea).unwrap(), Location::Hand);
        assert!(game.play_area.contains(card));
        assert_eq!(game.cards.get(card).unwrap().location, Location::PlayArea);
        assert!(game.get_player_zones(alice).unwrap().hand.is_empty());

        assert_eq!(game.cards_in(Location::PlayArea), vec![card]);
    }

    #[test]
    fn test_seat_order_starts_at_active_player() {
        let mut game = GameState::new_two_player("Alice", "Bob", 0);
        let alice = game.players[0].id;
        let bob = game.players[1].id;
        assert_eq!(game.seat_order(alice), 0);
        assert_eq!(game.seat_order(bob), 1);

        game.round.active_player = bob;
        assert_eq!(game.seat_order(bob), 0);
        assert_eq!(game.seat_order(alice), 1);
    }

    #[test]
    fn test_ghost_rock() {
        let mut game = GameState::new_two_player("Alice", "Bob", 3);
        let alice = game.players[0].id;
        assert!(game.spend_ghost_rock(alice, 4).is_err());
        game.spend_ghost_rock(alice, 2).unwrap();
        game.gain_ghost_rock(alice, 5).unwrap();
        assert_eq!(game.get_player(alice).unwrap().ghost_rock, 6);
    }

    #[test]
    fn test_cheatin_resolution_needs_cheatin_opponent() {
        let mut game = GameState::new_two_player("Alice", "Bob", 0);
        let alice = game.players[0].id;
        let bob = game.players[1].id;
        assert!(!game.can_play_cheatin_resolution(alice));

        game.get_player_mut(bob).unwrap().cheatin = true;
        assert!(game.can_play_cheatin_resolution(alice));
        assert!(!game.can_play_cheatin_resolution(bob));
    }
}
