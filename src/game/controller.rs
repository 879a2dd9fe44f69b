//! Decision makers
//!
//! Every player decision the engine needs is a [`Prompt`]: a title and a
//! list of buttons. A [`DecisionMaker`] answers by picking a button index.
//! It sees the board only through a read-only [`GameStateView`].

use crate::core::{Card, CardId, PlayerId};
use crate::game::{GameState, Prompt};
use crate::zones::Location;
use serde::{Deserialize, Serialize};

/// Read-only view of the board for one player
pub struct GameStateView<'a> {
    state: &'a GameState,
    player_id: PlayerId,
}

impl<'a> GameStateView<'a> {
    pub fn new(state: &'a GameState, player_id: PlayerId) -> Self {
        GameStateView { state, player_id }
    }

    pub fn player_id(&self) -> PlayerId {
        self.player_id
    }

    pub fn ghost_rock(&self) -> u32 {
        self.state
            .get_player(self.player_id)
            .map(|p| p.ghost_rock)
            .unwrap_or(0)
    }

    pub fn hand(&self) -> &[CardId] {
        self.state
            .get_player_zones(self.player_id)
            .map(|zones| zones.hand.cards.as_slice())
            .unwrap_or(&[])
    }

    pub fn cards_in_play(&self) -> &[CardId] {
        &self.state.play_area.cards
    }

    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.state.cards.get(id).ok()
    }

    pub fn card_title(&self, id: CardId) -> Option<&str> {
        self.card(id).map(|card| card.title.as_str())
    }

    pub fn is_in_hand(&self, id: CardId) -> bool {
        self.card(id).is_some_and(|card| card.location == Location::Hand)
    }

    pub fn is_active_player(&self) -> bool {
        self.state.active_player() == self.player_id
    }

    pub fn round_number(&self) -> u32 {
        self.state.round.round_number
    }
}

/// Owned description of an open prompt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptView {
    pub title: String,
    pub buttons: Vec<String>,
    pub source: Option<CardId>,
}

impl From<&Prompt> for PromptView {
    fn from(prompt: &Prompt) -> Self {
        PromptView {
            title: prompt.title.clone(),
            buttons: prompt.buttons.clone(),
            source: prompt.source,
        }
    }
}

/// Generic "pick option 0 to N-1" interface
///
/// The engine validates the returned index; an out-of-range answer aborts
/// `Engine::run_with` with an error.
pub trait DecisionMaker {
    fn player_id(&self) -> PlayerId;

    fn make_choice(&mut self, view: &GameStateView, prompt: &PromptView) -> usize;
}

/// Always picks the first button (accepts every offer)
pub struct ZeroController {
    player_id: PlayerId,
}

impl ZeroController {
    pub fn new(player_id: PlayerId) -> Self {
        ZeroController { player_id }
    }
}

impl DecisionMaker for ZeroController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn make_choice(&mut self, _view: &GameStateView, _prompt: &PromptView) -> usize {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardType;

    #[test]
    fn test_view_reads_player_zones() {
        let mut game = GameState::new_two_player("Alice", "Bob", 7);
        let alice = game.players[0].id;
        let card = game.create_card(alice, "Cheatin' Varmint", CardType::Action, Location::Hand);

        let view = GameStateView::new(&game, alice);
        assert_eq!(view.ghost_rock(), 7);
        assert_eq!(view.hand(), &[card]);
        assert_eq!(view.card_title(card), Some("Cheatin' Varmint"));
        assert!(view.is_active_player());
        assert!(view.cards_in_play().is_empty());
    }

    #[test]
    fn test_zero_controller_picks_first() {
        let game = GameState::new_two_player("Alice", "Bob", 0);
        let alice = game.players[0].id;
        let mut controller = ZeroController::new(alice);
        let prompt = PromptView {
            title: "Trigger?".to_string(),
            buttons: vec!["Yes".to_string(), "No".to_string()],
            source: None,
        };
        assert_eq!(controller.make_choice(&GameStateView::new(&game, alice), &prompt), 0);
    }
}
