//! Random decision maker for smoke runs and baseline play
//!
//! Seeded with ChaCha12 so a given seed replays the same answers on every
//! platform.

use crate::core::PlayerId;
use crate::game::controller::{DecisionMaker, GameStateView, PromptView};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha12Rng;

pub struct RandomController {
    player_id: PlayerId,
    rng: ChaCha12Rng,
}

impl RandomController {
    pub fn new(player_id: PlayerId) -> Self {
        RandomController {
            player_id,
            rng: ChaCha12Rng::from_entropy(),
        }
    }

    /// Deterministic controller for tests and replays
    pub fn with_seed(player_id: PlayerId, seed: u64) -> Self {
        RandomController {
            player_id,
            rng: ChaCha12Rng::seed_from_u64(seed),
        }
    }
}

impl DecisionMaker for RandomController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn make_choice(&mut self, _view: &GameStateView, prompt: &PromptView) -> usize {
        if prompt.buttons.len() <= 1 {
            0
        } else {
            self.rng.gen_range(0..prompt.buttons.len())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;

    fn prompt(n: usize) -> PromptView {
        PromptView {
            title: "Pick".to_string(),
            buttons: (0..n).map(|i| format!("option {i}")).collect(),
            source: None,
        }
    }

    #[test]
    fn test_choices_stay_in_range() {
        let game = GameState::new_two_player("Alice", "Bob", 0);
        let alice = game.players[0].id;
        let mut controller = RandomController::with_seed(alice, 42);
        let view = GameStateView::new(&game, alice);
        for n in 1..6 {
            for _ in 0..20 {
                assert!(controller.make_choice(&view, &prompt(n)) < n);
            }
        }
    }

    #[test]
    fn test_same_seed_same_answers() {
        let game = GameState::new_two_player("Alice", "Bob", 0);
        let alice = game.players[0].id;
        let view = GameStateView::new(&game, alice);
        let mut a = RandomController::with_seed(alice, 7);
        let mut b = RandomController::with_seed(alice, 7);
        let left: Vec<_> = (0..16).map(|_| a.make_choice(&view, &prompt(4))).collect();
        let right: Vec<_> = (0..16).map(|_| b.make_choice(&view, &prompt(4))).collect();
        assert_eq!(left, right);
    }
}
