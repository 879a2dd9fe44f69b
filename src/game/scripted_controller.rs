//! Scripted decision maker for tests and demos
//!
//! Answers prompts from a fixed list of button indices. Once the script
//! runs out it picks the first button.

use crate::core::PlayerId;
use crate::game::controller::{DecisionMaker, GameStateView, PromptView};
use std::collections::VecDeque;

pub struct ScriptedController {
    player_id: PlayerId,
    script: VecDeque<usize>,
    /// Titles of the prompts answered so far
    seen: Vec<String>,
}

impl ScriptedController {
    pub fn new(player_id: PlayerId, script: impl IntoIterator<Item = usize>) -> Self {
        ScriptedController {
            player_id,
            script: script.into_iter().collect(),
            seen: Vec::new(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }

    pub fn seen_prompts(&self) -> &[String] {
        &self.seen
    }
}

impl DecisionMaker for ScriptedController {
    fn player_id(&self) -> PlayerId {
        self.player_id
    }

    fn make_choice(&mut self, _view: &GameStateView, prompt: &PromptView) -> usize {
        self.seen.push(prompt.title.clone());
        self.script.pop_front().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameState;

    #[test]
    fn test_follows_script_then_defaults() {
        let game = GameState::new_two_player("Alice", "Bob", 0);
        let bob = game.players[1].id;
        let view = GameStateView::new(&game, bob);
        let prompt = PromptView {
            title: "Use Pearly's Palace?".to_string(),
            buttons: vec!["Yes".to_string(), "No".to_string()],
            source: None,
        };

        let mut controller = ScriptedController::new(bob, [1, 0]);
        assert_eq!(controller.make_choice(&view, &prompt), 1);
        assert_eq!(controller.make_choice(&view, &prompt), 0);
        assert_eq!(controller.remaining(), 0);
        assert_eq!(controller.make_choice(&view, &prompt), 0);
        assert_eq!(controller.seen_prompts().len(), 3);
    }
}
