//! Message templates
//!
//! Templates use positional `{0}`, `{1}` placeholders and named ones such as
//! `{player}`, `{source}` or a target slot name. Unknown placeholders are
//! kept verbatim so a typo in card content shows up in the game log.

use crate::core::{CardId, PlayerId};
use crate::game::GameState;
use bumpalo::collections::String as BumpString;
use serde::{Deserialize, Serialize};
use std::fmt::Write as FmtWrite;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageArg {
    Player(PlayerId),
    Card(CardId),
    Text(String),
    Number(i64),
}

impl MessageArg {
    fn write_to(&self, state: &GameState, out: &mut BumpString<'_>) {
        let _ = match self {
            MessageArg::Player(id) => match state.get_player(*id) {
                Ok(player) => write!(out, "{}", player.name),
                Err(_) => write!(out, "player {id}"),
            },
            MessageArg::Card(id) => match state.cards.get(*id) {
                Ok(card) => write!(out, "{}", card.title),
                Err(_) => write!(out, "card {id}"),
            },
            MessageArg::Text(text) => write!(out, "{text}"),
            MessageArg::Number(n) => write!(out, "{n}"),
        };
    }
}

impl From<PlayerId> for MessageArg {
    fn from(id: PlayerId) -> Self {
        MessageArg::Player(id)
    }
}

impl From<CardId> for MessageArg {
    fn from(id: CardId) -> Self {
        MessageArg::Card(id)
    }
}

impl From<&str> for MessageArg {
    fn from(text: &str) -> Self {
        MessageArg::Text(text.to_string())
    }
}

impl From<i64> for MessageArg {
    fn from(n: i64) -> Self {
        MessageArg::Number(n)
    }
}

/// Render a template against the board
pub fn render(
    state: &GameState,
    template: &str,
    positional: &[MessageArg],
    named: &[(&str, MessageArg)],
) -> String {
    state.logger.with_format_arena(|bump| {
        let mut out = BumpString::with_capacity_in(template.len() + 16, bump);
        let mut rest = template;

        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let Some(close) = after.find('}') else {
                out.push_str(&rest[open..]);
                rest = "";
                break;
            };
            let key = &after[..close];

            let arg = match key.parse::<usize>() {
                Ok(index) => positional.get(index),
                Err(_) => named
                    .iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, arg)| arg),
            };
            match arg {
                Some(arg) => arg.write_to(state, &mut out),
                None => {
                    out.push('{');
                    out.push_str(key);
                    out.push('}');
                }
            }
            rest = &after[close + 1..];
        }
        out.push_str(rest);
        out.as_str().to_owned()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CardType;
    use crate::zones::Location;

    #[test]
    fn test_positional_and_named_placeholders() {
        let mut game = GameState::new_two_player("Alice", "Bob", 0);
        let alice = game.players[0].id;
        let bob = game.players[1].id;
        let card = game.create_card(alice, "Cheatin' Varmint", CardType::Action, Location::Hand);

        let text = render(
            &game,
            "{player} uses {source} to lower {0}'s hand. Current rank is {1}",
            &[MessageArg::Player(bob), MessageArg::Number(3)],
            &[("player", alice.into()), ("source", card.into())],
        );
        assert_eq!(text, "Alice uses Cheatin' Varmint to lower Bob's hand. Current rank is 3");
    }

    #[test]
    fn test_unknown_placeholders_are_kept() {
        let game = GameState::new_two_player("Alice", "Bob", 0);
        assert_eq!(render(&game, "{2} and {who} {", &[], &[]), "{2} and {who} {");
        assert_eq!(render(&game, "no placeholders", &[], &[]), "no placeholders");
    }
}
