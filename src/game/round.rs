//! Round phases, play windows and round-scoped flags

use crate::core::PlayerId;
use serde::{Deserialize, Serialize};

/// Phases of a Doomtown round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Gamblin,
    Upkeep,
    HighNoon,
    Sundown,
}

impl Phase {
    /// Get the next phase in round order
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::Gamblin => Some(Phase::Upkeep),
            Phase::Upkeep => Some(Phase::HighNoon),
            Phase::HighNoon => Some(Phase::Sundown),
            Phase::Sundown => None, // End of round
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Gamblin => "gamblin'",
            Phase::Upkeep => "upkeep",
            Phase::HighNoon => "high noon",
            Phase::Sundown => "sundown",
        }
    }
}

/// Play windows in which actions can be used
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayWindow {
    /// Noon plays during high noon
    Noon,
    /// Shootout plays between draw hands being revealed and resolution
    ShootoutPlays,
    /// Resolution plays after draw hands are revealed
    Resolution,
}

/// Round-scoped state owned by the game, reset on the round-begin transition
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoundState {
    pub round_number: u32,

    pub phase: Phase,

    /// Currently open play window, if any
    pub play_window: Option<PlayWindow>,

    /// Player who acts first this round (winner of lowball)
    pub active_player: PlayerId,

    /// A headline action has already been played this round
    pub headline_used: bool,
}

impl RoundState {
    pub fn new(active_player: PlayerId) -> Self {
        RoundState {
            round_number: 0,
            phase: Phase::Gamblin,
            play_window: None,
            active_player,
            headline_used: false,
        }
    }

    /// Start the next round: clear round flags and go back to gamblin'
    pub fn begin_round(&mut self) -> u32 {
        self.round_number += 1;
        self.phase = Phase::Gamblin;
        self.play_window = None;
        self.headline_used = false;
        self.round_number
    }

    /// Advance to the next phase; returns false at the end of the round
    pub fn advance_phase(&mut self) -> bool {
        match self.phase.next() {
            Some(next) => {
                self.phase = next;
                self.play_window = None;
                true
            }
            None => false,
        }
    }

    pub fn is_window_open(&self, window: PlayWindow) -> bool {
        self.play_window == Some(window)
    }
}
