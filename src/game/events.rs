//! Game events
//!
//! Events are immutable once raised: they are shared behind an `Rc` between
//! the event step, the trigger window and every context created from it.

use crate::core::{AbilityId, CardId, PlayerId};
use crate::game::{Phase, PlayWindow};
use crate::zones::Location;
use serde::{Deserialize, Serialize};

/// Names abilities subscribe to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventName {
    BeginRound,
    PhaseStarted,
    PhaseEnded,
    PlayWindowOpened,
    PlayWindowClosed,
    DrawHandsRevealed,
    AbilityResolved,
    CardEnteredPlay,
    CardLeftPlay,
    ShootoutFinished,
}

/// Event payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventData {
    BeginRound {
        round: u32,
    },
    PhaseStarted {
        phase: Phase,
    },
    PhaseEnded {
        phase: Phase,
    },
    PlayWindowOpened {
        window: PlayWindow,
    },
    PlayWindowClosed {
        window: PlayWindow,
    },
    DrawHandsRevealed {
        /// Revealed for a shootout rather than lowball
        shootout: bool,
    },
    AbilityResolved {
        ability: AbilityId,
        source: CardId,
        player: PlayerId,
    },
    CardEnteredPlay {
        card: CardId,
        from: Location,
    },
    CardLeftPlay {
        card: CardId,
        to: Location,
    },
    ShootoutFinished,
}

impl EventData {
    pub fn name(&self) -> EventName {
        match self {
            EventData::BeginRound { .. } => EventName::BeginRound,
            EventData::PhaseStarted { .. } => EventName::PhaseStarted,
            EventData::PhaseEnded { .. } => EventName::PhaseEnded,
            EventData::PlayWindowOpened { .. } => EventName::PlayWindowOpened,
            EventData::PlayWindowClosed { .. } => EventName::PlayWindowClosed,
            EventData::DrawHandsRevealed { .. } => EventName::DrawHandsRevealed,
            EventData::AbilityResolved { .. } => EventName::AbilityResolved,
            EventData::CardEnteredPlay { .. } => EventName::CardEnteredPlay,
            EventData::CardLeftPlay { .. } => EventName::CardLeftPlay,
            EventData::ShootoutFinished => EventName::ShootoutFinished,
        }
    }
}

/// A fired event, ordered by the timestamp the game assigned when raising it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameEvent {
    pub timestamp: u64,
    pub data: EventData,
}

impl GameEvent {
    pub fn new(timestamp: u64, data: EventData) -> Self {
        GameEvent { timestamp, data }
    }

    pub fn name(&self) -> EventName {
        self.data.name()
    }

    pub fn play_window(&self) -> Option<PlayWindow> {
        match self.data {
            EventData::PlayWindowOpened { window } | EventData::PlayWindowClosed { window } => {
                Some(window)
            }
            _ => None,
        }
    }

    /// Card the event is about, if any
    pub fn card(&self) -> Option<CardId> {
        match self.data {
            EventData::AbilityResolved { source, .. } => Some(source),
            EventData::CardEnteredPlay { card, .. } | EventData::CardLeftPlay { card, .. } => {
                Some(card)
            }
            _ => None,
        }
    }
}
