//! Card types and instances

use crate::core::{CardId, CardTitle, GameEntity, Keyword, PlayerId};
use crate::zones::Location;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Printed card types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CardType {
    Dude,
    Deed,
    Goods,
    Spell,
    Action,
    Outfit,
    Joker,
}

impl CardType {
    /// Card types whose abilities are gated on shootout participation
    pub fn is_shootout_participant_type(&self) -> bool {
        matches!(self, CardType::Dude | CardType::Goods | CardType::Spell)
    }

    /// Location a card of this type activates its abilities from by default
    pub fn natural_location(&self) -> Location {
        match self {
            CardType::Action => Location::Hand,
            _ => Location::PlayArea,
        }
    }
}

/// A card instance during play
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,

    pub title: CardTitle,

    pub card_type: CardType,

    pub keywords: SmallVec<[Keyword; 2]>,

    pub owner: PlayerId,

    /// Current controller (can differ from owner)
    pub controller: PlayerId,

    /// Zone the card currently sits in (kept in sync with the zone lists)
    pub location: Location,

    pub booted: bool,

    /// Text blanked by an effect; a blank card cannot use any of its abilities
    pub blank: bool,

    pub influence: i32,

    pub control: i32,

    /// Whether the dude/goods is at the Town Square
    pub in_town_square: bool,
}

impl Card {
    pub fn new(
        id: CardId,
        title: impl Into<CardTitle>,
        card_type: CardType,
        owner: PlayerId,
    ) -> Self {
        Card {
            id,
            title: title.into(),
            card_type,
            keywords: SmallVec::new(),
            owner,
            controller: owner,
            location: Location::DrawDeck,
            booted: false,
            blank: false,
            influence: 0,
            control: 0,
            in_town_square: false,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<Keyword>) -> Self {
        self.keywords.push(keyword.into());
        self
    }

    pub fn has_keyword(&self, keyword: &Keyword) -> bool {
        self.keywords.contains(keyword)
    }

    pub fn is_type(&self, card_type: CardType) -> bool {
        self.card_type == card_type
    }

    pub fn is_any_blank(&self) -> bool {
        self.blank
    }

    pub fn boot(&mut self) {
        self.booted = true;
    }

    pub fn unboot(&mut self) {
        self.booted = false;
    }
}

impl GameEntity<Card> for Card {
    fn id(&self) -> CardId {
        self.id
    }

    fn name(&self) -> &str {
        self.title.as_str()
    }
}
