//! Strongly-typed wrappers for game concepts
//!
//! Instead of using bare Strings for different concepts, we wrap them in
//! distinct types that cannot be mixed up.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Card title as printed (e.g., "Allie Hensman")
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardTitle(String);

impl CardTitle {
    pub fn new(s: impl Into<String>) -> Self {
        CardTitle(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CardTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for CardTitle {
    fn from(s: String) -> Self {
        CardTitle(s)
    }
}

impl From<&str> for CardTitle {
    fn from(s: &str) -> Self {
        CardTitle(s.to_string())
    }
}

/// Player name (distinct from other string types)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(s: impl Into<String>) -> Self {
        PlayerName(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for PlayerName {
    fn from(s: String) -> Self {
        PlayerName(s)
    }
}

impl From<&str> for PlayerName {
    fn from(s: &str) -> Self {
        PlayerName(s.to_string())
    }
}

/// Card keyword (e.g., "headline", "gadget", "weapon")
///
/// Keywords are compared case-insensitively; they are stored lowercased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Keyword(String);

impl Keyword {
    pub fn new(s: impl AsRef<str>) -> Self {
        Keyword(s.as_ref().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn headline() -> Self {
        Keyword("headline".to_string())
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Keyword {
    fn from(s: &str) -> Self {
        Keyword::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_title() {
        let title = CardTitle::new("Pearly's Palace");
        assert_eq!(title.as_str(), "Pearly's Palace");
        assert_eq!(title.to_string(), "Pearly's Palace");
    }

    #[test]
    fn test_player_name() {
        let name = PlayerName::from("Alice");
        assert_eq!(name.as_str(), "Alice");
    }

    #[test]
    fn test_keyword_is_lowercased() {
        assert_eq!(Keyword::new("Headline"), Keyword::headline());
        assert_eq!(Keyword::from("GADGET").as_str(), "gadget");
    }
}
