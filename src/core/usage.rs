//! Per-ability activation counters
//!
//! A limited ability gets a tracker entry when its events are registered and
//! loses it when they are unregistered. Counters only go up through
//! `increment` and only go back to zero through the period's reset event.

use crate::core::AbilityId;
use crate::game::EventName;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// When a limited ability's counter goes back to zero
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LimitPeriod {
    Round,
    Shootout,
}

impl LimitPeriod {
    pub fn reset_event(&self) -> EventName {
        match self {
            LimitPeriod::Round => EventName::BeginRound,
            LimitPeriod::Shootout => EventName::ShootoutFinished,
        }
    }
}

/// Maximum number of resolutions per period
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AbilityLimit {
    pub max: u32,
    pub period: LimitPeriod,
}

impl AbilityLimit {
    pub fn per_round(max: u32) -> Self {
        AbilityLimit {
            max,
            period: LimitPeriod::Round,
        }
    }

    pub fn per_shootout(max: u32) -> Self {
        AbilityLimit {
            max,
            period: LimitPeriod::Shootout,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AbilityUsage {
    limit: AbilityLimit,
    count: u32,
}

impl AbilityUsage {
    pub fn new(limit: AbilityLimit) -> Self {
        AbilityUsage { limit, count: 0 }
    }

    pub fn is_used(&self) -> bool {
        self.count >= self.limit.max
    }

    pub fn increment(&mut self) {
        self.count += 1;
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn limit(&self) -> AbilityLimit {
        self.limit
    }
}

/// Usage counters for every registered, limited ability
#[derive(Debug, Clone, Default)]
pub struct UsageTracker {
    entries: FxHashMap<AbilityId, AbilityUsage>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an ability; an existing counter is kept as is
    pub fn track(&mut self, ability: AbilityId, limit: AbilityLimit) {
        self.entries
            .entry(ability)
            .or_insert_with(|| AbilityUsage::new(limit));
    }

    pub fn untrack(&mut self, ability: AbilityId) -> bool {
        self.entries.remove(&ability).is_some()
    }

    pub fn is_tracked(&self, ability: AbilityId) -> bool {
        self.entries.contains_key(&ability)
    }

    /// Unlimited (untracked) abilities are never used up
    pub fn is_used(&self, ability: AbilityId) -> bool {
        self.entries.get(&ability).is_some_and(AbilityUsage::is_used)
    }

    pub fn increment(&mut self, ability: AbilityId) {
        if let Some(usage) = self.entries.get_mut(&ability) {
            usage.increment();
        }
    }

    pub fn reset(&mut self, ability: AbilityId) {
        if let Some(usage) = self.entries.get_mut(&ability) {
            usage.reset();
        }
    }

    pub fn count(&self, ability: AbilityId) -> Option<u32> {
        self.entries.get(&ability).map(AbilityUsage::count)
    }
}
