//! Event subscriptions per ability
//!
//! Every subscription returns a [`SubscriptionId`] token. Unregistering by
//! token is O(1) and idempotent; an ability keeps its own token list so the
//! card lifecycle can drop all of them at once.

use crate::core::AbilityId;
use crate::game::EventName;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Token returned when subscribing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// What the engine does for an ability when the event fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Listener {
    /// Collect the ability into the event's trigger window
    Trigger,
    /// Reset the ability's usage counter
    ResetUsage,
    /// Forget the ability's stack of deactivatable contexts
    ClearActivations,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub ability: AbilityId,
    pub event: EventName,
    pub listener: Listener,
}

#[derive(Debug, Clone, Default)]
pub struct EventRegistrar {
    next_id: u64,
    subscriptions: FxHashMap<SubscriptionId, Subscription>,
    by_ability: FxHashMap<AbilityId, SmallVec<[SubscriptionId; 4]>>,
}

impl EventRegistrar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        ability: AbilityId,
        event: EventName,
        listener: Listener,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.insert(
            id,
            Subscription {
                id,
                ability,
                event,
                listener,
            },
        );
        self.by_ability.entry(ability).or_default().push(id);
        id
    }

    /// Drop one subscription; false if it was already gone
    pub fn unregister(&mut self, id: SubscriptionId) -> bool {
        match self.subscriptions.remove(&id) {
            Some(subscription) => {
                if let Some(ids) = self.by_ability.get_mut(&subscription.ability) {
                    ids.retain(|other| *other != id);
                    if ids.is_empty() {
                        self.by_ability.remove(&subscription.ability);
                    }
                }
                true
            }
            None => false,
        }
    }

    /// Drop every subscription held by an ability; returns how many were dropped
    pub fn unregister_all(&mut self, ability: AbilityId) -> usize {
        let ids = self.by_ability.remove(&ability).unwrap_or_default();
        ids.iter()
            .filter(|id| self.subscriptions.remove(id).is_some())
            .count()
    }

    pub fn is_registered(&self, ability: AbilityId) -> bool {
        self.by_ability.contains_key(&ability)
    }

    /// Subscriptions for an event in registration order
    pub fn listeners_for(&self, event: EventName) -> Vec<Subscription> {
        let mut listeners: Vec<Subscription> = self
            .subscriptions
            .values()
            .filter(|subscription| subscription.event == event)
            .copied()
            .collect();
        listeners.sort_by_key(|subscription| subscription.id);
        listeners
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}
