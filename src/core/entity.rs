//! Game entity system with simple integer IDs

use crate::Result;
use crate::RulesError;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Simple integer ID for game entities, tagged with the entity type
///
/// Keeps IDs simple and contiguous for human readability and dense storage,
/// while the type parameter stops a card id from being passed where a player
/// id is expected.
pub struct EntityId<T> {
    raw: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> EntityId<T> {
    pub const fn new(raw: u32) -> Self {
        EntityId {
            raw,
            _marker: PhantomData,
        }
    }

    pub fn as_u32(&self) -> u32 {
        self.raw
    }
}

impl<T> Clone for EntityId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for EntityId<T> {}

impl<T> PartialEq for EntityId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl<T> Eq for EntityId<T> {}

impl<T> PartialOrd for EntityId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for EntityId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.raw.cmp(&other.raw)
    }
}

impl<T> Hash for EntityId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.raw.hash(state);
    }
}

impl<T> fmt::Debug for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.raw)
    }
}

impl<T> fmt::Display for EntityId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl<T> Serialize for EntityId<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.raw)
    }
}

impl<'de, T> Deserialize<'de> for EntityId<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        u32::deserialize(deserializer).map(EntityId::new)
    }
}

/// Base trait for all named game entities
pub trait GameEntity<T> {
    fn id(&self) -> EntityId<T>;
    fn name(&self) -> &str;
}

/// Central storage for all game entities of one kind
///
/// Provides fast lookup by EntityId. Uses FxHashMap for fast hashing of
/// integer keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore<T> {
    entities: FxHashMap<EntityId<T>, T>,
}

impl<T> EntityStore<T> {
    pub fn new() -> Self {
        EntityStore {
            entities: FxHashMap::default(),
        }
    }

    pub fn insert(&mut self, id: EntityId<T>, entity: T) {
        self.entities.insert(id, entity);
    }

    pub fn get(&self, id: EntityId<T>) -> Result<&T> {
        self.entities
            .get(&id)
            .ok_or(RulesError::EntityNotFound(id.as_u32()))
    }

    pub fn get_mut(&mut self, id: EntityId<T>) -> Result<&mut T> {
        self.entities
            .get_mut(&id)
            .ok_or(RulesError::EntityNotFound(id.as_u32()))
    }

    pub fn contains(&self, id: EntityId<T>) -> bool {
        self.entities.contains_key(&id)
    }

    /// Remove an entity (rarely used - entities typically persist)
    pub fn remove(&mut self, id: EntityId<T>) -> Option<T> {
        self.entities.remove(&id)
    }

    /// Iterate over all entities (unordered)
    pub fn iter(&self) -> impl Iterator<Item = (&EntityId<T>, &T)> {
        self.entities.iter()
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}

impl<T> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct TestEntity {
        id: EntityId<TestEntity>,
        name: String,
    }

    impl GameEntity<TestEntity> for TestEntity {
        fn id(&self) -> EntityId<TestEntity> {
            self.id
        }

        fn name(&self) -> &str {
            &self.name
        }
    }

    #[test]
    fn test_entity_store() {
        let mut store = EntityStore::new();
        let id1 = EntityId::new(0);
        let id2 = EntityId::new(1);

        store.insert(
            id1,
            TestEntity {
                id: id1,
                name: "Test1".to_string(),
            },
        );
        store.insert(
            id2,
            TestEntity {
                id: id2,
                name: "Test2".to_string(),
            },
        );

        assert_eq!(store.len(), 2);
        assert_eq!(store.get(id1).unwrap().name(), "Test1");
        assert_eq!(store.get(id2).unwrap().id(), id2);
        assert!(store.get(EntityId::new(999)).is_err());
    }

    #[test]
    fn test_ids_order_by_raw_value() {
        let a: EntityId<TestEntity> = EntityId::new(3);
        let b: EntityId<TestEntity> = EntityId::new(7);
        assert!(a < b);
        assert_eq!(format!("{a:?}"), "#3");
        assert_eq!(serde_json::to_string(&b).unwrap(), "7");
    }
}
