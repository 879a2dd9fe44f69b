//! Core rules types: entities, cards, players, costs and abilities

pub mod ability;
pub mod card;
pub mod context;
pub mod costs;
pub mod entity;
pub mod player;
pub mod types;
pub mod usage;

pub use ability::{
    Ability, AbilityBuilder, AbilityKind, CardFilter, Condition, EventCondition, Handler,
    MessageArgsFn, PlayType, PlayerFilter, PlayerSelector, TargetKind, TargetSpec, TitleFn,
    DEFAULT_FAIL_MESSAGE,
};
pub use card::{Card, CardType};
pub use context::{AbilityContext, ActivationStage, ChosenTarget};
pub use costs::{can_pay_all, can_unpay_all, pay_all, unpay_all, Cost, CostReceipt};
pub use entity::{EntityId, EntityStore, GameEntity};
pub use player::{Player, TriggerRestriction};
pub use types::{CardTitle, Keyword, PlayerName};
pub use usage::{AbilityLimit, AbilityUsage, LimitPeriod, UsageTracker};

pub type CardId = EntityId<Card>;
pub type PlayerId = EntityId<Player>;
pub type AbilityId = EntityId<Ability>;
pub type ContextId = EntityId<AbilityContext>;
