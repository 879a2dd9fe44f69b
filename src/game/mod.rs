//! Rules resolution: board state, events, the step queue and the engine

pub mod controller;
mod engine;
pub mod events;
pub mod legality;
pub mod logger;
pub mod message;
pub mod queue;
pub mod random_controller;
pub mod registrar;
mod resolver;
pub mod round;
pub mod scripted_controller;
pub mod shootout;
pub mod state;
mod triggers;

pub use controller::{DecisionMaker, GameStateView, PromptView, ZeroController};
pub use engine::{Engine, MenuItem};
pub use events::{EventData, EventName, GameEvent};
pub use legality::Illegal;
pub use logger::{GameLogger, LogEntry, OutputFormat, OutputMode, VerbosityLevel};
pub use message::MessageArg;
pub use queue::{
    AnswerFn, GameStep, Prompt, QueueStatus, ResolutionStage, StepFn, StepId, StepKind, StepQueue,
};
pub use random_controller::RandomController;
pub use registrar::{EventRegistrar, Listener, Subscription, SubscriptionId};
pub use round::{Phase, PlayWindow, RoundState};
pub use scripted_controller::ScriptedController;
pub use shootout::{Posse, Shootout};
pub use state::GameState;
pub use triggers::{TriggerCandidate, TriggerWindow};
