//! Game step queue
//!
//! A single-threaded cooperative scheduler. Exactly one step runs at a time.
//! Steps queued while a step runs are collected as its children and are
//! placed, in order, ahead of every older pending step once it finishes. A
//! prompt at the front of the queue halts all progress until it is answered.

use crate::core::{CardId, ContextId, EntityId, PlayerId};
use crate::game::{Engine, GameEvent, TriggerWindow};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

pub type StepId = EntityId<GameStep>;
pub type StepFn = Rc<dyn Fn(&mut Engine) -> Result<()>>;
pub type AnswerFn = Rc<dyn Fn(&mut Engine, usize) -> Result<()>>;

/// Stage of an activation still waiting in the queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionStage {
    PayCosts,
    ChooseTargets,
    Execute,
}

/// A pending decision for one player
#[derive(Clone)]
pub struct Prompt {
    pub player: PlayerId,
    pub title: String,
    pub buttons: Vec<String>,
    pub source: Option<CardId>,
    pub on_answer: AnswerFn,
}

impl fmt::Debug for Prompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Prompt")
            .field("player", &self.player)
            .field("title", &self.title)
            .field("buttons", &self.buttons)
            .field("source", &self.source)
            .finish()
    }
}

#[derive(Clone)]
pub enum StepKind {
    /// Arbitrary engine callback
    Simple { label: String, run: StepFn },
    /// Next stage of an activation
    Resolve {
        context: ContextId,
        stage: ResolutionStage,
    },
    /// Apply an event's mutation and open its trigger window
    Event {
        event: Rc<GameEvent>,
        handler: Option<StepFn>,
    },
    /// Offer the next ability of an open trigger window
    Window(TriggerWindow),
    Prompt(Prompt),
}

impl fmt::Debug for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepKind::Simple { label, .. } => write!(f, "Simple({label})"),
            StepKind::Resolve { context, stage } => write!(f, "Resolve({context:?}, {stage:?})"),
            StepKind::Event { event, .. } => write!(f, "Event({:?})", event.name()),
            StepKind::Window(window) => {
                write!(f, "Window({:?}, {} left)", window.event.name(), window.len())
            }
            StepKind::Prompt(prompt) => write!(f, "Prompt({})", prompt.title),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GameStep {
    pub id: StepId,
    pub kind: StepKind,
}

/// Where the queue stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum QueueStatus {
    Idle,
    AwaitingPrompt { player: PlayerId },
}

#[derive(Debug, Default)]
pub struct StepQueue {
    steps: VecDeque<GameStep>,
    children: Vec<GameStep>,
    executing: bool,
    next_id: u32,
}

impl StepQueue {
    pub fn new() -> Self {
        Self::default()
    }

    fn make_step(&mut self, kind: StepKind) -> GameStep {
        let id = StepId::new(self.next_id);
        self.next_id += 1;
        GameStep { id, kind }
    }

    /// Append a step (after the running step's other children, if any)
    pub fn queue_step(&mut self, kind: StepKind) -> StepId {
        let step = self.make_step(kind);
        let id = step.id;
        if self.executing {
            self.children.push(step);
        } else {
            self.steps.push_back(step);
        }
        id
    }

    /// Put a step ahead of everything not yet started
    pub fn queue_next(&mut self, kind: StepKind) -> StepId {
        let step = self.make_step(kind);
        let id = step.id;
        if self.executing {
            self.children.insert(0, step);
        } else {
            self.steps.push_front(step);
        }
        id
    }

    /// Withdraw a step that has not started; false if it is unknown or already ran
    pub fn cancel_step(&mut self, id: StepId) -> bool {
        if let Some(pos) = self.steps.iter().position(|step| step.id == id) {
            self.steps.remove(pos);
            return true;
        }
        if let Some(pos) = self.children.iter().position(|step| step.id == id) {
            self.children.remove(pos);
            return true;
        }
        false
    }

    pub fn contains(&self, id: StepId) -> bool {
        self.steps.iter().chain(self.children.iter()).any(|step| step.id == id)
    }

    /// Take the front step to run, unless it is a prompt
    pub fn begin(&mut self) -> Option<GameStep> {
        if self.executing || self.front_prompt().is_some() {
            return None;
        }
        let step = self.steps.pop_front()?;
        self.executing = true;
        Some(step)
    }

    /// Take the front prompt to answer it
    pub fn begin_answer(&mut self) -> Option<(StepId, Prompt)> {
        if self.executing {
            return None;
        }
        match self.steps.front() {
            Some(GameStep {
                kind: StepKind::Prompt(_),
                ..
            }) => {}
            _ => return None,
        }
        let step = self.steps.pop_front()?;
        self.executing = true;
        match step.kind {
            StepKind::Prompt(prompt) => Some((step.id, prompt)),
            _ => None,
        }
    }

    /// Mark the running step done and splice its children in front
    pub fn finish(&mut self) {
        self.executing = false;
        for step in self.children.drain(..).rev() {
            self.steps.push_front(step);
        }
    }

    pub fn front_prompt(&self) -> Option<&Prompt> {
        match self.steps.front() {
            Some(GameStep {
                kind: StepKind::Prompt(prompt),
                ..
            }) => Some(prompt),
            _ => None,
        }
    }

    pub fn is_executing(&self) -> bool {
        self.executing
    }

    pub fn len(&self) -> usize {
        self.steps.len() + self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Labels of pending steps, front first
    pub fn describe(&self) -> Vec<String> {
        self.steps.iter().map(|step| format!("{:?}", step.kind)).collect()
    }
}
