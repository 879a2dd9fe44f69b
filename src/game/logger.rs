//! Bump-allocating game logger
//!
//! Entries are owned strings; the bump arena is only used for temporary
//! template formatting and is reset after every render. Captured entries
//! carry a category: `message` for player-visible template output, `choice`
//! for prompt answers and `engine` for internal tracing.

use bumpalo::Bump;
use serde::{Deserialize, Serialize};
use std::cell::{Ref, RefCell};
use std::ops::Deref;
use std::str::FromStr;

pub const CATEGORY_MESSAGE: &str = "message";
pub const CATEGORY_CHOICE: &str = "choice";
pub const CATEGORY_ENGINE: &str = "engine";

/// Verbosity level for game output
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum VerbosityLevel {
    /// Silent - no output during game
    Silent = 0,
    /// Minimal - only round boundaries
    Minimal = 1,
    /// Normal - game messages and choices (default)
    #[default]
    Normal = 2,
    /// Verbose - steps, trigger windows and legality skips
    Verbose = 3,
}

impl FromStr for VerbosityLevel {
    type Err = String;

    /// Accepts a level name or its number
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityLevel::Silent),
            "minimal" | "1" => Ok(VerbosityLevel::Minimal),
            "normal" | "2" => Ok(VerbosityLevel::Normal),
            "verbose" | "3" => Ok(VerbosityLevel::Verbose),
            other => Err(format!("unknown verbosity level: {other}")),
        }
    }
}

/// Output format for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// Machine-readable JSON output (one object per line)
    Json,
}

/// Output destination for log messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OutputMode {
    /// Output only to stdout (default)
    #[default]
    Stdout,
    /// Capture only to in-memory buffer (no stdout)
    Memory,
    /// Both stdout and in-memory buffer
    Both,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: VerbosityLevel,
    pub message: String,
    pub category: Option<String>,
}

/// Read-only access to captured entries
pub struct LogGuard<'a> {
    guard: Ref<'a, Vec<LogEntry>>,
}

impl<'a> LogGuard<'a> {
    pub fn iter(&self) -> std::slice::Iter<'_, LogEntry> {
        self.guard.iter()
    }

    pub fn len(&self) -> usize {
        self.guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard.is_empty()
    }
}

impl<'a> Deref for LogGuard<'a> {
    type Target = [LogEntry];

    fn deref(&self) -> &Self::Target {
        &self.guard
    }
}

pub struct GameLogger {
    verbosity: VerbosityLevel,
    output_format: OutputFormat,
    output_mode: OutputMode,

    /// Bump allocator for temporary template formatting
    format_bump: RefCell<Bump>,

    log_buffer: RefCell<Vec<LogEntry>>,
}

impl GameLogger {
    pub fn new() -> Self {
        Self::with_verbosity(VerbosityLevel::default())
    }

    pub fn with_verbosity(verbosity: VerbosityLevel) -> Self {
        GameLogger {
            verbosity,
            output_format: OutputFormat::default(),
            output_mode: OutputMode::default(),
            format_bump: RefCell::new(Bump::new()),
            log_buffer: RefCell::new(Vec::new()),
        }
    }

    pub fn set_output_mode(&mut self, mode: OutputMode) {
        self.output_mode = mode;
    }

    pub fn output_mode(&self) -> OutputMode {
        self.output_mode
    }

    /// Capture to memory only (suppresses stdout)
    pub fn enable_capture(&mut self) {
        self.output_mode = OutputMode::Memory;
    }

    pub fn disable_capture(&mut self) {
        self.output_mode = OutputMode::Stdout;
    }

    pub fn is_capturing(&self) -> bool {
        matches!(self.output_mode, OutputMode::Memory | OutputMode::Both)
    }

    pub fn set_output_format(&mut self, format: OutputFormat) {
        self.output_format = format;
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format
    }

    pub fn verbosity(&self) -> VerbosityLevel {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: VerbosityLevel) {
        self.verbosity = verbosity;
    }

    pub fn logs(&self) -> LogGuard<'_> {
        LogGuard {
            guard: self.log_buffer.borrow(),
        }
    }

    /// Captured player-visible messages in order
    pub fn messages(&self) -> Vec<String> {
        self.log_buffer
            .borrow()
            .iter()
            .filter(|entry| entry.category.as_deref() == Some(CATEGORY_MESSAGE))
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn clear_logs(&mut self) {
        self.log_buffer.borrow_mut().clear();
        self.format_bump.borrow_mut().reset();
    }

    /// Print buffered entries allowed by the verbosity, then clear the buffer
    pub fn flush_buffer(&mut self) {
        let buffer = self.log_buffer.borrow();
        for entry in buffer.iter() {
            if entry.level <= self.verbosity {
                self.write_stdout(entry);
            }
        }
        drop(buffer);
        self.clear_logs();
    }

    /// Run a formatting closure against the scratch arena, then reset it
    pub fn with_format_arena<R>(&self, f: impl FnOnce(&Bump) -> R) -> R {
        let mut bump = self.format_bump.borrow_mut();
        let result = f(&bump);
        bump.reset();
        result
    }

    fn write_stdout(&self, entry: &LogEntry) {
        match self.output_format {
            OutputFormat::Text => {
                if entry.level == VerbosityLevel::Minimal {
                    println!("{}", entry.message);
                } else {
                    println!("  {}", entry.message);
                }
            }
            OutputFormat::Json => match serde_json::to_string(entry) {
                Ok(line) => println!("{line}"),
                Err(err) => eprintln!("failed to encode log entry: {err}"),
            },
        }
    }

    fn log(&self, level: VerbosityLevel, category: Option<&str>, message: &str) {
        let should_capture = self.is_capturing();
        let should_output = matches!(self.output_mode, OutputMode::Stdout | OutputMode::Both);

        // Early exit if message won't be used
        if level > self.verbosity && !should_capture {
            return;
        }

        let entry = LogEntry {
            level,
            message: message.to_string(),
            category: category.map(str::to_string),
        };

        if should_output && level <= self.verbosity {
            self.write_stdout(&entry);
        }
        if should_capture {
            self.log_buffer.borrow_mut().push(entry);
        }
    }

    /// Silent messages are never printed or captured
    #[inline]
    pub fn silent(&self, _message: &str) {}

    #[inline]
    pub fn minimal(&self, message: &str) {
        self.log(VerbosityLevel::Minimal, None, message);
    }

    #[inline]
    pub fn normal(&self, message: &str) {
        self.log(VerbosityLevel::Normal, None, message);
    }

    #[inline]
    pub fn verbose(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, None, message);
    }

    /// Player-visible game message
    pub fn message(&self, message: &str) {
        self.log(VerbosityLevel::Normal, Some(CATEGORY_MESSAGE), message);
    }

    /// Prompt answer, in a controller-independent format
    pub fn choice(&self, player: &str, message: &str) {
        let formatted = format!("{player} chose {message}");
        self.log(VerbosityLevel::Normal, Some(CATEGORY_CHOICE), &formatted);
    }

    /// Internal tracing of steps, windows and legality skips
    pub fn engine(&self, message: &str) {
        self.log(VerbosityLevel::Verbose, Some(CATEGORY_ENGINE), message);
    }
}

impl Default for GameLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GameLogger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameLogger")
            .field("verbosity", &self.verbosity)
            .field("output_mode", &self.output_mode)
            .field("log_count", &self.log_buffer.borrow().len())
            .finish()
    }
}

/// Clones carry settings only, never captured entries
impl Clone for GameLogger {
    fn clone(&self) -> Self {
        GameLogger {
            verbosity: self.verbosity,
            output_format: self.output_format,
            output_mode: self.output_mode,
            format_bump: RefCell::new(Bump::new()),
            log_buffer: RefCell::new(Vec::new()),
        }
    }
}

impl Serialize for GameLogger {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        use serde::ser::SerializeStruct;
        let mut state = serializer.serialize_struct("GameLogger", 3)?;
        state.serialize_field("verbosity", &self.verbosity)?;
        state.serialize_field("output_format", &self.output_format)?;
        state.serialize_field("output_mode", &self.output_mode)?;
        state.end()
    }
}

impl<'de> Deserialize<'de> for GameLogger {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct GameLoggerData {
            verbosity: VerbosityLevel,
            output_format: OutputFormat,
            output_mode: OutputMode,
        }

        let data = GameLoggerData::deserialize(deserializer)?;
        let mut logger = GameLogger::with_verbosity(data.verbosity);
        logger.output_format = data.output_format;
        logger.output_mode = data.output_mode;
        Ok(logger)
    }
}
