//! Operator command console over chat.
//!
//! Each chat line is parsed by [ConsoleCommandParser] and executed against a
//! [StoreRegistry]. Every outcome, including failures, becomes plain broadcast text; nothing
//! here is fatal. The bulk wipe is gated by a two-step confirmation owned by the console:
//!
//! ```text
//! Idle --(deleteStores)--> Armed --(deleteStoresConfirm)--> Idle   (wipes everything)
//! ```
//!
//! An armed confirmation never expires unless a timeout is configured, and other commands
//! do not disarm it.

pub mod parser;

use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::logutil::escape_log;
use crate::store::{PropertyAdapter, StoreError, StoreRegistry, StoreValue};

pub use parser::{ConsoleCommand, ConsoleCommandParser, ALLOWED_PREFIXES, DEFAULT_PREFIX};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmState {
    Idle,
    Armed { armed_at: Instant },
}

pub struct CommandConsole {
    parser: ConsoleCommandParser,
    confirm: ConfirmState,
    confirm_timeout: Option<Duration>,
}

impl Default for CommandConsole {
    fn default() -> Self {
        Self::new(ConsoleCommandParser::new())
    }
}

impl CommandConsole {
    pub fn new(parser: ConsoleCommandParser) -> Self {
        Self {
            parser,
            confirm: ConfirmState::Idle,
            confirm_timeout: None,
        }
    }

    /// Let an armed wipe lapse after `timeout`. `None` keeps it armed indefinitely.
    pub fn with_confirm_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.confirm_timeout = timeout;
        self
    }

    pub fn prefix(&self) -> &str {
        self.parser.prefix()
    }

    /// Whether a `deleteStoresConfirm` sent now would be honored.
    pub fn is_armed(&self) -> bool {
        match self.confirm {
            ConfirmState::Idle => false,
            ConfirmState::Armed { armed_at } => match self.confirm_timeout {
                Some(timeout) => armed_at.elapsed() < timeout,
                None => true,
            },
        }
    }

    /// Execute one chat line. Returns the lines to broadcast; empty when the line is not
    /// a console command or the command has nothing to say.
    pub fn handle<A: PropertyAdapter>(
        &mut self,
        registry: &mut StoreRegistry<A>,
        line: &str,
    ) -> Vec<String> {
        let command = self.parser.parse(line);
        if command != ConsoleCommand::Unknown {
            info!("console: {}", escape_log(line));
        }
        match command {
            ConsoleCommand::Unknown => Vec::new(),
            ConsoleCommand::Invalid(usage) => vec![usage],
            ConsoleCommand::Get(name) => vec![self.get(registry, &name)],
            ConsoleCommand::Set { name, value, .. } => vec![self.set(registry, &name, &value)],
            ConsoleCommand::ListStores => self.list_stores(registry),
            ConsoleCommand::DeleteStores => self.arm_delete(),
            ConsoleCommand::DeleteStoresConfirm => self.confirm_delete(registry),
        }
    }

    fn get<A: PropertyAdapter>(&self, registry: &StoreRegistry<A>, name: &str) -> String {
        match registry.get(name) {
            Ok(value) => format!("{}: {}", name, format_value(&value)),
            Err(e) => e.to_string(),
        }
    }

    fn set<A: PropertyAdapter>(
        &self,
        registry: &mut StoreRegistry<A>,
        name: &str,
        literal: &str,
    ) -> String {
        let Some(desc) = registry.descriptor(name) else {
            return StoreError::UndefinedStore(name.to_string()).to_string();
        };
        let expected = desc.declared_type;
        let Some(value) = StoreValue::parse_as(expected, literal) else {
            return StoreError::UnparsableLiteral {
                literal: literal.to_string(),
                expected,
            }
            .to_string();
        };
        let shown = format_value(&value);
        match registry.set(name, value) {
            Ok(()) => format!("Set {} to {}", name, shown),
            Err(e) => e.to_string(),
        }
    }

    fn list_stores<A: PropertyAdapter>(&self, registry: &StoreRegistry<A>) -> Vec<String> {
        let stores = registry.get_stores();
        if stores.is_empty() {
            return vec!["No stores registered.".to_string()];
        }
        stores
            .iter()
            .map(|d| format!("{} is {}", d.name, d.declared_type))
            .collect()
    }

    fn arm_delete(&mut self) -> Vec<String> {
        self.confirm = ConfirmState::Armed {
            armed_at: Instant::now(),
        };
        warn!(target: "security", "bulk store deletion armed");
        vec![
            "WARNING: this deletes ALL saved world data, including level progress.".to_string(),
            format!(
                "WARNING: send {}deleteStoresConfirm to continue. This cannot be undone.",
                self.parser.prefix()
            ),
        ]
    }

    fn confirm_delete<A: PropertyAdapter>(&mut self, registry: &mut StoreRegistry<A>) -> Vec<String> {
        if !self.is_armed() {
            debug!("deleteStoresConfirm ignored: no pending deletion");
            self.confirm = ConfirmState::Idle;
            return Vec::new();
        }
        self.confirm = ConfirmState::Idle;
        match registry.clear_all() {
            Ok(()) => {
                warn!(target: "security", "all world properties deleted by console");
                vec!["All stores deleted.".to_string()]
            }
            Err(e) => {
                warn!("bulk deletion failed: {}", e);
                vec![format!("Delete failed: {}", e)]
            }
        }
    }
}

/// Render a value for chat: strings quoted so an empty string is visible.
pub fn format_value(value: &StoreValue) -> String {
    match value {
        StoreValue::String(s) => format!("\"{}\"", s),
        other => other.to_string(),
    }
}
