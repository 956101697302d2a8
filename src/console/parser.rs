//! Operator chat command parser.
//!
//! Commands are recognized only when the line starts with the configured prefix (`!` by
//! default) so normal chat never triggers them. The first whitespace-delimited token is the
//! command, the rest are positional arguments. Command names match case-insensitively.
use log::trace;

/// Prefixes an operator may configure. Anything else falls back to [DEFAULT_PREFIX].
pub const ALLOWED_PREFIXES: &[&str] = &["!", "^", "/", "$", "+", ">"];
pub const DEFAULT_PREFIX: &str = "!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleCommand {
    Get(String),
    Set {
        name: String,
        value: String,
        /// Accepted for compatibility; the registered type decides coercion.
        type_hint: Option<String>,
    },
    ListStores,
    DeleteStores,
    DeleteStoresConfirm,
    /// A known command with the wrong arguments; carries the usage line.
    Invalid(String),
    Unknown,
}

pub struct ConsoleCommandParser {
    prefix: String,
}

impl ConsoleCommandParser {
    pub fn new() -> Self {
        Self {
            prefix: DEFAULT_PREFIX.to_string(),
        }
    }

    pub fn new_with_prefix(prefix: Option<&str>) -> Self {
        let prefix = match prefix {
            Some(p) if ALLOWED_PREFIXES.contains(&p) => p.to_string(),
            _ => DEFAULT_PREFIX.to_string(),
        };
        Self { prefix }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn parse(&self, raw: &str) -> ConsoleCommand {
        let trimmed = raw.trim();
        let Some(body) = trimmed.strip_prefix(self.prefix.as_str()) else {
            return ConsoleCommand::Unknown;
        };
        let mut tokens = body.split_whitespace();
        let Some(cmd) = tokens.next() else {
            return ConsoleCommand::Unknown;
        };
        let args: Vec<&str> = tokens.collect();

        if cmd.eq_ignore_ascii_case("get") {
            return match args.as_slice() {
                [name] => {
                    trace!("Parsed GET '{}'", name);
                    ConsoleCommand::Get(name.to_string())
                }
                _ => ConsoleCommand::Invalid(format!("Usage: {}get <name>", self.prefix)),
            };
        }
        if cmd.eq_ignore_ascii_case("set") {
            return match args.as_slice() {
                [name, value] | [name, value, _] => {
                    trace!("Parsed SET '{}'", name);
                    ConsoleCommand::Set {
                        name: name.to_string(),
                        value: value.to_string(),
                        type_hint: args.get(2).map(|s| s.to_string()),
                    }
                }
                _ => ConsoleCommand::Invalid(format!(
                    "Usage: {}set <name> <value> [type]",
                    self.prefix
                )),
            };
        }
        // Confirm must be tested before the bare delete command.
        if cmd.eq_ignore_ascii_case("deleteStoresConfirm") {
            return ConsoleCommand::DeleteStoresConfirm;
        }
        if cmd.eq_ignore_ascii_case("deleteStores") {
            return ConsoleCommand::DeleteStores;
        }
        if cmd
            .get(..10)
            .map(|head| head.eq_ignore_ascii_case("listStores"))
            .unwrap_or(false)
        {
            return ConsoleCommand::ListStores;
        }
        ConsoleCommand::Unknown
    }
}

impl Default for ConsoleCommandParser {
    fn default() -> Self {
        Self::new()
    }
}
