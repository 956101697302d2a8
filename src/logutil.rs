//! Logging helpers for chat lines and store names.
//!
//! Chat input is operator-typed free text; escape it before it reaches a log line so one
//! message always stays one line.

use std::fmt::Write;

/// Default cap on how many characters of a chat line end up in the log.
pub const MAX_PREVIEW: usize = 200;

/// Escape control characters and cap the length at [MAX_PREVIEW].
pub fn escape_log(s: &str) -> String {
    escape_log_limited(s, MAX_PREVIEW)
}

/// Escape `\n`, `\r`, `\t`, backslash and other control characters (as `\xNN`),
/// truncating with an ellipsis after `limit` characters.
pub fn escape_log_limited(s: &str, limit: usize) -> String {
    let mut out = String::with_capacity(s.len().min(limit) + 4);
    for (i, ch) in s.chars().enumerate() {
        if i >= limit {
            out.push('…');
            break;
        }
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => {
                let _ = write!(out, "\\x{:02X}", c as u32);
            }
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_control_characters() {
        assert_eq!(escape_log("!set a\nb"), "!set a\\nb");
        assert_eq!(escape_log("tab\there"), "tab\\there");
        assert_eq!(escape_log("\u{7}"), "\\x07");
    }

    #[test]
    fn truncates_long_lines() {
        assert_eq!(escape_log_limited("abcdef", 3), "abc…");
        assert_eq!(escape_log_limited("abc", 3), "abc");
    }
}
