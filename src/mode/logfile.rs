//! Highlight rules for application server log files.

use super::{HighlightRules, Rule, RuleSet, START};

/// Rules of the `ace/mode/logfile` mode.
///
/// Token kinds: `stacktrace`, `caused-by`, `timestamp`, `category`,
/// `level-trace` .. `level-fatal`, `exception`, `thread`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFileHighlightRules;

const RULES: &[Rule] = &[
    // `    at org.foo.Bar.baz(Bar.java:42)`
    Rule::new("stacktrace", r"^\s+at\s.*$"),
    Rule::new("caused-by", r"^Caused by:"),
    // `2024-01-01 10:00:00,000`, `10:00:00.000`
    Rule::new(
        "timestamp",
        r"\b(?:\d{4}-\d{2}-\d{2}[ T])?\d{2}:\d{2}:\d{2}[,.]\d{3}\b",
    ),
    Rule::new("category", r"\[[^\]\s]+\]"),
    Rule::new("level-trace", r"\bTRACE\b"),
    Rule::new("level-debug", r"\bDEBUG\b"),
    Rule::new("level-info", r"\bINFO\b"),
    Rule::new("level-warn", r"\bWARN(?:ING)?\b"),
    Rule::new("level-error", r"\bERROR\b"),
    Rule::new("level-fatal", r"\bFATAL\b"),
    Rule::new(
        "exception",
        r"\b(?:[A-Za-z_$][\w$]*\.)*[A-Z][\w$]*(?:Exception|Error)\b",
    ),
    Rule::new("thread", r"\([^()]*\)"),
];

impl HighlightRules for LogFileHighlightRules {
    fn rules(&self) -> RuleSet {
        RuleSet::new().state(START, RULES.to_vec())
    }
}

#[cfg(test)]
impl LogFileHighlightRules {
    /// Every token kind the mode can emit, in rule order.
    pub fn token_kinds() -> impl Iterator<Item = &'static str> {
        RULES.iter().map(|r| r.token)
    }
}
