//! Editor modes: lexical rule sets and the tokenizer that runs them.
//!
//! A mode is a set of named states, each an ordered list of rules. At every
//! position of a line the rules of the current state are tried in order and
//! the first one matching there wins; a rule may switch the state for the
//! rest of the line and the following lines.
//!
//! ```text
//! "2024-01-01 10:00:00,000 [org.foo] ERROR Boom"
//!  └──── timestamp ──────┘ └category┘ └─┬─┘
//!                                  level-error
//! ```

mod logfile;
mod tokenizer;

use rustc_hash::FxHashMap;

pub use logfile::LogFileHighlightRules;
pub use tokenizer::Tokenizer;

/// Initial state of every rule set.
pub const START: &str = "start";

/// Kind of characters no rule matched.
pub const TEXT: &str = "text";

/// One lexical rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    /// Token kind emitted on a match.
    pub token: &'static str,
    /// Regular expression matched at the current position.
    pub regex: &'static str,
    /// State to switch to after a match.
    pub next: Option<&'static str>,
}

impl Rule {
    pub const fn new(token: &'static str, regex: &'static str) -> Self {
        Self {
            token,
            regex,
            next: None,
        }
    }

    #[cfg(test)]
    pub const fn next(mut self, state: &'static str) -> Self {
        self.next = Some(state);
        self
    }
}

/// Named states, each holding an ordered rule list.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    states: Vec<(&'static str, Vec<Rule>)>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a state.
    pub fn state(mut self, name: &'static str, rules: Vec<Rule>) -> Self {
        self.states.retain(|(existing, _)| *existing != name);
        self.states.push((name, rules));
        self
    }

    pub fn states(&self) -> impl Iterator<Item = (&'static str, &[Rule])> {
        self.states.iter().map(|(name, rules)| (*name, rules.as_slice()))
    }

    #[cfg(test)]
    pub fn get(&self, state: &str) -> Option<&[Rule]> {
        self.states
            .iter()
            .find(|(name, _)| *name == state)
            .map(|(_, rules)| rules.as_slice())
    }
}

/// Provides the rule set of a mode.
pub trait HighlightRules: Send + Sync {
    fn rules(&self) -> RuleSet;
}

/// A registered mode.
#[derive(Debug)]
pub struct Mode {
    id: String,
    tokenizer: Tokenizer,
}

impl Mode {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }
}

/// Modes by id (e.g. `ace/mode/logfile`).
#[derive(Debug, Default)]
pub struct ModeRegistry {
    modes: FxHashMap<String, Mode>,
}

impl ModeRegistry {
    pub const LOGFILE: &'static str = "ace/mode/logfile";

    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding the built-in modes.
    pub fn with_builtin() -> Result<Self, regex::Error> {
        let mut registry = Self::new();
        registry.register(Self::LOGFILE, &LogFileHighlightRules)?;
        Ok(registry)
    }

    /// Compile and register `rules` under `id`, replacing any previous mode.
    pub fn register(
        &mut self,
        id: impl Into<String>,
        rules: &dyn HighlightRules,
    ) -> Result<(), regex::Error> {
        let id = id.into();
        let tokenizer = Tokenizer::new(rules)?;
        self.modes.insert(id.clone(), Mode { id, tokenizer });
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Mode> {
        self.modes.get(id)
    }

    /// Registered ids, sorted.
    #[cfg(test)]
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<_> = self.modes.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Words;

    impl HighlightRules for Words {
        fn rules(&self) -> RuleSet {
            RuleSet::new().state(START, vec![Rule::new("word", r"\w+")])
        }
    }

    #[test]
    fn test_registry_builtin() {
        let registry = ModeRegistry::with_builtin().unwrap();
        assert_eq!(registry.ids(), vec!["ace/mode/logfile"]);
        let mode = registry.get("ace/mode/logfile").unwrap();
        assert_eq!(mode.id(), "ace/mode/logfile");
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = ModeRegistry::with_builtin().unwrap();
        registry.register("ace/mode/words", &Words).unwrap();
        registry.register("ace/mode/words", &Words).unwrap();
        assert_eq!(registry.ids(), vec!["ace/mode/logfile", "ace/mode/words"]);
        assert!(registry.get("ace/mode/missing").is_none());
    }

    #[test]
    fn test_rule_set_replace_state() {
        let set = RuleSet::new()
            .state(START, vec![Rule::new("a", "a")])
            .state(START, vec![Rule::new("b", "b"), Rule::new("c", "c")]);
        assert_eq!(set.states().count(), 1);
        assert_eq!(set.get(START).unwrap().len(), 2);
    }
}
