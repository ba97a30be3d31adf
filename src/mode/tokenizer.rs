//! Rule-set tokenizer.
//!
//! The rules of each state are joined into one alternation
//! `(r1)|(r2)|...`. A single leftmost search then finds the next token,
//! and among rules matching at the same position the earliest listed wins.
//! A winner that matched nothing yields to the first later rule with a
//! non-empty match at that position.

use regex::Regex;
use rustc_hash::FxHashMap;

use super::{HighlightRules, Rule, START, TEXT};

/// A token of one line. `start` is a byte offset into that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: &'static str,
    pub start: usize,
    pub text: &'a str,
}

#[derive(Debug)]
struct CompiledState {
    regex: Option<Regex>,
    /// Capture group index of each rule, parallel to `rules`.
    groups: Vec<usize>,
    /// Each rule compiled alone, parallel to `rules`.
    singles: Vec<Regex>,
    rules: Vec<Rule>,
}

impl CompiledState {
    fn new(rules: &[Rule]) -> Result<Self, regex::Error> {
        let mut groups = Vec::with_capacity(rules.len());
        let mut singles = Vec::with_capacity(rules.len());
        let mut alternatives = Vec::with_capacity(rules.len());
        let mut next_group = 1;

        for rule in rules {
            // Compile alone first: reports the failing rule and counts its groups.
            let own = Regex::new(rule.regex)?;
            groups.push(next_group);
            next_group += own.captures_len();
            alternatives.push(format!("({})", rule.regex));
            singles.push(own);
        }

        let regex = if alternatives.is_empty() {
            None
        } else {
            Some(Regex::new(&alternatives.join("|"))?)
        };

        Ok(Self {
            regex,
            groups,
            singles,
            rules: rules.to_vec(),
        })
    }

    /// First rule after `after` matching non-empty text starting at `at`.
    fn non_empty_at<'h>(&self, after: usize, line: &'h str, at: usize) -> Option<(usize, regex::Match<'h>)> {
        self.singles
            .iter()
            .enumerate()
            .skip(after + 1)
            .find_map(|(index, re)| {
                re.find_at(line, at)
                    .filter(|m| m.start() == at && !m.is_empty())
                    .map(|m| (index, m))
            })
    }
}

/// Compiled rule set.
#[derive(Debug)]
pub struct Tokenizer {
    states: FxHashMap<&'static str, CompiledState>,
}

impl Tokenizer {
    pub fn new(rules: &dyn HighlightRules) -> Result<Self, regex::Error> {
        let set = rules.rules();
        let mut states = FxHashMap::default();
        for (name, rules) in set.states() {
            states.insert(name, CompiledState::new(rules)?);
        }
        if !states.contains_key(START) {
            states.insert(START, CompiledState::new(&[])?);
        }
        Ok(Self { states })
    }

    /// Tokenize one line starting in `state`, returning the tokens and the
    /// state the next line starts in.
    ///
    /// Characters no rule matches are merged into `text` tokens. Empty
    /// matches never produce a token.
    pub fn tokenize_line<'a>(&self, line: &'a str, state: &str) -> (Vec<Token<'a>>, &'static str) {
        let mut state = self.state_name(state);
        let mut tokens = Vec::new();
        let mut text_start = 0;
        let mut pos = 0;

        while pos < line.len() {
            let current = &self.states[state];
            let Some(caps) = current
                .regex
                .as_ref()
                .and_then(|re| re.captures_at(line, pos))
            else {
                break;
            };
            let Some((index, m)) = current
                .groups
                .iter()
                .enumerate()
                .find_map(|(index, &group)| caps.get(group).map(|m| (index, m)))
            else {
                break;
            };

            let (index, m) = if m.is_empty() {
                match current.non_empty_at(index, line, m.start()) {
                    Some(found) => found,
                    None => {
                        // Step over one character; it becomes text.
                        pos = next_char_boundary(line, m.start());
                        continue;
                    }
                }
            } else {
                (index, m)
            };
            let rule = &current.rules[index];

            if text_start < m.start() {
                tokens.push(text_token(line, text_start, m.start()));
            }
            tokens.push(Token {
                kind: rule.token,
                start: m.start(),
                text: m.as_str(),
            });
            pos = m.end();
            text_start = pos;

            if let Some(next) = rule.next {
                state = self.state_name(next);
            }
        }

        if text_start < line.len() {
            tokens.push(text_token(line, text_start, line.len()));
        }
        (tokens, state)
    }

    /// Tokenize every line of `text`, threading the state across lines.
    pub fn tokenize<'a>(&self, text: &'a str) -> Vec<Vec<Token<'a>>> {
        let mut state = START;
        text.lines()
            .map(|line| {
                let (tokens, next) = self.tokenize_line(line, state);
                state = next;
                tokens
            })
            .collect()
    }

    /// Known state name, falling back to `start`.
    fn state_name(&self, state: &str) -> &'static str {
        self.states
            .get_key_value(state)
            .map_or(START, |(name, _)| *name)
    }
}

fn text_token(line: &str, start: usize, end: usize) -> Token<'_> {
    Token {
        kind: TEXT,
        start,
        text: &line[start..end],
    }
}

fn next_char_boundary(line: &str, at: usize) -> usize {
    line[at..]
        .chars()
        .next()
        .map_or(line.len(), |c| at + c.len_utf8())
}
