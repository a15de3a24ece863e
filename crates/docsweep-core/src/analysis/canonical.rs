use crate::error::Error;
use crate::model::CanonicalKey;
use regex::Regex;
use std::path::Path;

lazy_static::lazy_static! {
    static ref DEFAULT_CANONICALIZER: Canonicalizer = Canonicalizer::default();
}

/// Built-in duplicate markers, applied in this order.
const DEFAULT_RULES: &[(&str, &str)] = &[
    ("space-counter", r" \d+"),
    ("parenthesized-counter", r" \(\d+\)"),
    ("underscore-counter", r"_\d+"),
    ("conflict-marker", r"(?i)conflicto.*"),
];

/// A suffix pattern stripped from the end of a file stem.
#[derive(Debug, Clone)]
pub struct SuffixRule {
    name: String,
    pattern: Regex,
}

impl SuffixRule {
    /// The pattern is anchored to the end of the stem; callers must not add `$`.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, Error> {
        let regex = Regex::new(&format!("(?:{})$", pattern)).map_err(|e| Error::InvalidPattern {
            pattern: pattern.to_string(),
            reason: e.to_string(),
        })?;
        Ok(Self {
            name: name.into(),
            pattern: regex,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    fn strip<'a>(&self, stem: &'a str) -> &'a str {
        match self.pattern.find(stem) {
            Some(m) => &stem[..m.start()],
            None => stem,
        }
    }
}

/// Maps display names to canonical keys through an ordered list of suffix rules.
#[derive(Debug, Clone)]
pub struct Canonicalizer {
    rules: Vec<SuffixRule>,
}

impl Default for Canonicalizer {
    fn default() -> Self {
        let rules = DEFAULT_RULES
            .iter()
            .filter_map(|(name, pattern)| SuffixRule::new(*name, pattern).ok())
            .collect();
        Self { rules }
    }
}

impl Canonicalizer {
    pub fn with_rules(rules: Vec<SuffixRule>) -> Self {
        Self { rules }
    }

    /// Appends a rule after the existing ones.
    pub fn push_rule(&mut self, rule: SuffixRule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[SuffixRule] {
        &self.rules
    }

    pub fn canonicalize(&self, display_name: &str) -> CanonicalKey {
        let stem = strip_extension(display_name);
        let key = self.rules.iter().fold(stem, |acc, rule| rule.strip(acc));
        CanonicalKey::new(key)
    }
}

/// Canonical key of `display_name` under the built-in rules.
pub fn canonicalize(display_name: &str) -> CanonicalKey {
    DEFAULT_CANONICALIZER.canonicalize(display_name)
}

fn strip_extension(display_name: &str) -> &str {
    Path::new(display_name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(display_name)
}
