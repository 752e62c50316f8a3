//! Compiled glob patterns for matching model identifiers.
//!
//! Patterns use shell-style wildcards: `*` matches any run of characters (including
//! `/`, which commonly appears in model identifiers such as `meta-llama/Llama-3-8B`),
//! `?` matches exactly one character, and `[...]` matches a character class. Matching
//! ignores case in both the pattern and the identifier.
//!
//! Model identifiers are not paths. A run of `*` behaves like a single `*`, and case
//! folding applies to all of Unicode, not only ASCII.

use glob::{MatchOptions, PatternError};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
pub(crate) struct Pattern {
    compiled: glob::Pattern,
}

/// Lowercase the pattern and collapse runs of `*`, which `glob` would otherwise
/// treat as a recursive path wildcard.
fn normalize(pattern: &str) -> String {
    let mut normalized = String::with_capacity(pattern.len());

    for c in pattern.to_lowercase().chars() {
        if c == '*' && normalized.ends_with('*') {
            continue;
        }

        normalized.push(c);
    }

    normalized
}

impl Pattern {
    /// Compile a pattern. Fails if the pattern is malformed, e.g. it contains an
    /// unterminated character class such as `[invalid`.
    pub(crate) fn compile(pattern: &str) -> Result<Pattern, PatternError> {
        Ok(Pattern {
            compiled: glob::Pattern::new(&normalize(pattern))?,
        })
    }

    pub(crate) fn matches(&self, model_id: &str) -> bool {
        self.compiled
            .matches_with(&model_id.to_lowercase(), MATCH_OPTIONS)
    }
}
