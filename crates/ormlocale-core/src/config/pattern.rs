//! Name and type patterns used by include/exclude lists.

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A single include/exclude pattern.
///
/// Text starting with `/` is a delimited regular expression (`/^Meta/`,
/// optionally followed by inline flags such as `/^meta/i`); anything else is
/// compared literally.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Pattern {
    /// Exact, case-sensitive equality.
    Literal(String),
    /// Regular expression search.
    Regex {
        /// The pattern as written, delimiters included.
        source: String,
        /// The compiled expression.
        regex: Regex,
    },
}

impl Pattern {
    /// Parse pattern text.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let Some(rest) = text.strip_prefix('/') else {
            return Ok(Pattern::Literal(text.to_string()));
        };

        // Without a closing delimiter the remainder is the whole expression.
        let (body, flags) = match rest.rfind('/') {
            Some(idx) => (&rest[..idx], &rest[idx + 1..]),
            None => (rest, ""),
        };

        let expr = if flags.is_empty() {
            body.to_string()
        } else {
            format!("(?{flags}){body}")
        };

        let regex = Regex::new(&expr).map_err(|source| Error::InvalidPattern {
            pattern: text.to_string(),
            source,
        })?;

        Ok(Pattern::Regex {
            source: text.to_string(),
            regex,
        })
    }

    /// Create a literal pattern without interpreting a leading `/`.
    pub fn literal(text: impl Into<String>) -> Self {
        Pattern::Literal(text.into())
    }

    /// The pattern text as written.
    pub fn as_str(&self) -> &str {
        match self {
            Pattern::Literal(text) => text,
            Pattern::Regex { source, .. } => source,
        }
    }

    /// Check whether this pattern matches either the raw or the base value.
    pub fn matches(&self, raw: &str, base: &str) -> bool {
        match self {
            Pattern::Literal(text) => text == raw || text == base,
            Pattern::Regex { regex, .. } => regex.is_match(raw) || regex.is_match(base),
        }
    }

    /// Check whether any pattern in `patterns` matches.
    pub fn any_matches(patterns: &[Pattern], raw: &str, base: &str) -> bool {
        patterns.iter().any(|p| p.matches(raw, base))
    }
}

impl PartialEq for Pattern {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Pattern {}

impl TryFrom<String> for Pattern {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Pattern::parse(&value)
    }
}

impl TryFrom<&str> for Pattern {
    type Error = Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Pattern::parse(value)
    }
}

impl From<Pattern> for String {
    fn from(pattern: Pattern) -> Self {
        match pattern {
            Pattern::Literal(text) => text,
            Pattern::Regex { source, .. } => source,
        }
    }
}

/// Parse a list of pattern strings.
pub fn parse_patterns<I, S>(texts: I) -> Result<Vec<Pattern>, Error>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    texts.into_iter().map(|t| Pattern::parse(t.as_ref())).collect()
}
