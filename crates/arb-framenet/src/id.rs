//! Semantic identifiers as supplied by callers.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// A caller-supplied semantic identifier: a frame id, a frame element id, a
/// lexical unit id, or (rarely) a frame name.
///
/// Identifiers are normalized on construction: surrounding whitespace is
/// trimmed and numeric text is stored in canonical decimal form, so `" 0139"`
/// and `"139"` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SemanticId(String);

impl SemanticId {
    /// Returns `None` for blank input.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        match trimmed.parse::<u32>() {
            Ok(n) => Some(Self(n.to_string())),
            Err(_) => Some(Self(trimmed.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_number(&self) -> Option<u32> {
        self.0.parse().ok()
    }

    /// Parses and normalizes a batch, silently dropping blank entries.
    pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Vec<SemanticId> {
        raw.iter()
            .filter_map(|s| SemanticId::parse(s.as_ref()))
            .collect()
    }
}

impl From<u32> for SemanticId {
    fn from(value: u32) -> Self {
        Self(value.to_string())
    }
}

impl fmt::Display for SemanticId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SemanticId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        SemanticId::parse(&raw).ok_or_else(|| serde::de::Error::custom("empty semantic id"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn numeric_ids_are_canonicalized() {
        assert_eq!(SemanticId::parse(" 0139 "), SemanticId::parse("139"));
        assert_eq!(SemanticId::parse("139").unwrap().as_number(), Some(139));
        assert_eq!(SemanticId::from(139u32).as_str(), "139");
    }

    #[test]
    fn names_are_trimmed_and_blank_dropped() {
        assert_eq!(SemanticId::parse("  Giving ").unwrap().as_str(), "Giving");
        assert!(SemanticId::parse("   ").is_none());
        assert_eq!(SemanticId::parse_all(&["1", "", "x"]).len(), 2);
    }
}
