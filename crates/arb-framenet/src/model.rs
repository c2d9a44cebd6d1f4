//! Normalized FrameNet value types.
//!
//! Every corpus backend converts its native records into these shapes once, at
//! the adapter boundary. Downstream code (the inheritance walker, candidate
//! search, role scoring) only ever sees `Frame` / `FrameElement` /
//! `FrameRelation` / `LexicalUnit`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// FrameNet frame identifier.
pub type FrameId = u32;
/// FrameNet frame element identifier.
pub type ElementId = u32;
/// FrameNet lexical unit identifier.
pub type LexicalUnitId = u32;

/// Relation type name of frame-to-super-frame inheritance edges.
pub const INHERITANCE: &str = "Inheritance";

// ============================================================================
// Core types
// ============================================================================

/// How mandatory a frame element is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CoreType {
    Core,
    CoreUnexpressed,
    Peripheral,
    ExtraThematic,
}

impl CoreType {
    /// `core` and `core-unexpressed` roles must be bound when a frame is applied.
    pub fn is_required(self) -> bool {
        matches!(self, CoreType::Core | CoreType::CoreUnexpressed)
    }

    /// Only plain `core` elements take part in match scoring.
    pub fn is_scored(self) -> bool {
        self == CoreType::Core
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CoreType::Core => "core",
            CoreType::CoreUnexpressed => "core-unexpressed",
            CoreType::Peripheral => "peripheral",
            CoreType::ExtraThematic => "extra-thematic",
        }
    }
}

impl fmt::Display for CoreType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown core type `{0}`")]
pub struct UnknownCoreType(pub String);

impl FromStr for CoreType {
    type Err = UnknownCoreType;

    /// Accepts the FrameNet spellings (`Core`, `Core-Unexpressed`,
    /// `Extra-Thematic`, ...) case-insensitively, with `_` or `-`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "core" => Ok(CoreType::Core),
            "core-unexpressed" => Ok(CoreType::CoreUnexpressed),
            "peripheral" => Ok(CoreType::Peripheral),
            "extra-thematic" => Ok(CoreType::ExtraThematic),
            _ => Err(UnknownCoreType(s.to_string())),
        }
    }
}

impl TryFrom<String> for CoreType {
    type Error = UnknownCoreType;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CoreType> for String {
    fn from(value: CoreType) -> Self {
        value.as_str().to_string()
    }
}

// ============================================================================
// Frames and elements
// ============================================================================

/// A named role inside exactly one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameElement {
    pub id: ElementId,
    pub name: String,
    pub core_type: CoreType,
    #[serde(default)]
    pub definition: String,
}

impl FrameElement {
    pub fn new(id: ElementId, name: impl Into<String>, core_type: CoreType) -> Self {
        Self {
            id,
            name: name.into(),
            core_type,
            definition: String::new(),
        }
    }
}

/// Reference to a frame by identifier or by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FrameRef {
    Id(FrameId),
    Name(String),
}

impl FrameRef {
    /// Parses a user-supplied reference: numeric text is an id, anything else a name.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        match raw.parse::<FrameId>() {
            Ok(id) => FrameRef::Id(id),
            Err(_) => FrameRef::Name(raw.to_string()),
        }
    }

    /// Id equality, or case-insensitive name equality.
    pub fn matches(&self, frame: &Frame) -> bool {
        match self {
            FrameRef::Id(id) => *id == frame.id,
            FrameRef::Name(name) => name.eq_ignore_ascii_case(&frame.name),
        }
    }
}

impl fmt::Display for FrameRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameRef::Id(id) => write!(f, "{id}"),
            FrameRef::Name(name) => f.write_str(name),
        }
    }
}

impl From<FrameId> for FrameRef {
    fn from(value: FrameId) -> Self {
        FrameRef::Id(value)
    }
}

impl From<&str> for FrameRef {
    fn from(value: &str) -> Self {
        FrameRef::Name(value.to_string())
    }
}

/// A typed edge from a frame to another frame.
///
/// Both fields are optional on purpose: corpus data is kept verbatim and an
/// entry missing either part is skipped (with a warning) by the walker rather
/// than rejected at load time.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FrameRelation {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub super_frame: Option<FrameRef>,
}

impl FrameRelation {
    pub fn new(kind: impl Into<String>, super_frame: impl Into<FrameRef>) -> Self {
        Self {
            kind: Some(kind.into()),
            super_frame: Some(super_frame.into()),
        }
    }

    pub fn inheritance(super_frame: impl Into<FrameRef>) -> Self {
        Self::new(INHERITANCE, super_frame)
    }

    pub fn is_kind(&self, kind: &str) -> bool {
        self.kind
            .as_deref()
            .is_some_and(|k| k.eq_ignore_ascii_case(kind))
    }
}

/// A semantic template with named roles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: FrameId,
    pub name: String,
    #[serde(default)]
    pub definition: String,
    /// Elements in declaration order.
    #[serde(default)]
    pub elements: Vec<FrameElement>,
    #[serde(default)]
    pub relations: Vec<FrameRelation>,
}

impl Frame {
    pub fn new(id: FrameId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            definition: String::new(),
            elements: Vec::new(),
            relations: Vec::new(),
        }
    }

    pub fn with_definition(mut self, definition: impl Into<String>) -> Self {
        self.definition = definition.into();
        self
    }

    pub fn with_element(mut self, element: FrameElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_relation(mut self, relation: FrameRelation) -> Self {
        self.relations.push(relation);
        self
    }

    /// Element lookup by name (case-insensitive).
    pub fn element(&self, name: &str) -> Option<&FrameElement> {
        self.elements
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name))
    }

    pub fn element_by_id(&self, id: ElementId) -> Option<&FrameElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    /// Plain `core` elements, in declaration order.
    pub fn core_elements(&self) -> impl Iterator<Item = &FrameElement> {
        self.elements.iter().filter(|e| e.core_type.is_scored())
    }

    /// `core` and `core-unexpressed` elements, in declaration order.
    pub fn required_elements(&self) -> impl Iterator<Item = &FrameElement> {
        self.elements.iter().filter(|e| e.core_type.is_required())
    }

    pub fn summary(&self) -> FrameSummary {
        FrameSummary {
            id: self.id,
            name: self.name.clone(),
            definition: self.definition.clone(),
        }
    }
}

/// The externally visible face of a frame: `{id, name, definition}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameSummary {
    pub id: FrameId,
    pub name: String,
    #[serde(default)]
    pub definition: String,
}

// ============================================================================
// Lexical units
// ============================================================================

/// Binding of a word sense (`lemma.pos`) to the frame it evokes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LexicalUnit {
    pub id: LexicalUnitId,
    /// `lemma.pos`, e.g. `give.v`.
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<String>,
    pub frame: FrameRef,
}

impl LexicalUnit {
    pub fn lemma(&self) -> &str {
        match self.name.rsplit_once('.') {
            Some((lemma, _)) => lemma,
            None => &self.name,
        }
    }

    /// Explicit part of speech, else the suffix after the last `.` of the name.
    pub fn part_of_speech(&self) -> Option<&str> {
        self.pos
            .as_deref()
            .or_else(|| self.name.rsplit_once('.').map(|(_, pos)| pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn core_type_accepts_framenet_spellings() {
        assert_eq!("Core".parse::<CoreType>().unwrap(), CoreType::Core);
        assert_eq!(
            "Core-Unexpressed".parse::<CoreType>().unwrap(),
            CoreType::CoreUnexpressed
        );
        assert_eq!(
            "extra_thematic".parse::<CoreType>().unwrap(),
            CoreType::ExtraThematic
        );
        assert!("optional".parse::<CoreType>().is_err());
    }

    #[test]
    fn core_type_requirement_and_scoring_differ_for_unexpressed() {
        assert!(CoreType::CoreUnexpressed.is_required());
        assert!(!CoreType::CoreUnexpressed.is_scored());
        assert!(CoreType::Core.is_required() && CoreType::Core.is_scored());
        assert!(!CoreType::Peripheral.is_required());
    }

    #[test]
    fn frame_ref_deserializes_from_id_or_name() {
        let by_id: FrameRef = serde_json::from_str("139").unwrap();
        let by_name: FrameRef = serde_json::from_str("\"Giving\"").unwrap();
        assert_eq!(by_id, FrameRef::Id(139));
        assert_eq!(by_name, FrameRef::Name("Giving".to_string()));
        assert_eq!(FrameRef::parse(" 139 "), FrameRef::Id(139));
    }

    #[test]
    fn relation_keeps_malformed_entries() {
        let rel: FrameRelation = serde_json::from_str(r#"{"super_frame": "Getting"}"#).unwrap();
        assert!(rel.kind.is_none());
        assert!(!rel.is_kind(INHERITANCE));
    }

    #[test]
    fn lexical_unit_splits_lemma_and_pos() {
        let lu = LexicalUnit {
            id: 1,
            name: "hand over.v".to_string(),
            pos: None,
            frame: FrameRef::Id(139),
        };
        assert_eq!(lu.lemma(), "hand over");
        assert_eq!(lu.part_of_speech(), Some("v"));
    }
}
