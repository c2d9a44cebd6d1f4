//! JSON-backed, fully in-memory corpus.
//!
//! ```text
//! corpus.json ──► CorpusDocument ──► InMemoryCorpus
//!                                     ├── frames        (BTreeMap, id order)
//!                                     ├── by_name       (lowercase name → id)
//!                                     ├── element_owner (element id → frame id)
//!                                     └── lexical units (id → unit, frame id)
//! ```

use crate::corpus::{Corpus, LexicalUnitRef};
use crate::model::{ElementId, Frame, FrameId, LexicalUnit, LexicalUnitId};
use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// On-disk shape of a corpus file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorpusDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub frames: Vec<Frame>,
    #[serde(default)]
    pub lexical_units: Vec<LexicalUnit>,
}

#[derive(Debug, thiserror::Error)]
pub enum CorpusError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("duplicate frame id {id} (`{first}` and `{second}`)")]
    DuplicateFrame {
        id: FrameId,
        first: String,
        second: String,
    },

    #[error("frame `{frame}` declares element `{element}` more than once")]
    DuplicateElement { frame: String, element: String },

    #[error("lexical unit {id} (`{name}`) refers to unknown frame `{frame}`")]
    DanglingLexicalUnit {
        id: LexicalUnitId,
        name: String,
        frame: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryCorpus {
    version: Option<String>,
    frames: BTreeMap<FrameId, Frame>,
    by_name: AHashMap<String, FrameId>,
    element_owner: AHashMap<ElementId, FrameId>,
    lexical_units: BTreeMap<LexicalUnitId, (LexicalUnit, FrameId)>,
}

impl InMemoryCorpus {
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CorpusError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self, CorpusError> {
        let document: CorpusDocument = serde_json::from_str(text)?;
        Self::from_document(document)
    }

    pub fn from_frames(
        frames: Vec<Frame>,
        lexical_units: Vec<LexicalUnit>,
    ) -> Result<Self, CorpusError> {
        Self::from_document(CorpusDocument {
            version: None,
            frames,
            lexical_units,
        })
    }

    pub fn from_document(document: CorpusDocument) -> Result<Self, CorpusError> {
        let mut corpus = InMemoryCorpus {
            version: document.version,
            ..Default::default()
        };

        for frame in document.frames {
            let mut seen = AHashSet::new();
            for element in &frame.elements {
                if !seen.insert(element.name.to_lowercase()) {
                    return Err(CorpusError::DuplicateElement {
                        frame: frame.name.clone(),
                        element: element.name.clone(),
                    });
                }
            }
            if let Some(existing) = corpus.frames.get(&frame.id) {
                return Err(CorpusError::DuplicateFrame {
                    id: frame.id,
                    first: existing.name.clone(),
                    second: frame.name.clone(),
                });
            }

            let key = frame.name.to_lowercase();
            if let Some(other) = corpus.by_name.get(&key) {
                tracing::warn!(
                    frame_id = frame.id,
                    frame = %frame.name,
                    shadowed_by = *other,
                    "frame name already taken; name lookups resolve to the earlier frame"
                );
            } else {
                corpus.by_name.insert(key, frame.id);
            }

            for element in &frame.elements {
                if let Some(owner) = corpus.element_owner.get(&element.id) {
                    tracing::warn!(
                        element_id = element.id,
                        frame_id = frame.id,
                        owner = *owner,
                        "element id already owned by another frame; keeping the first owner"
                    );
                    continue;
                }
                corpus.element_owner.insert(element.id, frame.id);
            }

            corpus.frames.insert(frame.id, frame);
        }

        for unit in document.lexical_units {
            let frame_id = match corpus.frame_by_ref(&unit.frame) {
                Some(frame) => frame.id,
                None => {
                    return Err(CorpusError::DanglingLexicalUnit {
                        id: unit.id,
                        name: unit.name.clone(),
                        frame: unit.frame.to_string(),
                    })
                }
            };
            corpus.lexical_units.insert(unit.id, (unit, frame_id));
        }

        Ok(corpus)
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Back to the on-disk shape (frames and units in id order).
    pub fn to_document(&self) -> CorpusDocument {
        CorpusDocument {
            version: self.version.clone(),
            frames: self.frames.values().cloned().collect(),
            lexical_units: self
                .lexical_units
                .values()
                .map(|(unit, _)| unit.clone())
                .collect(),
        }
    }
}

impl Corpus for InMemoryCorpus {
    fn frame_by_id(&self, id: FrameId) -> Option<&Frame> {
        self.frames.get(&id)
    }

    fn frame_by_name(&self, name: &str) -> Option<&Frame> {
        self.by_name
            .get(&name.trim().to_lowercase())
            .and_then(|id| self.frames.get(id))
    }

    fn all_frames(&self) -> Box<dyn Iterator<Item = &Frame> + '_> {
        Box::new(self.frames.values())
    }

    fn lexical_unit_by_id(&self, id: LexicalUnitId) -> Option<LexicalUnitRef<'_>> {
        let (unit, frame_id) = self.lexical_units.get(&id)?;
        let frame = self.frames.get(frame_id)?;
        Some(LexicalUnitRef { unit, frame })
    }

    fn lexical_units(&self) -> Box<dyn Iterator<Item = LexicalUnitRef<'_>> + '_> {
        Box::new(self.lexical_units.values().filter_map(|(unit, frame_id)| {
            self.frames
                .get(frame_id)
                .map(|frame| LexicalUnitRef { unit, frame })
        }))
    }

    fn frame_for_element(&self, element_id: ElementId) -> Option<&Frame> {
        self.element_owner
            .get(&element_id)
            .and_then(|id| self.frames.get(id))
    }
}
