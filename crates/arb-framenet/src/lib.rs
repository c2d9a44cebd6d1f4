//! FrameNet corpus model and frame-inheritance walking
//!
//! ```text
//! corpus.json ──► InMemoryCorpus ──► InheritanceGraph ──► ancestors
//!                 (Corpus trait)                        ├► descendants
//!                                                       └► is_subtype
//! ```
//!
//! The corpus is the read-only source of frames, frame elements, inheritance
//! relations and lexical units. Everything past the adapter boundary works on
//! the normalized types in [`model`].

pub mod corpus;
pub mod id;
pub mod inheritance;
pub mod memory;
pub mod model;

#[cfg(any(test, feature = "fixtures"))]
pub mod fixtures;

pub use corpus::{Corpus, LexicalUnitRef};
pub use id::SemanticId;
pub use inheritance::InheritanceGraph;
pub use memory::{CorpusDocument, CorpusError, InMemoryCorpus};
pub use model::{
    CoreType, ElementId, Frame, FrameElement, FrameId, FrameRef, FrameRelation, FrameSummary,
    LexicalUnit, LexicalUnitId, INHERITANCE,
};
