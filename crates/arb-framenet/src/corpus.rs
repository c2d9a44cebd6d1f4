//! The lexical corpus adapter contract.
//!
//! The corpus is a read-only, deterministic source of frame definitions for a
//! fixed resource version. Lookups return `Option`: a miss is never an error.

use crate::id::SemanticId;
use crate::model::{ElementId, Frame, FrameId, FrameRef, LexicalUnit, LexicalUnitId};
use std::collections::BTreeMap;

/// A lexical unit together with the frame it evokes.
#[derive(Debug, Clone, Copy)]
pub struct LexicalUnitRef<'a> {
    pub unit: &'a LexicalUnit,
    pub frame: &'a Frame,
}

impl<'a> LexicalUnitRef<'a> {
    pub fn name(&self) -> &'a str {
        &self.unit.name
    }
}

/// Read-only access to frame definitions.
///
/// Implementors provide the five primitive lookups; everything else has a
/// default built on top of them (override where an index makes it cheaper).
pub trait Corpus {
    fn frame_by_id(&self, id: FrameId) -> Option<&Frame>;

    /// Case-insensitive lookup.
    fn frame_by_name(&self, name: &str) -> Option<&Frame>;

    /// Every frame, in ascending id order.
    fn all_frames(&self) -> Box<dyn Iterator<Item = &Frame> + '_>;

    fn lexical_unit_by_id(&self, id: LexicalUnitId) -> Option<LexicalUnitRef<'_>>;

    fn lexical_units(&self) -> Box<dyn Iterator<Item = LexicalUnitRef<'_>> + '_>;

    /// The frame owning an element.
    fn frame_for_element(&self, element_id: ElementId) -> Option<&Frame> {
        self.all_frames()
            .find(|frame| frame.element_by_id(element_id).is_some())
    }

    fn frame_by_ref(&self, frame_ref: &FrameRef) -> Option<&Frame> {
        match frame_ref {
            FrameRef::Id(id) => self.frame_by_id(*id),
            FrameRef::Name(name) => self.frame_by_name(name),
        }
    }

    /// Resolves a semantic id to a frame: as a frame id, then as the owner of
    /// an element, then as the frame of a lexical unit. Non-numeric ids are
    /// treated as frame names.
    fn resolve_frame(&self, id: &SemanticId) -> Option<&Frame> {
        match id.as_number() {
            Some(n) => self
                .frame_by_id(n)
                .or_else(|| self.frame_for_element(n))
                .or_else(|| self.lexical_unit_by_id(n).map(|lu| lu.frame)),
            None => self.frame_by_name(id.as_str()),
        }
    }

    /// Frames evoked by lexical units with the given lemma, sorted by id.
    fn frames_by_lemma(&self, lemma: &str, pos: Option<&str>) -> Vec<&Frame> {
        let lemma = lemma.trim();
        let mut hits: BTreeMap<FrameId, &Frame> = BTreeMap::new();
        for lu in self.lexical_units() {
            if !lu.unit.lemma().eq_ignore_ascii_case(lemma) {
                continue;
            }
            if let Some(pos) = pos {
                let matches_pos = lu
                    .unit
                    .part_of_speech()
                    .is_some_and(|p| p.eq_ignore_ascii_case(pos));
                if !matches_pos {
                    continue;
                }
            }
            hits.insert(lu.frame.id, lu.frame);
        }
        hits.into_values().collect()
    }

    /// Case-insensitive substring search over names, then definitions.
    /// Name hits rank before definition hits; each group is in id order.
    fn search_frames(&self, query: &str, max_results: usize) -> Vec<&Frame> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() || max_results == 0 {
            return Vec::new();
        }
        let mut by_name = Vec::new();
        let mut by_definition = Vec::new();
        for frame in self.all_frames() {
            if frame.name.to_lowercase().contains(&needle) {
                by_name.push(frame);
            } else if frame.definition.to_lowercase().contains(&needle) {
                by_definition.push(frame);
            }
        }
        by_name.extend(by_definition);
        by_name.truncate(max_results);
        by_name
    }

    /// Frames one relation edge above `frame`, optionally restricted to one
    /// relation type. Malformed and unresolvable edges are skipped.
    fn related_frames(&self, frame: &Frame, relation_type: Option<&str>) -> Vec<&Frame> {
        frame
            .relations
            .iter()
            .filter(|rel| match relation_type {
                Some(kind) => rel.is_kind(kind),
                None => rel.kind.is_some(),
            })
            .filter_map(|rel| rel.super_frame.as_ref())
            .filter_map(|target| self.frame_by_ref(target))
            .collect()
    }
}
