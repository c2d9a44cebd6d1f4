//! Frame-inheritance graph walking.
//!
//! Edges run from a frame to its super-frame (`Inheritance` relations only).
//! The corpus is expected to be acyclic, but every walk carries an explicit
//! visited set and simply stops a branch when it reaches a frame it has
//! already seen.
//!
//! ```text
//!   Renting ──Inheritance──► Commerce_buy ──Inheritance──► Getting
//!
//!   ancestors_of(Renting)   = {Commerce_buy, Getting}
//!   descendants_of(Getting) = {Commerce_buy, Renting}
//! ```

use crate::corpus::Corpus;
use crate::model::{Frame, FrameId, FrameRef, INHERITANCE};
use std::collections::{BTreeSet, VecDeque};

/// Ancestor/descendant/subtype queries over one corpus.
pub struct InheritanceGraph<'c, C: Corpus + ?Sized> {
    corpus: &'c C,
}

impl<'c, C: Corpus + ?Sized> Clone for InheritanceGraph<'c, C> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'c, C: Corpus + ?Sized> Copy for InheritanceGraph<'c, C> {}

impl<'c, C: Corpus + ?Sized> InheritanceGraph<'c, C> {
    pub fn new(corpus: &'c C) -> Self {
        Self { corpus }
    }

    pub fn corpus(&self) -> &'c C {
        self.corpus
    }

    /// Super-frame references of the well-formed `Inheritance` edges of `frame`.
    ///
    /// Entries without a `type` or without a `super_frame` are skipped with a
    /// warning.
    pub fn inheritance_edges<'f>(&self, frame: &'f Frame) -> Vec<&'f FrameRef> {
        let mut edges = Vec::new();
        for relation in &frame.relations {
            let Some(kind) = relation.kind.as_deref() else {
                tracing::warn!(
                    frame_id = frame.id,
                    frame = %frame.name,
                    "frame relation without a type; skipping"
                );
                continue;
            };
            if !kind.eq_ignore_ascii_case(INHERITANCE) {
                continue;
            }
            match relation.super_frame.as_ref() {
                Some(target) => edges.push(target),
                None => tracing::warn!(
                    frame_id = frame.id,
                    frame = %frame.name,
                    "inheritance relation without a super_frame; skipping"
                ),
            }
        }
        edges
    }

    /// True when `frame` is the child side of at least one inheritance edge.
    pub fn is_child(&self, frame: &Frame) -> bool {
        !self.inheritance_edges(frame).is_empty()
    }

    /// Direct super-frames that resolve in the corpus.
    pub fn parents_of(&self, frame: &Frame) -> Vec<&'c Frame> {
        self.inheritance_edges(frame)
            .into_iter()
            .filter_map(|target| {
                let parent = self.corpus.frame_by_ref(target);
                if parent.is_none() {
                    tracing::debug!(
                        frame_id = frame.id,
                        super_frame = %target,
                        "super-frame not found in corpus"
                    );
                }
                parent
            })
            .collect()
    }

    /// Breadth-first ancestor walk starting at `frame`'s parents.
    ///
    /// Frames already in `visited` are neither returned nor expanded, and
    /// every returned frame is added to it. Seed `visited` with `frame.id` to
    /// keep the start frame out of the result.
    pub fn walk_ancestors(
        &self,
        frame: &Frame,
        visited: &mut BTreeSet<FrameId>,
    ) -> Vec<&'c Frame> {
        let mut found = Vec::new();
        let mut queue: VecDeque<&'c Frame> = self.parents_of(frame).into();
        while let Some(current) = queue.pop_front() {
            if !visited.insert(current.id) {
                continue;
            }
            found.push(current);
            queue.extend(self.parents_of(current));
        }
        found
    }

    /// All transitive super-frames of `frame`, nearest first, excluding `frame`.
    pub fn ancestor_frames(&self, frame: &Frame) -> Vec<&'c Frame> {
        let mut visited = BTreeSet::from([frame.id]);
        self.walk_ancestors(frame, &mut visited)
    }

    pub fn ancestors_of(&self, frame: &Frame) -> BTreeSet<FrameId> {
        self.ancestor_frames(frame)
            .into_iter()
            .map(|f| f.id)
            .collect()
    }

    /// `a` is a subtype of `b` when `b` is a transitive super-frame of `a`.
    ///
    /// A frame is never a subtype of itself. When `a` has no well-formed
    /// inheritance edge (no relations, or only malformed ones), fall back to
    /// case-insensitive name equality.
    pub fn is_subtype(&self, a: &Frame, b: &Frame) -> bool {
        if a.id == b.id {
            return false;
        }
        if self.inheritance_edges(a).is_empty() {
            return a.name.eq_ignore_ascii_case(&b.name);
        }
        self.ancestors_of(a).contains(&b.id)
    }

    /// Every corpus frame that has `frame` among its ancestors, in id order.
    ///
    /// The corpus does not index children, so this scans all frames.
    pub fn descendant_frames(&self, frame: &Frame) -> Vec<&'c Frame> {
        self.corpus
            .all_frames()
            .filter(|candidate| candidate.id != frame.id)
            .filter(|candidate| self.ancestors_of(candidate).contains(&frame.id))
            .collect()
    }

    pub fn descendants_of(&self, frame: &Frame) -> BTreeSet<FrameId> {
        self.descendant_frames(frame)
            .into_iter()
            .map(|f| f.id)
            .collect()
    }
}
