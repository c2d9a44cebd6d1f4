//! Frame candidate search.
//!
//! ```text
//!  ids ─► 1. direct   frame id │ element owner │ lexical unit (exact)
//!         2. down     descendants of every direct hit
//!         3. up       ancestors of everything so far
//!         4. scope    keep frames referenced by records in the environment
//! ```
//!
//! Every stage contributes to the union; results are de-duplicated and sorted
//! by frame id.

use arb_framenet::{Corpus, Frame, FrameId, InheritanceGraph, SemanticId};
use arb_world::{EnvironmentId, FrameRepository, RepositoryError};
use std::collections::{BTreeMap, BTreeSet};

/// Candidate frames in ascending id order, plus the ids reached through a
/// lexical unit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandidateSet<'c> {
    pub frames: Vec<&'c Frame>,
    pub exact: BTreeSet<FrameId>,
}

impl<'c> CandidateSet<'c> {
    pub fn ids(&self) -> BTreeSet<FrameId> {
        self.frames.iter().map(|f| f.id).collect()
    }

    pub fn contains(&self, id: FrameId) -> bool {
        self.frames.iter().any(|f| f.id == id)
    }

    pub fn is_exact(&self, id: FrameId) -> bool {
        self.exact.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}

pub struct CandidateFinder<'c, C: Corpus + ?Sized> {
    corpus: &'c C,
    graph: InheritanceGraph<'c, C>,
    repository: Option<&'c dyn FrameRepository>,
}

impl<'c, C: Corpus + ?Sized> CandidateFinder<'c, C> {
    pub fn new(corpus: &'c C) -> Self {
        Self {
            corpus,
            graph: InheritanceGraph::new(corpus),
            repository: None,
        }
    }

    pub fn with_repository(mut self, repository: &'c dyn FrameRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    /// Collects candidate frames for `ids`, optionally restricted to the
    /// frames referenced in `scope`.
    ///
    /// Only repository failures are errors. Ids that resolve to nothing are
    /// dropped.
    pub fn find_candidates(
        &self,
        ids: &[SemanticId],
        scope: Option<EnvironmentId>,
    ) -> Result<CandidateSet<'c>, RepositoryError> {
        if ids.is_empty() {
            return Ok(CandidateSet::default());
        }

        let mut found: BTreeMap<FrameId, &'c Frame> = BTreeMap::new();
        let mut exact = BTreeSet::new();

        // 1. Direct matches.
        for id in ids {
            let Some(n) = id.as_number() else {
                tracing::debug!(id = %id, "non-numeric semantic id, skipped");
                continue;
            };
            let mut hit = false;
            if let Some(frame) = self.corpus.frame_by_id(n) {
                found.insert(frame.id, frame);
                hit = true;
            }
            if let Some(frame) = self.corpus.frame_for_element(n) {
                found.insert(frame.id, frame);
                hit = true;
            }
            if let Some(lu) = self.corpus.lexical_unit_by_id(n) {
                found.insert(lu.frame.id, lu.frame);
                exact.insert(lu.frame.id);
                hit = true;
            }
            if !hit {
                tracing::debug!(id = n, "semantic id resolves to nothing");
            }
        }

        // 2. Downward expansion.
        let direct: Vec<&'c Frame> = found.values().copied().collect();
        for frame in direct {
            for child in self.graph.descendant_frames(frame) {
                found.entry(child.id).or_insert(child);
            }
        }

        // 3. Upward expansion.
        let expanded: Vec<&'c Frame> = found.values().copied().collect();
        for frame in expanded {
            for parent in self.graph.ancestor_frames(frame) {
                found.entry(parent.id).or_insert(parent);
            }
        }

        // 4. Scope restriction.
        if let Some(environment) = scope {
            let Some(repository) = self.repository else {
                tracing::warn!(environment, "scope given but no repository attached");
                return Ok(CandidateSet::default());
            };
            let records = repository.frames_in_scope(environment)?;
            found.retain(|_, frame| records.iter().any(|record| record.refers_to(frame)));
        }

        exact.retain(|id| found.contains_key(id));
        Ok(CandidateSet {
            frames: found.into_values().collect(),
            exact,
        })
    }
}
