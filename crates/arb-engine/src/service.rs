//! Frame suggestion: candidate search plus scoring, ranked.

use crate::candidates::CandidateFinder;
use crate::config::EngineConfig;
use crate::scorer::{FrameMatch, RoleScorer};
use arb_framenet::{Corpus, FrameSummary, SemanticId};
use arb_world::{Entity, EnvironmentId, FrameRepository, RepositoryError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One ranked suggestion as handed to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameSuggestion {
    pub frame: FrameSummary,
    pub score: f64,
    pub role_assignments: BTreeMap<String, String>,
    pub confidence: f64,
    #[serde(default)]
    pub exact: bool,
}

impl From<&FrameMatch<'_>> for FrameSuggestion {
    fn from(m: &FrameMatch<'_>) -> Self {
        Self {
            frame: m.frame.summary(),
            score: m.score,
            role_assignments: m
                .role_assignments
                .iter()
                .map(|(role, id)| (role.clone(), id.to_string()))
                .collect(),
            confidence: m.confidence,
            exact: m.exact,
        }
    }
}

/// Ranks corpus frames against a set of semantic ids.
///
/// Corpus and repository are borrowed for the service's lifetime; the
/// service itself holds no mutable state.
pub struct FrameSuggestionService<'c, C: Corpus + ?Sized> {
    corpus: &'c C,
    repository: Option<&'c dyn FrameRepository>,
    config: EngineConfig,
}

impl<'c, C: Corpus + ?Sized> FrameSuggestionService<'c, C> {
    pub fn new(corpus: &'c C) -> Self {
        Self {
            corpus,
            repository: None,
            config: EngineConfig::default(),
        }
    }

    pub fn with_repository(mut self, repository: &'c dyn FrameRepository) -> Self {
        self.repository = Some(repository);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn finder(&self) -> CandidateFinder<'c, C> {
        let finder = CandidateFinder::new(self.corpus);
        match self.repository {
            Some(repository) => finder.with_repository(repository),
            None => finder,
        }
    }

    pub fn scorer(&self) -> RoleScorer<'c, C> {
        RoleScorer::with_config(self.corpus, &self.config)
    }

    /// Scored candidates, best first (score descending, then frame id), with
    /// `min_score` and `max_results` applied.
    pub fn find_matches(
        &self,
        ids: &[SemanticId],
        scope: Option<EnvironmentId>,
    ) -> Result<Vec<FrameMatch<'c>>, RepositoryError> {
        let candidates = self.finder().find_candidates(ids, scope)?;
        let scorer = self.scorer();

        let mut matches: Vec<FrameMatch<'c>> = candidates
            .frames
            .iter()
            .copied()
            .map(|frame| {
                if self.config.lexical_units_exact && candidates.is_exact(frame.id) {
                    FrameMatch::exact(frame)
                } else {
                    scorer.evaluate(frame, ids)
                }
            })
            .filter(|m| m.score >= self.config.min_score)
            .collect();

        matches.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.frame.id.cmp(&b.frame.id))
        });
        if let Some(limit) = self.config.max_results {
            matches.truncate(limit);
        }
        Ok(matches)
    }

    /// Ranked suggestions for raw caller ids.
    ///
    /// Never fails: blank ids are dropped, and a repository failure while
    /// restricting to `scope` is logged and yields an empty list.
    pub fn suggest_frames<S: AsRef<str>>(
        &self,
        raw_ids: &[S],
        scope: Option<EnvironmentId>,
    ) -> Vec<FrameSuggestion> {
        let ids = SemanticId::parse_all(raw_ids);
        match self.find_matches(&ids, scope) {
            Ok(matches) => matches.iter().map(FrameSuggestion::from).collect(),
            Err(error) => {
                tracing::error!(?scope, %error, "frame suggestion failed");
                Vec::new()
            }
        }
    }

    /// Frames evoked by the entity's word sense, at most `limit` of them.
    ///
    /// The sense id reads `lemma.pos[.n]` (`rent.v.01`). Every hit is exact:
    /// the lexical unit names the frame, so nothing is scored.
    pub fn suggest_for_entity(&self, entity: &Entity, limit: usize) -> Vec<FrameSuggestion> {
        let Some((lemma, pos)) = entity.sense_id.as_deref().and_then(split_sense) else {
            tracing::debug!(entity = entity.id, "entity has no usable sense id");
            return Vec::new();
        };
        let frames = self.corpus.frames_by_lemma(lemma, pos);
        tracing::debug!(
            entity = entity.id,
            lemma,
            pos,
            hits = frames.len(),
            "sense lookup"
        );
        frames
            .into_iter()
            .take(limit)
            .map(|frame| FrameSuggestion::from(&FrameMatch::exact(frame)))
            .collect()
    }
}

/// `"rent.v.01"` → `("rent", Some("v"))`; `"rent"` → `("rent", None)`.
fn split_sense(sense: &str) -> Option<(&str, Option<&str>)> {
    let mut parts = sense.trim().split('.');
    let lemma = parts.next().filter(|l| !l.is_empty())?;
    let pos = parts.next().filter(|p| !p.is_empty());
    Some((lemma, pos))
}
