//! Role assignment scoring.
//!
//! Given a candidate frame and the caller's semantic ids, bind ids to the
//! frame's `core` elements and turn the binding into a score.
//!
//! ```text
//!   ids ──► direct pass ──► relaxed pass ──► inherited pass ──► score
//!           (element order,  (any open       (child frames:
//!            first fit)       core slot)      ancestor roles fill
//!                                             child slots)
//! ```

use crate::config::EngineConfig;
use arb_framenet::{Corpus, Frame, FrameElement, InheritanceGraph, SemanticId};
use serde::Serialize;
use std::collections::BTreeMap;

/// A scored candidate frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameMatch<'c> {
    pub frame: &'c Frame,
    /// In `[0, 1]`.
    pub score: f64,
    /// Element name → bound id.
    pub role_assignments: BTreeMap<String, SemanticId>,
    /// Assigned core elements / all core elements.
    pub confidence: f64,
    /// Reached through a lexical unit; scoring was skipped.
    pub exact: bool,
}

impl<'c> FrameMatch<'c> {
    pub fn unscored(frame: &'c Frame) -> Self {
        Self {
            frame,
            score: 0.0,
            role_assignments: BTreeMap::new(),
            confidence: 0.0,
            exact: false,
        }
    }

    pub fn exact(frame: &'c Frame) -> Self {
        Self {
            frame,
            score: 1.0,
            role_assignments: BTreeMap::new(),
            confidence: 1.0,
            exact: true,
        }
    }
}

pub struct RoleScorer<'c, C: Corpus + ?Sized> {
    corpus: &'c C,
    graph: InheritanceGraph<'c, C>,
    floor_assigned: f64,
    floor_unassigned: f64,
}

impl<'c, C: Corpus + ?Sized> RoleScorer<'c, C> {
    pub fn new(corpus: &'c C) -> Self {
        Self::with_config(corpus, &EngineConfig::default())
    }

    pub fn with_config(corpus: &'c C, config: &EngineConfig) -> Self {
        Self {
            corpus,
            graph: InheritanceGraph::new(corpus),
            floor_assigned: config.inherited_floor_assigned,
            floor_unassigned: config.inherited_floor_unassigned,
        }
    }

    /// Whether `candidate` can fill the role identified by `role`.
    ///
    /// Identical ids always can. Otherwise both must resolve to frames, and
    /// the candidate's frame must be a subtype of the role's frame or share
    /// its name. Unresolvable ids never can.
    pub fn can_play(&self, candidate: &SemanticId, role: &SemanticId) -> bool {
        if candidate == role {
            return true;
        }
        let (Some(candidate_frame), Some(role_frame)) = (
            self.corpus.resolve_frame(candidate),
            self.corpus.resolve_frame(role),
        ) else {
            return false;
        };
        self.graph.is_subtype(candidate_frame, role_frame)
            || candidate_frame.name.eq_ignore_ascii_case(&role_frame.name)
    }

    /// `(score, role_assignments)` for `frame` against `ids`.
    pub fn score(
        &self,
        frame: &'c Frame,
        ids: &[SemanticId],
    ) -> (f64, BTreeMap<String, SemanticId>) {
        let matched = self.evaluate(frame, ids);
        (matched.score, matched.role_assignments)
    }

    pub fn evaluate(&self, frame: &'c Frame, ids: &[SemanticId]) -> FrameMatch<'c> {
        let core: Vec<&FrameElement> = frame.core_elements().collect();
        if core.is_empty() {
            tracing::debug!(frame_id = frame.id, frame = %frame.name, "no core elements, not scored");
            return FrameMatch::unscored(frame);
        }

        let mut binding = Binding::new(ids.len());

        // Direct pass: each core element, in declaration order, takes the
        // first compatible id.
        for element in &core {
            let role = SemanticId::from(element.id);
            let first_fit = binding.open_ids().find(|&i| self.can_play(&ids[i], &role));
            if let Some(i) = first_fit {
                binding.bind(i, &element.name, &ids[i]);
            }
        }

        // Relaxed pass: each leftover id, in input order, takes any open slot.
        for i in 0..ids.len() {
            if binding.is_used(i) {
                continue;
            }
            let slot = core.iter().find(|e| {
                binding.is_open(&e.name) && self.can_play(&ids[i], &SemanticId::from(e.id))
            });
            if let Some(element) = slot {
                binding.bind(i, &element.name, &ids[i]);
            }
        }

        let is_child = self.graph.is_child(frame);
        if is_child {
            self.inherited_pass(frame, &core, ids, &mut binding);
        }

        let assigned = binding.assigned.len();
        let denominator = ids.len().min(core.len()).max(1);
        let mut score = assigned as f64 / denominator as f64;
        if is_child {
            let floor = if assigned > 0 {
                self.floor_assigned
            } else {
                self.floor_unassigned
            };
            score = score.max(floor);
        }

        tracing::debug!(
            frame_id = frame.id,
            frame = %frame.name,
            assigned,
            core = core.len(),
            score,
            "scored candidate"
        );

        FrameMatch {
            frame,
            score: score.clamp(0.0, 1.0),
            confidence: assigned as f64 / core.len() as f64,
            role_assignments: binding.assigned,
            exact: false,
        }
    }

    /// Ids matching an ancestor's elements bind to the child's open core
    /// slots. Per ancestor, ids equal to one of its element ids go first;
    /// ids that can merely play one of its roles follow.
    fn inherited_pass(
        &self,
        frame: &Frame,
        core: &[&FrameElement],
        ids: &[SemanticId],
        binding: &mut Binding,
    ) {
        for ancestor in self.graph.ancestor_frames(frame) {
            for exact in [true, false] {
                for i in 0..ids.len() {
                    if binding.is_used(i) || binding.assigned.len() == core.len() {
                        continue;
                    }
                    let parent_element = ancestor.elements.iter().find(|pe| {
                        let role = SemanticId::from(pe.id);
                        if exact {
                            ids[i] == role
                        } else {
                            self.can_play(&ids[i], &role)
                        }
                    });
                    if let Some(parent_element) = parent_element {
                        self.bind_inherited(frame, ancestor, parent_element, core, i, ids, binding);
                    }
                }
            }
        }
    }

    /// Picks the child slot for an id standing in for `parent_element`: a
    /// same-named slot, then a slot whose role can play the parent's, then
    /// any open slot.
    #[allow(clippy::too_many_arguments)]
    fn bind_inherited(
        &self,
        frame: &Frame,
        ancestor: &Frame,
        parent_element: &FrameElement,
        core: &[&FrameElement],
        i: usize,
        ids: &[SemanticId],
        binding: &mut Binding,
    ) {
        let parent_role = SemanticId::from(parent_element.id);
        let open: Vec<&FrameElement> = core
            .iter()
            .copied()
            .filter(|e| binding.is_open(&e.name))
            .collect();
        let slot = open
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(&parent_element.name))
            .or_else(|| {
                open.iter()
                    .find(|e| self.can_play(&SemanticId::from(e.id), &parent_role))
            })
            .or_else(|| open.first())
            .map(|e| e.name.clone());

        if let Some(name) = slot {
            tracing::trace!(
                frame = %frame.name,
                ancestor = %ancestor.name,
                inherited = %parent_element.name,
                slot = %name,
                "bound inherited role"
            );
            binding.bind(i, &name, &ids[i]);
        }
    }
}

/// Which ids are spent and which element names are filled.
struct Binding {
    used: Vec<bool>,
    assigned: BTreeMap<String, SemanticId>,
}

impl Binding {
    fn new(len: usize) -> Self {
        Self {
            used: vec![false; len],
            assigned: BTreeMap::new(),
        }
    }

    fn is_used(&self, i: usize) -> bool {
        self.used[i]
    }

    fn is_open(&self, element: &str) -> bool {
        !self.assigned.contains_key(element)
    }

    fn open_ids(&self) -> impl Iterator<Item = usize> + '_ {
        self.used
            .iter()
            .enumerate()
            .filter(|(_, used)| !**used)
            .map(|(i, _)| i)
    }

    fn bind(&mut self, i: usize, element: &str, id: &SemanticId) {
        self.used[i] = true;
        self.assigned.insert(element.to_string(), id.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use arb_framenet::fixtures::{self, ids};

    fn sid(raw: &str) -> SemanticId {
        SemanticId::parse(raw).unwrap()
    }

    #[test]
    fn identical_ids_can_always_play() {
        let corpus = fixtures::synthetic_corpus();
        let scorer = RoleScorer::new(&corpus);
        assert!(scorer.can_play(&sid("nonsense"), &sid("nonsense")));
        assert!(scorer.can_play(&sid("0139"), &sid("139")));
    }

    #[test]
    fn can_play_through_subtype_and_name() {
        let corpus = fixtures::synthetic_corpus();
        let scorer = RoleScorer::new(&corpus);

        // Renting is a subtype of Getting, not the other way round.
        let renting = SemanticId::from(ids::RENTING);
        let getting_recipient = SemanticId::from(ids::GETTING_RECIPIENT);
        assert!(scorer.can_play(&renting, &getting_recipient));
        assert!(!scorer.can_play(&SemanticId::from(ids::GETTING), &SemanticId::from(ids::RENTING_LESSEE)));

        // Frame id and one of its own elements share the frame name.
        assert!(scorer.can_play(&SemanticId::from(ids::GIVING), &SemanticId::from(ids::GIVING_DONOR)));
        assert!(!scorer.can_play(&sid("424242"), &SemanticId::from(ids::GIVING_DONOR)));
    }

    #[test]
    fn single_frame_id_fully_scores_parentless_frame() {
        let corpus = fixtures::synthetic_corpus();
        let scorer = RoleScorer::new(&corpus);
        let giving = corpus.frame_by_id(ids::GIVING).unwrap();

        let m = scorer.evaluate(giving, &[SemanticId::from(ids::GIVING)]);
        assert_relative_eq!(m.score, 1.0);
        assert_relative_eq!(m.confidence, 1.0 / 3.0);
        assert_eq!(
            m.role_assignments.get("Donor"),
            Some(&SemanticId::from(ids::GIVING))
        );
    }

    #[test]
    fn element_ids_bind_by_declaration_order() {
        let corpus = fixtures::synthetic_corpus();
        let scorer = RoleScorer::new(&corpus);
        let giving = corpus.frame_by_id(ids::GIVING).unwrap();

        let input = [
            SemanticId::from(ids::GIVING_RECIPIENT),
            SemanticId::from(ids::GIVING_DONOR),
        ];
        let (score, roles) = scorer.score(giving, &input);
        assert_relative_eq!(score, 1.0);
        // Every Giving element resolves to Giving, so first fit wins: Donor
        // takes the first id in input order.
        assert_eq!(roles.get("Donor"), Some(&input[0]));
        assert_eq!(roles.get("Theme"), Some(&input[1]));
        assert!(!roles.contains_key("Recipient"));
    }

    #[test]
    fn zero_core_frame_is_not_scored() {
        let corpus = fixtures::synthetic_corpus();
        let scorer = RoleScorer::new(&corpus);
        let no_core = corpus.frame_by_id(ids::NO_CORE).unwrap();

        let (score, roles) = scorer.score(no_core, &[SemanticId::from(ids::NO_CORE)]);
        assert_eq!(score, 0.0);
        assert!(roles.is_empty());
    }

    #[test]
    fn inherited_roles_fill_child_slots() {
        let corpus = fixtures::synthetic_corpus();
        let scorer = RoleScorer::new(&corpus);
        let buy = corpus.frame_by_id(ids::COMMERCE_BUY).unwrap();

        // Getting.Recipient resolves to Getting; Getting is not a subtype of
        // Commerce_buy, so only the inherited pass can place it.
        let input = [SemanticId::from(ids::GETTING_RECIPIENT)];
        let m = scorer.evaluate(buy, &input);
        assert_eq!(m.role_assignments.len(), 1);
        assert_relative_eq!(m.score, 1.0);
        assert_relative_eq!(m.confidence, 0.5);
    }

    #[test]
    fn inherited_element_ids_bind_before_compatible_ids() {
        let corpus = fixtures::synthetic_corpus();
        let scorer = RoleScorer::new(&corpus);
        let buy = corpus.frame_by_id(ids::COMMERCE_BUY).unwrap();

        // The Getting frame id can play any Getting role, but the two exact
        // Getting element ids claim both Commerce_buy slots first.
        let input = [
            SemanticId::from(ids::GETTING),
            SemanticId::from(ids::GETTING_RECIPIENT),
            SemanticId::from(ids::GETTING_THEME),
        ];
        let (score, roles) = scorer.score(buy, &input);
        assert_relative_eq!(score, 1.0);
        assert_eq!(roles.len(), 2);
        assert!(!roles.values().any(|id| *id == input[0]));
        assert!(roles.values().any(|id| *id == input[1]));
        assert!(roles.values().any(|id| *id == input[2]));
    }

    #[test]
    fn child_frames_get_a_score_floor() {
        let corpus = fixtures::synthetic_corpus();
        let scorer = RoleScorer::new(&corpus);
        let sell = corpus.frame_by_id(ids::COMMERCE_SELL).unwrap();

        let m = scorer.evaluate(sell, &[sid("424242")]);
        assert!(m.role_assignments.is_empty());
        assert_relative_eq!(m.score, 0.1);
        assert_relative_eq!(m.confidence, 0.0);

        let strict = EngineConfig {
            inherited_floor_unassigned: 0.0,
            ..EngineConfig::default()
        };
        let scorer = RoleScorer::with_config(&corpus, &strict);
        assert_eq!(scorer.evaluate(sell, &[sid("424242")]).score, 0.0);
    }

    #[test]
    fn empty_input_scores_zero_for_parentless_frame() {
        let corpus = fixtures::synthetic_corpus();
        let scorer = RoleScorer::new(&corpus);
        let giving = corpus.frame_by_id(ids::GIVING).unwrap();
        let (score, roles) = scorer.score(giving, &[]);
        assert_eq!(score, 0.0);
        assert!(roles.is_empty());
    }

    #[test]
    fn cyclic_frames_score_without_hanging() {
        let corpus = fixtures::synthetic_corpus();
        let scorer = RoleScorer::new(&corpus);
        let cycle_a = corpus.frame_by_id(ids::CYCLE_A).unwrap();
        let m = scorer.evaluate(cycle_a, &[SemanticId::from(ids::CYCLE_B)]);
        assert!((0.0..=1.0).contains(&m.score));
    }
}
