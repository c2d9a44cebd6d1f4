//! Persisted records: environments, entities, materialized frames.

use arb_framenet::{CoreType, ElementId, Frame, FrameRef};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for an environment (a per-user workspace)
pub type EnvironmentId = u64;
/// Unique identifier for an entity
pub type EntityId = u64;

/// A simulation object that can be bound to frame roles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    /// Lexical sense reference into the corpus.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sense_id: Option<String>,
    /// Active frame name → roles this entity plays in it.
    #[serde(default)]
    pub active_frames: BTreeMap<String, Vec<String>>,
}

impl Entity {
    pub fn new(id: EntityId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sense_id: None,
            active_frames: BTreeMap::new(),
        }
    }

    pub fn with_sense(mut self, sense_id: impl Into<String>) -> Self {
        self.sense_id = Some(sense_id.into());
        self
    }

    /// Records that this entity plays `role` in `frame`. Returns `false` when
    /// the role was already recorded.
    pub fn activate(&mut self, frame: &str, role: &str) -> bool {
        let roles = self.active_frames.entry(frame.to_string()).or_default();
        if roles.iter().any(|r| r == role) {
            return false;
        }
        roles.push(role.to_string());
        true
    }

    pub fn roles_in(&self, frame: &str) -> &[String] {
        self.active_frames
            .get(frame)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedElement {
    pub fnid: ElementId,
    pub name: String,
    pub core_type: CoreType,
}

/// Local mirror of a corpus frame, materialized the first time an entity is
/// bound into it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedFrame {
    pub entity_id: EntityId,
    /// The corpus frame this record mirrors (id or name).
    pub frame: FrameRef,
    pub name: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub elements: Vec<PersistedElement>,
    #[serde(default)]
    pub is_primary: bool,
}

impl PersistedFrame {
    /// Copies name, definition and elements out of a corpus frame.
    pub fn mirror(entity_id: EntityId, frame: &Frame) -> Self {
        Self {
            entity_id,
            frame: FrameRef::Id(frame.id),
            name: frame.name.clone(),
            definition: frame.definition.clone(),
            elements: frame
                .elements
                .iter()
                .map(|e| PersistedElement {
                    fnid: e.id,
                    name: e.name.clone(),
                    core_type: e.core_type,
                })
                .collect(),
            is_primary: false,
        }
    }

    /// True when this record mirrors `frame` (by reference or by name).
    pub fn refers_to(&self, frame: &Frame) -> bool {
        self.frame.matches(frame) || self.name.eq_ignore_ascii_case(&frame.name)
    }

    /// True when a caller-supplied reference designates this record.
    pub fn answers_to(&self, frame_ref: &FrameRef) -> bool {
        if &self.frame == frame_ref {
            return true;
        }
        match frame_ref {
            FrameRef::Id(_) => false,
            FrameRef::Name(name) => {
                self.name.eq_ignore_ascii_case(name)
                    || matches!(&self.frame, FrameRef::Name(own) if own.eq_ignore_ascii_case(name))
            }
        }
    }
}

/// Scoping container for entities and their materialized frames.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Environment {
    pub id: EnvironmentId,
    pub name: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub frames: Vec<PersistedFrame>,
}

impl Environment {
    pub fn new(id: EnvironmentId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            entities: Vec::new(),
            frames: Vec::new(),
        }
    }

    pub fn with_entity(mut self, entity: Entity) -> Self {
        self.entities.push(entity);
        self
    }

    pub fn with_frame(mut self, frame: PersistedFrame) -> Self {
        self.frames.push(frame);
        self
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    pub fn frames_of(&self, entity_id: EntityId) -> impl Iterator<Item = &PersistedFrame> {
        self.frames.iter().filter(move |f| f.entity_id == entity_id)
    }
}
