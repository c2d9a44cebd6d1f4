//! Committing an accepted frame to entities.
//!
//! ```text
//! apply_frame(env, frame_ref, {role → entity})
//!   └─ transaction(env)
//!        ├─ resolve definition   persisted record in scope │ corpus frame
//!        ├─ validate roles       empty │ duplicate │ unknown │ missing required
//!        ├─ validate entities    every id must exist in env
//!        ├─ write active_frames  entity.activate(frame, role)
//!        ├─ materialize mirrors  first record per entity is primary
//!        └─ run frame handlers   an Err rolls everything back
//! ```

use arb_framenet::{Corpus, FrameId, FrameRef};
use arb_world::{
    EntityId, EnvironmentId, PersistedFrame, RepositoryError, ScopeTransaction,
    TransactionalRepository,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

// ============================================================================
// Errors
// ============================================================================

/// A rejected role binding. Each variant itemizes what is wrong.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoleAssignmentError {
    #[error("frame `{frame}` is missing required roles: {}", .missing.join(", "))]
    MissingRoles { frame: String, missing: Vec<String> },

    #[error("frame `{frame}` has no roles named: {}", .unknown.join(", "))]
    UnknownRoles { frame: String, unknown: Vec<String> },

    #[error("entity {entity} not found in environment {environment}")]
    EntityNotFound {
        environment: EnvironmentId,
        entity: EntityId,
    },

    #[error("frame `{frame}` has roles given more than once: {}", .duplicates.join(", "))]
    DuplicateRoles {
        frame: String,
        duplicates: Vec<String>,
    },

    #[error("no role assignments given for frame `{0}`")]
    Empty(String),
}

/// A frame handler refused the application.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("frame handler for `{frame}` failed: {reason}")]
pub struct FrameStateError {
    pub frame: String,
    pub reason: String,
}

impl FrameStateError {
    pub fn new(frame: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            frame: frame.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApplyError {
    #[error(transparent)]
    Roles(#[from] RoleAssignmentError),

    #[error("unknown frame `{0}`")]
    UnknownFrame(FrameRef),

    #[error(transparent)]
    Handler(#[from] FrameStateError),

    #[error("repository error: {0}")]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ApplyError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::EntityNotFound {
                environment,
                entity,
            } => ApplyError::Roles(RoleAssignmentError::EntityNotFound {
                environment,
                entity,
            }),
            other => ApplyError::Repository(other),
        }
    }
}

// ============================================================================
// Frame state and handlers
// ============================================================================

/// The record of a committed frame application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameState {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_id: Option<FrameId>,
    pub frame_name: String,
    pub role_assignments: BTreeMap<String, EntityId>,
    pub state: String,
    pub created_at: DateTime<Utc>,
    pub version: u32,
    /// Free-form annotations added by frame handlers.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub data: BTreeMap<String, serde_json::Value>,
}

impl FrameState {
    pub const ACTIVE: &'static str = "active";

    fn active(
        frame_id: Option<FrameId>,
        frame_name: &str,
        role_assignments: BTreeMap<String, EntityId>,
    ) -> Self {
        Self {
            frame_id,
            frame_name: frame_name.to_string(),
            role_assignments,
            state: Self::ACTIVE.to_string(),
            created_at: Utc::now(),
            version: 1,
            data: BTreeMap::new(),
        }
    }
}

/// Frame-specific logic run inside the application transaction.
///
/// `txn` already holds the new role bindings. Handlers must read entities
/// through it: the repository itself stays locked until the transaction ends.
pub trait FrameHandler {
    fn on_frame_applied(
        &self,
        txn: &ScopeTransaction<'_>,
        state: &mut FrameState,
    ) -> Result<(), FrameStateError>;
}

impl<F> FrameHandler for F
where
    F: Fn(&ScopeTransaction<'_>, &mut FrameState) -> Result<(), FrameStateError>,
{
    fn on_frame_applied(
        &self,
        txn: &ScopeTransaction<'_>,
        state: &mut FrameState,
    ) -> Result<(), FrameStateError> {
        self(txn, state)
    }
}

/// Caller-facing result of [`FrameApplicator::apply_frame`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApplyOutcome {
    pub success: bool,
    pub frame: String,
    pub roles: BTreeMap<String, EntityId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<FrameState>,
}

// ============================================================================
// Applicator
// ============================================================================

pub struct FrameApplicator<'a, C: Corpus + ?Sized, R: TransactionalRepository> {
    corpus: &'a C,
    repository: &'a R,
    /// Lowercase frame name → handlers, run in registration order.
    handlers: BTreeMap<String, Vec<Box<dyn FrameHandler + 'a>>>,
}

impl<'a, C: Corpus + ?Sized, R: TransactionalRepository> FrameApplicator<'a, C, R> {
    pub fn new(corpus: &'a C, repository: &'a R) -> Self {
        Self {
            corpus,
            repository,
            handlers: BTreeMap::new(),
        }
    }

    pub fn with_handler(mut self, frame_name: &str, handler: impl FrameHandler + 'a) -> Self {
        self.register_handler(frame_name, handler);
        self
    }

    pub fn register_handler(&mut self, frame_name: &str, handler: impl FrameHandler + 'a) {
        self.handlers
            .entry(frame_name.to_lowercase())
            .or_default()
            .push(Box::new(handler));
    }

    /// Applies a frame and reports the outcome without failing.
    pub fn apply_frame(
        &self,
        environment: EnvironmentId,
        frame_ref: &FrameRef,
        roles: &BTreeMap<String, EntityId>,
    ) -> ApplyOutcome {
        match self.try_apply_frame(environment, frame_ref, roles) {
            Ok(state) => ApplyOutcome {
                success: true,
                frame: state.frame_name.clone(),
                roles: roles.clone(),
                error: None,
                state: Some(state),
            },
            Err(err) => {
                tracing::debug!(environment, frame = %frame_ref, error = %err, "frame application rejected");
                ApplyOutcome {
                    success: false,
                    frame: frame_ref.to_string(),
                    roles: roles.clone(),
                    error: Some(err.to_string()),
                    state: None,
                }
            }
        }
    }

    /// Applies a frame atomically: on any error no entity in `environment`
    /// is changed.
    pub fn try_apply_frame(
        &self,
        environment: EnvironmentId,
        frame_ref: &FrameRef,
        roles: &BTreeMap<String, EntityId>,
    ) -> Result<FrameState, ApplyError> {
        let state = self
            .repository
            .transaction(environment, |txn| self.apply_in(txn, frame_ref, roles))?;
        tracing::info!(
            environment,
            frame = %state.frame_name,
            roles = state.role_assignments.len(),
            "frame applied"
        );
        Ok(state)
    }

    fn apply_in(
        &self,
        txn: &mut ScopeTransaction<'_>,
        frame_ref: &FrameRef,
        roles: &BTreeMap<String, EntityId>,
    ) -> Result<FrameState, ApplyError> {
        let definition = self.resolve_definition(txn, frame_ref)?;
        let frame_name = definition.name.clone();

        validate_roles(&definition, roles)?;

        let entity_ids: BTreeSet<EntityId> = roles.values().copied().collect();
        for id in &entity_ids {
            txn.entity(*id)?;
        }

        for (role, id) in roles {
            txn.entity_mut(*id)?.activate(&frame_name, role);
        }
        for id in entity_ids {
            if !txn.has_frame(id, &frame_name) {
                let mut record = definition.clone();
                record.entity_id = id;
                txn.materialize(record);
            }
        }

        let frame_id = match &definition.frame {
            FrameRef::Id(id) => Some(*id),
            FrameRef::Name(_) => None,
        };
        let mut state = FrameState::active(frame_id, &frame_name, roles.clone());
        if let Some(handlers) = self.handlers.get(&frame_name.to_lowercase()) {
            for handler in handlers {
                handler.on_frame_applied(txn, &mut state)?;
            }
        }
        Ok(state)
    }

    /// A persisted record in scope wins over the corpus definition.
    fn resolve_definition(
        &self,
        txn: &ScopeTransaction<'_>,
        frame_ref: &FrameRef,
    ) -> Result<PersistedFrame, ApplyError> {
        if let Some(record) = txn.frames().iter().find(|r| r.answers_to(frame_ref)) {
            return Ok(record.clone());
        }
        self.corpus
            .frame_by_ref(frame_ref)
            .map(|frame| PersistedFrame::mirror(0, frame))
            .ok_or_else(|| ApplyError::UnknownFrame(frame_ref.clone()))
    }
}

/// Role names match element names case-insensitively.
fn validate_roles(
    definition: &PersistedFrame,
    roles: &BTreeMap<String, EntityId>,
) -> Result<(), RoleAssignmentError> {
    if roles.is_empty() {
        return Err(RoleAssignmentError::Empty(definition.name.clone()));
    }

    // Keys are unique as given; only case can collide.
    let mut seen = BTreeSet::new();
    let duplicates: Vec<String> = roles
        .keys()
        .filter(|role| !seen.insert(role.to_lowercase()))
        .cloned()
        .collect();
    if !duplicates.is_empty() {
        return Err(RoleAssignmentError::DuplicateRoles {
            frame: definition.name.clone(),
            duplicates,
        });
    }

    let unknown: Vec<String> = roles
        .keys()
        .filter(|role| {
            !definition
                .elements
                .iter()
                .any(|e| e.name.eq_ignore_ascii_case(role))
        })
        .cloned()
        .collect();
    if !unknown.is_empty() {
        return Err(RoleAssignmentError::UnknownRoles {
            frame: definition.name.clone(),
            unknown,
        });
    }

    let missing: Vec<String> = definition
        .elements
        .iter()
        .filter(|e| e.core_type.is_required())
        .filter(|e| !roles.keys().any(|role| role.eq_ignore_ascii_case(&e.name)))
        .map(|e| e.name.clone())
        .collect();
    if !missing.is_empty() {
        return Err(RoleAssignmentError::MissingRoles {
            frame: definition.name.clone(),
            missing,
        });
    }
    Ok(())
}
