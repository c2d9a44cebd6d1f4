//! The frame repository contract.

use crate::model::{Entity, EntityId, Environment, EnvironmentId, PersistedFrame};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("environment {0} not found")]
    EnvironmentNotFound(EnvironmentId),

    #[error("entity {entity} not found in environment {environment}")]
    EntityNotFound {
        environment: EnvironmentId,
        entity: EntityId,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Read access to persisted records, scoped by environment.
pub trait FrameRepository {
    fn frames_in_scope(
        &self,
        environment: EnvironmentId,
    ) -> Result<Vec<PersistedFrame>, RepositoryError>;

    /// Fails with [`RepositoryError::EntityNotFound`] on the first id that is
    /// not part of the environment.
    fn entities_in_scope(
        &self,
        environment: EnvironmentId,
        ids: &[EntityId],
    ) -> Result<Vec<Entity>, RepositoryError>;
}

/// A repository that can run all-or-nothing updates against one environment.
pub trait TransactionalRepository: FrameRepository {
    /// Runs `f` against a working copy of the environment. The copy replaces
    /// the stored environment only when `f` returns `Ok`; on `Err` nothing is
    /// written.
    fn transaction<T, E, F>(&self, environment: EnvironmentId, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut ScopeTransaction<'_>) -> Result<T, E>,
        E: From<RepositoryError>;
}

/// Mutable view of one environment inside a transaction.
pub struct ScopeTransaction<'a> {
    environment: &'a mut Environment,
}

impl<'a> ScopeTransaction<'a> {
    pub fn new(environment: &'a mut Environment) -> Self {
        Self { environment }
    }

    pub fn environment(&self) -> &Environment {
        self.environment
    }

    pub fn entity(&self, id: EntityId) -> Result<&Entity, RepositoryError> {
        let environment = self.environment.id;
        self.environment
            .entity(id)
            .ok_or(RepositoryError::EntityNotFound {
                environment,
                entity: id,
            })
    }

    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, RepositoryError> {
        let environment = self.environment.id;
        self.environment
            .entity_mut(id)
            .ok_or(RepositoryError::EntityNotFound {
                environment,
                entity: id,
            })
    }

    pub fn frames(&self) -> &[PersistedFrame] {
        &self.environment.frames
    }

    /// True when `entity_id` already has a materialized record named `frame_name`.
    pub fn has_frame(&self, entity_id: EntityId, frame_name: &str) -> bool {
        self.environment
            .frames_of(entity_id)
            .any(|record| record.name.eq_ignore_ascii_case(frame_name))
    }

    /// Stores a record; it becomes the entity's primary frame if it is its first.
    pub fn materialize(&mut self, mut record: PersistedFrame) {
        record.is_primary = self.environment.frames_of(record.entity_id).next().is_none();
        self.environment.frames.push(record);
    }
}
