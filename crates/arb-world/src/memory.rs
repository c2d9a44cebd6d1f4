//! In-memory repository with JSON snapshots.

use crate::model::{Entity, EntityId, Environment, EnvironmentId, PersistedFrame};
use crate::repository::{
    FrameRepository, RepositoryError, ScopeTransaction, TransactionalRepository,
};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// On-disk shape of a world: every environment with its entities and frames.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldSnapshot {
    #[serde(default)]
    pub environments: Vec<Environment>,
}

/// Environments held in memory behind a single lock.
///
/// Transactions hold the write lock for their whole duration, so concurrent
/// writers are serialized and readers only ever observe committed state.
#[derive(Debug, Default)]
pub struct InMemoryRepository {
    environments: RwLock<BTreeMap<EnvironmentId, Environment>>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: WorldSnapshot) -> Self {
        let environments = snapshot
            .environments
            .into_iter()
            .map(|env| (env.id, env))
            .collect();
        Self {
            environments: RwLock::new(environments),
        }
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let snapshot: WorldSnapshot = serde_json::from_str(&text)?;
        Ok(Self::from_snapshot(snapshot))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RepositoryError> {
        let json = serde_json::to_string_pretty(&self.snapshot())?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    pub fn snapshot(&self) -> WorldSnapshot {
        WorldSnapshot {
            environments: self.environments.read().values().cloned().collect(),
        }
    }

    /// Inserts or replaces an environment.
    pub fn insert_environment(&self, environment: Environment) {
        self.environments.write().insert(environment.id, environment);
    }

    pub fn environment(&self, id: EnvironmentId) -> Option<Environment> {
        self.environments.read().get(&id).cloned()
    }

    pub fn entity(&self, environment: EnvironmentId, id: EntityId) -> Option<Entity> {
        self.environments
            .read()
            .get(&environment)
            .and_then(|env| env.entity(id).cloned())
    }
}

impl FrameRepository for InMemoryRepository {
    fn frames_in_scope(
        &self,
        environment: EnvironmentId,
    ) -> Result<Vec<PersistedFrame>, RepositoryError> {
        let guard = self.environments.read();
        let env = guard
            .get(&environment)
            .ok_or(RepositoryError::EnvironmentNotFound(environment))?;
        Ok(env.frames.clone())
    }

    fn entities_in_scope(
        &self,
        environment: EnvironmentId,
        ids: &[EntityId],
    ) -> Result<Vec<Entity>, RepositoryError> {
        let guard = self.environments.read();
        let env = guard
            .get(&environment)
            .ok_or(RepositoryError::EnvironmentNotFound(environment))?;
        ids.iter()
            .map(|id| {
                env.entity(*id)
                    .cloned()
                    .ok_or(RepositoryError::EntityNotFound {
                        environment,
                        entity: *id,
                    })
            })
            .collect()
    }
}

impl TransactionalRepository for InMemoryRepository {
    fn transaction<T, E, F>(&self, environment: EnvironmentId, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut ScopeTransaction<'_>) -> Result<T, E>,
        E: From<RepositoryError>,
    {
        let mut guard = self.environments.write();
        let mut working = guard
            .get(&environment)
            .cloned()
            .ok_or(RepositoryError::EnvironmentNotFound(environment))?;

        let result = f(&mut ScopeTransaction::new(&mut working));
        match result {
            Ok(value) => {
                guard.insert(environment, working);
                Ok(value)
            }
            Err(err) => {
                tracing::debug!(environment, "transaction rolled back");
                Err(err)
            }
        }
    }
}
