//! Environments, entities and materialized frame records
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │ InMemoryRepository (RwLock)                             │
//! │                                                         │
//! │  Environment ──┬── Entity { active_frames }             │
//! │                └── PersistedFrame { mirror of corpus }  │
//! │                                                         │
//! │  transaction(env, f): clone ─► f(&mut copy) ─► commit   │
//! │                                     └─ Err ─► drop copy │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Key Features
//!
//! - **Scoped**: every read and write is addressed to one environment
//! - **Transactional**: a failed update leaves no entity mutated
//! - **Snapshotted**: the whole world loads from and saves to one JSON file

pub mod memory;
pub mod model;
pub mod repository;


pub use memory::{InMemoryRepository, WorldSnapshot};
pub use model::{Entity, EntityId, Environment, EnvironmentId, PersistedElement, PersistedFrame};
pub use repository::{FrameRepository, RepositoryError, ScopeTransaction, TransactionalRepository};
