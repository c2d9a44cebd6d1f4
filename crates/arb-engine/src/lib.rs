//! Frame suggestion and application
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │ FrameSuggestionService                                        │
//! │   ids ──► CandidateFinder ──► RoleScorer ──► ranked matches   │
//! │             (corpus + scope)    (core roles)                  │
//! └───────────────────────────────────────────────────────────────┘
//!                              │ caller accepts a match
//!                              ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │ FrameApplicator                                               │
//! │   validate roles + entities ──► write active frames           │
//! │   (one repository transaction, all or nothing)                │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both halves borrow a [`Corpus`](arb_framenet::Corpus) and a repository;
//! neither keeps process-wide state.

pub mod application;
pub mod candidates;
pub mod config;
pub mod scorer;
pub mod service;

pub use application::{
    ApplyError, ApplyOutcome, FrameApplicator, FrameHandler, FrameState, FrameStateError,
    RoleAssignmentError,
};
pub use candidates::{CandidateFinder, CandidateSet};
pub use config::{ConfigError, EngineConfig};
pub use scorer::{FrameMatch, RoleScorer};
pub use service::{FrameSuggestion, FrameSuggestionService};
