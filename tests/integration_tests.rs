//! Integration tests for the complete Arbitrarium frame pipeline
//!
//! These tests verify end-to-end functionality across crates:
//! - Corpus file → InMemoryCorpus → inheritance walker
//! - Suggestion → Application → World snapshot on disk
//! - Concurrent applications against one repository
//!
//! Run with: cargo test --test integration_tests

use std::collections::BTreeMap;
use std::sync::Arc;
use tempfile::tempdir;

use arb_engine::{EngineConfig, FrameApplicator, FrameSuggestionService};
use arb_framenet::fixtures::{self, ids};
use arb_framenet::{Corpus, FrameRef, InMemoryCorpus, InheritanceGraph};
use arb_world::{Entity, Environment, FrameRepository, InMemoryRepository, WorldSnapshot};

fn village() -> Environment {
    Environment::new(1, "village")
        .with_entity(Entity::new(1, "Ada").with_sense("person.n.01"))
        .with_entity(Entity::new(2, "Bo"))
        .with_entity(Entity::new(3, "Lantern"))
        .with_entity(Entity::new(4, "Cottage"))
}

// ============================================================================
// Corpus on disk → Walker
// ============================================================================

#[test]
fn test_corpus_file_round_trip_keeps_inheritance() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corpus.json");
    std::fs::write(&path, fixtures::SYNTHETIC_CORPUS_JSON).unwrap();

    let corpus = InMemoryCorpus::from_path(&path).unwrap();
    let graph = InheritanceGraph::new(&corpus);
    let renting = corpus.frame_by_id(ids::RENTING).unwrap();

    let ancestors: Vec<&str> = graph
        .ancestor_frames(renting)
        .iter()
        .map(|f| f.name.as_str())
        .collect();
    assert_eq!(ancestors, vec!["Commerce_buy", "Getting"]);
    assert_eq!(corpus.version(), Some("synthetic-1"));
}

// ============================================================================
// Suggest → Apply → Snapshot
// ============================================================================

#[test]
fn test_suggest_apply_and_reload_world() {
    let corpus = fixtures::synthetic_corpus();
    let dir = tempdir().unwrap();
    let world_path = dir.path().join("world.json");

    let snapshot = WorldSnapshot {
        environments: vec![village()],
    };
    std::fs::write(&world_path, serde_json::to_string_pretty(&snapshot).unwrap()).unwrap();
    let repo = InMemoryRepository::load(&world_path).unwrap();

    // Ask what "rent.v" evokes; take the exact lexical-unit hit.
    let service = FrameSuggestionService::new(&corpus);
    let suggestions = service.suggest_frames(&[ids::LU_RENT.to_string()], None);
    let top = suggestions.first().expect("rent.v should evoke a frame");
    assert_eq!(top.frame.id, ids::RENTING);
    assert!(top.exact);

    let roles: BTreeMap<String, u64> = [
        ("Lessee".to_string(), 1),
        ("Goods".to_string(), 4),
        ("Duration".to_string(), 3),
        ("Lessor".to_string(), 2),
    ]
    .into_iter()
    .collect();
    let applicator = FrameApplicator::new(&corpus, &repo);
    let outcome = applicator.apply_frame(1, &FrameRef::Id(top.frame.id), &roles);
    assert!(outcome.success, "{:?}", outcome.error);
    repo.save(&world_path).unwrap();

    let reloaded = InMemoryRepository::load(&world_path).unwrap();
    let ada = reloaded.entity(1, 1).unwrap();
    assert_eq!(ada.roles_in("Renting"), ["Lessee"]);
    assert_eq!(ada.sense_id.as_deref(), Some("person.n.01"));

    let records = reloaded.frames_in_scope(1).unwrap();
    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.name == "Renting" && r.is_primary));

    // Scoped suggestions now see the materialized frame.
    let scoped = FrameSuggestionService::new(&corpus)
        .with_repository(&reloaded)
        .suggest_frames(&[ids::RENTING_LESSEE.to_string()], Some(1));
    let names: Vec<&str> = scoped.iter().map(|s| s.frame.name.as_str()).collect();
    assert_eq!(names, vec!["Renting"]);
}

#[test]
fn test_suggestion_json_shape() {
    let corpus = fixtures::synthetic_corpus();
    let service = FrameSuggestionService::new(&corpus).with_config(EngineConfig {
        max_results: Some(1),
        ..EngineConfig::default()
    });

    let suggestions = service.suggest_frames(&["139"], None);
    let json = serde_json::to_value(&suggestions).unwrap();
    let first = &json[0];
    assert_eq!(first["frame"]["id"], 139);
    assert_eq!(first["frame"]["name"], "Giving");
    assert!(first["frame"]["definition"].is_string());
    assert_eq!(first["score"], 1.0);
    assert_eq!(first["role_assignments"]["Donor"], "139");
}

// ============================================================================
// Concurrency
// ============================================================================

#[test]
fn test_concurrent_applications_all_commit() {
    let corpus = Arc::new(fixtures::synthetic_corpus());
    let repo = Arc::new(InMemoryRepository::new());
    repo.insert_environment(village());

    let handles: Vec<_> = (0..4u64)
        .map(|i| {
            let corpus = Arc::clone(&corpus);
            let repo = Arc::clone(&repo);
            std::thread::spawn(move || {
                let applicator = FrameApplicator::new(corpus.as_ref(), repo.as_ref());
                let roles: BTreeMap<String, u64> = [
                    ("Donor".to_string(), i % 2 + 1),
                    ("Theme".to_string(), 3),
                    ("Recipient".to_string(), 4),
                ]
                .into_iter()
                .collect();
                applicator
                    .apply_frame(1, &FrameRef::Id(ids::GIVING), &roles)
                    .success
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }

    let env = repo.environment(1).unwrap();
    assert_eq!(env.entity(1).unwrap().roles_in("Giving"), ["Donor"]);
    assert_eq!(env.entity(2).unwrap().roles_in("Giving"), ["Donor"]);
    // One mirror per involved entity, however many times the frame was applied.
    assert_eq!(env.frames.len(), 4);
}
