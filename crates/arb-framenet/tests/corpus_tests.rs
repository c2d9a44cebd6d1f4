use anyhow::Result;
use arb_framenet::fixtures::{self, ids};
use arb_framenet::{Corpus, CorpusError, InMemoryCorpus, SemanticId};

fn names(frames: &[&arb_framenet::Frame]) -> Vec<String> {
    frames.iter().map(|f| f.name.clone()).collect()
}

#[test]
fn resolve_frame_tries_frame_then_element_then_lexical_unit() {
    let corpus = fixtures::synthetic_corpus();
    let resolve = |raw: &str| {
        corpus
            .resolve_frame(&SemanticId::parse(raw).unwrap())
            .map(|f| f.id)
    };

    assert_eq!(resolve("139"), Some(ids::GIVING));
    assert_eq!(resolve(&ids::GETTING_THEME.to_string()), Some(ids::GETTING));
    assert_eq!(resolve(&ids::LU_RENT.to_string()), Some(ids::RENTING));
    assert_eq!(resolve("commerce_BUY"), Some(ids::COMMERCE_BUY));
    assert_eq!(resolve("424242"), None);
    assert_eq!(resolve("No_such_frame"), None);
}

#[test]
fn frames_by_lemma_filters_on_part_of_speech() {
    let corpus = fixtures::synthetic_corpus();

    assert_eq!(names(&corpus.frames_by_lemma("GIVE", None)), vec!["Giving"]);
    assert_eq!(
        names(&corpus.frames_by_lemma("purchase", Some("n"))),
        vec!["Commerce_buy"]
    );
    assert!(corpus.frames_by_lemma("purchase", Some("v")).is_empty());
}

#[test]
fn search_ranks_name_hits_before_definition_hits() {
    let corpus = fixtures::synthetic_corpus();

    let hits = corpus.search_frames("commerce", 10);
    assert_eq!(names(&hits), vec!["Commerce_buy", "Commerce_sell"]);

    // "goods" appears only in definitions.
    let hits = corpus.search_frames("goods", 10);
    assert_eq!(names(&hits), vec!["Commerce_buy", "Commerce_sell", "Renting"]);

    assert_eq!(corpus.search_frames("goods", 1).len(), 1);
    assert!(corpus.search_frames("   ", 10).is_empty());
}

#[test]
fn related_frames_filters_by_relation_type() {
    let corpus = fixtures::synthetic_corpus();
    let renting = corpus.frame_by_id(ids::RENTING).unwrap();

    assert_eq!(
        names(&corpus.related_frames(renting, Some("inheritance"))),
        vec!["Commerce_buy"]
    );
    assert_eq!(
        names(&corpus.related_frames(renting, None)),
        vec!["Commerce_buy", "Giving"]
    );
    let malformed = corpus.frame_by_id(ids::MALFORMED).unwrap();
    assert!(corpus.related_frames(malformed, None).is_empty());
}

#[test]
fn corpus_round_trips_through_a_file() -> Result<()> {
    let corpus = fixtures::synthetic_corpus();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("corpus.json");
    std::fs::write(&path, serde_json::to_string_pretty(&corpus.to_document())?)?;

    let reloaded = InMemoryCorpus::from_path(&path)?;
    assert_eq!(reloaded.len(), corpus.len());
    assert_eq!(reloaded.version(), Some("synthetic-1"));
    assert_eq!(
        reloaded.frame_by_id(ids::RENTING),
        corpus.frame_by_id(ids::RENTING)
    );
    assert_eq!(
        reloaded.lexical_unit_by_id(ids::LU_GIVE).map(|lu| lu.frame.id),
        Some(ids::GIVING)
    );
    Ok(())
}

#[test]
fn missing_file_and_bad_json_are_reported() {
    let err = InMemoryCorpus::from_path("/definitely/not/here.json").unwrap_err();
    assert!(matches!(err, CorpusError::Io(_)));

    let err = InMemoryCorpus::from_json_str(r#"{"frames": [{"id": "x"}]}"#).unwrap_err();
    assert!(matches!(err, CorpusError::Parse(_)));

    let err = InMemoryCorpus::from_json_str(
        r#"{"frames": [{"id": 1, "name": "A", "elements": [{"id": 2, "name": "B", "core_type": "sometimes"}]}]}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("sometimes"));
}
