use std::{
    fs,
    time::{Duration, UNIX_EPOCH},
};

use oathplate_calc::{
    domain::{AppState, CacheRecord, PriceSnapshot, PriceTriple, Provenance, ProvenanceTag},
    infra::{CacheError, CacheStore, JsonFileCache},
};

fn record() -> CacheRecord {
    let mut state = AppState::new(
        PriceSnapshot::default(),
        Provenance::fetched(UNIX_EPOCH + Duration::from_secs(1_700_000_000)),
    );
    state.apply_edit("shale", "1,301").unwrap();
    state.apply_edit("item2.high", "31.5m").unwrap();
    state.to_record()
}

#[test]
fn round_trips_snapshot_and_provenance() {
    let dir = tempfile::tempdir().unwrap();
    let cache = JsonFileCache::new(dir.path().join("prices_cache.json"));
    let saved = record();

    cache.save(&saved).unwrap();
    let loaded = cache.load().unwrap().unwrap();

    assert_eq!(loaded, saved);
    assert_eq!(loaded.provenance.tag, ProvenanceTag::Manual);
    assert_eq!(loaded.snapshot.ingredient_a, PriceTriple::flat(1_301));
    assert_eq!(loaded.snapshot.items[1].price.high, 31_500_000);
}

#[test]
fn absent_and_corrupt_are_distinct_but_both_unusable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices_cache.json");
    let cache = JsonFileCache::new(&path);

    assert!(matches!(cache.load(), Ok(None)));
    assert!(cache.load_usable().is_none());

    fs::write(&path, "{ not json").unwrap();
    assert!(matches!(cache.load(), Err(CacheError::Corrupt(_))));
    assert!(cache.load_usable().is_none());
}

#[test]
fn save_replaces_previous_file_without_leftovers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices_cache.json");
    let cache = JsonFileCache::new(&path);

    cache
        .save(&CacheRecord {
            snapshot: PriceSnapshot::default(),
            provenance: Provenance::manual(),
        })
        .unwrap();
    let newer = record();
    cache.save(&newer).unwrap();

    assert_eq!(cache.load().unwrap(), Some(newer));
    let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
    assert_eq!(entries.len(), 1, "temp files must not be left behind");
}

#[test]
fn missing_provenance_defaults_to_manual() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prices_cache.json");
    let snapshot = serde_json::to_value(PriceSnapshot::default()).unwrap();
    fs::write(&path, serde_json::json!({ "snapshot": snapshot }).to_string()).unwrap();

    let loaded = JsonFileCache::new(&path).load().unwrap().unwrap();
    assert_eq!(loaded.provenance, Provenance::manual());
    assert!(loaded.provenance.fetched_at().is_none());
}
