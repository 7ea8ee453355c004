use popup_search::classify::{SearchBackend, TargetKind};
use popup_search::settings::Settings;
use tempfile::tempdir;

#[test]
fn missing_file_yields_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings, Settings::default());
    assert_eq!(settings.debounce_ms, 300);
    assert!(settings.remote_suggestions);
    assert_eq!(settings.default_backend, SearchBackend::Web);
}

#[test]
fn partial_file_fills_in_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    std::fs::write(
        &path,
        r#"{ "default_backend": "youtube", "tlds": ["dev"], "debounce_ms": 50 }"#,
    )
    .unwrap();
    let settings = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(settings.default_backend, SearchBackend::Videos);
    assert_eq!(settings.debounce().as_millis(), 50);
    assert_eq!(settings.history_limit, Some(100));

    let classifier = settings.classifier();
    assert_eq!(
        classifier.classify("web.dev", SearchBackend::Web).kind,
        TargetKind::DirectUrl
    );
    assert_eq!(
        classifier.classify("example.com", SearchBackend::Web).kind,
        TargetKind::SearchQuery
    );
}

#[test]
fn save_and_load_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("settings.json");
    let settings = Settings {
        debug_logging: true,
        storage_path: Some(dir.path().join("store.json")),
        remote_suggestions: false,
        ..Default::default()
    };
    settings.save(path.to_str().unwrap()).unwrap();
    let loaded = Settings::load(path.to_str().unwrap()).unwrap();
    assert_eq!(loaded, settings);
    assert!(loaded.suggest_client().is_none());
}

#[test]
fn configured_storage_path_backs_history() {
    let dir = tempdir().unwrap();
    let settings = Settings {
        storage_path: Some(dir.path().join("data").join("store.json")),
        ..Default::default()
    };
    {
        let mut history = settings.open_history();
        history.record_query("persisted").unwrap();
    }
    assert!(dir.path().join("data").join("store.json").exists());
    let history = settings.open_history();
    assert_eq!(history.all_queries()[0].query, "persisted");
}

#[test]
fn bad_endpoint_disables_remote() {
    let settings = Settings {
        suggest_endpoint: "not a url".into(),
        ..Default::default()
    };
    assert!(settings.suggest_client().is_none());
}
