use popup_search::classify::{Classifier, SearchBackend, TargetKind};

#[test]
fn bare_domain_opens_directly() {
    let t = Classifier::default().classify("example.com", SearchBackend::Web);
    assert_eq!(t.kind, TargetKind::DirectUrl);
    assert_eq!(t.destination, "http://example.com");
    assert_eq!(t.search_backend, None);
}

#[test]
fn phrase_goes_to_web_search() {
    let t = Classifier::default().classify("hello world", SearchBackend::default());
    assert_eq!(t.kind, TargetKind::SearchQuery);
    assert_eq!(t.search_backend, Some(SearchBackend::Web));
    assert_eq!(t.destination, "https://www.google.com/search?q=hello%20world");
}

#[test]
fn blank_input_is_an_empty_search() {
    let t = Classifier::default().classify("   ", SearchBackend::Web);
    assert_eq!(t.kind, TargetKind::SearchQuery);
    assert!(t.destination.is_empty());
    assert!(t.is_empty());
}

#[test]
fn bare_word_never_becomes_a_url() {
    let t = Classifier::default().classify("rustlang", SearchBackend::Web);
    assert_eq!(t.kind, TargetKind::SearchQuery);
}

#[test]
fn backend_preference_selects_template() {
    let c = Classifier::default();
    let images = c.classify("cats", SearchBackend::Images);
    assert_eq!(images.destination, "https://www.google.com/search?tbm=isch&q=cats");
    let videos = c.classify("cats", SearchBackend::Videos);
    assert_eq!(
        videos.destination,
        "https://www.youtube.com/results?search_query=cats"
    );
    assert_eq!(videos.search_backend, Some(SearchBackend::Videos));
}

#[test]
fn surrounding_whitespace_is_trimmed() {
    let t = Classifier::default().classify("  github.io  ", SearchBackend::Web);
    assert_eq!(t.kind, TargetKind::DirectUrl);
    assert_eq!(t.destination, "http://github.io");
}
