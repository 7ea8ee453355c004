mod common;

use common::{FailingProvider, GatedProvider};
use popup_search::error::SuggestError;
use popup_search::suggest::SuggestClient;
use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_millis(300);
const WAIT: Duration = Duration::from_secs(5);

#[test]
fn nothing_fires_inside_the_window() {
    let provider = GatedProvider::immediate(&[("rust", &["rust lang"])]);
    let mut client = SuggestClient::new(provider.clone(), WINDOW);
    let start = Instant::now();
    client.request("rust", 1, start);
    assert!(client.poll(start + Duration::from_millis(299)).is_empty());
    assert_eq!(client.in_flight(), 0);
    assert!(client.is_pending());
}

#[test]
fn burst_issues_one_request_for_the_last_text() {
    let provider = GatedProvider::immediate(&[("rus", &["rust", "rusty"])]);
    let mut client = SuggestClient::new(provider.clone(), WINDOW);
    let start = Instant::now();
    client.request("r", 1, start);
    client.request("ru", 2, start + Duration::from_millis(100));
    client.request("rus", 3, start + Duration::from_millis(200));

    client.poll(start + Duration::from_millis(500));
    let done = client.wait(WAIT).expect("completion");
    assert_eq!(done.generation, 3);
    assert_eq!(done.query, "rus");
    assert_eq!(done.result.unwrap(), vec!["rust", "rusty"]);
    assert_eq!(provider.calls(), vec!["rus"]);
}

#[test]
fn same_query_joins_the_in_flight_fetch() {
    let (provider, gates) = GatedProvider::new(&[("rust", &["rust lang"])]);
    let mut client = SuggestClient::new(provider.clone(), WINDOW);
    let start = Instant::now();

    client.request("rust", 1, start);
    client.poll(start + WINDOW);
    assert_eq!(client.in_flight(), 1);

    client.request("rust", 2, start + WINDOW);
    client.poll(start + WINDOW * 2);
    assert_eq!(client.in_flight(), 1);

    gates["rust"].send(()).unwrap();
    let done = client.wait(WAIT).expect("completion");
    assert_eq!(done.generation, 2);
    assert_eq!(client.in_flight(), 0);
    assert_eq!(provider.calls(), vec!["rust"]);
}

#[test]
fn blank_request_cancels_pending() {
    let provider = GatedProvider::immediate(&[]);
    let mut client = SuggestClient::new(provider.clone(), WINDOW);
    let start = Instant::now();
    client.request("rust", 1, start);
    client.request("   ", 2, start);
    assert!(!client.is_pending());
    assert!(client.poll(start + WINDOW).is_empty());
    assert!(provider.calls().is_empty());
}

#[test]
fn errors_are_delivered_not_raised() {
    let provider = std::sync::Arc::new(FailingProvider(SuggestError::Network(
        "connection refused".into(),
    )));
    let mut client = SuggestClient::new(provider, WINDOW);
    client.request("rust", 7, Instant::now());
    client.flush();
    let done = client.wait(WAIT).expect("completion");
    assert_eq!(done.generation, 7);
    assert!(matches!(done.result, Err(SuggestError::Network(_))));
}
