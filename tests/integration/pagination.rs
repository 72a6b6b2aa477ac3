//! End-to-end pagination: termination reasons, flush cadence, and the
//! cursor each run leaves behind in its checkpoint.

use crate::common;
use scopus_harvester::StopReason;
use wiremock::matchers::{header, method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_walk_until_empty_page_stops_with_exhausted() {
    let server = MockServer::start().await;
    let root = tempfile::TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(query_param("cursor", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_body(
            vec![
                common::entry("p1-a", "2024-03-01"),
                common::entry("p1-b", "2024-02-20"),
            ],
            Some("c2"),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("cursor", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_body(
            vec![common::entry("p2-a", "2024-02-10")],
            Some("c3"),
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("cursor", "c3"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::empty_page_body()))
        .mount(&server)
        .await;

    let config = common::test_config(&server.uri(), root.path());
    let report = common::run_harvest(&config).await;

    assert_eq!(report.reason, StopReason::Exhausted);
    assert_eq!(report.counters.requests_done, 2);
    assert_eq!(report.counters.total_docs, 3);

    // One final flush with all three records in API order.
    let files = common::chunk_files(&config);
    assert_eq!(files.len(), 1);
    assert_eq!(common::chunk_titles(&files[0]), ["p1-a", "p1-b", "p2-a"]);

    // The empty page never advanced the cursor.
    let checkpoint = common::load_checkpoint(&config);
    assert_eq!(checkpoint.cursor, "c3");
    assert_eq!(checkpoint.chunk_counter, 1);
}

#[tokio::test]
async fn test_missing_next_cursor_stops_with_end_of_results() {
    let server = MockServer::start().await;
    let root = tempfile::TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(query_param("cursor", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_body(
            vec![common::entry("p1-a", "2024-03-01")],
            Some("c2"),
        )))
        .mount(&server)
        .await;
    // Final page: entries present, no @next cursor.
    Mock::given(method("GET"))
        .and(query_param("cursor", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_body(
            vec![common::entry("p2-a", "2024-02-10")],
            None,
        )))
        .mount(&server)
        .await;

    let config = common::test_config(&server.uri(), root.path());
    let report = common::run_harvest(&config).await;

    assert_eq!(report.reason, StopReason::EndOfResults);
    assert_eq!(report.counters.total_docs, 2);

    // Both pages flushed exactly once.
    let files = common::chunk_files(&config);
    assert_eq!(files.len(), 1);
    assert_eq!(common::chunk_titles(&files[0]), ["p1-a", "p2-a"]);

    // Without an @next the cursor stays at the last one issued.
    let checkpoint = common::load_checkpoint(&config);
    assert_eq!(checkpoint.cursor, "c2");
    assert_eq!(checkpoint.chunk_counter, 1);
}

#[tokio::test]
async fn test_quota_stop_checkpoints_the_advanced_cursor() {
    let server = MockServer::start().await;
    let root = tempfile::TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(query_param("cursor", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_body(
            vec![common::entry("p1-a", "2024-03-01")],
            Some("c2"),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut config = common::test_config(&server.uri(), root.path());
    config.max_requests_per_run = 1;
    let report = common::run_harvest(&config).await;

    assert_eq!(report.reason, StopReason::QuotaReached);
    assert_eq!(report.counters.requests_done, 1);
    // Last cover date surfaces for operator visibility on quota stops.
    assert_eq!(report.last_cover_date.as_deref(), Some("2024-03-01"));

    // The checkpoint holds the next unfetched page's cursor.
    let checkpoint = common::load_checkpoint(&config);
    assert_eq!(checkpoint.cursor, "c2");
    assert_eq!(checkpoint.chunk_counter, 1);
}

#[tokio::test]
async fn test_chunk_flush_cadence_and_final_flush() {
    let server = MockServer::start().await;
    let root = tempfile::TempDir::new().unwrap();

    let pages = [
        ("*", "e1", Some("c2")),
        ("c2", "e2", Some("c3")),
        ("c3", "e3", Some("c4")),
    ];
    for (cursor, title, next) in pages {
        Mock::given(method("GET"))
            .and(query_param("cursor", cursor))
            .respond_with(ResponseTemplate::new(200).set_body_json(common::page_body(
                vec![common::entry(title, "2024-01-01")],
                next,
            )))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(query_param("cursor", "c4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::empty_page_body()))
        .mount(&server)
        .await;

    let mut config = common::test_config(&server.uri(), root.path());
    config.chunk_size_requests = 2;
    let report = common::run_harvest(&config).await;

    assert_eq!(report.reason, StopReason::Exhausted);
    assert_eq!(report.chunks_written, 2);

    // Chunk 1 flushed mid-run after request 2; chunk 2 holds the leftover.
    let files = common::chunk_files(&config);
    assert_eq!(files.len(), 2);
    assert_eq!(common::chunk_titles(&files[0]), ["e1", "e2"]);
    assert_eq!(common::chunk_titles(&files[1]), ["e3"]);

    // chunk_counter equals the number of chunk files ever written.
    let checkpoint = common::load_checkpoint(&config);
    assert_eq!(checkpoint.chunk_counter, 2);
    assert_eq!(checkpoint.cursor, "c4");
}

#[tokio::test]
async fn test_requests_carry_credential_and_full_query_skeleton() {
    let server = MockServer::start().await;
    let root = tempfile::TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(header("X-ELS-APIKey", "test-key"))
        .and(header("Accept", "application/json"))
        .and(query_param("query", "AFFIL('Test University')"))
        .and(query_param("date", "2023-2026"))
        .and(query_param("sort", "-coverDate"))
        .and(query_param("count", "25"))
        .and(query_param("view", "COMPLETE"))
        .and(query_param("cursor", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::empty_page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let config = common::test_config(&server.uri(), root.path());
    let report = common::run_harvest(&config).await;
    assert_eq!(report.reason, StopReason::Exhausted);
}
