//! Resume semantics: a persisted cursor reproduces the exact next query, and
//! chunk counters continue across runs.

use crate::common;
use scopus_harvester::resume::{Checkpoint, CheckpointStore};
use scopus_harvester::StopReason;
use wiremock::matchers::{method, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_resume_reissues_the_checkpointed_cursor() {
    let server = MockServer::start().await;
    let root = tempfile::TempDir::new().unwrap();
    let config = common::test_config(&server.uri(), root.path());

    CheckpointStore::new(&config.state_file)
        .save(&Checkpoint {
            cursor: "resume-c".to_string(),
            chunk_counter: 4,
        })
        .unwrap();

    // The very first request must carry the persisted cursor, as if the
    // previous run had never stopped.
    Mock::given(method("GET"))
        .and(query_param("cursor", "resume-c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::empty_page_body()))
        .expect(1)
        .mount(&server)
        .await;

    let report = common::run_harvest(&config).await;
    assert_eq!(report.reason, StopReason::Exhausted);

    // Nothing fetched, so cursor and counter are unchanged.
    let checkpoint = common::load_checkpoint(&config);
    assert_eq!(checkpoint.cursor, "resume-c");
    assert_eq!(checkpoint.chunk_counter, 4);
    assert!(common::chunk_files(&config).is_empty());
}

#[tokio::test]
async fn test_chunk_counter_continues_across_runs() {
    let server = MockServer::start().await;
    let root = tempfile::TempDir::new().unwrap();
    let config = common::test_config(&server.uri(), root.path());

    CheckpointStore::new(&config.state_file)
        .save(&Checkpoint {
            cursor: "resume-c".to_string(),
            chunk_counter: 4,
        })
        .unwrap();

    Mock::given(method("GET"))
        .and(query_param("cursor", "resume-c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_body(
            vec![common::entry("next-batch", "2024-01-05")],
            None,
        )))
        .mount(&server)
        .await;

    let report = common::run_harvest(&config).await;
    assert_eq!(report.reason, StopReason::EndOfResults);
    assert_eq!(report.chunks_written, 1);

    // The new chunk continues the global numbering.
    let files = common::chunk_files(&config);
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_string_lossy().to_string();
    assert!(name.starts_with("scopus_raw_000005_"), "unexpected name {name}");

    let checkpoint = common::load_checkpoint(&config);
    assert_eq!(checkpoint.chunk_counter, 5);
}

#[tokio::test]
async fn test_two_consecutive_runs_walk_disjoint_pages() {
    let server = MockServer::start().await;
    let root = tempfile::TempDir::new().unwrap();

    Mock::given(method("GET"))
        .and(query_param("cursor", "*"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_body(
            vec![common::entry("run1", "2024-02-01")],
            Some("c2"),
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(query_param("cursor", "c2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::page_body(
            vec![common::entry("run2", "2024-01-15")],
            None,
        )))
        .expect(1)
        .mount(&server)
        .await;

    // Run 1 stops on its one-request quota.
    let mut config = common::test_config(&server.uri(), root.path());
    config.max_requests_per_run = 1;
    let first = common::run_harvest(&config).await;
    assert_eq!(first.reason, StopReason::QuotaReached);

    // Run 2 picks up at c2 and drains the rest.
    config.max_requests_per_run = 100;
    let second = common::run_harvest(&config).await;
    assert_eq!(second.reason, StopReason::EndOfResults);
    assert_eq!(second.counters.requests_done, 1);

    let files = common::chunk_files(&config);
    assert_eq!(files.len(), 2);
    assert_eq!(common::chunk_titles(&files[0]), ["run1"]);
    assert_eq!(common::chunk_titles(&files[1]), ["run2"]);
}
