//! Integration tests for the batch engine: identifier parsing, fan-out,
//! rate gating, summary aggregation, and the progress callback.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use mockito::Matcher;

use gh_pr::github::GraphQLClient;
use gh_pr::services::{BatchConfig, BatchEngine, MutationOrchestrator, ProgressCallback, RateGate};

fn engine_for(server: &mockito::Server, rate_limit: f64, max_concurrency: usize) -> BatchEngine {
    let client = GraphQLClient::with_endpoint("test_token", &server.url()).unwrap();
    BatchEngine::new(
        MutationOrchestrator::new(client),
        BatchConfig {
            rate_limit,
            max_concurrency,
        },
    )
    .unwrap()
}

fn permission_body(level: &str) -> String {
    format!(
        r#"{{"data": {{"repository": {{"viewerPermission": "{}"}}, "viewer": {{"login": "testuser"}}}}}}"#,
        level
    )
}

fn threads_body(nodes: &str) -> String {
    format!(
        r#"{{
            "data": {{
                "repository": {{
                    "pullRequest": {{
                        "reviewThreads": {{
                            "nodes": [{}],
                            "pageInfo": {{"hasNextPage": false, "endCursor": null}}
                        }}
                    }}
                }}
            }}
        }}"#,
        nodes
    )
}

const EMPTY_SUGGESTIONS_BODY: &str = r#"{
    "data": {
        "repository": {
            "pullRequest": {
                "reviews": {"nodes": []}
            }
        }
    }
}"#;

async fn mock_read_only_pr(server: &mut mockito::Server) {
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex("GetPRThreads".to_string()))
        .with_status(200)
        .with_body(threads_body(""))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex("GetPRSuggestions".to_string()))
        .with_status(200)
        .with_body(EMPTY_SUGGESTIONS_BODY)
        .create_async()
        .await;
}

#[tokio::test]
async fn test_malformed_identifier_never_reaches_network() {
    let mut server = mockito::Server::new_async().await;
    let any_call = server
        .mock("POST", "/")
        .with_status(200)
        .with_body(r#"{"data": {}}"#)
        .expect(0)
        .create_async()
        .await;

    let engine = engine_for(&server, 0.0, 2);
    let summary = engine
        .resolve_outdated_comments_batch(&["not-a-pr".to_string()])
        .await;

    assert_eq!(summary.total_prs, 1);
    assert_eq!(summary.successful, 0);
    assert_eq!(summary.failed, 1);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].starts_with("PR #not-a-pr:"));
    assert!(summary.errors[0].contains("Cannot parse PR identifier"));
    any_call.assert_async().await;
}

#[tokio::test]
async fn test_summary_partitions_mixed_results() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex("CheckPermissions".to_string()))
        .with_status(200)
        .with_body(permission_body("WRITE"))
        .expect_at_least(1)
        .create_async()
        .await;
    // PR 1 has one resolvable thread; PR 2 does not exist.
    server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("GetPRThreads".to_string()),
            Matcher::Regex(r#""number":1[,}]"#.to_string()),
        ]))
        .with_status(200)
        .with_body(threads_body(r#"{"id": "t1", "isOutdated": true, "isResolved": false}"#))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("GetPRThreads".to_string()),
            Matcher::Regex(r#""number":2[,}]"#.to_string()),
        ]))
        .with_status(200)
        .with_body(r#"{"data": {"repository": {"pullRequest": null}}}"#)
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex("ResolveReviewThread".to_string()))
        .with_status(200)
        .with_body(r#"{"data": {"resolveReviewThread": {"thread": {"id": "t1", "isResolved": true}}}}"#)
        .create_async()
        .await;

    let engine = engine_for(&server, 0.0, 2);
    let identifiers = vec![
        "owner/repo#1".to_string(),
        "owner/repo#2".to_string(),
        "garbage".to_string(),
    ];
    let summary = engine.resolve_outdated_comments_batch(&identifiers).await;

    assert_eq!(summary.total_prs, 3);
    assert_eq!(summary.successful, 1);
    assert_eq!(summary.failed, 2);
    assert_eq!(summary.total_prs, summary.successful + summary.failed);
    assert_eq!(summary.total_items_processed, 1);
    assert!(
        summary
            .errors
            .iter()
            .any(|e| e.contains("Pull request #2 not found"))
    );
    assert!(summary.errors.iter().any(|e| e.starts_with("PR #garbage:")));
}

#[tokio::test]
async fn test_rate_gate_spaces_units_globally() {
    let mut server = mockito::Server::new_async().await;
    mock_read_only_pr(&mut server).await;

    let engine = engine_for(&server, 0.2, 5);
    let identifiers = vec!["owner/repo#1".to_string(), "owner/repo#2".to_string()];

    let started = Instant::now();
    let summary = engine.get_pr_data_batch(&identifiers).await;
    let elapsed = started.elapsed();

    assert_eq!(summary.successful, 2);
    assert!(
        elapsed >= Duration::from_millis(200),
        "batch finished in {:?}, faster than the rate limit allows",
        elapsed
    );
}

#[tokio::test]
async fn test_shared_gate_spaces_units_across_engines() {
    let mut server = mockito::Server::new_async().await;
    mock_read_only_pr(&mut server).await;

    // Two engines sharing one gate stay within the same global budget.
    let gate = Arc::new(RateGate::new(Duration::from_millis(150)));
    let make_engine = || {
        let client = GraphQLClient::with_endpoint("test_token", &server.url()).unwrap();
        BatchEngine::new(
            MutationOrchestrator::new(client),
            BatchConfig {
                rate_limit: 0.0,
                max_concurrency: 2,
            },
        )
        .unwrap()
        .with_rate_gate(Arc::clone(&gate))
    };
    let first = make_engine();
    let second = make_engine();

    let started = Instant::now();
    let first_ids = ["owner/repo#1".to_string()];
    let second_ids = ["owner/repo#2".to_string()];
    let (left, right) = tokio::join!(
        first.get_pr_data_batch(&first_ids),
        second.get_pr_data_batch(&second_ids),
    );
    let elapsed = started.elapsed();

    assert_eq!(left.successful + right.successful, 2);
    assert!(
        elapsed >= gate.interval(),
        "engines sharing a gate finished in {:?}, below the shared spacing",
        elapsed
    );
}

#[tokio::test]
async fn test_zero_rate_limit_adds_no_deliberate_delay() {
    let mut server = mockito::Server::new_async().await;
    mock_read_only_pr(&mut server).await;

    let engine = engine_for(&server, 0.0, 5);
    let identifiers: Vec<String> = (1..=4).map(|n| format!("owner/repo#{}", n)).collect();

    let started = Instant::now();
    let summary = engine.get_pr_data_batch(&identifiers).await;
    let elapsed = started.elapsed();

    assert_eq!(summary.successful, 4);
    assert!(
        elapsed < Duration::from_millis(200),
        "batch took {:?} with no rate limit configured",
        elapsed
    );
}

#[tokio::test]
async fn test_progress_callback_fires_once_per_item() {
    let mut server = mockito::Server::new_async().await;
    mock_read_only_pr(&mut server).await;

    let completions = Arc::new(AtomicUsize::new(0));
    let callback: ProgressCallback = {
        let completions = Arc::clone(&completions);
        Arc::new(move |_| {
            completions.fetch_add(1, Ordering::SeqCst);
        })
    };

    let client = GraphQLClient::with_endpoint("test_token", &server.url()).unwrap();
    let engine = BatchEngine::new(
        MutationOrchestrator::new(client),
        BatchConfig {
            rate_limit: 0.0,
            max_concurrency: 3,
        },
    )
    .unwrap()
    .with_progress(callback);

    let identifiers = vec![
        "owner/repo#1".to_string(),
        "owner/repo#2".to_string(),
        "broken".to_string(),
    ];
    let summary = engine.get_pr_data_batch(&identifiers).await;

    assert_eq!(summary.total_prs, 3);
    assert_eq!(completions.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_failed_pr_does_not_abort_the_batch() {
    let mut server = mockito::Server::new_async().await;
    // Threads for PR 1 fail hard at transport level; PR 2 succeeds.
    server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("GetPRThreads".to_string()),
            Matcher::Regex(r#""number":1[,}]"#.to_string()),
        ]))
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("GetPRThreads".to_string()),
            Matcher::Regex(r#""number":2[,}]"#.to_string()),
        ]))
        .with_status(200)
        .with_body(threads_body(r#"{"id": "t1", "isOutdated": false, "isResolved": false}"#))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex("GetPRSuggestions".to_string()))
        .with_status(200)
        .with_body(EMPTY_SUGGESTIONS_BODY)
        .create_async()
        .await;

    let engine = engine_for(&server, 0.0, 2);
    let identifiers = vec!["owner/repo#1".to_string(), "owner/repo#2".to_string()];
    let summary = engine.get_pr_data_batch(&identifiers).await;

    assert_eq!(summary.total_prs, 2);
    assert_eq!(summary.successful, 1);
    assert_eq!(summary.failed, 1);
    assert!(summary.errors.iter().any(|e| e.contains("HTTP 500")));
}

#[tokio::test]
async fn test_accept_suggestions_batch_counts_applied_items() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex("CheckPermissions".to_string()))
        .with_status(200)
        .with_body(permission_body("WRITE"))
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex("GetPRSuggestions".to_string()))
        .with_status(200)
        .with_body(
            r#"{
                "data": {
                    "repository": {
                        "pullRequest": {
                            "reviews": {
                                "nodes": [
                                    {"comments": {"nodes": [{"suggestions": {"nodes": [{"id": "s1"}, {"id": "s2"}]}}]}}
                                ]
                            }
                        }
                    }
                }
            }"#,
        )
        .create_async()
        .await;
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex("AcceptSuggestion".to_string()))
        .with_status(200)
        .with_body(r#"{"data": {"acceptSuggestion": {"clientMutationId": "m"}}}"#)
        .expect(2)
        .create_async()
        .await;

    let engine = engine_for(&server, 0.0, 1);
    let summary = engine
        .accept_suggestions_batch(&["owner/repo#1".to_string()])
        .await;

    assert_eq!(summary.successful, 1);
    assert_eq!(summary.total_items_processed, 2);
    assert!(summary.errors.is_empty());
}

#[tokio::test]
async fn test_permission_denied_pr_fails_without_fetching_targets() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("POST", "/")
        .match_body(Matcher::Regex("CheckPermissions".to_string()))
        .with_status(200)
        .with_body(permission_body("READ"))
        .create_async()
        .await;
    let threads_mock = server
        .mock("POST", "/")
        .match_body(Matcher::Regex("GetPRThreads".to_string()))
        .with_status(200)
        .with_body(threads_body(""))
        .expect(0)
        .create_async()
        .await;

    let engine = engine_for(&server, 0.0, 1);
    let summary = engine
        .resolve_outdated_comments_batch(&["a/b#1".to_string()])
        .await;

    assert_eq!(summary.failed, 1);
    assert!(
        summary
            .errors
            .iter()
            .any(|e| e.contains("Insufficient permissions"))
    );
    threads_mock.assert_async().await;
}
