//! End-to-end scan pipeline tests against a mock recognition engine.

mod common;

use common::{dir_filenames, engine_detection, test_context, test_png};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use lector::engine::EngineProfileKind;
use lector::error::LectorError;
use lector::services::ScanOptions;

#[tokio::test]
async fn identical_bytes_invoke_the_engine_exactly_once() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recognize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "detections": [
                engine_detection(0.0, 10.0, "hello", 0.9),
                engine_detection(60.0, 12.0, "world", 0.8),
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path(), Some(server.uri())).await;
    let png = test_png(100, 60, 128);

    let first = ctx
        .scans
        .process_upload("receipt.png", &png, &ScanOptions::default())
        .await
        .unwrap();
    assert!(!first.from_cache);
    assert_eq!(first.result.text, "hello world");
    assert_eq!(first.result.stats.detection_count, 2);
    assert_eq!(first.result.stats.avg_confidence, 85.0);
    assert!(first.warnings.is_empty());

    // Same bytes, different filename: served from cache, engine untouched.
    let second = ctx
        .scans
        .process_upload("copy-of-receipt.png", &png, &ScanOptions::default())
        .await
        .unwrap();
    assert!(second.from_cache);
    assert_eq!(second.fingerprint, first.fingerprint);
    assert_eq!(second.result, first.result);

    // One cache entry, but one history event per processing request.
    assert_eq!(ctx.cache.stats().await.unwrap().entry_count, 1);
    let history = ctx.history.list(10).await.unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].original_filename, "copy-of-receipt.png");
    assert_eq!(history[1].original_filename, "receipt.png");
    assert_eq!(history[0].content_fingerprint, first.fingerprint);
}

#[tokio::test]
async fn cache_hit_with_different_options_reuses_first_population() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recognize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "detections": [engine_detection(0.0, 10.0, "faint", 0.35)]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path(), Some(server.uri())).await;
    let png = test_png(80, 40, 10);

    let first = ctx
        .scans
        .process_upload("a.png", &png, &ScanOptions::default())
        .await
        .unwrap();
    assert_eq!(first.result.stats.detection_count, 1);

    // A stricter threshold on a repeat upload does not recompute: the
    // parameters used at first population win.
    let opts = ScanOptions {
        min_confidence: Some(0.9),
        ..Default::default()
    };
    let second = ctx.scans.process_upload("b.png", &png, &opts).await.unwrap();
    assert!(second.from_cache);
    assert_eq!(second.result.stats.detection_count, 1);
}

#[tokio::test]
async fn empty_result_is_valid_and_still_recorded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recognize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "detections": [
                engine_detection(0.0, 10.0, "noise", 0.1),
                engine_detection(0.0, 40.0, "blur", 0.1),
            ]
        })))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path(), Some(server.uri())).await;

    let outcome = ctx
        .scans
        .process_upload("blank.png", &test_png(64, 64, 200), &ScanOptions::default())
        .await
        .unwrap();

    assert_eq!(outcome.result.text, "");
    assert_eq!(outcome.result.stats.detection_count, 0);
    assert_eq!(outcome.result.stats.avg_confidence, 0.0);

    // The empty result is still a processing event and a cache entry.
    assert_eq!(ctx.cache.stats().await.unwrap().entry_count, 1);
    let history = ctx.history.list(10).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].text, "");
}

#[tokio::test]
async fn engine_failure_mutates_neither_cache_nor_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recognize"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path(), Some(server.uri())).await;

    let err = ctx
        .scans
        .process_upload("doc.png", &test_png(64, 64, 50), &ScanOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LectorError::Engine(_)));

    assert_eq!(ctx.cache.stats().await.unwrap().entry_count, 0);
    assert!(ctx.history.list(10).await.unwrap().is_empty());

    // Artifacts written before the failure stay behind for the sweeper.
    assert!(!dir_filenames(&ctx.uploads_dir).is_empty());
}

#[tokio::test]
async fn invalid_uploads_are_rejected_before_any_artifact_is_written() {
    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path(), None).await;

    let err = ctx
        .scans
        .process_upload("notes.txt", b"plain text", &ScanOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LectorError::InvalidInput(_)));

    let err = ctx
        .scans
        .process_upload("empty.png", b"", &ScanOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LectorError::InvalidInput(_)));

    let err = ctx
        .scans
        .process_upload("fake.png", b"not png bytes", &ScanOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, LectorError::InvalidInput(_)));

    assert!(dir_filenames(&ctx.uploads_dir).is_empty());
    assert!(dir_filenames(&ctx.processed_dir).is_empty());
}

#[tokio::test]
async fn batch_reports_per_file_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recognize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "detections": [engine_detection(0.0, 10.0, "ok", 0.9)]
        })))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path(), Some(server.uri())).await;

    let files = vec![
        ("good.png".to_string(), test_png(64, 64, 1)),
        ("bad.txt".to_string(), b"nope".to_vec()),
        ("also-good.png".to_string(), test_png(64, 64, 2)),
    ];
    let outcomes = ctx.scans.process_batch(files, &ScanOptions::default()).await;

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes[0].1.is_ok());
    assert!(outcomes[1].1.is_err());
    assert!(outcomes[2].1.is_ok());
}

#[tokio::test]
async fn enhancement_and_annotation_store_processed_artifacts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recognize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "detections": [engine_detection(5.0, 5.0, "boxed", 0.95)]
        })))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path(), Some(server.uri())).await;

    let opts = ScanOptions {
        annotate: true,
        ..Default::default()
    };
    let outcome = ctx
        .scans
        .process_upload("page.png", &test_png(120, 90, 77), &opts)
        .await
        .unwrap();

    let annotated = outcome.annotated_filename.expect("annotated artifact");
    assert!(annotated.starts_with("boxed_"));

    let processed = dir_filenames(&ctx.processed_dir);
    assert!(processed.iter().any(|f| f.starts_with("pre_")));
    assert!(processed.contains(&annotated));
}

#[tokio::test]
async fn quick_profile_skips_enhancement_by_default() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/recognize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "detections": [] })))
        .mount(&server)
        .await;

    let tmp = tempfile::tempdir().unwrap();
    let ctx = test_context(tmp.path(), Some(server.uri())).await;

    let opts = ScanOptions {
        profile: Some(EngineProfileKind::Quick),
        ..Default::default()
    };
    ctx.scans
        .process_upload("page.png", &test_png(64, 64, 9), &opts)
        .await
        .unwrap();

    assert!(dir_filenames(&ctx.processed_dir).is_empty());
}
