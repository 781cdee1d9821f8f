/*!
 * Integration tests for the full translate-interrupt-resume pipeline,
 * running against the file-backed session store
 */

use std::sync::Arc;

use yabtwai::app_config::{Config, TranslationConfig};
use yabtwai::chapter_segmenter::{ChapterSegmenter, RawFile, SegmentMode};
use yabtwai::orchestrator::TranslationOrchestrator;
use yabtwai::providers::mock::MockTranslator;
use yabtwai::session::{
    FileSessionStore, SessionStatus, SessionStore, SourceFile, TranslationSession,
};

use crate::common::{create_temp_dir, create_test_file, sample_book};

fn chunked_config(chunk_size: usize) -> TranslationConfig {
    let mut config = TranslationConfig::default();
    config.processing_settings.enable_chunking = true;
    config.processing_settings.chunk_size = chunk_size;
    config.processing_settings.warn_missing_content = false;
    config
}

fn session_from_book(config: TranslationConfig) -> TranslationSession {
    let chapters = ChapterSegmenter::new().segment(
        &[RawFile::new("book.txt", sample_book())],
        SegmentMode::Single,
    );
    let source_files = chapters
        .into_iter()
        .map(|c| SourceFile::new(c.source_name, c.content))
        .collect();
    TranslationSession::new(source_files, config)
}

#[tokio::test]
async fn test_pipeline_endToEnd_shouldTranslateEveryChapter() {
    let dir = create_temp_dir().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path().join("session.json")));

    let session = session_from_book(chunked_config(40));
    let total_files = session.source_files.len();

    let outcome = TranslationOrchestrator::new(Arc::new(MockTranslator::working()), store.clone())
        .run(session)
        .await
        .expect("pipeline should complete");

    assert_eq!(outcome.session.status, SessionStatus::Completed);
    assert_eq!(outcome.translated_files().len(), total_files);
    assert!(outcome
        .translated_files()
        .iter()
        .all(|f| f.content.contains("[vi]")));
    // The slot on disk is cleared after completion.
    assert!(store.get().unwrap().is_none());
}

#[tokio::test]
async fn test_pipeline_interruptAndReload_shouldResumeLosslessly() {
    let dir = create_temp_dir().unwrap();
    let slot = dir.path().join("session.json");

    // Reference run, uninterrupted.
    let reference_store = Arc::new(FileSessionStore::new(dir.path().join("ref.json")));
    let reference =
        TranslationOrchestrator::new(Arc::new(MockTranslator::working()), reference_store)
            .run(session_from_book(chunked_config(25)))
            .await
            .unwrap();

    // Interrupted run: the provider dies partway through.
    let store = Arc::new(FileSessionStore::new(&slot));
    let result = TranslationOrchestrator::new(Arc::new(MockTranslator::fail_at(5)), store.clone())
        .run(session_from_book(chunked_config(25)))
        .await;
    assert!(result.is_err());

    // Reload the session from disk, the way a fresh process start would.
    let reloaded_store = Arc::new(FileSessionStore::new(&slot));
    let reloaded = reloaded_store
        .get()
        .unwrap()
        .expect("failed session should be on disk");
    assert_eq!(reloaded.status, SessionStatus::Failed);
    assert!(reloaded.is_resumable());

    let outcome =
        TranslationOrchestrator::new(Arc::new(MockTranslator::working()), reloaded_store.clone())
            .run(reloaded)
            .await
            .expect("resume should complete");

    // Chunk-for-chunk identical to the uninterrupted run.
    assert_eq!(
        outcome.session.translated_files,
        reference.session.translated_files
    );
    assert!(reloaded_store.get().unwrap().is_none());
}

#[tokio::test]
async fn test_pipeline_missingContentAdvisory_shouldSurviveTheRun() {
    let dir = create_temp_dir().unwrap();
    let store = Arc::new(FileSessionStore::new(dir.path().join("session.json")));

    let mut config = TranslationConfig::default();
    config.processing_settings.missing_content_threshold = 30;
    let session = TranslationSession::new(
        vec![
            SourceFile::new("first.txt", "0123456789"),
            SourceFile::new("second.txt", "0123456789"),
        ],
        config,
    );

    // 60% of every chunk survives: below the 70% floor, both files flagged.
    let outcome = TranslationOrchestrator::new(Arc::new(MockTranslator::truncated(60)), store)
        .run(session)
        .await
        .unwrap();

    assert_eq!(outcome.missing_content.len(), 2);
    let advisory = outcome.advisory().unwrap();
    assert!(advisory.contains("2 file(s)"));
    assert!(advisory.contains("first.txt"));
}

#[test]
fn test_settingsPreset_loadedFromDisk_shouldFillMissingFields() {
    let dir = create_temp_dir().unwrap();
    let path = create_test_file(
        dir.path(),
        "preset.json",
        r#"{
            "model": "gemini-2.5-pro",
            "processing_settings": { "enable_chunking": true, "chunk_size": 800 }
        }"#,
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.translation.model, "gemini-2.5-pro");
    assert!(config.translation.processing_settings.enable_chunking);
    assert_eq!(config.translation.processing_settings.chunk_size, 800);
    // Absent fields carry their documented defaults.
    assert!(config.translation.processing_settings.check_and_redo);
    assert_eq!(
        config.translation.processing_settings.missing_content_threshold,
        30
    );
    assert!(config.translation.dictionary.is_empty());
}
