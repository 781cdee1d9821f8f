/*!
 * Translation orchestration pipeline.
 *
 * The orchestrator owns the session state machine
 * (in-progress -> completed | failed, with failed -> in-progress on resume)
 * and drives the unit-by-unit loop: plan chunks per file, call the provider
 * once per chunk, persist after every completed unit. It is the sole mutator
 * of the session; persistence and progress reporting happen through two
 * narrow ports so other components only ever see snapshots.
 */

use log::{info, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::chunking::ChunkPlanner;
use crate::errors::AppError;
use crate::progress::EtaEstimator;
use crate::providers::Translator;
use crate::session::{Progress, SessionStatus, SessionStore, TranslatedFile, TranslationSession};

/// Snapshot handed to the progress port after each completed unit
#[derive(Debug, Clone)]
pub struct ProgressUpdate<'a> {
    /// Name of the file being translated
    pub file_name: &'a str,
    /// 1-based index of the file
    pub file_number: usize,
    /// Total number of files in the session
    pub total_files: usize,
    /// 1-based index of the chunk within the current file
    pub chunk_number: usize,
    /// Total chunks in the current file
    pub total_chunks: usize,
    /// Units completed across the whole session, previous runs included
    pub completed_units: usize,
    /// Total units across the whole session
    pub total_units: usize,
    /// Remaining-time estimate, when one can be produced
    pub eta: Option<Duration>,
}

/// Progress reporting port
pub trait ProgressSink: Send + Sync {
    /// Called after every completed unit of work
    fn on_unit_completed(&self, update: &ProgressUpdate<'_>);
}

/// Sink that ignores all updates
pub struct NullProgressSink;

impl ProgressSink for NullProgressSink {
    fn on_unit_completed(&self, _update: &ProgressUpdate<'_>) {}
}

/// Result of a completed run
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The final session state (status completed)
    pub session: TranslationSession,

    /// Names of files whose translation came back suspiciously short
    pub missing_content: Vec<String>,
}

impl RunOutcome {
    pub fn translated_files(&self) -> &[TranslatedFile] {
        &self.session.translated_files
    }

    /// Aggregate advisory for the missing-content heuristic, if any fired
    pub fn advisory(&self) -> Option<String> {
        let first = self.missing_content.first()?;
        Some(format!(
            "Possible missing content in {} file(s) (e.g. {}).",
            self.missing_content.len(),
            first
        ))
    }
}

/// Drives a session from its current cursor to completion
pub struct TranslationOrchestrator {
    translator: Arc<dyn Translator>,
    store: Arc<dyn SessionStore>,
    sink: Arc<dyn ProgressSink>,
}

impl TranslationOrchestrator {
    pub fn new(translator: Arc<dyn Translator>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            translator,
            store,
            sink: Arc::new(NullProgressSink),
        }
    }

    /// Attach a progress reporting port
    pub fn with_progress_sink(mut self, sink: Arc<dyn ProgressSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Run the session from its cursor to the end of its source files.
    ///
    /// A fresh session starts at 0/0; a resumed one picks up exactly where
    /// the persisted cursor points, seeding the in-flight file's accumulator
    /// from the persisted partial entry. On any provider error the session is
    /// persisted with status failed and the error is surfaced without retry.
    /// On clean completion the persisted copy is removed.
    pub async fn run(&self, mut session: TranslationSession) -> Result<RunOutcome, AppError> {
        let start_file = session.progress.current_file_index;
        let start_chunk = session.progress.current_chunk_index;

        session.status = SessionStatus::InProgress;
        session.touch();
        self.store.put(&session)?;

        let settings = session.settings.processing_settings.clone();
        let chunk_counts: Vec<usize> = session
            .source_files
            .iter()
            .map(|f| ChunkPlanner::count(&f.content, settings.chunk_size, settings.enable_chunking))
            .collect();
        let total_units: usize = chunk_counts.iter().sum();
        let initial_completed: usize = chunk_counts
            .iter()
            .take(start_file)
            .sum::<usize>()
            + start_chunk;
        let mut estimator = EtaEstimator::new(total_units, initial_completed);

        if initial_completed > 0 {
            info!(
                "Resuming session {} at file {}/{}, chunk {} ({} of {} units done)",
                session.short_id(),
                start_file + 1,
                session.source_files.len(),
                start_chunk,
                initial_completed,
                total_units
            );
        }

        let total_files = session.source_files.len();
        let mut missing_content: Vec<String> = Vec::new();

        for file_index in start_file..total_files {
            let file = session.source_files[file_index].clone();
            let chunks =
                ChunkPlanner::plan(&file.content, settings.chunk_size, settings.enable_chunking);

            // The saved chunk cursor applies only to the exact file index the
            // session was interrupted in; every other file starts at chunk 0.
            let resume_chunk = if file_index == start_file {
                start_chunk.min(chunks.len())
            } else {
                0
            };
            let mut accumulated = if resume_chunk > 0 {
                session
                    .translated_files
                    .get(file_index)
                    .map(|f| f.content.clone())
                    .unwrap_or_default()
            } else {
                session.translated_files.truncate(file_index);
                String::new()
            };

            for (chunk_index, chunk) in chunks.iter().enumerate().skip(resume_chunk) {
                let translated = match self.translator.translate(chunk, &session.settings).await {
                    Ok(text) => text,
                    Err(err) => {
                        warn!(
                            "Translation failed in {} (chunk {}/{}): {}",
                            file.name,
                            chunk_index + 1,
                            chunks.len(),
                            err
                        );
                        session.status = SessionStatus::Failed;
                        session.touch();
                        self.store.put(&session)?;
                        return Err(AppError::Provider(err));
                    }
                };

                accumulated.push_str(&translated);
                estimator.record_unit();
                self.sink.on_unit_completed(&ProgressUpdate {
                    file_name: &file.name,
                    file_number: file_index + 1,
                    total_files,
                    chunk_number: chunk_index + 1,
                    total_chunks: chunks.len(),
                    completed_units: estimator.completed_units(),
                    total_units,
                    eta: estimator.estimate(),
                });

                // Persist the partial result so a crash after this point
                // costs at most the chunk currently in flight.
                upsert_translated(
                    &mut session.translated_files,
                    file_index,
                    &file.name,
                    accumulated.clone(),
                );
                session.progress = Progress::new(file_index, chunk_index + 1);
                session.touch();
                self.store.put(&session)?;
            }

            if settings.warn_missing_content && is_suspiciously_short(
                &file.content,
                &accumulated,
                settings.missing_content_threshold,
            ) {
                missing_content.push(file.name.clone());
            }

            upsert_translated(
                &mut session.translated_files,
                file_index,
                &file.name,
                accumulated,
            );
            session.progress = Progress::new(file_index + 1, 0);
            session.touch();
            self.store.put(&session)?;
        }

        session.status = SessionStatus::Completed;
        session.touch();
        self.store.clear()?;
        info!(
            "Session {} completed: {} file(s) translated",
            session.short_id(),
            session.translated_files.len()
        );

        Ok(RunOutcome {
            session,
            missing_content,
        })
    }
}

// Replace the entry at `index` or append it; files are processed in order so
// the entry for file `index` always lands at position `index`.
fn upsert_translated(files: &mut Vec<TranslatedFile>, index: usize, name: &str, content: String) {
    let entry = TranslatedFile {
        name: name.to_string(),
        content,
    };
    if index < files.len() {
        files[index] = entry;
    } else {
        files.push(entry);
    }
}

// Content-loss heuristic: flag when the translation has shrunk below
// (100 - threshold) percent of the original, measured in characters. A file
// at exactly the limit is not flagged.
fn is_suspiciously_short(original: &str, translated: &str, threshold: u8) -> bool {
    let original_chars = original.chars().count() as u64;
    let translated_chars = translated.chars().count() as u64;
    translated_chars * 100 < original_chars * u64::from(100u8.saturating_sub(threshold))
}
