use anyhow::{anyhow, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::Path;
use std::sync::Arc;

use crate::app_config::Config;
use crate::chapter_segmenter::{AnalyzedFile, ChapterSegmenter, ChapterStatus, RawFile, SegmentMode};
use crate::file_utils::FileManager;
use crate::orchestrator::{ProgressSink, ProgressUpdate, TranslationOrchestrator};
use crate::progress::EtaEstimator;
use crate::providers::Translator;
use crate::session::{SessionStore, SourceFile, TranslationSession};

// @module: Application controller for chapter translation

/// What to do when a persisted unfinished session exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumePolicy {
    /// Continue the persisted session from its cursor
    Resume,
    /// Drop the persisted session and start fresh
    Discard,
    /// Start fresh; refuse to run while an unfinished session exists
    Fresh,
}

// Progress port implementation over an indicatif bar.
struct ConsoleProgressSink {
    bar: ProgressBar,
}

impl ConsoleProgressSink {
    fn new(bar: ProgressBar) -> Self {
        Self { bar }
    }
}

impl ProgressSink for ConsoleProgressSink {
    fn on_unit_completed(&self, update: &ProgressUpdate<'_>) {
        if self.bar.length() != Some(update.total_units as u64) {
            self.bar.set_length(update.total_units as u64);
        }
        self.bar.set_position(update.completed_units as u64);

        let eta = update
            .eta
            .map(|d| format!(" ~ {}", EtaEstimator::format_eta(d)))
            .unwrap_or_default();
        self.bar.set_message(format!(
            "{} [file {}/{}, chunk {}/{}]{}",
            update.file_name,
            update.file_number,
            update.total_files,
            update.chunk_number,
            update.total_chunks,
            eta
        ));
    }
}

/// Main application controller for chapter translation
pub struct Controller {
    // @field: App configuration
    config: Config,

    // @field: Translation provider
    translator: Arc<dyn Translator>,

    // @field: Session persistence port
    store: Arc<dyn SessionStore>,
}

impl Controller {
    // @method: Create a new controller with the given configuration and ports
    pub fn new(config: Config, translator: Arc<dyn Translator>, store: Arc<dyn SessionStore>) -> Self {
        Self {
            config,
            translator,
            store,
        }
    }

    /// Segment the input path into chapters and log a report
    pub fn analyze(&self, input: &Path, mode: Option<SegmentMode>) -> Result<Vec<AnalyzedFile>> {
        let chapters = self.segment_input(input, mode)?;

        let warnings = chapters
            .iter()
            .filter(|c| c.info.status == ChapterStatus::Warning)
            .count();
        info!(
            "Found {} chapter(s), {} with warnings",
            chapters.len(),
            warnings
        );
        for chapter in &chapters {
            let ordinal = chapter
                .info
                .number
                .map(|n| n.to_string())
                .unwrap_or_else(|| "?".to_string());
            let title = chapter.info.name.as_deref().unwrap_or("-");
            match chapter.info.status {
                ChapterStatus::Ok => {
                    info!("  Chapter {:>3}  {}  ({})", ordinal, title, chapter.source_name);
                }
                ChapterStatus::Warning => {
                    warn!(
                        "  Chapter {:>3}  {}  ({}) - {}",
                        ordinal,
                        title,
                        chapter.source_name,
                        chapter.info.message.as_deref().unwrap_or("warning")
                    );
                }
            }
        }

        Ok(chapters)
    }

    /// Run a translation over the input path, honoring the resume policy
    pub async fn run(
        &self,
        input: &Path,
        output_dir: &Path,
        mode: Option<SegmentMode>,
        policy: ResumePolicy,
    ) -> Result<()> {
        let saved = self
            .store
            .get()
            .context("Failed to read the persisted session slot")?
            .filter(|s| s.is_resumable());

        let session = match policy {
            ResumePolicy::Resume => {
                let Some(saved) = saved else {
                    return Err(anyhow!("No unfinished session found to resume"));
                };
                info!(
                    "Resuming session {} ({} file(s), cursor at file {}, chunk {})",
                    saved.short_id(),
                    saved.source_files.len(),
                    saved.progress.current_file_index + 1,
                    saved.progress.current_chunk_index
                );
                self.check_fingerprint(&saved, input, mode);
                saved
            }
            ResumePolicy::Discard | ResumePolicy::Fresh => {
                if let Some(saved) = saved {
                    if policy == ResumePolicy::Discard {
                        warn!("Discarding unfinished session {}", saved.short_id());
                        self.store
                            .clear()
                            .context("Failed to discard the persisted session")?;
                    } else {
                        return Err(anyhow!(
                            "Found an unfinished session ({}); rerun with --resume to continue \
                             it or --discard-session to drop it",
                            saved.short_id()
                        ));
                    }
                }
                self.new_session(input, mode)?
            }
        };

        let bar = ProgressBar::new(session.source_files.len() as u64);
        let template_result = ProgressStyle::default_bar()
            .template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} {msg}"));
        if let Ok(style) = template_result {
            bar.set_style(style);
        }
        let sink = Arc::new(ConsoleProgressSink::new(bar.clone()));

        let orchestrator = TranslationOrchestrator::new(self.translator.clone(), self.store.clone())
            .with_progress_sink(sink);

        let outcome = match orchestrator.run(session).await {
            Ok(outcome) => outcome,
            Err(err) => {
                bar.abandon();
                return Err(err).context(
                    "Translation failed; completed work was preserved, rerun with --resume to continue",
                );
            }
        };
        bar.finish_and_clear();

        FileManager::ensure_dir(output_dir)?;
        for file in outcome.translated_files() {
            FileManager::write_to_file(output_dir.join(&file.name), &file.content)?;
        }

        if let Some(advisory) = outcome.advisory() {
            warn!("{}", advisory);
        }
        info!(
            "Translated {} file(s) into {:?}",
            outcome.translated_files().len(),
            output_dir
        );

        Ok(())
    }

    // Build a fresh session by segmenting the input with the configured settings.
    fn new_session(&self, input: &Path, mode: Option<SegmentMode>) -> Result<TranslationSession> {
        let chapters = self.analyze(input, mode)?;
        if chapters.is_empty() {
            return Err(anyhow!("No chapters found in {:?}", input));
        }

        let source_files = chapters
            .into_iter()
            .map(|c| SourceFile::new(c.source_name, c.content))
            .collect();
        Ok(TranslationSession::new(
            source_files,
            self.config.translation.clone(),
        ))
    }

    // Warn when the current inputs no longer match the snapshot being resumed.
    // The saved snapshot stays authoritative either way.
    fn check_fingerprint(&self, saved: &TranslationSession, input: &Path, mode: Option<SegmentMode>) {
        if saved.source_fingerprint.is_empty() || !input.exists() {
            return;
        }
        let Ok(chapters) = self.segment_input(input, mode) else {
            return;
        };
        let current: Vec<SourceFile> = chapters
            .into_iter()
            .map(|c| SourceFile::new(c.source_name, c.content))
            .collect();
        if TranslationSession::fingerprint(&current) != saved.source_fingerprint {
            warn!(
                "Input files differ from the saved session; continuing with the saved snapshot"
            );
        }
    }

    // Collect the raw inputs and segment them. A single file defaults to
    // Single mode, a directory to Multiple.
    fn segment_input(&self, input: &Path, mode: Option<SegmentMode>) -> Result<Vec<AnalyzedFile>> {
        let raw = Self::collect_input(input)?;
        let mode = mode.unwrap_or(if raw.len() == 1 {
            SegmentMode::Single
        } else {
            SegmentMode::Multiple
        });
        Ok(ChapterSegmenter::new().segment(&raw, mode))
    }

    fn collect_input(input: &Path) -> Result<Vec<RawFile>> {
        if FileManager::file_exists(input) {
            let name = input
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| "input.txt".to_string());
            return Ok(vec![RawFile::new(name, FileManager::read_to_string(input)?)]);
        }

        if FileManager::dir_exists(input) {
            let paths = FileManager::find_files(input, "txt")?;
            if paths.is_empty() {
                return Err(anyhow!("No .txt files found in {:?}", input));
            }
            let mut files = Vec::with_capacity(paths.len());
            for path in paths {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_else(|| path.to_string_lossy().to_string());
                files.push(RawFile::new(name, FileManager::read_to_string(&path)?));
            }
            return Ok(files);
        }

        Err(anyhow!("Input path does not exist: {:?}", input))
    }
}
