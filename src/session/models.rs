/*!
 * Session data model.
 *
 * A `TranslationSession` is the single unit of persisted, resumable state:
 * the settings snapshot, the source files being translated, the results so
 * far and a cursor into the work. It is written back to the store after every
 * completed chunk, so a crash never loses more than one chunk of work.
 */

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::app_config::TranslationConfig;

/// Durable, serializable form of an analyzed input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceFile {
    /// File name used for the translated output
    pub name: String,

    /// Full text content
    pub content: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// One translated output file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslatedFile {
    /// File name, matching the source file it was produced from
    pub name: String,

    /// Translated content (all chunks joined in order)
    pub content: String,
}

/// Session lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionStatus {
    /// Translation is running or was interrupted without an error
    InProgress,
    /// All files completed; the persisted copy is removed
    Completed,
    /// A unit of work errored; the session can be resumed
    Failed,
}

/// Cursor into the session's source files
///
/// `current_chunk_index` is meaningful only while the file at
/// `current_file_index` is being chunk-processed; it resets to 0 whenever the
/// file index advances.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub current_file_index: usize,
    pub current_chunk_index: usize,
}

impl Progress {
    pub fn new(current_file_index: usize, current_chunk_index: usize) -> Self {
        Self {
            current_file_index,
            current_chunk_index,
        }
    }
}

/// The persisted, resumable state of one translation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationSession {
    /// Unique session ID
    pub id: String,

    /// Lifecycle status
    pub status: SessionStatus,

    /// Snapshot of the input files
    pub source_files: Vec<SourceFile>,

    /// Snapshot of the settings at the time the run started
    pub settings: TranslationConfig,

    /// Completed files, plus a partial entry for the in-flight file
    #[serde(default)]
    pub translated_files: Vec<TranslatedFile>,

    /// Work cursor
    #[serde(default)]
    pub progress: Progress,

    /// Fingerprint of the source files, for resume sanity checks
    #[serde(default)]
    pub source_fingerprint: String,

    /// Creation time (RFC 3339)
    #[serde(default)]
    pub created_at: String,

    /// Last update time (RFC 3339)
    #[serde(default)]
    pub updated_at: String,
}

impl TranslationSession {
    /// Create a fresh session over the given inputs and settings snapshot
    pub fn new(source_files: Vec<SourceFile>, settings: TranslationConfig) -> Self {
        let now = Utc::now().to_rfc3339();
        let source_fingerprint = Self::fingerprint(&source_files);
        Self {
            id: Uuid::new_v4().to_string(),
            status: SessionStatus::InProgress,
            source_files,
            settings,
            translated_files: Vec::new(),
            progress: Progress::default(),
            source_fingerprint,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    /// SHA-256 over names and contents, in order
    pub fn fingerprint(files: &[SourceFile]) -> String {
        let mut hasher = Sha256::new();
        for file in files {
            hasher.update(file.name.as_bytes());
            hasher.update([0u8]);
            hasher.update(file.content.as_bytes());
            hasher.update([0u8]);
        }
        format!("{:x}", hasher.finalize())
    }

    /// Whether this session may be picked up again
    pub fn is_resumable(&self) -> bool {
        matches!(self.status, SessionStatus::InProgress | SessionStatus::Failed)
    }

    /// Refresh the update timestamp
    pub fn touch(&mut self) {
        self.updated_at = Utc::now().to_rfc3339();
    }

    /// Short id prefix for log lines
    pub fn short_id(&self) -> &str {
        &self.id[..8.min(self.id.len())]
    }

    /// Basic shape validation applied after deserialization
    pub fn is_valid(&self) -> bool {
        !self.id.is_empty()
    }
}
