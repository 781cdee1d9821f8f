use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::dictionary::DictionaryEntry;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings. The on-disk format of
/// `Config` doubles as the settings preset exchanged between users: every
/// field carries a serde default, so a preset with missing fields loads with
/// documented defaults instead of failing.

/// Default instruction template sent to the translation provider.
pub const DEFAULT_PROMPT: &str = "You are a professional literary translator. \
Translate the provided text faithfully, preserving tone, register and \
paragraph structure. Keep proper nouns consistent throughout. Return only \
the translated text with no commentary.";

/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Translation settings snapshot (also the preset exchange format)
    #[serde(flatten)]
    pub translation: TranslationConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            translation: TranslationConfig::default(),
            log_level: LogLevel::default(),
        }
    }
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref())
            .with_context(|| format!("Failed to open config file: {:?}", path.as_ref()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path.as_ref(), json)
            .with_context(|| format!("Failed to write config file: {:?}", path.as_ref()))?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.translation.validate()
    }
}

/// Immutable snapshot of everything the translator needs for one session
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    // @field: Model name passed to the provider
    #[serde(default = "default_model")]
    pub model: String,

    // @field: Prompt construction settings
    #[serde(default)]
    pub prompt_settings: PromptSettings,

    // @field: Ordered custom dictionary
    #[serde(default)]
    pub dictionary: Vec<DictionaryEntry>,

    // @field: Processing toggles and thresholds
    #[serde(default)]
    pub processing_settings: ProcessingSettings,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            prompt_settings: PromptSettings::default(),
            dictionary: Vec::new(),
            processing_settings: ProcessingSettings::default(),
        }
    }
}

impl TranslationConfig {
    /// Validate the snapshot
    pub fn validate(&self) -> Result<()> {
        self.processing_settings.validate()
    }
}

/// Settings that shape the instruction sent with every translation request
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct PromptSettings {
    /// Story title, included in the instruction when non-empty
    #[serde(default)]
    pub story_name: String,

    /// Author name, included when non-empty
    #[serde(default)]
    pub author: String,

    /// Genre, included when non-empty
    #[serde(default)]
    pub genre: String,

    /// Source language, included when non-empty
    #[serde(default)]
    pub source_language: String,

    /// Base instruction template
    #[serde(default = "default_prompt")]
    pub prompt: String,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            story_name: String::new(),
            author: String::new(),
            genre: String::new(),
            source_language: String::new(),
            prompt: default_prompt(),
        }
    }
}

/// Processing toggles applied by the orchestration pipeline
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProcessingSettings {
    /// Ask the provider to re-check for untranslated characters
    #[serde(default = "default_true")]
    pub check_and_redo: bool,

    /// Ask the provider to fix grammar after translating
    #[serde(default = "default_true")]
    pub fix_grammar: bool,

    /// Flag files whose translation looks suspiciously short
    #[serde(default = "default_true")]
    pub warn_missing_content: bool,

    /// Allowed shrinkage in percent before a file is flagged (0..=100)
    #[serde(default = "default_missing_content_threshold")]
    pub missing_content_threshold: u8,

    /// Split large files into fixed-size chunks
    #[serde(default)]
    pub enable_chunking: bool,

    /// Maximum characters per chunk
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
}

impl Default for ProcessingSettings {
    fn default() -> Self {
        Self {
            check_and_redo: true,
            fix_grammar: true,
            warn_missing_content: true,
            missing_content_threshold: default_missing_content_threshold(),
            enable_chunking: false,
            chunk_size: default_chunk_size(),
        }
    }
}

impl ProcessingSettings {
    /// Validate thresholds and sizes
    pub fn validate(&self) -> Result<()> {
        if self.missing_content_threshold > 100 {
            return Err(anyhow!(
                "missing_content_threshold must be between 0 and 100, got {}",
                self.missing_content_threshold
            ));
        }
        if self.chunk_size == 0 {
            return Err(anyhow!("chunk_size must be greater than zero"));
        }
        Ok(())
    }
}

/// Log level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_prompt() -> String {
    DEFAULT_PROMPT.to_string()
}

fn default_true() -> bool {
    true
}

fn default_missing_content_threshold() -> u8 {
    30
}

fn default_chunk_size() -> usize {
    5000
}
