/*!
 * Translation provider contract.
 *
 * The orchestration pipeline drives everything through the `Translator`
 * trait: one call per chunk, strictly sequential. Concrete API clients
 * (Gemini, OpenAI-compatible servers, ...) implement this trait outside the
 * core; the crate ships prompt assembly shared by all of them and a mock
 * implementation used by tests and dry runs.
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::app_config::TranslationConfig;
use crate::errors::ProviderError;

/// Common trait for all translation providers
///
/// This trait defines the interface every provider implementation must
/// follow, allowing them to be used interchangeably by the orchestrator.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate one chunk of text under the given session configuration
    ///
    /// # Arguments
    /// * `text` - The chunk to translate
    /// * `config` - The immutable session settings snapshot
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or an error
    async fn translate(&self, text: &str, config: &TranslationConfig)
        -> Result<String, ProviderError>;
}

pub mod mock;
pub mod prompt;
