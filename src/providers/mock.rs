/*!
 * Mock translator implementation for testing and dry runs.
 *
 * The mock simulates different provider behaviors:
 * - `MockTranslator::working()` - always succeeds with marked-up text
 * - `MockTranslator::failing()` - always fails with an error
 * - `MockTranslator::fail_at(n)` - fails on the nth call only
 * - `MockTranslator::truncated(p)` - returns the leading p% of the input
 */

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::app_config::TranslationConfig;
use crate::errors::ProviderError;
use crate::providers::Translator;

/// Behavior mode for the mock translator
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds, echoing the input with a translation marker
    Working,
    /// Always fails with an error
    Failing,
    /// Fails on the nth call (1-based), succeeds otherwise
    FailAt { nth: usize },
    /// Succeeds but returns only the leading percentage of the input
    Truncated { keep_percent: u8 },
}

/// Mock translator for exercising the orchestration pipeline
#[derive(Debug)]
pub struct MockTranslator {
    /// Behavior mode
    behavior: MockBehavior,
    /// Number of translate calls made so far
    call_count: Arc<AtomicUsize>,
}

impl MockTranslator {
    /// Create a new mock translator with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create a working mock that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Create a mock that fails on the nth call (1-based)
    pub fn fail_at(nth: usize) -> Self {
        Self::new(MockBehavior::FailAt { nth })
    }

    /// Create a mock that keeps only the leading percentage of each chunk
    pub fn truncated(keep_percent: u8) -> Self {
        Self::new(MockBehavior::Truncated { keep_percent })
    }

    /// Number of translate calls made against this mock
    pub fn calls(&self) -> usize {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Handle to the shared call counter, usable after the mock is boxed
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        self.call_count.clone()
    }
}

#[async_trait]
impl Translator for MockTranslator {
    async fn translate(
        &self,
        text: &str,
        _config: &TranslationConfig,
    ) -> Result<String, ProviderError> {
        let call = self.call_count.fetch_add(1, Ordering::SeqCst) + 1;

        match self.behavior {
            MockBehavior::Working => Ok(format!("[vi] {}", text)),
            MockBehavior::Failing => Err(ProviderError::RequestFailed(
                "mock translator configured to fail".to_string(),
            )),
            MockBehavior::FailAt { nth } => {
                if call == nth {
                    Err(ProviderError::RequestFailed(format!(
                        "mock translator failed on call {}",
                        call
                    )))
                } else {
                    Ok(format!("[vi] {}", text))
                }
            }
            MockBehavior::Truncated { keep_percent } => {
                let keep = text.chars().count() * usize::from(keep_percent) / 100;
                Ok(text.chars().take(keep).collect())
            }
        }
    }
}
