/*!
 * Translation session state and persistence.
 *
 * This module handles:
 * - The durable `TranslationSession` snapshot (settings, inputs, progress)
 * - The `SessionStore` persistence port with file and in-memory backends
 * - Resume detection at startup
 */

pub mod models;
pub mod store;

pub use models::{Progress, SessionStatus, SourceFile, TranslatedFile, TranslationSession};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore};
