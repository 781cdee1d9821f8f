/*!
 * Deterministic chunk planning for chapter content.
 *
 * A chunk is the unit of work sent to the translation provider. Planning is
 * purely size-based: boundaries may fall mid-word by design, which keeps the
 * plan a pure function of the input and makes resume cursors stable across
 * runs.
 */

// @struct: Fixed-size chunk planner
pub struct ChunkPlanner;

impl ChunkPlanner {
    /// Partition `content` into contiguous slices of `chunk_size` characters.
    ///
    /// When chunking is disabled, or the content fits into a single chunk,
    /// the whole content is returned as one piece. The final slice may be
    /// shorter; concatenating all slices reproduces the input exactly.
    pub fn plan(content: &str, chunk_size: usize, enabled: bool) -> Vec<String> {
        let chunk_size = chunk_size.max(1);
        if !enabled || content.chars().count() <= chunk_size {
            return vec![content.to_string()];
        }

        let mut chunks = Vec::with_capacity(Self::count(content, chunk_size, enabled));
        let mut rest = content;
        while !rest.is_empty() {
            match rest.char_indices().nth(chunk_size) {
                Some((split, _)) => {
                    chunks.push(rest[..split].to_string());
                    rest = &rest[split..];
                }
                None => {
                    chunks.push(rest.to_string());
                    break;
                }
            }
        }
        chunks
    }

    /// Number of chunks `plan` would produce, without allocating them.
    pub fn count(content: &str, chunk_size: usize, enabled: bool) -> usize {
        let chunk_size = chunk_size.max(1);
        let len = content.chars().count();
        if !enabled || len <= chunk_size {
            1
        } else {
            len.div_ceil(chunk_size)
        }
    }
}
