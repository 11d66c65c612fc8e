//! Layered stylesheet cache
//!
//! Each configured stylesheet is copied into a single shared cache
//! directory, wrapped in one `@layer <name> { ... }` block. Cache files are
//! keyed by the sanitized style handle and regenerated only when the source
//! file is newer than the cached copy.
//!
//! # Invalidation
//!
//! | Cache file | Source vs cache mtime | Action |
//! |------------|-----------------------|--------|
//! | absent | - | generate |
//! | present | source newer | regenerate in place |
//! | present | source same age or older | reuse |
//!
//! Freshness is timestamp-only. Two writes within the filesystem's
//! timestamp resolution, or a clock that moves backwards, can leave stale
//! output that is treated as fresh until the next clear.
//!
//! Writes go to a hidden temporary file that is renamed into place, so a
//! failed write never leaves a truncated file under the final name.
//! Staging files orphaned by a crashed writer are swept by `clear`.

pub mod compose;
pub mod name;
pub mod store;

pub use compose::{compose_layered, LayeredHeader};
pub use name::{cache_file_name, sanitize_file_name, CACHE_SUFFIX};
pub use store::{CachedArtifact, Generation, LayerCache, Published};
