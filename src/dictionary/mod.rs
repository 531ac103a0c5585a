/*!
 * Chinese dictionary support.
 *
 * This module contains:
 * - `entry`: dictionary records and the JSON / CC-CEDICT loaders
 * - `index`: the read-only headword index and gloss resolution
 * - `segmenter`: greedy longest-match segmentation into translation units
 */

pub mod entry;
pub mod index;
pub mod segmenter;

pub use entry::DictionaryEntry;
pub use index::{DictionaryIndex, resolve_gloss};
pub use segmenter::{DEFAULT_MAX_WORD_LENGTH, Segmenter, TranslationUnit, UnitSource};
