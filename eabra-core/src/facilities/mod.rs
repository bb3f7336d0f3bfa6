//! Word-level measurement facilities
//!
//! Syllable counting and lexical diversity are measured by pluggable
//! facilities so a caller can swap in a dictionary hyphenator or a different
//! diversity library without touching the extractor families.

pub mod diversity;
pub mod syllables;

pub use diversity::{LexicalDiversity, StandardDiversity, MTLD_UNDEFINED};
pub use syllables::{SyllableCounter, VowelGroupCounter};
