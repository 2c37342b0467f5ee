//! Grapheme-to-phoneme alignment for Phonocolor dictionary exports.
//!
//! Aligns a word's letters with its flat phoneme list using the per-letter
//! color tags of the Phonocolor `word_to_phoneme` table as phoneme-boundary
//! markers, and converts whole export tables into the
//! `word,clean_phonemes,graphemes` dictionary format.

pub mod align;
pub mod color;
pub mod table;
pub mod trace_init;
