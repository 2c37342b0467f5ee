//! Color-descriptor parsing and normalization.
//!
//! The Phonocolor export stores one descriptor per character position,
//! either as a bare list of fields (`[m,#FF0000]`) or as a mapping whose
//! key order is unreliable (`[1:#FF0000,0:m]`). Both shapes are normalized
//! into a single ordered list of color tokens before the aligner runs, so
//! the aligner never branches on descriptor shape.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// One per-letter descriptor from the color column.
///
/// Keyed descriptors keep their raw `key:value` fields rather than split
/// pairs: a keyed descriptor can mix in colon-less fields, and sorting the
/// raw strings matches the export's observed ordering exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColorDescriptor {
    /// Bare list of fields, in export order.
    Fields(Vec<String>),
    /// Exported from a mapping; key order is unreliable and must be sorted.
    KeyedFields(Vec<String>),
}

impl ColorDescriptor {
    /// Parse one descriptor body (the text between `[` and `]`).
    /// A `:` in any field marks the whole descriptor as keyed.
    pub fn parse(raw: &str) -> Self {
        let fields: Vec<String> = raw.split(',').map(str::to_string).collect();
        if fields.iter().any(|f| f.contains(':')) {
            Self::KeyedFields(fields)
        } else {
            Self::Fields(fields)
        }
    }

    /// Normalize to the ordered list of color tokens (fields containing `#`).
    ///
    /// Keyed fields are sorted lexicographically, then stripped to the
    /// portion after their last `:`. The positional slice drops the "self"
    /// letter field the export prepends: 4 fields keep `[1..3]`, 3 and 2
    /// fields keep `[1..]`, any other count is kept unchanged. The slice
    /// table mirrors the export convention as observed; field counts
    /// outside {2,3,4} are unconfirmed upstream, so the fallback must not
    /// change without checking real data.
    pub fn color_fields(&self) -> Vec<String> {
        let mut fields = match self {
            Self::Fields(f) => f.clone(),
            Self::KeyedFields(f) => {
                let mut sorted = f.clone();
                sorted.sort();
                sorted
                    .into_iter()
                    .map(|p| p.rsplit(':').next().unwrap_or("").to_string())
                    .collect()
            }
        };
        fields = match fields.len() {
            4 => fields[1..3].to_vec(),
            3 | 2 => fields[1..].to_vec(),
            _ => fields,
        };
        fields.retain(|p| p.contains('#'));
        fields
    }
}

/// A letter's resolved color signature, the proxy key for "same sound as
/// the previous letter".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorKey {
    /// Color fields joined by `,`, in export order (order encodes
    /// double-color sequencing).
    pub signature: String,
    /// Number of distinct color values; `["#AAA","#AAA"]` counts 1.
    pub distinct: usize,
}

impl ColorKey {
    pub fn of(descriptor: &ColorDescriptor) -> Self {
        let fields = descriptor.color_fields();
        let distinct = fields.iter().collect::<HashSet<_>>().len();
        Self {
            signature: fields.join(","),
            distinct,
        }
    }

    /// True when the letter carries no color data at all.
    pub fn is_empty(&self) -> bool {
        self.signature.is_empty()
    }
}

/// Parse a whole cleaned color column value into per-letter descriptors.
///
/// A cleaned value looks like `[[m,#F00],[o,#0F0],[t,#00F]]`: two outer
/// characters are dropped on each side and the body split on `],[`.
pub fn parse_seq(colors: &str) -> Vec<ColorDescriptor> {
    let chars: Vec<char> = colors.chars().collect();
    let body: String = if chars.len() >= 4 {
        chars[2..chars.len() - 2].iter().collect()
    } else {
        String::new()
    };
    body.split("],[").map(ColorDescriptor::parse).collect()
}
