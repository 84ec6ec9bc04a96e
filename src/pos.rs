//! Part-of-speech enumeration and the per-POS database file layout.
//!
//! WordNet ships four index/data file pairs (noun, verb, adjective,
//! adverb). Adjective satellites use the `s` tag on data lines but live
//! in the adjective files, so `from_tag` folds `s` into [`Pos::Adjective`]
//! while record parsing keeps the literal tag.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Part of speech, one per WordNet index/data file pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pos {
    Noun,
    Verb,
    Adjective,
    Adverb,
}

impl Pos {
    /// All four parts of speech in file order.
    pub const ALL: [Pos; 4] = [Pos::Noun, Pos::Verb, Pos::Adjective, Pos::Adverb];

    /// Order used by all-POS lookups. Fixed, not alphabetical; output
    /// grouping tests depend on it.
    pub const LOOKUP_ORDER: [Pos; 4] = [Pos::Adverb, Pos::Adjective, Pos::Verb, Pos::Noun];

    /// Single-character POS tag as used in index and data lines.
    #[inline]
    pub fn as_tag(self) -> &'static str {
        match self {
            Pos::Noun => "n",
            Pos::Verb => "v",
            Pos::Adjective => "a",
            Pos::Adverb => "r",
        }
    }

    /// Parse a POS tag. `s` (adjective satellite) maps to `Adjective`;
    /// anything else outside n/v/a/r is an [`Error::UnknownPos`].
    pub fn from_tag(tag: &str) -> Result<Pos> {
        match tag {
            "n" => Ok(Pos::Noun),
            "v" => Ok(Pos::Verb),
            "a" | "s" => Ok(Pos::Adjective),
            "r" => Ok(Pos::Adverb),
            other => Err(Error::unknown_pos(other)),
        }
    }

    /// File-name suffix shared by the index and data files.
    #[inline]
    pub fn file_suffix(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adjective => "adj",
            Pos::Adverb => "adv",
        }
    }

    /// Name of the flat index file for this POS.
    #[inline]
    pub fn index_file_name(self) -> String {
        format!("index.{}", self.file_suffix())
    }

    /// Name of the flat data file for this POS.
    #[inline]
    pub fn data_file_name(self) -> String {
        format!("data.{}", self.file_suffix())
    }

    /// Name of the fast-index JSON sidecar for this POS.
    #[inline]
    pub fn fast_index_file_name(self) -> String {
        format!("fast-index.{}.json", self.file_suffix())
    }

    /// Longest line in the data file for this POS, in bytes. Bounds the
    /// chunked record read; measured once against WordNet 3.x.
    #[inline]
    pub fn max_data_line_length(self) -> usize {
        match self {
            Pos::Noun => 12972,
            Pos::Verb => 7713,
            Pos::Adjective => 2794,
            Pos::Adverb => 638,
        }
    }

    /// Human-readable singular label.
    #[inline]
    pub fn label(self) -> &'static str {
        match self {
            Pos::Noun => "noun",
            Pos::Verb => "verb",
            Pos::Adjective => "adjective",
            Pos::Adverb => "adverb",
        }
    }

    /// Plural label, used as the result-bucket key in classified output.
    #[inline]
    pub fn plural_label(self) -> &'static str {
        match self {
            Pos::Noun => "nouns",
            Pos::Verb => "verbs",
            Pos::Adjective => "adjectives",
            Pos::Adverb => "adverbs",
        }
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
