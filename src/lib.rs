//! # wordpos - Part-of-Speech Classification and Dictionary Lookup
//!
//! wordpos classifies the words of English text by part of speech and
//! looks up definitions, synonyms and examples against the WordNet
//! flat-file database. Instead of loading multi-megabyte index files
//! into memory, it consults small bucketed fast-index files and reads
//! only the byte range a query needs.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Fast-index buckets, index/data file readers, read coalescing
//! - [`wordpos`] - Engine facade (`is` / `get` / `lookup` / `seek` / `rand`)
//! - [`pos`] - Part-of-speech taxonomy and per-POS file naming
//! - [`output`] - CLI result formatting
//! - [`utils`] - Tokenization, stopwords, prefix trie, RNG
//!
//! ## Quick Start
//!
//! ```ignore
//! use wordpos::{WordPos, WordPosOptions};
//!
//! let wp = WordPos::new(WordPosOptions::default()).unwrap();
//!
//! let pos = wp.get_pos("The angry bear chased the frightened little squirrel").unwrap();
//! println!("nouns: {:?}", pos.nouns);
//!
//! for sense in wp.lookup_verb("bear").unwrap() {
//!     println!("{}: {}", sense.pos, sense.def);
//! }
//! ```
//!
//! ## Lookup Path
//!
//! A word resolves in two stages. The first three characters of the
//! word select a bucket from the fast-index sidecar, one bounded read
//! fetches that bucket from the index file, and a binary search inside
//! the bucket finds the line whose synset offsets drive the data-file
//! reads. Concurrent requests for the same file region share a single
//! physical read and a single descriptor.

pub mod error;
pub mod index;
pub mod output;
pub mod pos;
pub mod utils;
pub mod wordpos;

pub use error::{Error, Result};
pub use index::types::{DataRecord, IndexRecord, Pointer};
pub use pos::Pos;
pub use wordpos::{PosBreakdown, PosStats, RandOptions, WordPos, WordPosOptions};
