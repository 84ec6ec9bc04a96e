//! Utility functions and data structures.
//!
//! This module provides shared utilities used throughout wordpos:
//!
//! ## Modules
//!
//! - [`stopwords`] - Stopword list and filtering for parsed text
//! - [`tokenizer`] - Word extraction and lemma normalization
//! - [`trie`] - Prefix tree over index bucket keys
//!
//! ## Key Functions
//!
//! ```no_run
//! use wordpos::utils::{normalize, tokenize};
//!
//! // Split text into candidate words
//! let words = tokenize("The angry bear");
//! // Returns: ["The", "angry", "bear"]
//!
//! // Fold a word into index form
//! let lemma = normalize("Bun in the oven");
//! // Returns: "bun_in_the_oven"
//! ```

pub mod stopwords;
pub mod tokenizer;
pub mod trie;

pub use stopwords::*;
pub use tokenizer::*;
pub use trie::*;
