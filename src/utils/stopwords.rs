//! Stopword filtering for parsed text.

use ahash::AHashSet;

/// English stopwords removed from parsed text under the default
/// configuration.
pub const DEFAULT_STOPWORDS: &[&str] = &[
    "about", "above", "after", "again", "all", "also", "am", "an", "and", "another", "any", "are",
    "as", "at", "be", "because", "been", "before", "being", "below", "between", "both", "but",
    "by", "came", "can", "cannot", "come", "could", "did", "do", "does", "doing", "during",
    "each", "few", "for", "from", "further", "get", "got", "has", "had", "he", "have", "her",
    "here", "him", "himself", "his", "how", "if", "in", "into", "is", "it", "its", "itself",
    "like", "make", "many", "me", "might", "more", "most", "much", "must", "my", "myself",
    "never", "now", "of", "on", "only", "or", "other", "our", "ours", "ourselves", "out", "over",
    "own", "said", "same", "see", "should", "since", "so", "some", "still", "such", "take",
    "than", "that", "the", "their", "theirs", "them", "themselves", "then", "there", "these",
    "they", "this", "those", "through", "to", "too", "under", "until", "up", "very", "was",
    "way", "we", "well", "were", "what", "where", "when", "which", "while", "who", "whom",
    "with", "would", "why", "you", "your", "yours", "yourself", "yourselves", "000", "$", "1",
    "2", "3", "4", "5", "6", "7", "8", "9", "10",
];

/// Which stopword list, if any, to apply when parsing text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Stopwords {
    /// Filter with [`DEFAULT_STOPWORDS`].
    #[default]
    Default,
    /// Keep every token.
    None,
    /// Filter with a caller-provided list.
    Custom(Vec<String>),
}

/// Case-insensitive membership filter built once from a [`Stopwords`]
/// choice.
#[derive(Debug)]
pub struct StopwordFilter {
    words: Option<AHashSet<String>>,
}

impl StopwordFilter {
    pub fn new(stopwords: &Stopwords) -> StopwordFilter {
        let words = match stopwords {
            Stopwords::Default => Some(DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect()),
            Stopwords::None => None,
            Stopwords::Custom(list) => Some(list.iter().map(|w| w.to_lowercase()).collect()),
        };
        StopwordFilter { words }
    }

    /// True when `word` should be dropped from parsed text.
    pub fn is_stopword(&self, word: &str) -> bool {
        match &self.words {
            Some(words) => words.contains(&word.to_lowercase()),
            None => false,
        }
    }
}
