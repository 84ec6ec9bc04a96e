//! Engine facade: POS classification, dictionary lookup, seek and
//! random word selection over one dictionary directory.

use std::path::{Path, PathBuf};
use std::time::Instant;

use ahash::AHashSet;
use fastrand::Rng;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::index::bucket::BucketRegistry;
use crate::index::types::DataRecord;
use crate::index::{DataFile, IndexFile};
use crate::pos::Pos;
use crate::utils::stopwords::{StopwordFilter, Stopwords};
use crate::utils::tokenizer::{normalize, tokenize, uniq};

/// Environment variable that overrides the default dictionary directory.
pub const DICT_ENV: &str = "WORDPOS_DICT";

/// `WORDPOS_DICT` if set, `./dict` otherwise.
pub fn default_dict_path() -> PathBuf {
    std::env::var_os(DICT_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("dict"))
}

/// Engine construction options.
#[derive(Debug, Clone)]
pub struct WordPosOptions {
    /// Directory holding the index, data and fast-index files
    pub dict_path: PathBuf,
    /// Log elapsed time per operation at debug level
    pub profile: bool,
    /// Stopword handling for [`WordPos::parse`]
    pub stopwords: Stopwords,
}

impl Default for WordPosOptions {
    fn default() -> WordPosOptions {
        WordPosOptions {
            dict_path: default_dict_path(),
            profile: false,
            stopwords: Stopwords::Default,
        }
    }
}

/// Words of a text grouped by part of speech.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PosBreakdown {
    pub nouns: Vec<String>,
    pub verbs: Vec<String>,
    pub adjectives: Vec<String>,
    pub adverbs: Vec<String>,
    /// Words found under no part of speech
    pub rest: Vec<String>,
}

/// Options for the random word operations.
#[derive(Debug, Clone)]
pub struct RandOptions {
    /// Only return words starting with this prefix; empty means any
    pub starts_with: String,
    pub count: usize,
}

impl Default for RandOptions {
    fn default() -> RandOptions {
        RandOptions {
            starts_with: String::new(),
            count: 1,
        }
    }
}

/// Point-in-time statistics for one POS: bucket shape from the
/// fast-index file plus physical read counters.
#[derive(Debug, Clone, Serialize)]
pub struct PosStats {
    pub pos: Pos,
    pub buckets: u32,
    pub words: u32,
    pub biggest: u32,
    pub avg: String,
    pub median: u32,
    pub index_reads: u64,
    pub data_reads: u64,
}

struct PosFiles {
    index: IndexFile,
    data: DataFile,
}

/// Dictionary engine over one dictionary directory.
///
/// Every operation takes `&self`; a single instance can serve lookups
/// from many threads, with concurrent reads of the same file region
/// coalesced into one physical read.
pub struct WordPos {
    options: WordPosOptions,
    stopword_filter: StopwordFilter,
    noun: PosFiles,
    verb: PosFiles,
    adjective: PosFiles,
    adverb: PosFiles,
}

impl WordPos {
    /// Open all four POS index/data file pairs under the configured
    /// dictionary directory. Fails if any fast-index file is missing
    /// or unreadable.
    pub fn new(options: WordPosOptions) -> Result<WordPos> {
        WordPos::with_registry(options, BucketRegistry::global())
    }

    /// Like [`WordPos::new`], with a private bucket-index registry.
    pub fn with_registry(options: WordPosOptions, registry: &BucketRegistry) -> Result<WordPos> {
        let dict = options.dict_path.clone();
        let open = |pos| -> Result<PosFiles> {
            Ok(PosFiles {
                index: IndexFile::open(&dict, pos, registry)?,
                data: DataFile::new(&dict, pos),
            })
        };
        Ok(WordPos {
            stopword_filter: StopwordFilter::new(&options.stopwords),
            noun: open(Pos::Noun)?,
            verb: open(Pos::Verb)?,
            adjective: open(Pos::Adjective)?,
            adverb: open(Pos::Adverb)?,
            options,
        })
    }

    pub fn options(&self) -> &WordPosOptions {
        &self.options
    }

    pub fn dict_path(&self) -> &Path {
        &self.options.dict_path
    }

    fn files_for(&self, pos: Pos) -> &PosFiles {
        match pos {
            Pos::Noun => &self.noun,
            Pos::Verb => &self.verb,
            Pos::Adjective => &self.adjective,
            Pos::Adverb => &self.adverb,
        }
    }

    fn profile_start(&self) -> Option<Instant> {
        self.options.profile.then(Instant::now)
    }

    /// Tokenize `text` into deduped, normalized words with stopwords
    /// removed.
    pub fn parse(&self, text: &str) -> Vec<String> {
        let normalized: Vec<String> = tokenize(text).iter().map(|w| normalize(w)).collect();
        uniq(normalized)
            .into_iter()
            .filter(|w| !self.stopword_filter.is_stopword(w))
            .collect()
    }

    /// Membership test for an already normalized lemma.
    fn is_known(&self, lemma: &str, pos: Pos) -> Result<bool> {
        Ok(self.files_for(pos).index.lookup(lemma)?.is_some())
    }

    /// True when `word` has at least one sense under `pos`.
    pub fn is(&self, word: &str, pos: Pos) -> Result<bool> {
        let start = self.profile_start();
        let lemma = normalize(word);
        let found = self.is_known(&lemma, pos)?;
        if let Some(t) = start {
            log::debug!("is {lemma} [{pos}] in {:.1?}", t.elapsed());
        }
        Ok(found)
    }

    pub fn is_noun(&self, word: &str) -> Result<bool> {
        self.is(word, Pos::Noun)
    }

    pub fn is_verb(&self, word: &str) -> Result<bool> {
        self.is(word, Pos::Verb)
    }

    pub fn is_adjective(&self, word: &str) -> Result<bool> {
        self.is(word, Pos::Adjective)
    }

    pub fn is_adverb(&self, word: &str) -> Result<bool> {
        self.is(word, Pos::Adverb)
    }

    fn matches_in(&self, words: &[String], pos: Pos) -> Result<Vec<String>> {
        let mut found = Vec::new();
        for word in words {
            if self.is_known(word, pos)? {
                found.push(word.clone());
            }
        }
        Ok(found)
    }

    /// Words of `text` having at least one sense under `pos`.
    pub fn get(&self, text: &str, pos: Pos) -> Result<Vec<String>> {
        let start = self.profile_start();
        let words = self.parse(text);
        let found = self.matches_in(&words, pos)?;
        if let Some(t) = start {
            log::debug!("get {} in {:.1?}", pos.plural_label(), t.elapsed());
        }
        Ok(found)
    }

    pub fn get_nouns(&self, text: &str) -> Result<Vec<String>> {
        self.get(text, Pos::Noun)
    }

    pub fn get_verbs(&self, text: &str) -> Result<Vec<String>> {
        self.get(text, Pos::Verb)
    }

    pub fn get_adjectives(&self, text: &str) -> Result<Vec<String>> {
        self.get(text, Pos::Adjective)
    }

    pub fn get_adverbs(&self, text: &str) -> Result<Vec<String>> {
        self.get(text, Pos::Adverb)
    }

    /// Group every word of `text` by part of speech. A word found under
    /// several parts appears in each; `rest` collects words found under
    /// none.
    pub fn get_pos(&self, text: &str) -> Result<PosBreakdown> {
        let start = self.profile_start();
        let words = self.parse(text);
        let adverbs = self.matches_in(&words, Pos::Adverb)?;
        let adjectives = self.matches_in(&words, Pos::Adjective)?;
        let verbs = self.matches_in(&words, Pos::Verb)?;
        let nouns = self.matches_in(&words, Pos::Noun)?;

        let mut matched = AHashSet::new();
        for list in [&adverbs, &adjectives, &verbs, &nouns] {
            matched.extend(list.iter().cloned());
        }
        let rest = words.into_iter().filter(|w| !matched.contains(w)).collect();

        if let Some(t) = start {
            log::debug!("get_pos in {:.1?}", t.elapsed());
        }
        Ok(PosBreakdown {
            nouns,
            verbs,
            adjectives,
            adverbs,
            rest,
        })
    }

    /// All senses of `word` under `pos`, one record per synset. An
    /// unknown word yields an empty list; a resolvable index entry with
    /// any unreadable offset fails the whole call.
    pub fn lookup(&self, word: &str, pos: Pos) -> Result<Vec<DataRecord>> {
        let start = self.profile_start();
        let lemma = normalize(word);
        let files = self.files_for(pos);
        let records = match files.index.lookup(&lemma)? {
            Some(record) => files.data.lookup(&record.synset_offsets)?,
            None => Vec::new(),
        };
        if let Some(t) = start {
            log::debug!("lookup {lemma} [{pos}] in {:.1?}", t.elapsed());
        }
        Ok(records)
    }

    pub fn lookup_noun(&self, word: &str) -> Result<Vec<DataRecord>> {
        self.lookup(word, Pos::Noun)
    }

    pub fn lookup_verb(&self, word: &str) -> Result<Vec<DataRecord>> {
        self.lookup(word, Pos::Verb)
    }

    pub fn lookup_adjective(&self, word: &str) -> Result<Vec<DataRecord>> {
        self.lookup(word, Pos::Adjective)
    }

    pub fn lookup_adverb(&self, word: &str) -> Result<Vec<DataRecord>> {
        self.lookup(word, Pos::Adverb)
    }

    /// Senses under every POS, grouped adverb, adjective, verb, noun.
    pub fn lookup_all(&self, word: &str) -> Result<Vec<DataRecord>> {
        let mut records = Vec::new();
        for pos in Pos::LOOKUP_ORDER {
            records.extend(self.lookup(word, pos)?);
        }
        Ok(records)
    }

    /// Record at a known data-file byte offset. The offset is validated
    /// before the POS tag; `s` is accepted as an adjective tag.
    pub fn seek(&self, offset: i64, pos: &str) -> Result<DataRecord> {
        if offset <= 0 {
            return Err(Error::malformed_offset(offset.to_string()));
        }
        let pos = Pos::from_tag(pos)?;
        self.files_for(pos).data.read_record(offset as u64)
    }

    /// Random words from one POS.
    pub fn rand_pos(&self, pos: Pos, opts: &RandOptions) -> Result<Vec<String>> {
        let start = self.profile_start();
        let mut rng = Rng::new();
        let words = self
            .files_for(pos)
            .index
            .rand_words(&opts.starts_with, opts.count, &mut rng)?;
        if let Some(t) = start {
            log::debug!("rand [{pos}] in {:.1?}", t.elapsed());
        }
        Ok(words)
    }

    pub fn rand_noun(&self, opts: &RandOptions) -> Result<Vec<String>> {
        self.rand_pos(Pos::Noun, opts)
    }

    pub fn rand_verb(&self, opts: &RandOptions) -> Result<Vec<String>> {
        self.rand_pos(Pos::Verb, opts)
    }

    pub fn rand_adjective(&self, opts: &RandOptions) -> Result<Vec<String>> {
        self.rand_pos(Pos::Adjective, opts)
    }

    pub fn rand_adverb(&self, opts: &RandOptions) -> Result<Vec<String>> {
        self.rand_pos(Pos::Adverb, opts)
    }

    /// Random words drawn across every POS. Parts of speech are tried
    /// in random order, each contributing up to `count` words, until
    /// `count` distinct words accumulate.
    pub fn rand(&self, opts: &RandOptions) -> Result<Vec<String>> {
        let start = self.profile_start();
        let mut rng = Rng::new();
        let mut order = Pos::ALL.to_vec();
        rng.shuffle(&mut order);

        let mut results: Vec<String> = Vec::new();
        for pos in order {
            let words = self
                .files_for(pos)
                .index
                .rand_words(&opts.starts_with, opts.count, &mut rng)?;
            for word in words {
                if !results.contains(&word) {
                    results.push(word);
                }
            }
            if results.len() >= opts.count {
                break;
            }
        }
        results.truncate(opts.count);

        if let Some(t) = start {
            log::debug!("rand in {:.1?}", t.elapsed());
        }
        Ok(results)
    }

    /// Index statistics and read counters per POS.
    pub fn stats(&self) -> Vec<PosStats> {
        Pos::ALL
            .iter()
            .map(|&pos| {
                let files = self.files_for(pos);
                let stats = files.index.bucket_stats();
                PosStats {
                    pos,
                    buckets: stats.buckets,
                    words: stats.words,
                    biggest: stats.biggest,
                    avg: stats.avg.clone(),
                    median: stats.median,
                    index_reads: files.index.physical_reads(),
                    data_reads: files.data.physical_reads(),
                }
            })
            .collect()
    }
}
