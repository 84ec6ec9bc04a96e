//! Exact-match lookup within one POS's flat index file.
//!
//! A search resolves to a three-character bucket through the fast index,
//! reads only that bucket's byte range (coalesced through the Piper),
//! and binary-searches the decoded lines. Lines within a bucket inherit
//! the global ascending sort of the index file.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use fastrand::Rng;

use crate::error::{Error, Result};
use crate::index::bucket::{BucketIndex, BucketRegistry, BucketStats, KEY_LENGTH};
use crate::index::piper::{self, Piper};
use crate::index::types::{IndexRecord, Outcome};
use crate::pos::Pos;
use crate::utils::trie::Trie;

/// One POS's index file plus its fast index and read coalescer.
#[derive(Debug)]
pub struct IndexFile {
    pos: Pos,
    path: PathBuf,
    bucket_index: Arc<BucketIndex>,
    piper: Piper,
    /// Prefix trie over bucket keys, built on the first short-prefix
    /// random query
    trie: OnceLock<Trie>,
}

impl IndexFile {
    /// Open the index file for `pos` under `dict_dir`. The fast-index
    /// sidecar is required; the flat file itself is only opened when a
    /// read happens.
    pub fn open(dict_dir: &Path, pos: Pos, registry: &BucketRegistry) -> Result<IndexFile> {
        let bucket_index = registry.load(dict_dir, pos)?;
        let path = dict_dir.join(pos.index_file_name());
        Ok(IndexFile {
            pos,
            piper: Piper::new(path.clone()),
            path,
            bucket_index,
            trie: OnceLock::new(),
        })
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Search for an exact lemma. Expects pre-normalized input; a word
    /// whose key has no bucket misses without touching the disk.
    pub fn find(&self, word: &str) -> Result<Outcome> {
        let key = BucketIndex::key_for(word);
        let Some((offset, next_offset)) = self.bucket_index.bucket_for(key) else {
            return Ok(Outcome::Miss);
        };

        let text = self.read_range(&format!("find:{key}"), offset, next_offset)?;
        let lines: Vec<&str> = text.split('\n').collect();
        match lines.binary_search_by(|line| leading_token(line).cmp(word)) {
            Ok(idx) => {
                let line = lines[idx];
                Ok(Outcome::Hit {
                    key: key.to_string(),
                    line: line.to_string(),
                    tokens: line.split_whitespace().map(str::to_string).collect(),
                })
            }
            Err(_) => Ok(Outcome::Miss),
        }
    }

    /// [`find`](Self::find), then parse the hit line into an
    /// [`IndexRecord`]. A line that fails the index grammar is a fatal
    /// parse error, never a silent miss.
    pub fn lookup(&self, word: &str) -> Result<Option<IndexRecord>> {
        match self.find(word)? {
            Outcome::Miss => Ok(None),
            Outcome::Hit { tokens, .. } => parse_index_tokens(&tokens).map(Some),
        }
    }

    /// Up to `count` random lemmas, optionally constrained to a prefix.
    ///
    /// A prefix shorter than the bucket key length enumerates matching
    /// buckets through the lazily built trie and reads their whole span;
    /// a longer prefix reads its single bucket and filters. Without a
    /// prefix, one lemma is drawn from each of `count` sampled buckets.
    pub fn rand_words(&self, starts_with: &str, count: usize, rng: &mut Rng) -> Result<Vec<String>> {
        if count == 0 {
            return Ok(Vec::new());
        }

        if starts_with.is_empty() {
            let keys = self.bucket_index.index_keys();
            if keys.is_empty() {
                return Ok(Vec::new());
            }
            let picked = rng.choose_multiple(keys.iter(), count);
            let mut words = Vec::with_capacity(picked.len());
            for key in picked {
                words.extend(self.rand_in_span(key, key, "", 1, rng)?);
            }
            return Ok(words);
        }

        if starts_with.chars().count() < KEY_LENGTH {
            let trie = self.trie();
            let keys = trie.keys_with_prefix(starts_with);
            let (Some(first), Some(last)) = (keys.first(), keys.last()) else {
                return Ok(Vec::new());
            };
            return self.rand_in_span(first, last, starts_with, count, rng);
        }

        let key = BucketIndex::key_for(starts_with);
        self.rand_in_span(key, key, starts_with, count, rng)
    }

    fn rand_in_span(
        &self,
        start_key: &str,
        end_key: &str,
        starts_with: &str,
        count: usize,
        rng: &mut Rng,
    ) -> Result<Vec<String>> {
        let Some((offset, next_offset)) = self.bucket_index.span_for(start_key, end_key) else {
            return Ok(Vec::new());
        };

        let text = self.read_range(&format!("rand:{start_key}:{end_key}"), offset, next_offset)?;
        let mut lemmas: Vec<&str> = text.split('\n').map(leading_token).collect();
        if !starts_with.is_empty() && starts_with != start_key {
            lemmas.retain(|lemma| lemma.starts_with(starts_with));
        }
        Ok(rng
            .choose_multiple(lemmas.into_iter(), count)
            .into_iter()
            .map(|lemma| lemma.to_string())
            .collect())
    }

    fn trie(&self) -> &Trie {
        self.trie.get_or_init(|| {
            let mut trie = Trie::new();
            for key in self.bucket_index.index_keys() {
                trie.insert(key);
            }
            log::debug!(
                "built prefix trie over {} bucket keys for {}",
                self.bucket_index.index_keys().len(),
                self.bucket_index.name
            );
            trie
        })
    }

    /// Coalesced read of `[offset, next_offset - 1)`, excluding the
    /// bucket's trailing newline.
    fn read_range(&self, task_id: &str, offset: u64, next_offset: u64) -> Result<Arc<str>> {
        let len = next_offset.saturating_sub(offset).saturating_sub(1) as usize;
        self.piper.run(task_id, move |file| {
            let mut buf = vec![0u8; len];
            piper::read_exact_at(file, &mut buf, offset)?;
            Ok(String::from_utf8_lossy(&buf).into_owned())
        })
    }

    /// All bucket keys, ascending.
    pub fn index_keys(&self) -> &[String] {
        self.bucket_index.index_keys()
    }

    pub fn bucket_stats(&self) -> &BucketStats {
        &self.bucket_index.stats
    }

    /// Physical reads issued against this file so far.
    pub fn physical_reads(&self) -> u64 {
        self.piper.physical_reads()
    }

    /// Coalesced read tasks currently in flight.
    pub fn in_flight(&self) -> usize {
        self.piper.in_flight()
    }
}

/// First space-delimited token of an index line, its sort key.
fn leading_token(line: &str) -> &str {
    line.split(' ').next().unwrap_or(line)
}

/// Parse the whitespace-split tokens of one index line.
///
/// Grammar: `lemma pos synset_cnt p_cnt [ptr_symbol]^p_cnt sense_cnt
/// tagsense_cnt [synset_offset]^synset_cnt`. The declared counts must
/// consume the line exactly.
fn parse_index_tokens(tokens: &[String]) -> Result<IndexRecord> {
    let lemma = field(tokens, 0, "?", "lemma")?;
    let pos = field(tokens, 1, lemma, "pos")?;
    let synset_cnt = count_field(tokens, 2, lemma, "synset_cnt")?;
    let p_cnt = count_field(tokens, 3, lemma, "p_cnt")?;

    let expected = p_cnt + 6 + synset_cnt;
    if tokens.len() != expected {
        return Err(Error::index_parse(
            lemma,
            format!(
                "expected {expected} tokens for p_cnt {p_cnt} and synset_cnt {synset_cnt}, found {}",
                tokens.len()
            ),
        ));
    }

    let ptr_symbols = tokens[4..4 + p_cnt].to_vec();
    let sense_cnt = count_field(tokens, p_cnt + 4, lemma, "sense_cnt")?;
    let tagsense_cnt = count_field(tokens, p_cnt + 5, lemma, "tagsense_cnt")?;
    let mut synset_offsets = Vec::with_capacity(synset_cnt);
    for idx in p_cnt + 6..p_cnt + 6 + synset_cnt {
        let raw = field(tokens, idx, lemma, "synset_offset")?;
        let offset = raw
            .parse::<u64>()
            .map_err(|_| Error::index_parse(lemma, format!("bad synset_offset '{raw}'")))?;
        synset_offsets.push(offset);
    }

    Ok(IndexRecord {
        lemma: lemma.to_string(),
        pos: pos.to_string(),
        ptr_symbols,
        sense_cnt: sense_cnt as u32,
        tagsense_cnt: tagsense_cnt as u32,
        synset_offsets,
    })
}

fn field<'a>(tokens: &'a [String], idx: usize, lemma: &str, name: &str) -> Result<&'a str> {
    tokens
        .get(idx)
        .map(String::as_str)
        .ok_or_else(|| Error::index_parse(lemma, format!("missing {name} at token {idx}")))
}

fn count_field(tokens: &[String], idx: usize, lemma: &str, name: &str) -> Result<usize> {
    let raw = field(tokens, idx, lemma, name)?;
    raw.parse::<usize>()
        .map_err(|_| Error::index_parse(lemma, format!("bad {name} '{raw}'")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn write_dict(lines: &[&str]) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.noun");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "  1 This line is part of the license header").unwrap();
        for line in lines {
            writeln!(file, "{line}").unwrap();
        }
        drop(file);
        BucketIndex::build(&path, "3.0")
            .unwrap()
            .save(&dir.path().join("fast-index.noun.json"))
            .unwrap();
        dir
    }

    fn open(dir: &tempfile::TempDir) -> IndexFile {
        IndexFile::open(dir.path(), Pos::Noun, &BucketRegistry::new()).unwrap()
    }

    fn sample_dict() -> tempfile::TempDir {
        write_dict(&[
            "a n 1 0 1 0 00000001",
            "bear n 2 2 @ ~ 2 1 00001111 00002222",
            "foal n 1 1 @ 1 0 00000333",
            "fog n 1 1 @ 1 1 00000444",
            "fox n 2 1 @ 2 1 00000555 00000666",
            "squab n 1 1 @ 1 0 00000777",
            "squirrel n 2 1 @ 2 2 00000888 00000999",
            "squirt n 1 1 @ 1 0 00001000",
        ])
    }

    #[test]
    fn find_hits_exact_lemma() {
        let dir = sample_dict();
        let index = open(&dir);

        let outcome = index.find("squirrel").unwrap();
        let Outcome::Hit { key, line, tokens } = outcome else {
            panic!("expected hit");
        };
        assert_eq!(key, "squ");
        assert_eq!(line, "squirrel n 2 1 @ 2 2 00000888 00000999");
        assert_eq!(tokens[0], "squirrel");
    }

    #[test]
    fn absent_key_misses_without_io() {
        let dir = sample_dict();
        let index = open(&dir);

        assert_eq!(index.find("garblegarble").unwrap(), Outcome::Miss);
        assert_eq!(index.physical_reads(), 0);

        // same bucket key as real words, but no exact line
        assert_eq!(index.find("square").unwrap(), Outcome::Miss);
        assert_eq!(index.physical_reads(), 1);
    }

    #[test]
    fn single_letter_lemma_resolves() {
        let dir = sample_dict();
        let index = open(&dir);
        assert!(index.find("a").unwrap().is_hit());
    }

    #[test]
    fn last_bucket_before_eof_is_readable() {
        let dir = sample_dict();
        let index = open(&dir);
        assert!(index.find("squirt").unwrap().is_hit());
    }

    #[test]
    fn prefix_of_stored_lemma_is_not_a_hit() {
        let dir = sample_dict();
        let index = open(&dir);
        assert_eq!(index.find("squir").unwrap(), Outcome::Miss);
    }

    #[test]
    fn lookup_parses_counts_symbols_and_offsets() {
        let dir = sample_dict();
        let index = open(&dir);

        let record = index.lookup("bear").unwrap().unwrap();
        assert_eq!(record.lemma, "bear");
        assert_eq!(record.pos, "n");
        assert_eq!(record.ptr_symbols, ["@", "~"]);
        assert_eq!(record.sense_cnt, 2);
        assert_eq!(record.tagsense_cnt, 1);
        assert_eq!(record.synset_offsets, [1111, 2222]);

        assert!(index.lookup("garblegarble").unwrap().is_none());
    }

    #[test]
    fn zero_pointer_lines_parse() {
        let dir = sample_dict();
        let index = open(&dir);

        let record = index.lookup("a").unwrap().unwrap();
        assert!(record.ptr_symbols.is_empty());
        assert_eq!(record.synset_offsets, [1]);
    }

    #[test]
    fn count_mismatch_is_a_parse_error() {
        let dir = write_dict(&["broken n 2 9 @ 1 0 00000001 00000002"]);
        let index = open(&dir);

        let err = index.lookup("broken").unwrap_err();
        assert!(matches!(err, Error::IndexParse { .. }));
    }

    #[test]
    fn non_numeric_count_is_a_parse_error() {
        let dir = write_dict(&["odd n x 1 @ 1 0 00000001"]);
        let index = open(&dir);

        let err = index.lookup("odd").unwrap_err();
        assert!(matches!(err, Error::IndexParse { .. }));
    }

    #[test]
    fn rand_with_short_prefix_spans_buckets() {
        let dir = sample_dict();
        let index = open(&dir);
        let mut rng = Rng::with_seed(11);

        let mut words = index.rand_words("fo", 10, &mut rng).unwrap();
        words.sort_unstable();
        assert_eq!(words, ["foal", "fog", "fox"]);
    }

    #[test]
    fn rand_with_long_prefix_filters_bucket() {
        let dir = sample_dict();
        let index = open(&dir);
        let mut rng = Rng::with_seed(11);

        let mut words = index.rand_words("squi", 10, &mut rng).unwrap();
        words.sort_unstable();
        assert_eq!(words, ["squirrel", "squirt"]);

        assert!(index.rand_words("squz", 10, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn rand_without_prefix_draws_from_sampled_buckets() {
        let dir = sample_dict();
        let index = open(&dir);
        let mut rng = Rng::with_seed(3);

        let words = index.rand_words("", 3, &mut rng).unwrap();
        assert_eq!(words.len(), 3);
        let mut distinct = words.clone();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(distinct.len(), 3, "one word per sampled bucket");
    }

    #[test]
    fn rand_respects_count() {
        let dir = sample_dict();
        let index = open(&dir);
        let mut rng = Rng::with_seed(8);

        assert_eq!(index.rand_words("squ", 1, &mut rng).unwrap().len(), 1);
        assert!(index.rand_words("nope", 1, &mut rng).unwrap().is_empty());
        assert!(index.rand_words("xy", 4, &mut rng).unwrap().is_empty());
    }

    #[test]
    fn equal_seeds_repeat_draws() {
        let dir = sample_dict();
        let index = open(&dir);

        let first = index.rand_words("", 2, &mut Rng::with_seed(21)).unwrap();
        let second = index.rand_words("", 2, &mut Rng::with_seed(21)).unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }
}
