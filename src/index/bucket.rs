//! Fast-index bucket maps.
//!
//! Each flat index file ships with a JSON sidecar (`fast-index.<pos>.json`)
//! mapping the first three characters of a lemma to the byte range of the
//! run of index lines sharing that prefix. Lookups resolve a word to a
//! bucket in O(1) and read only that byte range instead of scanning the
//! whole file.
//!
//! Sidecars are immutable once built, so parsed copies are shared per
//! canonical file path for the process lifetime through [`BucketRegistry`].

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock, RwLock};

use crate::error::{Error, Result};
use crate::pos::Pos;

/// Number of lemma characters used as the bucket key
pub const KEY_LENGTH: usize = 3;

/// Synthetic terminal key whose offset is the index file size
pub const EOF_KEY: &str = "_EOF_";

/// Bucket size statistics, informational only
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketStats {
    pub buckets: u32,
    pub words: u32,
    pub biggest: u32,
    /// Average words per bucket, serialized as a 2-decimal string
    pub avg: String,
    pub median: u32,
}

/// `[byte offset, next key]` pair; `next` is `None` only for the
/// [`EOF_KEY`] sentinel
pub type OffsetEntry = (u64, Option<String>);

/// In-memory form of one fast-index sidecar.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketIndex {
    pub first_key: String,
    pub key_length: usize,
    /// WordNet database version the sidecar was built against
    pub version: String,
    /// Index file name, e.g. `index.noun`
    pub name: String,
    pub stats: BucketStats,
    pub offsets: HashMap<String, OffsetEntry>,
    /// Sorted real keys (sentinel excluded), derived after load
    #[serde(skip)]
    keys: Vec<String>,
}

impl BucketIndex {
    /// Load the sidecar for `pos` from `dict_dir`. Absence or a parse
    /// failure is fatal for this POS.
    pub fn load(dict_dir: &Path, pos: Pos) -> Result<BucketIndex> {
        let path = dict_dir.join(pos.fast_index_file_name());
        Self::load_file(&path)
    }

    fn load_file(path: &Path) -> Result<BucketIndex> {
        let file = File::open(path)
            .map_err(|e| Error::missing_fast_index(path.display().to_string(), e.to_string()))?;
        let mut index: BucketIndex = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::missing_fast_index(path.display().to_string(), e.to_string()))?;
        index.rebuild_keys();
        log::debug!(
            "loaded {} buckets for {}",
            index.stats.buckets,
            index.name
        );
        Ok(index)
    }

    fn rebuild_keys(&mut self) {
        let mut keys: Vec<String> = self
            .offsets
            .keys()
            .filter(|k| k.as_str() != EOF_KEY)
            .cloned()
            .collect();
        keys.sort_unstable();
        self.keys = keys;
    }

    /// Bucket key for a (normalized) search word: its first
    /// `min(KEY_LENGTH, len)` characters.
    pub fn key_for(word: &str) -> &str {
        match word.char_indices().nth(KEY_LENGTH) {
            Some((idx, _)) => &word[..idx],
            None => word,
        }
    }

    /// Byte range `[offset, next_offset)` of the bucket for `key`, or
    /// `None` when no such bucket exists (a definitive miss, no I/O
    /// needed). The range includes the bucket's final newline.
    pub fn bucket_for(&self, key: &str) -> Option<(u64, u64)> {
        let (offset, next_key) = self.offsets.get(key)?;
        let next_key = next_key.as_deref()?;
        let (next_offset, _) = self.offsets.get(next_key)?;
        Some((*offset, *next_offset))
    }

    /// Byte range covering the buckets from `start` through `end`
    /// inclusive. Both must be real keys.
    pub fn span_for(&self, start: &str, end: &str) -> Option<(u64, u64)> {
        let (offset, _) = self.offsets.get(start)?;
        let (_, next_key) = self.offsets.get(end)?;
        let next_key = next_key.as_deref()?;
        let (next_offset, _) = self.offsets.get(next_key)?;
        Some((*offset, *next_offset))
    }

    /// All real bucket keys in ascending order.
    pub fn index_keys(&self) -> &[String] {
        &self.keys
    }

    /// Build a fast index by scanning a flat index file. One pass;
    /// license header lines (leading space) are skipped, each new key
    /// records the byte offset of its first line and becomes the `next`
    /// link of the key before it.
    pub fn build(index_path: &Path, version: &str) -> Result<BucketIndex> {
        let name = index_path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let file = File::open(index_path)?;
        let size = file.metadata()?.len();
        let mut reader = BufReader::new(file);

        let mut offsets: HashMap<String, OffsetEntry> = HashMap::new();
        let mut bucket_words: AHashMap<String, u32> = AHashMap::new();
        let mut first_key: Option<String> = None;
        let mut last_key: Option<String> = None;
        let mut offset: u64 = 0;
        let mut line = String::new();

        loop {
            line.clear();
            let consumed = reader.read_line(&mut line)?;
            if consumed == 0 {
                break;
            }
            let line_offset = offset;
            offset += consumed as u64;

            if line.starts_with(' ') {
                continue;
            }
            let trimmed = line.trim_end_matches('\n');
            if trimmed.is_empty() {
                continue;
            }
            let lemma = trimmed.split(' ').next().unwrap_or(trimmed);
            let key = BucketIndex::key_for(lemma);

            if let Some(count) = bucket_words.get_mut(key) {
                *count += 1;
                continue;
            }
            bucket_words.insert(key.to_string(), 1);
            offsets.insert(key.to_string(), (line_offset, None));
            if first_key.is_none() {
                first_key = Some(key.to_string());
            }
            if let Some(prev) = last_key.take() {
                if let Some(entry) = offsets.get_mut(&prev) {
                    entry.1 = Some(key.to_string());
                }
            }
            last_key = Some(key.to_string());
        }

        let last_key = last_key
            .ok_or_else(|| Error::io(format!("index file {} has no entries", name)))?;
        if let Some(entry) = offsets.get_mut(&last_key) {
            entry.1 = Some(EOF_KEY.to_string());
        }
        offsets.insert(EOF_KEY.to_string(), (size, None));

        let mut index = BucketIndex {
            first_key: first_key.unwrap_or_default(),
            key_length: KEY_LENGTH,
            version: version.to_string(),
            name,
            stats: bucket_stats(&bucket_words),
            offsets,
            keys: Vec::new(),
        };
        index.rebuild_keys();
        Ok(index)
    }

    /// Write the sidecar JSON next to its index file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }
}

fn bucket_stats(bucket_words: &AHashMap<String, u32>) -> BucketStats {
    let mut sizes: Vec<u32> = bucket_words.values().copied().collect();
    sizes.sort_unstable();
    let buckets = sizes.len() as u32;
    let words: u32 = sizes.iter().sum();
    let biggest = sizes.last().copied().unwrap_or(0);
    let median = sizes.get(sizes.len() / 2).copied().unwrap_or(0);
    let avg = if buckets == 0 {
        "0.00".to_string()
    } else {
        format!("{:.2}", f64::from(words) / f64::from(buckets))
    };
    BucketStats {
        buckets,
        words,
        biggest,
        avg,
        median,
    }
}

/// Process-wide cache of parsed sidecars, keyed by canonical index file
/// path. Populated on first use per path, never evicted.
pub struct BucketRegistry {
    cache: RwLock<AHashMap<PathBuf, Arc<BucketIndex>>>,
}

impl BucketRegistry {
    pub fn new() -> Self {
        BucketRegistry {
            cache: RwLock::new(AHashMap::new()),
        }
    }

    /// Shared default registry. Engines constructed without an explicit
    /// registry all share this one.
    pub fn global() -> &'static BucketRegistry {
        static GLOBAL: OnceLock<BucketRegistry> = OnceLock::new();
        GLOBAL.get_or_init(BucketRegistry::new)
    }

    /// Fetch-or-load the bucket index for `pos` under `dict_dir`.
    pub fn load(&self, dict_dir: &Path, pos: Pos) -> Result<Arc<BucketIndex>> {
        let dir = dict_dir.canonicalize().map_err(|e| {
            Error::missing_fast_index(dict_dir.display().to_string(), e.to_string())
        })?;
        let key = dir.join(pos.index_file_name());

        if let Some(index) = self.cache.read().unwrap().get(&key) {
            return Ok(Arc::clone(index));
        }

        let loaded = Arc::new(BucketIndex::load(&dir, pos)?);
        let mut cache = self.cache.write().unwrap();
        // another thread may have loaded it while we parsed
        let entry = cache.entry(key).or_insert(loaded);
        Ok(Arc::clone(entry))
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.cache.read().unwrap().len()
    }
}

impl Default for BucketRegistry {
    fn default() -> Self {
        Self::new()
    }
}
