//! Shared dictionary fixture for integration tests.
//!
//! Builds a small WordNet-shaped dictionary in a temp directory: four
//! index files, four data files, and one fast-index sidecar per index.
//! Offsets are computed while writing so every data line carries its
//! own byte offset, exactly as the real files do.

// not every test binary uses every helper
#![allow(dead_code)]

use std::path::Path;

use tempfile::TempDir;
use wordpos::index::bucket::{BucketIndex, BucketRegistry};
use wordpos::pos::Pos;
use wordpos::utils::stopwords::Stopwords;
use wordpos::{WordPos, WordPosOptions};

/// Sentence most tests classify; mirrors the canonical usage example.
pub const SAMPLE_SENTENCE: &str = "The angry bear chased the frightened little squirrel.";

pub struct DictFixture {
    pub dir: TempDir,
    /// Offset of the adjective record for "amazing", used by seek tests
    pub amazing_offset: u64,
    /// Offsets of the two noun senses of "squirrel"
    pub squirrel_offsets: Vec<u64>,
}

/// Accumulates one data file, tracking the byte offset of every synset.
struct DataBuilder {
    content: String,
}

impl DataBuilder {
    fn new(label: &str) -> DataBuilder {
        DataBuilder {
            content: format!("  1 {label} data assembled for tests\n"),
        }
    }

    /// Append one synset line and return its byte offset.
    fn add(&mut self, lex_filenum: u32, ss_type: &str, words: &[&str], gloss: &str) -> u64 {
        let offset = self.content.len() as u64;
        let mut line = format!("{offset:08} {lex_filenum:02} {ss_type} {:02x}", words.len());
        for word in words {
            line.push_str(&format!(" {word} 0"));
        }
        line.push_str(" 001 @ 00001740 n 0000 | ");
        line.push_str(gloss);
        line.push_str("  \n");
        self.content.push_str(&line);
        offset
    }

    fn write(self, dir: &Path, pos: Pos) {
        std::fs::write(dir.join(pos.data_file_name()), self.content).unwrap();
    }
}

/// One index line: lemma, tag, one pointer symbol, zero-padded offsets.
fn index_line(lemma: &str, tag: &str, offsets: &[u64]) -> String {
    let mut line = format!("{lemma} {tag} {} 1 @ {} 1", offsets.len(), offsets.len());
    for offset in offsets {
        line.push_str(&format!(" {offset:08}"));
    }
    line.push('\n');
    line
}

/// Write an index file from unsorted lines and build its sidecar.
fn write_index(dir: &Path, pos: Pos, mut lines: Vec<String>) {
    lines.sort();
    let mut content = String::from("  1 index assembled for tests\n");
    for line in &lines {
        content.push_str(line);
    }
    let index_path = dir.join(pos.index_file_name());
    std::fs::write(&index_path, content).unwrap();

    let bucket = BucketIndex::build(&index_path, "test").unwrap();
    bucket.save(&dir.join(pos.fast_index_file_name())).unwrap();
}

/// Build the full four-POS dictionary.
pub fn build_dict() -> DictFixture {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path();

    // nouns
    let mut noun = DataBuilder::new("noun");
    let squirrel_1 = noun.add(
        5,
        "n",
        &["squirrel"],
        "a kind of arboreal rodent having a long bushy tail",
    );
    let squirrel_2 = noun.add(
        18,
        "n",
        &["squirrel"],
        "a person regarded as quick and agile",
    );
    let bear_n1 = noun.add(
        5,
        "n",
        &["bear"],
        "massive plantigrade carnivorous or omnivorous mammals",
    );
    let bear_n2 = noun.add(
        18,
        "n",
        &["bear"],
        "an investor with a pessimistic market outlook",
    );
    let chased_n = noun.add(18, "n", &["chased"], "a person who is being chased");
    let little_n = noun.add(23, "n", &["little"], "a small amount");
    let foal_n = noun.add(5, "n", &["foal"], "a young horse");
    let fog_n = noun.add(
        19,
        "n",
        &["fog"],
        "droplets of water vapor suspended in the air near the ground",
    );
    let fox_n = noun.add(5, "n", &["fox"], "alert carnivorous mammal");
    let squab_n = noun.add(13, "n", &["squab"], "flesh of a pigeon suitable for roasting");
    let squirt_n = noun.add(
        18,
        "n",
        &["squirt"],
        "someone who is small and insignificant",
    );
    noun.write(path, Pos::Noun);
    write_index(
        path,
        Pos::Noun,
        vec![
            index_line("bear", "n", &[bear_n1, bear_n2]),
            index_line("chased", "n", &[chased_n]),
            index_line("foal", "n", &[foal_n]),
            index_line("fog", "n", &[fog_n]),
            index_line("fox", "n", &[fox_n]),
            index_line("little", "n", &[little_n]),
            index_line("squab", "n", &[squab_n]),
            index_line("squirrel", "n", &[squirrel_1, squirrel_2]),
            index_line("squirt", "n", &[squirt_n]),
        ],
    );

    // verbs
    let mut verb = DataBuilder::new("verb");
    let bear_v1 = verb.add(40, "v", &["bear", "hold"], "have rightfully");
    let bear_v2 = verb.add(
        31,
        "v",
        &["bear", "tolerate", "stand"],
        "put up with something or somebody unpleasant",
    );
    let bear_v3 = verb.add(
        29,
        "v",
        &["have_a_bun_in_the_oven", "bear", "carry", "gestate", "expect"],
        "be pregnant with",
    );
    let chase_v = verb.add(
        38,
        "v",
        &["chase", "trail"],
        "go after with the intent to catch",
    );
    verb.write(path, Pos::Verb);
    write_index(
        path,
        Pos::Verb,
        vec![
            index_line("bear", "v", &[bear_v1, bear_v2, bear_v3]),
            index_line("chase", "v", &[chase_v]),
            index_line("have_a_bun_in_the_oven", "v", &[bear_v3]),
        ],
    );

    // adjectives; satellite senses carry the literal `s` tag
    let mut adj = DataBuilder::new("adjective");
    let amazing_a = adj.add(
        0,
        "s",
        &["amazing", "astonishing"],
        "surprising greatly; \"she does an amazing amount of work\"",
    );
    let angry_a1 = adj.add(
        0,
        "s",
        &["angry", "furious"],
        "feeling or showing anger; \"angry at the weather\"",
    );
    let angry_a2 = adj.add(
        0,
        "a",
        &["angry"],
        "(of the elements) as if showing violent anger",
    );
    let angry_a3 = adj.add(0, "s", &["angry", "wrathful"], "incensed or enraged");
    let frightened_a = adj.add(0, "s", &["frightened", "scared"], "made afraid");
    let little_a = adj.add(
        0,
        "a",
        &["little", "small"],
        "limited or below average in number or quantity",
    );
    adj.write(path, Pos::Adjective);
    write_index(
        path,
        Pos::Adjective,
        vec![
            index_line("amazing", "a", &[amazing_a]),
            index_line("angry", "a", &[angry_a1, angry_a2, angry_a3]),
            index_line("frightened", "a", &[frightened_a]),
            index_line("little", "a", &[little_a]),
        ],
    );

    // adverbs
    let mut adv = DataBuilder::new("adverb");
    let little_r = adv.add(2, "r", &["little"], "not much");
    adv.write(path, Pos::Adverb);
    write_index(path, Pos::Adverb, vec![index_line("little", "r", &[little_r])]);

    DictFixture {
        dir,
        amazing_offset: amazing_a,
        squirrel_offsets: vec![squirrel_1, squirrel_2],
    }
}

/// Engine over the fixture with default stopword filtering.
pub fn engine(fixture: &DictFixture) -> WordPos {
    engine_with(fixture, Stopwords::Default)
}

/// Engine over the fixture with explicit stopword handling. Each engine
/// gets a private bucket-index registry so tests stay isolated.
pub fn engine_with(fixture: &DictFixture, stopwords: Stopwords) -> WordPos {
    let registry = BucketRegistry::new();
    WordPos::with_registry(
        WordPosOptions {
            dict_path: fixture.dir.path().to_path_buf(),
            profile: false,
            stopwords,
        },
        &registry,
    )
    .unwrap()
}
