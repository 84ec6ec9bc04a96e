//! Performance benchmarks for the wordpos engine
//!
//! Run with: cargo bench

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use std::fmt::Write as _;
use std::path::Path;
use tempfile::TempDir;

use wordpos::index::bucket::{BucketIndex, BucketRegistry};
use wordpos::pos::Pos;
use wordpos::{RandOptions, WordPos, WordPosOptions};

/// Write one POS's data file, index file and fast-index sidecar. Every
/// lemma gets a single synset; returns the synset offset of the first.
fn write_pos(dir: &Path, pos: Pos, lemmas: &[String]) -> u64 {
    let tag = pos.as_tag();
    let mut sorted: Vec<&String> = lemmas.iter().collect();
    sorted.sort();

    let mut data = String::from("  1 synthetic benchmark data\n");
    let mut first_offset = 0;
    let mut index_lines = Vec::with_capacity(sorted.len());
    for (i, lemma) in sorted.iter().enumerate() {
        let offset = data.len() as u64;
        if i == 0 {
            first_offset = offset;
        }
        write!(
            data,
            "{offset:08} 05 {tag} 01 {lemma} 0 001 @ 00001740 {tag} 0000 | a synthetic gloss for {lemma}  \n"
        )
        .unwrap();
        index_lines.push(format!("{lemma} {tag} 1 1 @ 1 0 {offset:08}\n"));
    }
    std::fs::write(dir.join(pos.data_file_name()), data).expect("write data file");

    let mut index = String::from("  1 synthetic benchmark index\n");
    for line in index_lines {
        index.push_str(&line);
    }
    let index_path = dir.join(pos.index_file_name());
    std::fs::write(&index_path, index).expect("write index file");
    BucketIndex::build(&index_path, "bench")
        .expect("build fast index")
        .save(&dir.join(pos.fast_index_file_name()))
        .expect("save fast index");
    first_offset
}

/// Build a synthetic dictionary: ~5000 generated nouns spread over a few
/// hundred buckets, plus small verb/adjective/adverb files.
fn build_dict() -> (TempDir, WordPos, u64) {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path();

    let onsets = [
        "b", "bl", "c", "cr", "d", "f", "g", "gr", "h", "j", "k", "l", "m", "n", "p", "pl", "r",
        "s", "st", "t",
    ];
    let vowels = ["a", "e", "i", "o", "u"];
    let codas = ["ck", "ll", "mp", "nd", "nt", "r", "sh", "st", "t", "x"];

    let mut nouns = Vec::new();
    for onset in onsets {
        for v1 in vowels {
            for coda in codas {
                for v2 in vowels {
                    nouns.push(format!("{onset}{v1}{coda}{v2}"));
                }
            }
        }
    }
    let first_offset = write_pos(path, Pos::Noun, &nouns);

    let verbs: Vec<String> = ["run", "walk", "jump", "swim", "climb"]
        .map(String::from)
        .to_vec();
    let adjectives: Vec<String> = ["red", "green", "blue", "small", "large"]
        .map(String::from)
        .to_vec();
    let adverbs: Vec<String> = ["fast", "slowly", "well"].map(String::from).to_vec();
    write_pos(path, Pos::Verb, &verbs);
    write_pos(path, Pos::Adjective, &adjectives);
    write_pos(path, Pos::Adverb, &adverbs);

    let registry = BucketRegistry::new();
    let wordpos = WordPos::with_registry(
        WordPosOptions {
            dict_path: path.to_path_buf(),
            ..Default::default()
        },
        &registry,
    )
    .expect("open engine");
    (dir, wordpos, first_offset)
}

fn bench_parse(c: &mut Criterion) {
    let (_dir, wordpos, _) = build_dict();
    let text = "The backa ran past a slowly turning bucka, while small green \
                waves kept the placko and the stindo well apart.";

    c.bench_function("parse_sentence", |b| {
        b.iter(|| wordpos.parse(black_box(text)))
    });
}

fn bench_membership(c: &mut Criterion) {
    let (_dir, wordpos, _) = build_dict();

    let cases = [
        ("hit", "backa"),
        ("miss_in_bucket", "backz"),
        ("miss_no_bucket", "zzz"),
    ];

    let mut group = c.benchmark_group("is_noun");
    for (name, word) in cases {
        group.bench_with_input(BenchmarkId::from_parameter(name), &word, |b, &w| {
            b.iter(|| wordpos.is_noun(black_box(w)).unwrap())
        });
    }
    group.finish();
}

fn bench_lookup(c: &mut Criterion) {
    let (_dir, wordpos, first_offset) = build_dict();

    let mut group = c.benchmark_group("lookup");
    group.bench_function("single_word", |b| {
        b.iter(|| wordpos.lookup_noun(black_box("backa")).unwrap())
    });
    group.bench_function("seek_offset", |b| {
        b.iter(|| wordpos.seek(black_box(first_offset as i64), "n").unwrap())
    });
    group.finish();
}

fn bench_get_pos(c: &mut Criterion) {
    let (_dir, wordpos, _) = build_dict();
    let text = "the backa and the bucka ran well past some small green placko";

    c.bench_function("get_pos_sentence", |b| {
        b.iter(|| wordpos.get_pos(black_box(text)).unwrap())
    });
}

fn bench_rand(c: &mut Criterion) {
    let (_dir, wordpos, _) = build_dict();

    let mut group = c.benchmark_group("rand");
    group.bench_function("no_prefix", |b| {
        let opts = RandOptions {
            starts_with: String::new(),
            count: 10,
        };
        b.iter(|| wordpos.rand_noun(black_box(&opts)).unwrap())
    });
    group.bench_function("short_prefix", |b| {
        let opts = RandOptions {
            starts_with: "ba".to_string(),
            count: 10,
        };
        b.iter(|| wordpos.rand_noun(black_box(&opts)).unwrap())
    });
    group.finish();
}

fn bench_fast_index_build(c: &mut Criterion) {
    let (dir, _wordpos, _) = build_dict();
    let index_path = dir.path().join(Pos::Noun.index_file_name());

    c.bench_function("fast_index_build", |b| {
        b.iter(|| BucketIndex::build(black_box(&index_path), "bench").unwrap())
    });
}

criterion_group!(
    benches,
    bench_parse,
    bench_membership,
    bench_lookup,
    bench_get_pos,
    bench_rand,
    bench_fast_index_build,
);

criterion_main!(benches);
