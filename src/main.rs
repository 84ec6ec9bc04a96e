mod error;
mod index;
mod output;
mod pos;
mod utils;
mod wordpos;

use std::io::Read;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::index::types::DataRecord;
use crate::pos::Pos;
use crate::utils::stopwords::{DEFAULT_STOPWORDS, Stopwords};
use crate::wordpos::{RandOptions, WordPos, WordPosOptions};

/// POS order used for flag aggregation and `-c` count output.
const CLI_POS: [Pos; 4] = [Pos::Noun, Pos::Adjective, Pos::Verb, Pos::Adverb];

#[derive(Parser)]
#[command(name = "wordpos", version)]
#[command(about = "Part-of-speech classification and WordNet dictionary lookup")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Dictionary directory (default: $WORDPOS_DICT or ./dict)
    #[arg(long, global = true)]
    dict: Option<PathBuf>,

    /// Nouns only
    #[arg(short = 'n', long, global = true)]
    noun: bool,

    /// Adjectives only
    #[arg(short = 'a', long, global = true)]
    adj: bool,

    /// Verbs only
    #[arg(short = 'v', long, global = true)]
    verb: bool,

    /// Adverbs only
    #[arg(short = 'r', long, global = true)]
    adv: bool,

    /// Counts only (one per selected POS, then total parsed words)
    #[arg(short = 'c', long, global = true)]
    count: bool,

    /// Brief output: one line per section, no headers
    #[arg(short = 'b', long, global = true)]
    brief: bool,

    /// Results as pretty JSON
    #[arg(short = 'f', long, global = true)]
    full: bool,

    /// Results as compact JSON
    #[arg(short = 'j', long, global = true)]
    json: bool,

    /// Read input text from a file
    #[arg(short = 'i', long, global = true, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Keep stopwords in parsed text
    #[arg(short = 's', long, global = true)]
    stopwords: bool,

    /// Log elapsed time per operation
    #[arg(long, global = true)]
    profile: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List words of the input found under each POS
    Get {
        /// Words to classify (stdin when empty and no -i)
        words: Vec<String>,
    },
    /// Look up definitions
    Def { words: Vec<String> },
    /// Look up synonyms
    Syn { words: Vec<String> },
    /// Look up example sentences
    Exp { words: Vec<String> },
    /// Read the record at a byte offset of one POS data file
    Seek {
        #[arg(allow_negative_numbers = true)]
        offset: i64,
        /// POS tag: n, v, a or r (s folds to a)
        pos: String,
    },
    /// Pick random words
    Rand {
        /// Prefix the words must start with
        starts_with: Option<String>,
        /// Number of words to return
        #[arg(short = 'N', long, default_value_t = 1)]
        num: usize,
    },
    /// Show parsed words, deduped and less stopwords
    Parse { words: Vec<String> },
    /// Print the default stopword list
    Stopwords,
    /// Show dictionary index statistics
    Stats,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let start = cli.profile.then(Instant::now);

    run_command(&cli)?;

    if let Some(t) = start {
        eprintln!("{:.1?}", t.elapsed());
    }
    Ok(())
}

fn run_command(cli: &Cli) -> Result<()> {
    // the stopword list needs no dictionary
    if let Commands::Stopwords = &cli.command {
        let words: Vec<String> = DEFAULT_STOPWORDS.iter().map(|w| w.to_string()).collect();
        if cli.json || cli.full {
            output::print_json(&words, cli.full)?;
        } else {
            output::print_words(&words, cli.brief)?;
        }
        return Ok(());
    }

    let wordpos = engine(cli)?;

    match &cli.command {
        Commands::Get { words } => {
            let text = gather_text(words, cli)?;
            let selected = selected_pos(cli);
            let mut sections: Vec<(&str, Vec<String>)> = Vec::new();
            for pos in &selected {
                sections.push((pos.plural_label(), wordpos.get(&text, *pos)?));
            }
            if cli.count {
                let counts: Vec<String> =
                    sections.iter().map(|(_, w)| w.len().to_string()).collect();
                println!("{} {}", counts.join(" "), wordpos.parse(&text).len());
            } else if cli.json || cli.full {
                output::print_json(&section_map(&sections), cli.full)?;
            } else {
                output::print_word_sections(&sections, cli.brief)?;
            }
        }

        Commands::Def { words } => {
            let entries = lookup_entries(cli, &wordpos, words)?;
            if cli.json || cli.full {
                output::print_json(&entry_map(&entries), cli.full)?;
            } else {
                output::print_definitions(&entries)?;
            }
        }

        Commands::Syn { words } => {
            let entries = lookup_entries(cli, &wordpos, words)?;
            if cli.json || cli.full {
                output::print_json(&entry_map(&entries), cli.full)?;
            } else {
                output::print_synonyms(&entries)?;
            }
        }

        Commands::Exp { words } => {
            let entries = lookup_entries(cli, &wordpos, words)?;
            if cli.json || cli.full {
                output::print_json(&entry_map(&entries), cli.full)?;
            } else {
                output::print_examples(&entries)?;
            }
        }

        Commands::Seek { offset, pos } => {
            let record = wordpos.seek(*offset, pos)?;
            if cli.json || cli.full {
                output::print_json(&record, cli.full)?;
            } else {
                output::print_record(&record)?;
            }
        }

        Commands::Rand { starts_with, num } => {
            let opts = RandOptions {
                starts_with: starts_with.clone().unwrap_or_default(),
                count: *num,
            };
            let picked = match explicit_pos(cli) {
                Some(list) => {
                    let mut all = Vec::new();
                    for pos in list {
                        all.extend(wordpos.rand_pos(pos, &opts)?);
                    }
                    all
                }
                None => wordpos.rand(&opts)?,
            };
            if cli.json || cli.full {
                output::print_json(&picked, cli.full)?;
            } else {
                output::print_words(&picked, cli.brief)?;
            }
        }

        Commands::Parse { words } => {
            let text = gather_text(words, cli)?;
            let parsed = wordpos.parse(&text);
            if cli.count {
                println!("{}", parsed.len());
            } else if cli.json || cli.full {
                output::print_json(&parsed, cli.full)?;
            } else {
                output::print_word_sections(&[("words", parsed)], cli.brief)?;
            }
        }

        Commands::Stats => {
            let stats = wordpos.stats();
            if cli.json || cli.full {
                output::print_json(&stats, cli.full)?;
            } else {
                for s in &stats {
                    println!(
                        "{}: {} words in {} buckets (biggest {}, avg {}, median {})",
                        s.pos, s.words, s.buckets, s.biggest, s.avg, s.median
                    );
                }
            }
        }

        Commands::Stopwords => {}
    }

    Ok(())
}

fn engine(cli: &Cli) -> Result<WordPos> {
    let options = WordPosOptions {
        dict_path: cli
            .dict
            .clone()
            .unwrap_or_else(crate::wordpos::default_dict_path),
        profile: cli.profile,
        stopwords: if cli.stopwords {
            Stopwords::None
        } else {
            Stopwords::Default
        },
    };
    Ok(WordPos::new(options)?)
}

/// Input text from the `-i` file, the command line, or stdin, in that
/// priority.
fn gather_text(words: &[String], cli: &Cli) -> Result<String> {
    if let Some(path) = &cli.file {
        return Ok(std::fs::read_to_string(path)?);
    }
    if !words.is_empty() {
        return Ok(words.join(" "));
    }
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(buf)
}

/// POS flags given on the command line, in [`CLI_POS`] order, or `None`
/// when no flag was given.
fn explicit_pos(cli: &Cli) -> Option<Vec<Pos>> {
    let mut chosen = Vec::new();
    if cli.noun {
        chosen.push(Pos::Noun);
    }
    if cli.adj {
        chosen.push(Pos::Adjective);
    }
    if cli.verb {
        chosen.push(Pos::Verb);
    }
    if cli.adv {
        chosen.push(Pos::Adverb);
    }
    (!chosen.is_empty()).then_some(chosen)
}

fn selected_pos(cli: &Cli) -> Vec<Pos> {
    explicit_pos(cli).unwrap_or_else(|| CLI_POS.to_vec())
}

/// Sense lookups for every parsed word of the input, restricted to the
/// selected POS when flags are given.
fn lookup_entries(
    cli: &Cli,
    wordpos: &WordPos,
    words: &[String],
) -> Result<Vec<(String, Vec<DataRecord>)>> {
    let text = gather_text(words, cli)?;
    let mut entries = Vec::new();
    for word in wordpos.parse(&text) {
        let records = match explicit_pos(cli) {
            Some(list) => {
                let mut records = Vec::new();
                for pos in list {
                    records.extend(wordpos.lookup(&word, pos)?);
                }
                records
            }
            None => wordpos.lookup_all(&word)?,
        };
        entries.push((word, records));
    }
    Ok(entries)
}

fn section_map(sections: &[(&str, Vec<String>)]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (label, section_words) in sections {
        map.insert(label.to_string(), serde_json::json!(section_words));
    }
    serde_json::Value::Object(map)
}

fn entry_map(entries: &[(String, Vec<DataRecord>)]) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (word, records) in entries {
        map.insert(word.clone(), serde_json::json!(records));
    }
    serde_json::Value::Object(map)
}
