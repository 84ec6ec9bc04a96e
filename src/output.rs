//! Output formatting for CLI results

use std::io::{self, Write};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::index::types::DataRecord;

/// Print per-POS word sections: a colored `# nouns 4:` header, then one
/// word per line. Brief mode joins each section on a single line with
/// no header. Empty sections are skipped.
pub fn print_word_sections(sections: &[(&str, Vec<String>)], brief: bool) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    for (label, words) in sections {
        if words.is_empty() {
            continue;
        }
        if brief {
            writeln!(stdout, "{}", words.join(" "))?;
            continue;
        }
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
        write!(stdout, "# {label} ")?;
        stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
        write!(stdout, "{}", words.len())?;
        stdout.reset()?;
        writeln!(stdout, ":")?;
        for word in words {
            writeln!(stdout, "{word}")?;
        }
        writeln!(stdout)?;
    }

    Ok(())
}

/// Print definition-style lookup results: the word, then one
/// `  pos: gloss` line per sense. Words with no senses are skipped.
pub fn print_definitions(entries: &[(String, Vec<DataRecord>)]) -> io::Result<()> {
    print_senses(entries, |record| record.gloss.clone())
}

/// Print synonym lists, one `  pos: word word ...` line per sense.
pub fn print_synonyms(entries: &[(String, Vec<DataRecord>)]) -> io::Result<()> {
    print_senses(entries, |record| record.synonyms.join(" "))
}

/// Print example sentences, one `  pos: example` line per example.
pub fn print_examples(entries: &[(String, Vec<DataRecord>)]) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    for (word, records) in entries {
        let examples: Vec<(&str, &str)> = records
            .iter()
            .flat_map(|r| r.exp.iter().map(move |e| (r.pos.as_str(), e.as_str())))
            .collect();
        if examples.is_empty() {
            continue;
        }
        print_word_header(&mut stdout, word)?;
        for (pos, example) in examples {
            print_sense_line(&mut stdout, pos, example)?;
        }
    }

    Ok(())
}

/// Print one record the way a definition entry prints, lemma first.
pub fn print_record(record: &DataRecord) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    print_word_header(&mut stdout, &record.lemma)?;
    print_sense_line(&mut stdout, &record.pos, &record.gloss)?;
    if record.synonyms.len() > 1 {
        print_sense_line(&mut stdout, "syn", &record.synonyms.join(" "))?;
    }
    Ok(())
}

/// Print a flat word list, one per line, or space-joined in brief mode.
pub fn print_words(words: &[String], brief: bool) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    if brief {
        writeln!(stdout, "{}", words.join(" "))?;
    } else {
        for word in words {
            writeln!(stdout, "{word}")?;
        }
    }
    Ok(())
}

/// Print any serializable result as JSON, pretty or compact.
pub fn print_json<T: Serialize>(value: &T, pretty: bool) -> io::Result<()> {
    let rendered = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
    .map_err(io::Error::other)?;
    println!("{rendered}");
    Ok(())
}

fn print_senses(
    entries: &[(String, Vec<DataRecord>)],
    text: impl Fn(&DataRecord) -> String,
) -> io::Result<()> {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);

    for (word, records) in entries {
        if records.is_empty() {
            continue;
        }
        print_word_header(&mut stdout, word)?;
        for record in records {
            print_sense_line(&mut stdout, &record.pos, &text(record))?;
        }
    }

    Ok(())
}

fn print_word_header(stdout: &mut StandardStream, word: &str) -> io::Result<()> {
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Magenta)).set_bold(true))?;
    writeln!(stdout, "{word}")?;
    stdout.reset()?;
    Ok(())
}

fn print_sense_line(stdout: &mut StandardStream, tag: &str, text: &str) -> io::Result<()> {
    write!(stdout, "  ")?;
    stdout.set_color(ColorSpec::new().set_fg(Some(Color::Green)))?;
    write!(stdout, "{tag}")?;
    stdout.reset()?;
    writeln!(stdout, ": {text}")?;
    Ok(())
}
