//! Synset record retrieval from one POS's flat data file.
//!
//! Records are addressed by byte offset. A read starts at the offset
//! with a nominal chunk size and grows until the line terminator shows
//! up, bounded by the longest line known for that POS. The line's own
//! leading zero-padded offset field must match the requested offset;
//! disagreement means the index and data files are out of step.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::index::piper::{self, Piper};
use crate::index::types::{DataRecord, Pointer, SynsetOffset, LEX_NAMES};
use crate::pos::Pos;

/// Starting chunk size for a record read
const NOMINAL_LINE_LENGTH: usize = 512;

/// One POS's data file and its read coalescer.
#[derive(Debug)]
pub struct DataFile {
    pos: Pos,
    path: PathBuf,
    max_line_length: usize,
    piper: Piper,
}

impl DataFile {
    pub fn new(dict_dir: &Path, pos: Pos) -> DataFile {
        let path = dict_dir.join(pos.data_file_name());
        DataFile {
            pos,
            piper: Piper::new(path.clone()),
            path,
            max_line_length: pos.max_data_line_length(),
        }
    }

    pub fn pos(&self) -> Pos {
        self.pos
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and parse the record starting exactly at `offset`.
    pub fn read_record(&self, offset: SynsetOffset) -> Result<DataRecord> {
        let line = self.read_line_at(offset)?;
        parse_data_line(&line, offset)
    }

    /// Read and parse several records, preserving input order. The first
    /// failing offset fails the whole call.
    pub fn lookup(&self, offsets: &[SynsetOffset]) -> Result<Vec<DataRecord>> {
        let mut records = Vec::with_capacity(offsets.len());
        for &offset in offsets {
            records.push(self.read_record(offset)?);
        }
        Ok(records)
    }

    /// Chunked line read at `offset`, coalesced with concurrent requests
    /// for the same offset.
    fn read_line_at(&self, offset: SynsetOffset) -> Result<String> {
        let max = self.max_line_length;
        let line = self.piper.run(&format!("seek:{offset}"), move |file| {
            let mut acc: Vec<u8> = Vec::with_capacity(NOMINAL_LINE_LENGTH);
            loop {
                let mut chunk = [0u8; NOMINAL_LINE_LENGTH];
                let n = piper::read_at(file, &mut chunk, offset + acc.len() as u64)?;
                if n == 0 {
                    return Err(Error::NoDataAtOffset(offset));
                }
                let scan_from = acc.len();
                acc.extend_from_slice(&chunk[..n]);
                if let Some(rel) = memchr::memchr(b'\n', &acc[scan_from..]) {
                    acc.truncate(scan_from + rel);
                    break;
                }
                if acc.len() >= max {
                    return Err(Error::NoDataAtOffset(offset));
                }
            }
            if acc.is_empty() {
                return Err(Error::NoDataAtOffset(offset));
            }
            Ok(String::from_utf8_lossy(&acc).into_owned())
        })?;
        Ok(line.to_string())
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

/// Parse one data line into a [`DataRecord`].
///
/// Grammar: `synset_offset lex_filenum ss_type w_cnt [word lex_id]^w_cnt
/// p_cnt [pointer]^p_cnt [frames] | gloss` with `w_cnt` in hex. Verb
/// frames between the pointers and the gloss separator are skipped.
pub fn parse_data_line(line: &str, offset: SynsetOffset) -> Result<DataRecord> {
    let padded = format!("{offset:08}");
    if !line.starts_with(&padded) {
        return Err(Error::BadDataAtLocation(offset));
    }

    let Some((token_part, gloss)) = line.split_once("| ") else {
        return Err(Error::data_parse(offset, "missing gloss separator"));
    };
    let tokens: Vec<&str> = token_part.split_whitespace().collect();

    let synset_offset = num_field(&tokens, 0, offset, "synset_offset")?;
    let lex_filenum = num_field(&tokens, 1, offset, "lex_filenum")? as usize;
    let lex_name = LEX_NAMES
        .get(lex_filenum)
        .copied()
        .ok_or_else(|| Error::data_parse(offset, format!("lex_filenum {lex_filenum} out of range")))?;
    let pos = field(&tokens, 2, offset, "ss_type")?;

    let raw_w_cnt = field(&tokens, 3, offset, "w_cnt")?;
    let w_cnt = u32::from_str_radix(raw_w_cnt, 16)
        .map_err(|_| Error::data_parse(offset, format!("bad hex w_cnt '{raw_w_cnt}'")))?;
    if w_cnt == 0 {
        return Err(Error::data_parse(offset, "zero word count"));
    }

    let mut synonyms = Vec::with_capacity(w_cnt as usize);
    for k in 0..w_cnt as usize {
        synonyms.push(field(&tokens, 4 + 2 * k, offset, "word")?.to_string());
    }
    let lemma = synonyms[0].clone();
    let lex_id = field(&tokens, 5, offset, "lex_id")?.to_string();

    let ptr_offset = (w_cnt as usize - 1) * 2 + 6;
    let p_cnt_raw = field(&tokens, ptr_offset, offset, "p_cnt")?;
    let p_cnt = p_cnt_raw
        .parse::<usize>()
        .map_err(|_| Error::data_parse(offset, format!("bad p_cnt '{p_cnt_raw}'")))?;

    let mut ptrs = Vec::with_capacity(p_cnt);
    for i in 0..p_cnt {
        let base = ptr_offset + 1 + 4 * i;
        ptrs.push(Pointer {
            pointer_symbol: field(&tokens, base, offset, "pointer_symbol")?.to_string(),
            synset_offset: num_field(&tokens, base + 1, offset, "pointer offset")?,
            pos: field(&tokens, base + 2, offset, "pointer pos")?.to_string(),
            source_target: field(&tokens, base + 3, offset, "source_target")?.to_string(),
        });
    }

    let mut segments = gloss.split("; ");
    let def = segments.next().unwrap_or_default().to_string();
    let exp: Vec<String> = segments.map(strip_example).collect();

    Ok(DataRecord {
        synset_offset,
        lex_filenum: lex_filenum as u32,
        lex_name,
        pos: pos.to_string(),
        w_cnt,
        lemma,
        synonyms,
        lex_id,
        ptrs,
        gloss: gloss.to_string(),
        def,
        exp,
    })
}

/// Drop literal quote characters and delete whitespace runs of two or
/// more, keeping single spaces.
fn strip_example(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut pending: Option<char> = None;
    let mut run = 0usize;
    for ch in segment.chars() {
        if ch == '"' {
            continue;
        }
        if ch.is_whitespace() {
            run += 1;
            pending = Some(ch);
            continue;
        }
        if run == 1 {
            if let Some(ws) = pending.take() {
                out.push(ws);
            }
        }
        run = 0;
        pending = None;
        out.push(ch);
    }
    if run == 1 {
        if let Some(ws) = pending {
            out.push(ws);
        }
    }
    out
}

fn field<'a>(tokens: &'a [&str], idx: usize, offset: SynsetOffset, name: &str) -> Result<&'a str> {
    tokens
        .get(idx)
        .copied()
        .ok_or_else(|| Error::data_parse(offset, format!("missing {name} at token {idx}")))
}

fn num_field(tokens: &[&str], idx: usize, offset: SynsetOffset, name: &str) -> Result<u64> {
    let raw = field(tokens, idx, offset, name)?;
    raw.parse::<u64>()
        .map_err(|_| Error::data_parse(offset, format!("bad {name} '{raw}'")))
}
