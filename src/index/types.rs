use serde::Serialize;

/// Byte offset of a synset record within a data file
pub type SynsetOffset = u64;

/// Lexicographer file names, indexed by the `lex_filenum` field of a data
/// line. Fixed ordinal table from the WordNet distribution.
pub const LEX_NAMES: [&str; 45] = [
    "adj.all",
    "adj.pert",
    "adv.all",
    "noun.Tops",
    "noun.act",
    "noun.animal",
    "noun.artifact",
    "noun.attribute",
    "noun.body",
    "noun.cognition",
    "noun.communication",
    "noun.event",
    "noun.feeling",
    "noun.food",
    "noun.group",
    "noun.location",
    "noun.motive",
    "noun.object",
    "noun.person",
    "noun.phenomenon",
    "noun.plant",
    "noun.possession",
    "noun.process",
    "noun.quantity",
    "noun.relation",
    "noun.shape",
    "noun.state",
    "noun.substance",
    "noun.time",
    "verb.body",
    "verb.change",
    "verb.cognition",
    "verb.communication",
    "verb.competition",
    "verb.consumption",
    "verb.contact",
    "verb.creation",
    "verb.emotion",
    "verb.motion",
    "verb.perception",
    "verb.possession",
    "verb.social",
    "verb.stative",
    "verb.weather",
    "adj.ppl",
];

/// One parsed line of a flat index file: a lemma, its pointer symbols,
/// and the synset offsets of every sense in the corresponding data file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexRecord {
    pub lemma: String,
    /// Single-character POS tag as stored on the line
    pub pos: String,
    pub ptr_symbols: Vec<String>,
    pub sense_cnt: u32,
    pub tagsense_cnt: u32,
    pub synset_offsets: Vec<SynsetOffset>,
}

/// A semantic pointer from one synset to another
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pointer {
    pub pointer_symbol: String,
    pub synset_offset: SynsetOffset,
    /// Literal POS tag of the target, may be `s`
    pub pos: String,
    /// Four-digit hex source/target field, kept verbatim
    pub source_target: String,
}

/// One parsed synset line of a flat data file. Constructed fresh on every
/// lookup, never cached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DataRecord {
    pub synset_offset: SynsetOffset,
    pub lex_filenum: u32,
    /// Name from [`LEX_NAMES`] for `lex_filenum`
    pub lex_name: &'static str,
    /// Literal synset type tag; adjective satellites keep `s`
    pub pos: String,
    /// Word count, hex-encoded on disk
    pub w_cnt: u32,
    /// First word of the synset (not necessarily the word searched for)
    pub lemma: String,
    pub synonyms: Vec<String>,
    /// Hex lex-id digit of the first word, kept verbatim
    pub lex_id: String,
    pub ptrs: Vec<Pointer>,
    /// Gloss text exactly as stored after the `| ` separator
    pub gloss: String,
    /// First `"; "`-delimited segment of the gloss
    pub def: String,
    /// Remaining gloss segments with quote characters and doubled
    /// whitespace stripped
    pub exp: Vec<String>,
}

/// Outcome of an exact-match search in one index file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Word's key has no bucket, or the bucket holds no exact match
    Miss,
    /// Exact line match within the word's bucket
    Hit {
        /// Three-character bucket key the word hashed to
        key: String,
        /// Complete matched line
        line: String,
        /// Whitespace-split tokens of the line; `tokens[0]` is the lemma
        /// as stored
        tokens: Vec<String>,
    },
}

impl Outcome {
    #[inline]
    pub fn is_hit(&self) -> bool {
        matches!(self, Outcome::Hit { .. })
    }
}
