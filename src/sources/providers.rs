//! The public N1 word lists and their field mappings
//!
//! Order matters: [`default_sources`] returns the providers in aggregation
//! order, and deduplication keeps the first occurrence of each word.

use crate::sources::{
    CsvColumns, CsvSource, FieldMap, HttpFetcher, JsonArraySource, PagedJsonSource, VocabSource,
};

pub const JLPT_API_URL: &str = "https://jlpt-vocab-api.vercel.app/api/words?level=1";
pub const OPEN_ANKI_CSV_URL: &str =
    "https://raw.githubusercontent.com/jamsinclair/open-anki-jlpt-decks/main/src/n1.csv";
pub const ELZUP_JSON_URL: &str =
    "https://raw.githubusercontent.com/elzup/jlpt-word-list/master/out/jlpt-n1.json";
pub const BLUSKYO_JSON_URL: &str =
    "https://raw.githubusercontent.com/Bluskyo/JLPT_Vocabulary/master/N1.json";

pub const JLPT_API_FIELDS: FieldMap = FieldMap {
    word: &["word", "expression", "kanji"],
    meaning: &["meaning", "meanings", "translation"],
    pos: &["pos", "partOfSpeech"],
};

/// `expression,reading,meaning,tags` rows; some rows carry the gloss in the fourth column
pub const OPEN_ANKI_COLUMNS: CsvColumns = CsvColumns {
    word: &[0],
    meaning: &[2, 3],
    pos: &[3],
    header_marker: Some("expression"),
};

pub const ELZUP_FIELDS: FieldMap = FieldMap {
    word: &["expression", "word"],
    meaning: &["gloss", "meaning"],
    pos: &["pos"],
};

pub const BLUSKYO_FIELDS: FieldMap = FieldMap {
    word: &["kanji", "kana"],
    meaning: &["english", "meaning"],
    pos: &["pos"],
};

/// All providers, in aggregation order
pub fn default_sources(http: &HttpFetcher) -> Vec<Box<dyn VocabSource>> {
    vec![
        Box::new(PagedJsonSource::new(
            "jlpt-vocab-api",
            JLPT_API_URL,
            "words",
            JLPT_API_FIELDS,
            http.clone(),
        )),
        Box::new(CsvSource::new(
            "open-anki-jlpt-decks",
            OPEN_ANKI_CSV_URL,
            OPEN_ANKI_COLUMNS,
            http.clone(),
        )),
        Box::new(JsonArraySource::new(
            "elzup-jlpt-word-list",
            ELZUP_JSON_URL,
            ELZUP_FIELDS,
            http.clone(),
        )),
        Box::new(JsonArraySource::new(
            "bluskyo-jlpt-vocabulary",
            BLUSKYO_JSON_URL,
            BLUSKYO_FIELDS,
            http.clone(),
        )),
    ]
}
