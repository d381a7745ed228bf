use include_dir::{include_dir, Dir};
use serde::Deserialize;
use serde_json::from_str;
use std::error::Error;
use std::fmt;

static DICT_DIR: Dir = include_dir!("src/dict");

/// Entries per chapter
pub const CHAPTER_LENGTH: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DictKind {
    #[default]
    Words,
    Articles,
}

impl DictKind {
    pub fn is_article(self) -> bool {
        self == Self::Articles
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DictEntry {
    pub name: String,
    #[serde(default)]
    pub trans: Option<String>,
}

/// A bundled word list or article collection
#[derive(Debug, Clone, Deserialize)]
pub struct Dictionary {
    pub name: String,
    #[serde(default)]
    pub kind: DictKind,
    pub entries: Vec<DictEntry>,
}

#[derive(Debug)]
pub struct UnknownDictionary(String);

impl fmt::Display for UnknownDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown dictionary: {}", self.0)
    }
}

impl Error for UnknownDictionary {}

impl Dictionary {
    pub fn load(file_name: &str) -> Result<Self, Box<dyn Error>> {
        let file = DICT_DIR
            .get_file(format!("{file_name}.json"))
            .ok_or_else(|| UnknownDictionary(file_name.to_string()))?;

        let contents = file
            .contents_utf8()
            .ok_or_else(|| UnknownDictionary(file_name.to_string()))?;

        Ok(from_str(contents)?)
    }

    /// Bundled dictionary names, without the .json suffix
    pub fn available() -> Vec<String> {
        let mut names: Vec<String> = DICT_DIR
            .files()
            .filter_map(|f| {
                f.path()
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
            })
            .collect();
        names.sort();
        names
    }

    pub fn chapter_count(&self) -> usize {
        self.entries.len().div_ceil(CHAPTER_LENGTH)
    }

    pub fn chapter(&self, index: usize) -> &[DictEntry] {
        let start = index * CHAPTER_LENGTH;
        if start >= self.entries.len() {
            return &[];
        }
        let end = (start + CHAPTER_LENGTH).min(self.entries.len());
        &self.entries[start..end]
    }
}

/// Ordered sequence of units, advanced one at a time. Tracks chapter and
/// word indices so the session can apply its first-chapter rules.
#[derive(Debug)]
pub struct UnitFeed {
    dict: Dictionary,
    chapter: usize,
    index: usize,
}

impl UnitFeed {
    pub fn new(dict: Dictionary, chapter: usize) -> Self {
        Self {
            dict,
            chapter,
            index: 0,
        }
    }

    pub fn dict(&self) -> &Dictionary {
        &self.dict
    }

    pub fn chapter_index(&self) -> usize {
        self.chapter
    }

    pub fn word_index(&self) -> usize {
        self.index
    }

    pub fn chapter_len(&self) -> usize {
        self.dict.chapter(self.chapter).len()
    }

    pub fn is_article(&self) -> bool {
        self.dict.kind.is_article()
    }

    pub fn current(&self) -> Option<&DictEntry> {
        self.dict.chapter(self.chapter).get(self.index)
    }

    /// Step to the next entry in the chapter; false when exhausted
    pub fn advance(&mut self) -> bool {
        if self.index + 1 < self.chapter_len() {
            self.index += 1;
            true
        } else {
            self.index = self.chapter_len();
            false
        }
    }
}
