// LexEntry: one reading of a lexicon word.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::RecordError;
use crate::classes::{AttachType, InClass, format_set, parse_set_lenient};

/// Tag that starts the tab-separated lexicon entry record.
pub const LEXENTRY_TAG: &str = "LEXENTRY:";

/// A word, its standardized form, its lexical classes, and how it attaches.
///
/// Several entries may share `word`; each one is a separate reading.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LexEntry {
    pub word: String,
    pub std_word: String,
    pub classes: BTreeSet<InClass>,
    pub attach: BTreeSet<AttachType>,
}

impl LexEntry {
    pub fn new(
        word: impl Into<String>,
        std_word: impl Into<String>,
        classes: impl IntoIterator<Item = InClass>,
        attach: impl IntoIterator<Item = AttachType>,
    ) -> Self {
        Self {
            word: word.into(),
            std_word: std_word.into(),
            classes: classes.into_iter().collect(),
            attach: attach.into_iter().collect(),
        }
    }

    pub fn is_prefix(&self) -> bool {
        self.attach.contains(&AttachType::Prefix)
    }

    pub fn is_suffix(&self) -> bool {
        self.attach.contains(&AttachType::Suffix)
    }

    /// Format as `LEXENTRY:<TAB>word<TAB>std<TAB>types<TAB>attach`.
    pub fn to_record(&self) -> String {
        format!(
            "{LEXENTRY_TAG}\t{}\t{}\t{}\t{}",
            self.word,
            self.std_word,
            format_set(&self.classes),
            format_set(&self.attach),
        )
    }

    /// Parse a lexicon entry record.
    ///
    /// Unknown class names become `BADTOKEN` and unknown attach names are
    /// dropped; both are returned in the second tuple element so the caller
    /// can report them. The attach field may be empty or missing.
    pub fn from_record(line: &str) -> Result<(Self, Vec<String>), RecordError> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
        if fields[0] != LEXENTRY_TAG {
            return Err(RecordError::BadTag {
                expected: LEXENTRY_TAG,
                actual: fields[0].to_string(),
            });
        }
        if !(4..=5).contains(&fields.len()) {
            return Err(RecordError::FieldCount {
                expected: 5,
                actual: fields.len(),
            });
        }

        let (classes, mut unknown) = parse_set_lenient(fields[3], InClass::BadToken);
        let mut attach = BTreeSet::new();
        for name in fields.get(4).copied().unwrap_or("").split(',').map(str::trim) {
            if name.is_empty() {
                continue;
            }
            match name.parse::<AttachType>() {
                Ok(a) => {
                    attach.insert(a);
                }
                Err(_) => unknown.push(name.to_string()),
            }
        }

        let entry = Self {
            word: fields[1].to_string(),
            std_word: fields[2].to_string(),
            classes,
            attach,
        };
        Ok((entry, unknown))
    }
}
