// Token: one scanned unit of an address, with its candidate classes.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::RecordError;
use crate::classes::{AttachType, InClass, OutClass, format_set, parse_set};

/// Tag that starts the tab-separated token record.
pub const TOKEN_TAG: &str = "TOKEN:";

/// A scanned word, number, or separator.
///
/// The candidate class set stays ambiguous until a pattern is fixed; the
/// output class is assigned once, after a successful parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Text as scanned.
    pub text: String,

    /// Standardized form. Empty until classification fills it in.
    pub std_text: String,

    /// Candidate lexical classes, in ordinal order.
    pub in_classes: BTreeSet<InClass>,

    pub attach: AttachType,

    /// Address field chosen by the winning parse.
    pub out_class: Option<OutClass>,
}

impl Token {
    /// Create an unclassified token.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            std_text: String::new(),
            in_classes: BTreeSet::new(),
            attach: AttachType::Detach,
            out_class: None,
        }
    }

    /// Create a token with a single class and its text as standard form.
    pub fn with_class(text: impl Into<String>, class: InClass) -> Self {
        let text = text.into();
        Self {
            std_text: text.clone(),
            in_classes: BTreeSet::from([class]),
            ..Self::new(text)
        }
    }

    /// Whether `class` is one of the candidates.
    pub fn has_class(&self, class: InClass) -> bool {
        self.in_classes.contains(&class)
    }

    /// Whether any candidate class is in `set`.
    pub fn intersects(&self, set: &BTreeSet<InClass>) -> bool {
        self.in_classes.iter().any(|c| set.contains(c))
    }

    /// Standardized text, falling back to the scanned text.
    pub fn display_text(&self) -> &str {
        if self.std_text.is_empty() {
            &self.text
        } else {
            &self.std_text
        }
    }

    /// Format as `TOKEN:<TAB>text<TAB>std<TAB>types<TAB>outclass<TAB>attach`.
    ///
    /// An unassigned output class is written as an empty field.
    pub fn to_record(&self) -> String {
        format!(
            "{TOKEN_TAG}\t{}\t{}\t{}\t{}\t{}",
            self.text,
            self.std_text,
            format_set(&self.in_classes),
            self.out_class.map(OutClass::as_str).unwrap_or(""),
            self.attach,
        )
    }

    /// Parse a record written by [`Token::to_record`].
    pub fn from_record(line: &str) -> Result<Self, RecordError> {
        let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split('\t').collect();
        if fields[0] != TOKEN_TAG {
            return Err(RecordError::BadTag {
                expected: TOKEN_TAG,
                actual: fields[0].to_string(),
            });
        }
        if fields.len() != 6 {
            return Err(RecordError::FieldCount {
                expected: 6,
                actual: fields.len(),
            });
        }
        let out_class = match fields[4].trim() {
            "" => None,
            name => Some(name.parse()?),
        };
        let attach = match fields[5].split(',').map(str::trim).find(|s| !s.is_empty()) {
            Some(name) => name.parse()?,
            None => AttachType::Detach,
        };
        Ok(Self {
            text: fields[1].to_string(),
            std_text: fields[2].to_string(),
            in_classes: parse_set(fields[3])?,
            attach,
            out_class,
        })
    }
}
