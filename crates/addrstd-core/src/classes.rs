// Class taxonomies: InClass (lexical), OutClass (address field), AttachType.
//
// All three are closed enums with a canonical upper-case name. The name
// tables are static; parsing goes through a lazily built hash table.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::RecordError;

macro_rules! class_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant, )+
        }

        impl $name {
            /// Every variant, in ordinal order.
            pub const ALL: &'static [$name] = &[$($name::$variant,)+];

            /// Canonical upper-case name.
            pub const fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = RecordError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                static TABLE: std::sync::LazyLock<hashbrown::HashMap<&'static str, $name>> =
                    std::sync::LazyLock::new(|| {
                        $name::ALL.iter().map(|c| (c.as_str(), *c)).collect()
                    });
                let key = s.trim();
                TABLE
                    .get(key)
                    .or_else(|| TABLE.get(key.to_ascii_uppercase().as_str()))
                    .copied()
                    .ok_or_else(|| RecordError::UnknownClass {
                        kind: $kind,
                        name: key.to_string(),
                    })
            }
        }
    };
}

class_enum! {
    /// Lexical class of a scanned token.
    InClass, "input class" {
        /// Digit run.
        Number => "NUMBER",
        /// Alphabetic word with no better classification.
        Word => "WORD",
        /// Street type (AVENUE, RUE, ...).
        Type => "TYPE",
        Qualif => "QUALIF",
        Road => "ROAD",
        StopWord => "STOPWORD",
        /// Rural route designator.
        Rr => "RR",
        Dash => "DASH",
        City => "CITY",
        Prov => "PROV",
        Nation => "NATION",
        Ampers => "AMPERS",
        BoxH => "BOXH",
        BoxT => "BOXT",
        Ord => "ORD",
        UnitH => "UNITH",
        UnitT => "UNITT",
        /// Single letter.
        Single => "SINGLE",
        BuildH => "BUILDH",
        BuildT => "BUILDT",
        Mile => "MILE",
        /// Two letters.
        Double => "DOUBLE",
        /// Compass direction.
        Direct => "DIRECT",
        /// Letters and digits mixed.
        Mixed => "MIXED",
        Fract => "FRACT",
        Pct => "PCT",
        Pch => "PCH",
        /// Exactly five digits.
        Quint => "QUINT",
        /// Exactly four digits.
        Quad => "QUAD",
        Punct => "PUNCT",
        Space => "SPACE",
        EmDash => "EMDASH",
        /// Unclassifiable; never matched by a rule.
        BadToken => "BADTOKEN",
    }
}

class_enum! {
    /// Address field assigned to a token by a successful parse.
    OutClass, "output class" {
        Bldng => "BLDNG",
        House => "HOUSE",
        PreDir => "PREDIR",
        Qualif => "QUALIF",
        PreTyp => "PRETYP",
        Street => "STREET",
        SufTyp => "SUFTYP",
        SufDir => "SUFDIR",
        Rr => "RR",
        Extra => "EXTRA",
        City => "CITY",
        Prov => "PROV",
        Nation => "NATION",
        Postal => "POSTAL",
        BoxH => "BOXH",
        BoxT => "BOXT",
        UnitH => "UNITH",
        UnitT => "UNITT",
        Stop => "STOP",
        /// Consumed by the grammar but not reported.
        Ignore => "IGNORE",
        BadToken => "BADTOKEN",
    }
}

class_enum! {
    /// Whether a word binds to a neighbouring token, and on which side.
    #[derive(Default)]
    AttachType, "attach type" {
        /// Stands alone between separators.
        #[default]
        Detach => "DETACH",
        /// Glued to the front of the following word.
        Prefix => "PREFIX",
        /// Glued to the end of the preceding word.
        Suffix => "SUFFIX",
    }
}

/// Parse a comma-separated list of class names.
///
/// Empty items are skipped. Any unknown name rejects the whole list, so a
/// typo in a filter can never widen it.
pub fn parse_set<T>(list: &str) -> Result<BTreeSet<T>, RecordError>
where
    T: FromStr<Err = RecordError> + Ord,
{
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .collect()
}

/// Parse a comma-separated list, mapping unknown names to `fallback`.
///
/// Returns the set and the names that were not recognized.
pub fn parse_set_lenient<T>(list: &str, fallback: T) -> (BTreeSet<T>, Vec<String>)
where
    T: FromStr<Err = RecordError> + Ord + Copy,
{
    let mut set = BTreeSet::new();
    let mut unknown = Vec::new();
    for item in list.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        match item.parse() {
            Ok(c) => {
                set.insert(c);
            }
            Err(_) => {
                set.insert(fallback);
                unknown.push(item.to_string());
            }
        }
    }
    (set, unknown)
}

/// Join class names with commas, in iteration order.
pub fn format_set<'a, T>(items: impl IntoIterator<Item = &'a T>) -> String
where
    T: fmt::Display + 'a,
{
    items
        .into_iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}
