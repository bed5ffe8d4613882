//! Lexicon and grammar driven postal address standardizer.
//!
//! Raw text is scanned into classified tokens ([`tokenizer`]), expanded into
//! unambiguous class patterns and matched against a rule
//! grammar ([`grammar`], [`search`]) and finally reassembled into labeled
//! address fields ([`assembler`]). [`handle::Standardizer`] ties the steps
//! together.

pub mod assembler;
pub mod grammar;
pub mod handle;
pub mod lexicon;
pub mod search;
pub mod tokenizer;

use std::path::PathBuf;

pub use addrstd_core::classes::{AttachType, InClass, OutClass};
pub use addrstd_core::diagnostic::{Diagnostic, DiagnosticKind};
pub use addrstd_core::lexentry::LexEntry;
pub use addrstd_core::token::Token;
pub use assembler::StdAddr;
pub use grammar::{Grammar, Rule};
pub use handle::{CompiledLexicon, MatchResult, Standardizer, StandardizeError, StandardizerOptions};
pub use lexicon::Lexicon;
pub use search::{Parse, Search};
pub use tokenizer::Tokenizer;

/// Failure to load a lexicon or grammar definition.
///
/// These make the engine unusable and are kept apart from "no match",
/// which is an ordinary `None` result.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A rule line appeared before any section header.
    #[error("line {line}: data outside of a section: {text:?}")]
    DataOutsideSection { line: usize, text: String },

    #[error("line {line}: bad lexicon header: {reason}")]
    BadLexiconHeader { line: usize, reason: String },

    #[error("lexicon header announces {expected} entries, found {actual}")]
    EntryCount { expected: usize, actual: usize },

    /// The lexicon words did not compile into a scanner regex.
    #[error("cannot compile lexicon pattern: {0}")]
    Pattern(regex::Error),
}
