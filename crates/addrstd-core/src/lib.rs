//! Shared types for the address standardizer.
//!
//! - [`classes`] -- input/output class taxonomies and attachment types
//! - [`token`] -- scanned tokens and their tab-separated record form
//! - [`lexentry`] -- lexicon entries and their record form
//! - [`diagnostic`] -- non-fatal problems found while loading definitions

pub mod classes;
pub mod diagnostic;
pub mod lexentry;
pub mod token;

/// Error type for class names and tab-separated records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecordError {
    #[error("unknown {kind} name: {name:?}")]
    UnknownClass { kind: &'static str, name: String },
    #[error("expected record tag {expected:?}, got {actual:?}")]
    BadTag {
        expected: &'static str,
        actual: String,
    },
    #[error("record has {actual} fields, expected {expected}")]
    FieldCount { expected: usize, actual: usize },
}
