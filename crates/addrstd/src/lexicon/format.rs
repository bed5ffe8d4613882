// Lexicon text format.
//
//   LEXICON:<TAB>name<TAB>LANG<TAB>locale<TAB>count
//   LEXENTRY:<TAB>word<TAB>stdword<TAB>TYPE,TYPE<TAB>ATTACH,ATTACH
//   ... (count entry lines)
//
// Blank lines are skipped. A bad header or a wrong entry count fails the
// load; a bad entry line or unknown class name is kept as a diagnostic.

use addrstd_core::diagnostic::{Diagnostic, DiagnosticKind};
use addrstd_core::lexentry::LexEntry;

use super::Lexicon;
use crate::LoadError;

/// Tag that starts the lexicon header line.
pub const LEXICON_TAG: &str = "LEXICON:";

pub(crate) fn parse(text: &str) -> Result<Lexicon, LoadError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim_end_matches('\r')))
        .filter(|(_, l)| !l.trim().is_empty());

    let Some((header_line, header)) = lines.next() else {
        return Err(LoadError::BadLexiconHeader {
            line: 0,
            reason: "empty lexicon source".to_string(),
        });
    };
    let fields: Vec<&str> = header.split('\t').collect();
    if fields[0] != LEXICON_TAG || fields.len() != 5 {
        return Err(LoadError::BadLexiconHeader {
            line: header_line,
            reason: format!("expected `{LEXICON_TAG}<TAB>name<TAB>LANG<TAB>locale<TAB>count`"),
        });
    }
    let expected: usize = fields[4].trim().parse().map_err(|_| LoadError::BadLexiconHeader {
        line: header_line,
        reason: format!("invalid entry count {:?}", fields[4]),
    })?;

    let mut lexicon = Lexicon::new(fields[1], fields[2], fields[3]);
    let mut actual = 0usize;
    for (line_no, line) in lines {
        actual += 1;
        match LexEntry::from_record(line) {
            Ok((entry, unknown)) => {
                for name in unknown {
                    lexicon.push_diagnostic(Diagnostic::new(
                        line_no,
                        DiagnosticKind::UnknownClass,
                        format!("unknown class or attach name {name:?} for {:?}", entry.word),
                    ));
                }
                lexicon.insert(entry);
            }
            Err(e) => lexicon.push_diagnostic(Diagnostic::new(
                line_no,
                DiagnosticKind::MalformedEntry,
                e.to_string(),
            )),
        }
    }
    if actual != expected {
        return Err(LoadError::EntryCount { expected, actual });
    }

    for d in lexicon.diagnostics() {
        tracing::warn!(%d, lexicon = lexicon.name(), "lexicon definition problem");
    }
    tracing::debug!(
        lexicon = lexicon.name(),
        words = lexicon.words().len(),
        entries = lexicon.len(),
        "lexicon loaded"
    );
    Ok(lexicon)
}

pub(crate) fn write(lexicon: &Lexicon) -> String {
    let mut out = format!(
        "{LEXICON_TAG}\t{}\t{}\t{}\t{}\n",
        lexicon.name(),
        lexicon.lang(),
        lexicon.locale(),
        lexicon.len()
    );
    for entry in lexicon.entries() {
        out.push_str(&entry.to_record());
        out.push('\n');
    }
    out
}
