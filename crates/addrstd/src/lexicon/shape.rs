// Shape classification: classes inferred from the characters of a word that
// the lexicon does not know.

use addrstd_core::classes::InClass;

/// Classes implied by the shape of `text`, or an empty list if no shape rule
/// applies.
///
/// - digits only: `NUMBER`, plus `QUINT` for five digits or `QUAD` for four
/// - one letter: `SINGLE`, `WORD`
/// - two letters: `DOUBLE`, `WORD`
/// - letters only: `WORD`
/// - letters and digits: `MIXED`
pub fn shape_classes(text: &str) -> Vec<InClass> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut digits = 0usize;
    let mut letters = 0usize;
    for c in text.chars() {
        if c.is_numeric() {
            digits += 1;
        } else if c.is_alphabetic() {
            letters += 1;
        } else {
            return Vec::new();
        }
    }

    match (digits, letters) {
        (n, 0) => {
            let mut classes = vec![InClass::Number];
            match n {
                5 => classes.push(InClass::Quint),
                4 => classes.push(InClass::Quad),
                _ => {}
            }
            classes
        }
        (0, 1) => vec![InClass::Single, InClass::Word],
        (0, 2) => vec![InClass::Double, InClass::Word],
        (0, _) => vec![InClass::Word],
        _ => vec![InClass::Mixed],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_runs() {
        assert_eq!(shape_classes("7"), vec![InClass::Number]);
        assert_eq!(shape_classes("11"), vec![InClass::Number]);
        assert_eq!(shape_classes("1234"), vec![InClass::Number, InClass::Quad]);
        assert_eq!(shape_classes("12345"), vec![InClass::Number, InClass::Quint]);
        assert_eq!(shape_classes("123456"), vec![InClass::Number]);
    }

    #[test]
    fn letter_runs() {
        assert_eq!(shape_classes("N"), vec![InClass::Single, InClass::Word]);
        assert_eq!(shape_classes("QC"), vec![InClass::Double, InClass::Word]);
        assert_eq!(shape_classes("MAIN"), vec![InClass::Word]);
        assert_eq!(shape_classes("ÉCOLE"), vec![InClass::Word]);
    }

    #[test]
    fn mixed() {
        assert_eq!(shape_classes("12B"), vec![InClass::Mixed]);
        assert_eq!(shape_classes("K1A"), vec![InClass::Mixed]);
    }

    #[test]
    fn no_shape() {
        assert!(shape_classes("").is_empty());
        assert!(shape_classes("O'BRIEN").is_empty());
        assert!(shape_classes("#").is_empty());
    }
}
