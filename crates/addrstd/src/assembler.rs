// Assembler: turns the winning parse back into labeled address fields.
//
// Each token gets the output class of its pattern position, then the
// standardized text of all tokens in one field is joined with spaces in
// token order.

use std::fmt;

use addrstd_core::classes::OutClass;
use addrstd_core::token::Token;
use serde::{Deserialize, Serialize};

use crate::lexicon::Lexicon;
use crate::search::Parse;

/// Fields of a standardized address, in canonical order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Building,
    HouseNum,
    PreDir,
    Qual,
    PreType,
    Name,
    SufType,
    SufDir,
    RuralRoute,
    Extra,
    City,
    Prov,
    Country,
    PostCode,
    Box,
    Unit,
}

impl Field {
    pub const ALL: [Field; 16] = [
        Field::Building,
        Field::HouseNum,
        Field::PreDir,
        Field::Qual,
        Field::PreType,
        Field::Name,
        Field::SufType,
        Field::SufDir,
        Field::RuralRoute,
        Field::Extra,
        Field::City,
        Field::Prov,
        Field::Country,
        Field::PostCode,
        Field::Box,
        Field::Unit,
    ];

    /// Field that collects tokens of `class`; `None` for IGNORE.
    pub fn of(class: OutClass) -> Option<Field> {
        Some(match class {
            OutClass::Bldng => Field::Building,
            OutClass::House => Field::HouseNum,
            OutClass::PreDir => Field::PreDir,
            OutClass::Qualif => Field::Qual,
            OutClass::PreTyp => Field::PreType,
            OutClass::Street => Field::Name,
            OutClass::SufTyp => Field::SufType,
            OutClass::SufDir => Field::SufDir,
            OutClass::Rr => Field::RuralRoute,
            OutClass::Extra | OutClass::Stop | OutClass::BadToken => Field::Extra,
            OutClass::City => Field::City,
            OutClass::Prov => Field::Prov,
            OutClass::Nation => Field::Country,
            OutClass::Postal => Field::PostCode,
            OutClass::BoxH | OutClass::BoxT => Field::Box,
            OutClass::UnitH | OutClass::UnitT => Field::Unit,
            OutClass::Ignore => return None,
        })
    }

    /// Serialized field name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Building => "building",
            Field::HouseNum => "house_num",
            Field::PreDir => "predir",
            Field::Qual => "qual",
            Field::PreType => "pretype",
            Field::Name => "name",
            Field::SufType => "suftype",
            Field::SufDir => "sufdir",
            Field::RuralRoute => "ruralroute",
            Field::Extra => "extra",
            Field::City => "city",
            Field::Prov => "prov",
            Field::Country => "country",
            Field::PostCode => "postcode",
            Field::Box => "box",
            Field::Unit => "unit",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A standardized address. Absent fields are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StdAddr {
    pub building: Option<String>,
    pub house_num: Option<String>,
    pub predir: Option<String>,
    pub qual: Option<String>,
    pub pretype: Option<String>,
    pub name: Option<String>,
    pub suftype: Option<String>,
    pub sufdir: Option<String>,
    pub ruralroute: Option<String>,
    pub extra: Option<String>,
    pub city: Option<String>,
    pub prov: Option<String>,
    pub country: Option<String>,
    pub postcode: Option<String>,
    #[serde(rename = "box")]
    pub po_box: Option<String>,
    pub unit: Option<String>,
}

impl StdAddr {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.slot(field).as_deref()
    }

    fn slot(&self, field: Field) -> &Option<String> {
        match field {
            Field::Building => &self.building,
            Field::HouseNum => &self.house_num,
            Field::PreDir => &self.predir,
            Field::Qual => &self.qual,
            Field::PreType => &self.pretype,
            Field::Name => &self.name,
            Field::SufType => &self.suftype,
            Field::SufDir => &self.sufdir,
            Field::RuralRoute => &self.ruralroute,
            Field::Extra => &self.extra,
            Field::City => &self.city,
            Field::Prov => &self.prov,
            Field::Country => &self.country,
            Field::PostCode => &self.postcode,
            Field::Box => &self.po_box,
            Field::Unit => &self.unit,
        }
    }

    fn slot_mut(&mut self, field: Field) -> &mut Option<String> {
        match field {
            Field::Building => &mut self.building,
            Field::HouseNum => &mut self.house_num,
            Field::PreDir => &mut self.predir,
            Field::Qual => &mut self.qual,
            Field::PreType => &mut self.pretype,
            Field::Name => &mut self.name,
            Field::SufType => &mut self.suftype,
            Field::SufDir => &mut self.sufdir,
            Field::RuralRoute => &mut self.ruralroute,
            Field::Extra => &mut self.extra,
            Field::City => &mut self.city,
            Field::Prov => &mut self.prov,
            Field::Country => &mut self.country,
            Field::PostCode => &mut self.postcode,
            Field::Box => &mut self.po_box,
            Field::Unit => &mut self.unit,
        }
    }

    /// Present fields in canonical order.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &str)> {
        Field::ALL
            .into_iter()
            .filter_map(|f| self.get(f).map(|v| (f, v)))
    }

    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }

    fn append(&mut self, field: Field, text: &str) {
        if text.is_empty() {
            return;
        }
        match self.slot_mut(field) {
            Some(value) => {
                value.push(' ');
                value.push_str(text);
            }
            slot => *slot = Some(text.to_string()),
        }
    }
}

/// `field="value"` pairs of the present fields, space separated.
impl fmt::Display for StdAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (field, value)) in self.fields().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{field}={value:?}")?;
        }
        Ok(())
    }
}

/// Give each token the output class of its position in `parse`.
///
/// The standard text is re-read from the lexicon reading that carries the
/// class the parse chose, so a homograph gets the matching standard form.
/// Returns `false`, leaving the tokens untouched, if `parse` was made for a
/// different number of tokens.
pub fn assign(tokens: &mut [Token], parse: &Parse<'_>, lexicon: &Lexicon) -> bool {
    if parse.pattern.len() != tokens.len() {
        tracing::warn!(
            tokens = tokens.len(),
            pattern = parse.pattern.len(),
            "parse does not fit the token sequence"
        );
        return false;
    }
    for ((token, &class), out) in tokens.iter_mut().zip(&parse.pattern).zip(parse.outputs()) {
        token.out_class = Some(out);
        if let Some(std) = lexicon.std_word(&token.text, class) {
            token.std_text = std.to_string();
        }
    }
    true
}

/// Collect assigned tokens into address fields.
///
/// Returns `None` if no token has an output class.
pub fn assemble(tokens: &[Token]) -> Option<StdAddr> {
    let mut addr = StdAddr::default();
    let mut assigned = false;
    for token in tokens {
        let Some(class) = token.out_class else {
            continue;
        };
        assigned = true;
        if let Some(field) = Field::of(class) {
            addr.append(field, token.display_text());
        }
    }
    assigned.then_some(addr)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Grammar;
    use crate::search::Search;
    use addrstd_core::classes::InClass;
    use addrstd_core::lexentry::LexEntry;

    fn token(text: &str, std: &str, out: OutClass) -> Token {
        let mut t = Token::new(text);
        t.std_text = std.to_string();
        t.out_class = Some(out);
        t
    }

    #[test]
    fn fields_join_in_token_order() {
        let tokens = [
            token("11", "11", OutClass::House),
            token("Dackon", "DACKON", OutClass::Street),
            token("Hill", "HILL", OutClass::Street),
            token("Allee", "ALY", OutClass::SufTyp),
            token("Podunk", "PODUNK", OutClass::City),
            token("AL", "AL", OutClass::Prov),
            token("12345", "12345", OutClass::Postal),
        ];
        let addr = assemble(&tokens).unwrap();
        assert_eq!(addr.house_num.as_deref(), Some("11"));
        assert_eq!(addr.name.as_deref(), Some("DACKON HILL"));
        assert_eq!(addr.suftype.as_deref(), Some("ALY"));
        assert_eq!(addr.city.as_deref(), Some("PODUNK"));
        assert_eq!(addr.prov.as_deref(), Some("AL"));
        assert_eq!(addr.postcode.as_deref(), Some("12345"));
        assert_eq!(addr.building, None);
        let order: Vec<Field> = addr.fields().map(|(f, _)| f).collect();
        assert_eq!(
            order,
            vec![
                Field::HouseNum,
                Field::Name,
                Field::SufType,
                Field::City,
                Field::Prov,
                Field::PostCode
            ]
        );
    }

    #[test]
    fn shared_buckets_and_ignore() {
        let tokens = [
            token("C/O", "CO", OutClass::Stop),
            token("SMITH", "SMITH", OutClass::Extra),
            token("#", "", OutClass::BadToken),
            token(",", ",", OutClass::Ignore),
            token("PO", "PO", OutClass::BoxH),
            token("BOX", "BOX", OutClass::BoxH),
            token("7", "7", OutClass::BoxT),
            token("APT", "APT", OutClass::UnitH),
            token("2", "2", OutClass::UnitT),
        ];
        let addr = assemble(&tokens).unwrap();
        assert_eq!(addr.extra.as_deref(), Some("CO SMITH #"));
        assert_eq!(addr.po_box.as_deref(), Some("PO BOX 7"));
        assert_eq!(addr.unit.as_deref(), Some("APT 2"));
        assert_eq!(addr.fields().count(), 3);
    }

    #[test]
    fn display_names_present_fields() {
        let tokens = [
            token("PO", "PO", OutClass::BoxH),
            token("BOX", "BOX", OutClass::BoxH),
            token("7", "7", OutClass::BoxT),
            token("Podunk", "PODUNK", OutClass::City),
        ];
        let addr = assemble(&tokens).unwrap();
        assert_eq!(addr.to_string(), r#"city="PODUNK" box="PO BOX 7""#);
        assert_eq!(StdAddr::default().to_string(), "");
    }

    #[test]
    fn unassigned_tokens_give_no_result() {
        assert_eq!(assemble(&[Token::new("11")]), None);
        assert_eq!(assemble(&[]), None);
    }

    #[test]
    fn assign_uses_reading_chosen_by_parse() {
        let mut lex = Lexicon::new("t", "EN", "en_US");
        lex.insert(LexEntry::new("ST", "STREET", [InClass::Type], []));
        lex.insert(LexEntry::new("ST", "SAINT", [InClass::Qualif], []));
        let g = Grammar::from_text(
            "[ADDRESS]\nNUMBER QUALIF WORD -> HOUSE QUALIF STREET -> 0.9\n\
             NUMBER WORD TYPE -> HOUSE STREET SUFTYP -> 0.9\n",
        )
        .unwrap();

        let mut tokens = vec![
            Token::with_class("12", InClass::Number),
            Token::new("ST"),
            Token::with_class("JOHN", InClass::Word),
        ];
        lex.classify(&mut tokens[1], InClass::BadToken);
        let patterns = crate::search::enumerate(&tokens);
        let best = Search::new(&g).best(&patterns).unwrap();
        assert!(assign(&mut tokens, &best, &lex));
        let addr = assemble(&tokens).unwrap();
        assert_eq!(addr.qual.as_deref(), Some("SAINT"));
        assert_eq!(addr.name.as_deref(), Some("JOHN"));
    }

    #[test]
    fn assign_rejects_mismatched_parse() {
        let lex = Lexicon::default();
        let g = Grammar::from_text("[ADDRESS]\nNUMBER -> HOUSE -> 1\n").unwrap();
        let parse = Search::new(&g).search(&[InClass::Number]).remove(0);
        let mut tokens = vec![Token::new("1"), Token::new("2")];
        assert!(!assign(&mut tokens, &parse, &lex));
        assert!(tokens.iter().all(|t| t.out_class.is_none()));
    }

    #[test]
    fn serializes_box_field_name() {
        let addr = StdAddr {
            po_box: Some("PO BOX 7".into()),
            ..StdAddr::default()
        };
        let json = serde_json::to_value(&addr).unwrap();
        assert_eq!(json["box"], "PO BOX 7");
        assert!(json["house_num"].is_null());
        let back: StdAddr = serde_json::from_value(json).unwrap();
        assert_eq!(back, addr);
        assert_eq!(Field::Box.name(), "box");
    }
}
