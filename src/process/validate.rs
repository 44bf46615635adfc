// src/process/validate.rs
use once_cell::sync::Lazy;
use regex::Regex;

/// Optional thousands separators every three digits, optional two-digit fraction.
/// ASCII digits only.
static AMOUNT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:[0-9]{1,3}(?:,[0-9]{3})+|[0-9]+)(?:\.[0-9]{2})?$").expect("amount pattern should compile")
});

/// Three-letter month abbreviation and a one or two digit day, e.g. `Jun 9`.
static SHORT_DATE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Z][a-z]{2} [0-9]{1,2}$").expect("date pattern should compile"));

/// The closed set of column types a statement column can have.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Amount,
    Date,
    Text,
}

type HeaderMatcher = fn(&str) -> bool;

fn is_amount_header(name: &str) -> bool {
    name.to_lowercase().contains("amount") || name.eq_ignore_ascii_case("balance")
}

fn is_date_header(name: &str) -> bool {
    name.eq_ignore_ascii_case("date")
}

/// Checked in order; the first matching header rule decides the kind.
static KIND_RULES: &[(HeaderMatcher, ColumnKind)] = &[
    (is_amount_header, ColumnKind::Amount),
    (is_date_header, ColumnKind::Date),
];

impl ColumnKind {
    pub fn for_header(name: &str) -> Self {
        KIND_RULES
            .iter()
            .find(|(matches, _)| matches(name))
            .map(|(_, kind)| *kind)
            .unwrap_or(ColumnKind::Text)
    }

    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ColumnKind::Amount => AMOUNT_RE.is_match(value),
            ColumnKind::Date => SHORT_DATE_RE.is_match(value),
            ColumnKind::Text => true,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            ColumnKind::Amount => "amount",
            ColumnKind::Date => "date",
            ColumnKind::Text => "text",
        }
    }
}

/// Advisory check of one cell against the rule for its column.
pub fn is_valid_cell(header: &str, value: &str) -> bool {
    ColumnKind::for_header(header).accepts(value)
}
