//! Derived O(1) lookup tables, built once from [`crate::metadata::raw_metadata`].

use std::collections::HashMap;

use once_cell::sync::Lazy;
use phf::phf_map;

use crate::kind::SyntaxKind;
use crate::metadata::{raw_metadata, PropertyValue};

/// `token text -> kind`, for every kind with fixed text (punctuation and
/// keywords). Built lazily from [`raw_metadata`]; `KEYWORD_MAP` below
/// covers the hot identifier-vs-keyword path with a compile-time `phf::Map`
/// instead.
static TEXT_TO_KIND: Lazy<HashMap<&'static str, SyntaxKind>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for &kind in SyntaxKind::ALL {
        if let Some(text) = raw_metadata(kind).token_text {
            map.insert(text, kind);
        }
    }
    map
});

/// `kind -> fixed token text`, the inverse of [`TEXT_TO_KIND`].
static KIND_TO_TEXT: Lazy<HashMap<SyntaxKind, &'static str>> = Lazy::new(|| {
    SyntaxKind::ALL.iter().filter_map(|&kind| raw_metadata(kind).token_text.map(|text| (kind, text))).collect()
});

static CATEGORY_MEMBERS: Lazy<HashMap<&'static str, Vec<SyntaxKind>>> = Lazy::new(|| {
    let mut map: HashMap<&'static str, Vec<SyntaxKind>> = HashMap::new();
    for &kind in SyntaxKind::ALL {
        for &category in raw_metadata(kind).categories {
            map.entry(category).or_default().push(kind);
        }
    }
    map
});

static PROPERTIES: Lazy<HashMap<(SyntaxKind, &'static str), PropertyValue>> = Lazy::new(|| {
    let mut map = HashMap::new();
    for &kind in SyntaxKind::ALL {
        for &(key, value) in raw_metadata(kind).properties {
            map.insert((kind, key), value);
        }
    }
    map
});

/// Compile-time perfect-hash map from reserved-word spelling to its
/// keyword kind. This is the lexer's identifier-vs-keyword fast path;
/// [`ContinueKeyword`](SyntaxKind::ContinueKeyword) is intentionally
/// omitted since it is a soft keyword and must be classified as an
/// identifier unless the active dialect recognizes `continue`.
static KEYWORD_MAP: phf::Map<&'static str, SyntaxKind> = phf_map! {
    "and" => SyntaxKind::AndKeyword,
    "break" => SyntaxKind::BreakKeyword,
    "do" => SyntaxKind::DoKeyword,
    "else" => SyntaxKind::ElseKeyword,
    "elseif" => SyntaxKind::ElseifKeyword,
    "end" => SyntaxKind::EndKeyword,
    "false" => SyntaxKind::FalseKeyword,
    "for" => SyntaxKind::ForKeyword,
    "function" => SyntaxKind::FunctionKeyword,
    "goto" => SyntaxKind::GotoKeyword,
    "if" => SyntaxKind::IfKeyword,
    "in" => SyntaxKind::InKeyword,
    "local" => SyntaxKind::LocalKeyword,
    "nil" => SyntaxKind::NilKeyword,
    "not" => SyntaxKind::NotKeyword,
    "or" => SyntaxKind::OrKeyword,
    "repeat" => SyntaxKind::RepeatKeyword,
    "return" => SyntaxKind::ReturnKeyword,
    "then" => SyntaxKind::ThenKeyword,
    "true" => SyntaxKind::TrueKeyword,
    "until" => SyntaxKind::UntilKeyword,
    "while" => SyntaxKind::WhileKeyword,
};

/// Looks up a reserved word by spelling, ignoring soft keywords (those are
/// dialect-gated and handled by the lexer itself via
/// [`crate::is_soft_keyword`]).
pub fn lookup_keyword(text: &str) -> Option<SyntaxKind> {
    KEYWORD_MAP.get(text).copied()
}

/// The fixed text for a kind with one (punctuation, keyword), or `None` for
/// kinds whose text varies (identifiers, numbers, strings, trivia).
pub fn token_text(kind: SyntaxKind) -> Option<&'static str> {
    KIND_TO_TEXT.get(&kind).copied()
}

/// The kind whose fixed text equals `text`, if any.
pub fn kind_from_text(text: &str) -> Option<SyntaxKind> {
    TEXT_TO_KIND.get(text).copied()
}

/// All kinds belonging to `category` (spec's approved category constants,
/// see [`crate::metadata::category`]).
pub fn kinds_in_category(category: &str) -> &'static [SyntaxKind] {
    static EMPTY: &[SyntaxKind] = &[];
    CATEGORY_MEMBERS.get(category).map(Vec::as_slice).unwrap_or(EMPTY)
}

/// Whether `kind` belongs to `category`.
pub fn is_in_category(kind: SyntaxKind, category: &str) -> bool {
    raw_metadata(kind).categories.contains(&category)
}

/// The value of `(kind, property)`, if declared.
pub fn property(kind: SyntaxKind, property: &str) -> Option<PropertyValue> {
    PROPERTIES.get(&(kind, property)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::category;

    #[test]
    fn keyword_map_round_trips_through_raw_metadata() {
        for &kind in SyntaxKind::ALL {
            let meta = raw_metadata(kind);
            if meta.is_keyword && property(kind, crate::metadata::property::SOFT_KEYWORD).is_none() {
                let text = meta.token_text.unwrap();
                assert_eq!(lookup_keyword(text), Some(kind));
            }
        }
    }

    #[test]
    fn continue_keyword_is_not_in_hard_keyword_map() {
        assert_eq!(lookup_keyword("continue"), None);
    }

    #[test]
    fn text_and_kind_lookups_are_inverses() {
        assert_eq!(kind_from_text("+"), Some(SyntaxKind::PlusToken));
        assert_eq!(token_text(SyntaxKind::PlusToken), Some("+"));
        assert_eq!(kind_from_text("nonexistent"), None);
    }

    #[test]
    fn caret_and_dot_dot_are_right_associative() {
        assert_eq!(
            property(SyntaxKind::CaretToken, crate::metadata::property::RIGHT_ASSOCIATIVE),
            Some(PropertyValue::Bool(true))
        );
        assert_eq!(
            property(SyntaxKind::DotDotToken, crate::metadata::property::RIGHT_ASSOCIATIVE),
            Some(PropertyValue::Bool(true))
        );
        assert_eq!(property(SyntaxKind::PlusToken, crate::metadata::property::RIGHT_ASSOCIATIVE), None);
    }

    #[test]
    fn category_membership_matches_metadata() {
        assert!(kinds_in_category(category::KEYWORD).contains(&SyntaxKind::IfKeyword));
        assert!(is_in_category(SyntaxKind::IfKeyword, category::KEYWORD));
        assert!(!is_in_category(SyntaxKind::PlusToken, category::KEYWORD));
    }
}
