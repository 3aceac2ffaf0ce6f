//! Symbol types for automata transitions.

use crate::error::EditError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// The glyph used to write epsilon in labels and grammars.
pub const EPSILON_GLYPH: char = 'ε';

/// An input symbol labelling a transition.
///
/// `Epsilon` is ordered before every character so it leads sorted labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symbol {
    /// Consumes no input.
    Epsilon,
    Char(char),
}

impl Symbol {
    #[inline]
    pub fn is_epsilon(self) -> bool {
        matches!(self, Symbol::Epsilon)
    }

    pub fn as_char(self) -> Option<char> {
        match self {
            Symbol::Char(c) => Some(c),
            Symbol::Epsilon => None,
        }
    }
}

impl From<char> for Symbol {
    fn from(c: char) -> Self {
        if c == EPSILON_GLYPH {
            Symbol::Epsilon
        } else {
            Symbol::Char(c)
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Symbol::Epsilon => write!(f, "{EPSILON_GLYPH}"),
            Symbol::Char(c) => write!(f, "{c}"),
        }
    }
}

/// Parse a transition label written as comma-separated single characters.
///
/// Blank entries are dropped and duplicates collapse. A label with no symbols
/// left is rejected with [`EditError::EmptyLabel`].
pub fn parse_label(text: &str) -> Result<BTreeSet<Symbol>, EditError> {
    let mut symbols = BTreeSet::new();
    for entry in text.split(',').map(str::trim).filter(|entry| !entry.is_empty()) {
        let mut chars = entry.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                symbols.insert(Symbol::from(c));
            }
            _ => return Err(EditError::InvalidSymbol(entry.to_owned())),
        }
    }
    if symbols.is_empty() {
        return Err(EditError::EmptyLabel);
    }
    Ok(symbols)
}

/// Render a symbol set back into label notation.
pub fn format_label<'a>(symbols: impl IntoIterator<Item = &'a Symbol>) -> String {
    symbols
        .into_iter()
        .map(Symbol::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_epsilon() {
        assert!(Symbol::Epsilon.is_epsilon());
        assert!(!Symbol::Char('a').is_epsilon());
        assert_eq!(Symbol::from('ε'), Symbol::Epsilon);
        assert_eq!(Symbol::Epsilon.as_char(), None);
    }

    #[test]
    fn test_parse_label() {
        let symbols = parse_label(" a, b ,,ε, a").unwrap();
        assert_eq!(
            symbols.into_iter().collect::<Vec<_>>(),
            vec![Symbol::Epsilon, Symbol::Char('a'), Symbol::Char('b')]
        );
    }

    #[test]
    fn test_parse_label_rejects_empty() {
        assert_eq!(parse_label(""), Err(EditError::EmptyLabel));
        assert_eq!(parse_label(" , ,"), Err(EditError::EmptyLabel));
    }

    #[test]
    fn test_parse_label_rejects_words() {
        assert_eq!(
            parse_label("a,bc"),
            Err(EditError::InvalidSymbol("bc".to_owned()))
        );
    }

    #[test]
    fn test_format_label() {
        let symbols = parse_label("b,a,ε").unwrap();
        assert_eq!(format_label(&symbols), "ε,a,b");
    }
}
