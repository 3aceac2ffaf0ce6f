//! Reader for the `VAR -> alt | alt` right-linear grammar notation.

use crate::automaton::EPSILON_GLYPH;
use crate::error::GrammarError;
use crate::grammar::{Alternative, Grammar};
use indexmap::IndexMap;
use std::str::FromStr;

const SEPARATOR: &str = "->";

fn is_variable(c: char) -> bool {
    c.is_ascii_uppercase()
}

fn is_terminal(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit()
}

fn is_epsilon_word(alt: &str) -> bool {
    let mut chars = alt.chars();
    matches!((chars.next(), chars.next()), (Some(EPSILON_GLYPH), None))
        || alt.eq_ignore_ascii_case("epsilon")
        || alt == "eps"
}

/// Classify one trimmed alternative of a production.
fn parse_alternative(alt: &str, line: usize) -> Result<Alternative, GrammarError> {
    if is_epsilon_word(alt) {
        return Ok(Alternative::Epsilon);
    }

    let mut chars = alt.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), None, None) if is_terminal(a) => Ok(Alternative::Terminal(a)),
        (Some(a), Some(b), None) if is_terminal(a) && is_variable(b) => {
            Ok(Alternative::Step(a, b))
        }
        _ => Err(GrammarError::NonRightLinearProduction {
            line,
            alternative: alt.to_owned(),
        }),
    }
}

/// Parse a whole grammar.
///
/// Lines are numbered from 1 in the raw input; blank lines are skipped. The
/// left-hand side of the first production is the start variable. Any error
/// aborts the whole parse.
pub fn parse(text: &str) -> Result<Grammar, GrammarError> {
    let mut start = None;
    let mut productions: IndexMap<char, Vec<Alternative>> = IndexMap::new();

    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.trim();
        if content.is_empty() {
            continue;
        }

        let invalid_line = || GrammarError::InvalidGrammarLine {
            line,
            text: content.to_owned(),
        };
        let mut sides = content.split(SEPARATOR);
        let (Some(left), Some(right), None) = (sides.next(), sides.next(), sides.next()) else {
            return Err(invalid_line());
        };
        let (left, right) = (left.trim(), right.trim());
        if left.is_empty() || right.is_empty() {
            return Err(invalid_line());
        }

        let mut left_chars = left.chars();
        let variable = match (left_chars.next(), left_chars.next()) {
            (Some(v), None) if is_variable(v) => v,
            _ => {
                return Err(GrammarError::InvalidVariable {
                    line,
                    text: left.to_owned(),
                });
            }
        };

        let alternatives = right
            .split('|')
            .map(|alt| parse_alternative(alt.trim(), line))
            .collect::<Result<Vec<_>, _>>()?;

        start.get_or_insert(variable);
        productions.entry(variable).or_default().extend(alternatives);
    }

    let start = start.ok_or(GrammarError::Empty)?;
    Ok(Grammar { start, productions })
}

impl FromStr for Grammar {
    type Err = GrammarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse(s)
    }
}
