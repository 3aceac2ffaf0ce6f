//! Right-linear grammars and their translation into automata.

mod compile;
mod parser;

pub use compile::{CompiledGrammar, compile};
pub use parser::parse;

use crate::automaton::EPSILON_GLYPH;
use crate::error::GrammarError;
use indexmap::IndexMap;
use log::{debug, warn};
use std::fmt;

/// Grammar compiled when the input text is blank.
pub const DEFAULT_GRAMMAR: &str = "S -> aS | b | ε";

/// Right-hand side of a right-linear production.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alternative {
    Epsilon,
    /// A single terminal.
    Terminal(char),
    /// A terminal followed by a variable, as in `aB`.
    Step(char, char),
}

impl fmt::Display for Alternative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Alternative::Epsilon => write!(f, "{EPSILON_GLYPH}"),
            Alternative::Terminal(a) => write!(f, "{a}"),
            Alternative::Step(a, b) => write!(f, "{a}{b}"),
        }
    }
}

/// A right-linear grammar: productions grouped by variable, in the order the
/// variables were first defined.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    start: char,
    productions: IndexMap<char, Vec<Alternative>>,
}

impl Grammar {
    pub fn start(&self) -> char {
        self.start
    }

    /// Alternatives of `variable`, empty if it has no productions.
    pub fn alternatives(&self, variable: char) -> &[Alternative] {
        self.productions
            .get(&variable)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn productions(&self) -> impl Iterator<Item = (char, &[Alternative])> + '_ {
        self.productions
            .iter()
            .map(|(&variable, alts)| (variable, alts.as_slice()))
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (variable, alts)) in self.productions().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{variable} ->")?;
            for (j, alt) in alts.iter().enumerate() {
                let sep = if j == 0 { " " } else { " | " };
                write!(f, "{sep}{alt}")?;
            }
        }
        Ok(())
    }
}

/// Keeps the most recent grammar that compiled successfully.
#[derive(Debug, Default)]
pub struct GrammarSession {
    compiled: Option<CompiledGrammar>,
}

impl GrammarSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompile from `text`; blank text compiles [`DEFAULT_GRAMMAR`].
    ///
    /// On error the previously compiled grammar stays in place.
    pub fn update(&mut self, text: &str) -> Result<&CompiledGrammar, GrammarError> {
        let source = if text.trim().is_empty() {
            DEFAULT_GRAMMAR
        } else {
            text
        };
        let grammar = parse(source).inspect_err(|err| warn!("grammar rejected: {err}"))?;
        let compiled = compile(&grammar);
        debug!(
            "compiled grammar with {} variable(s)",
            compiled.variables().count()
        );
        Ok(&*self.compiled.insert(compiled))
    }

    pub fn compiled(&self) -> Option<&CompiledGrammar> {
        self.compiled.as_ref()
    }

    /// Test `word` against the current grammar, `None` if nothing compiled yet.
    pub fn test(&self, word: &str) -> Option<bool> {
        self.compiled.as_ref().map(|compiled| compiled.accepts(word))
    }
}
