//! Error types.
//!
//! Every condition here is local and recoverable. Rejecting an input word is
//! never an error; it is a [`Verdict`](crate::execution::Verdict).

use crate::automaton::{StateId, Symbol};
use thiserror::Error;

/// Refusal to snapshot the model for execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("no initial state is set")]
    MissingInitialState,
    #[error("at least one final state is required")]
    MissingFinalState,
}

/// Refusal to apply a model edit. The model is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    #[error("empty transition label")]
    EmptyLabel,
    #[error("`{0}` is not a single-character symbol")]
    InvalidSymbol(String),
    #[error("unknown state {0}")]
    UnknownState(StateId),
    #[error("epsilon transitions are not allowed in a DFA")]
    EpsilonNotAllowedInDfa,
    #[error("DFA conflict at {state} on symbol '{symbol}'")]
    DeterminismConflict { state: StateId, symbol: Symbol },
}

/// Failure to read a right-linear grammar. No automaton is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("grammar has no productions")]
    Empty,
    #[error("line {line}: invalid production `{text}`")]
    InvalidGrammarLine { line: usize, text: String },
    #[error("line {line}: left-hand side must be a single uppercase variable, found `{text}`")]
    InvalidVariable { line: usize, text: String },
    #[error("line {line}: production `{alternative}` is not right-linear")]
    NonRightLinearProduction { line: usize, alternative: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Edit(#[from] EditError),
    #[error(transparent)]
    Grammar(#[from] GrammarError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
