//! Finite automata: the editable model, immutable snapshots and the
//! algorithms that run them.
//!
//! This module provides:
//! - An editing model with DFA-mode determinism checks
//! - A transition index rebuilt on every edit
//! - Epsilon closure, subset stepping and NFA/DFA acceptance

pub mod closure;
mod index;
mod model;
mod snapshot;
mod state;
mod symbol;
pub mod validator;

pub use closure::{accepts_dfa, accepts_nfa, epsilon_closure, step};
pub use index::TransitionIndex;
pub use model::{AutomatonModel, ModelEvent};
pub use snapshot::{Automaton, Mode};
pub use state::{StateId, StateSet};
pub use symbol::{EPSILON_GLYPH, Symbol, format_label, parse_label};
