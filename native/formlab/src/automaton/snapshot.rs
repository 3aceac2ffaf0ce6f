//! Immutable automaton snapshots handed to the algorithms.

use crate::automaton::closure;
use crate::automaton::index::TransitionIndex;
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::Symbol;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// Acceptance semantics of an automaton.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Nfa,
    Dfa,
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Nfa => "nfa",
            Mode::Dfa => "dfa",
        })
    }
}

/// A read-only automaton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Automaton {
    states: StateSet,
    initial: StateId,
    finals: StateSet,
    index: TransitionIndex,
    mode: Mode,
}

impl Automaton {
    /// Assemble a snapshot from already validated parts.
    pub(crate) fn from_parts(
        states: StateSet,
        initial: StateId,
        finals: StateSet,
        index: TransitionIndex,
        mode: Mode,
    ) -> Self {
        Self {
            states,
            initial,
            finals,
            index,
            mode,
        }
    }

    pub fn states(&self) -> &StateSet {
        &self.states
    }

    pub fn initial(&self) -> StateId {
        self.initial
    }

    pub fn finals(&self) -> &StateSet {
        &self.finals
    }

    pub fn index(&self) -> &TransitionIndex {
        &self.index
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// The same automaton read with other acceptance semantics.
    pub fn with_mode(&self, mode: Mode) -> Self {
        Self {
            mode,
            ..self.clone()
        }
    }

    pub fn is_final(&self, state: StateId) -> bool {
        self.finals.contains(state)
    }

    /// Run `word` under this automaton's mode.
    pub fn accepts(&self, word: &str) -> bool {
        match self.mode {
            Mode::Nfa => closure::accepts_nfa(self, word),
            Mode::Dfa => closure::accepts_dfa(self, word),
        }
    }

    /// Check whether the language is empty (no final state is reachable).
    pub fn is_empty(&self) -> bool {
        let mut visited = StateSet::with_capacity(self.states.len());
        let mut queue = VecDeque::from([self.initial]);
        let alphabet = self.index.alphabet();

        while let Some(state) = queue.pop_front() {
            if !visited.insert(state) {
                continue;
            }
            if self.finals.contains(state) {
                return false;
            }

            let symbols = alphabet
                .iter()
                .map(|&c| Symbol::Char(c))
                .chain(std::iter::once(Symbol::Epsilon));
            for symbol in symbols {
                if let Some(targets) = self.index.targets(state, symbol) {
                    queue.extend(targets.iter().filter(|&next| !visited.contains(next)));
                }
            }
        }

        true
    }
}
