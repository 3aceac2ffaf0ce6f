//! Lookup table from `(state, symbol)` to target states.

use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::Symbol;
use serde::{Serialize, Serializer};
use std::collections::{BTreeSet, HashMap};

/// Transitions keyed by `(source, symbol)`.
///
/// Always derived from transition records through [`TransitionIndex::build`];
/// there is no way to edit an index in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransitionIndex {
    transitions: HashMap<(StateId, Symbol), StateSet>,
}

impl TransitionIndex {
    /// Build an index from `(source, target, symbols)` records.
    pub fn build<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = (StateId, StateId, &'a BTreeSet<Symbol>)>,
    {
        let mut transitions: HashMap<(StateId, Symbol), StateSet> = HashMap::new();
        for (source, target, symbols) in records {
            for &symbol in symbols {
                transitions.entry((source, symbol)).or_default().insert(target);
            }
        }
        Self { transitions }
    }

    /// Targets of `state` on `symbol`, if any.
    pub fn targets(&self, state: StateId, symbol: Symbol) -> Option<&StateSet> {
        self.transitions.get(&(state, symbol))
    }

    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    pub fn has_epsilon_transitions(&self) -> bool {
        self.transitions.keys().any(|(_, symbol)| symbol.is_epsilon())
    }

    /// All non-epsilon symbols in use.
    pub fn alphabet(&self) -> BTreeSet<char> {
        self.transitions
            .keys()
            .filter_map(|(_, symbol)| symbol.as_char())
            .collect()
    }

    /// All `(source, symbol, target)` triples.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, Symbol, StateId)> + '_ {
        self.transitions
            .iter()
            .flat_map(|(&(src, sym), dests)| dests.iter().map(move |dst| (src, sym, dst)))
    }

    /// Outgoing `(symbol, targets)` pairs of one state.
    pub fn outgoing(&self, state: StateId) -> impl Iterator<Item = (Symbol, &StateSet)> + '_ {
        self.transitions
            .iter()
            .filter(move |((src, _), _)| *src == state)
            .map(|(&(_, sym), dests)| (sym, dests))
    }

    /// Whether any entry mentions `state` as source or target.
    pub fn mentions(&self, state: StateId) -> bool {
        self.iter().any(|(src, _, dst)| src == state || dst == state)
    }
}

impl Serialize for TransitionIndex {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut triples: Vec<_> = self.iter().collect();
        triples.sort_unstable();
        serializer.collect_seq(triples)
    }
}
