//! Epsilon closure, subset stepping and acceptance.
//!
//! These are total functions over snapshots: a missing transition is a normal
//! outcome, never an error.

use crate::automaton::index::TransitionIndex;
use crate::automaton::snapshot::Automaton;
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::Symbol;
use log::trace;

/// Compute the epsilon closure of a set of states using an explicit stack.
pub fn epsilon_closure(index: &TransitionIndex, states: &StateSet) -> StateSet {
    let mut closure = states.clone();
    let mut stack: Vec<StateId> = states.iter().collect();

    while let Some(s) = stack.pop() {
        if let Some(destinations) = index.targets(s, Symbol::Epsilon) {
            for dest in destinations.iter() {
                if closure.insert(dest) {
                    stack.push(dest);
                }
            }
        }
    }

    closure
}

/// Union of the targets of every state in `states` on `symbol`.
///
/// The result is not epsilon-closed.
pub fn step(index: &TransitionIndex, states: &StateSet, symbol: char) -> StateSet {
    let mut reached = StateSet::new();
    for state in states.iter() {
        if let Some(destinations) = index.targets(state, Symbol::Char(symbol)) {
            reached.union_with(destinations);
        }
    }
    reached
}

/// The sole target of `state` on `symbol`, or `None` when there is no
/// transition or more than one.
pub fn deterministic_step(index: &TransitionIndex, state: StateId, symbol: char) -> Option<StateId> {
    index
        .targets(state, Symbol::Char(symbol))
        .and_then(StateSet::only)
}

/// Starting configuration under nondeterministic semantics.
pub fn initial_configuration(automaton: &Automaton) -> StateSet {
    epsilon_closure(automaton.index(), &StateSet::singleton(automaton.initial()))
}

pub fn accepts_nfa(automaton: &Automaton, word: &str) -> bool {
    let index = automaton.index();
    let mut current = initial_configuration(automaton);
    for ch in word.chars() {
        current = epsilon_closure(index, &step(index, &current, ch));
        trace!("nfa consumed '{ch}' -> {current:?}");
    }
    current.intersects(automaton.finals())
}

/// Deterministic acceptance. A missing or ambiguous transition rejects.
pub fn accepts_dfa(automaton: &Automaton, word: &str) -> bool {
    let index = automaton.index();
    let mut state = automaton.initial();
    for ch in word.chars() {
        match deterministic_step(index, state, ch) {
            Some(next) => state = next,
            None => {
                trace!("dfa has no single transition from {state} on '{ch}'");
                return false;
            }
        }
    }
    automaton.is_final(state)
}
