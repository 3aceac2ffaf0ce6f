//! Translation of right-linear grammars into nondeterministic automata.

use crate::automaton::{Automaton, Mode, StateId, StateSet, Symbol, TransitionIndex};
use crate::grammar::{Alternative, Grammar};
use indexmap::IndexMap;
use std::collections::BTreeSet;

/// A grammar together with the automaton recognizing its language.
#[derive(Debug, Clone)]
pub struct CompiledGrammar {
    grammar: Grammar,
    variables: IndexMap<char, StateId>,
    accept: StateId,
    automaton: Automaton,
}

impl CompiledGrammar {
    pub fn grammar(&self) -> &Grammar {
        &self.grammar
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    /// State standing for `variable`.
    pub fn state_of(&self, variable: char) -> Option<StateId> {
        self.variables.get(&variable).copied()
    }

    /// Variables and their states, start variable first.
    pub fn variables(&self) -> impl Iterator<Item = (char, StateId)> + '_ {
        self.variables.iter().map(|(&variable, &state)| (variable, state))
    }

    /// The synthetic accepting state every derivation ends in.
    pub fn accept_state(&self) -> StateId {
        self.accept
    }

    pub fn accepts(&self, word: &str) -> bool {
        self.automaton.accepts(word)
    }
}

/// Build the automaton of a grammar.
///
/// Every variable, including ones that only occur on a right-hand side,
/// becomes a state. One extra state is the sole final state:
/// - `A -> aB` gives `A --a--> B`
/// - `A -> a` gives `A --a--> accept`
/// - `A -> ε` gives `A --ε--> accept`
pub fn compile(grammar: &Grammar) -> CompiledGrammar {
    let mut variables: IndexMap<char, StateId> = IndexMap::new();
    let mut intern = |variable: char| {
        let next = StateId::new(variables.len() as u32);
        *variables.entry(variable).or_insert(next)
    };

    let start = intern(grammar.start());
    let mut edges: Vec<(char, Alternative)> = Vec::new();
    for (variable, alts) in grammar.productions() {
        intern(variable);
        for &alt in alts {
            if let Alternative::Step(_, target) = alt {
                intern(target);
            }
            edges.push((variable, alt));
        }
    }

    let accept = StateId::new(variables.len() as u32);
    let mut records: IndexMap<(StateId, StateId), BTreeSet<Symbol>> = IndexMap::new();
    for (variable, alt) in edges {
        let source = variables[&variable];
        let (target, symbol) = match alt {
            Alternative::Step(a, next) => (variables[&next], Symbol::Char(a)),
            Alternative::Terminal(a) => (accept, Symbol::Char(a)),
            Alternative::Epsilon => (accept, Symbol::Epsilon),
        };
        records.entry((source, target)).or_default().insert(symbol);
    }

    let index = TransitionIndex::build(
        records
            .iter()
            .map(|(&(source, target), symbols)| (source, target, symbols)),
    );
    let states: StateSet = variables
        .values()
        .copied()
        .chain(std::iter::once(accept))
        .collect();
    let automaton =
        Automaton::from_parts(states, start, StateSet::singleton(accept), index, Mode::Nfa);

    CompiledGrammar {
        grammar: grammar.clone(),
        variables,
        accept,
        automaton,
    }
}
