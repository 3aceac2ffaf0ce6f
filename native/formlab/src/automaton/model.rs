//! The mutable automaton edited by the user.

use crate::automaton::index::TransitionIndex;
use crate::automaton::snapshot::{Automaton, Mode};
use crate::automaton::state::{StateId, StateSet};
use crate::automaton::symbol::Symbol;
use crate::automaton::validator;
use crate::error::{EditError, ValidationError};
use indexmap::{IndexMap, IndexSet};
use log::{debug, warn};
use std::collections::BTreeSet;
use std::fmt;

/// A change applied to an [`AutomatonModel`].
///
/// Presentation layers subscribe to these to keep node and edge visuals keyed
/// by the same identities as the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelEvent {
    StateAdded(StateId),
    StateRemoved(StateId),
    InitialChanged(Option<StateId>),
    FinalChanged { state: StateId, is_final: bool },
    TransitionChanged {
        source: StateId,
        target: StateId,
        symbols: BTreeSet<Symbol>,
    },
    TransitionRemoved { source: StateId, target: StateId },
}

type Observer = Box<dyn FnMut(&ModelEvent)>;

/// The editing model: states, designations and labelled transition records.
///
/// There is at most one record per ordered `(source, target)` pair and its
/// label is never empty. The transition index is rebuilt after every change to
/// the records, before control returns to the caller.
pub struct AutomatonModel {
    mode: Mode,
    next_id: u32,
    states: IndexSet<StateId>,
    initial: Option<StateId>,
    finals: StateSet,
    transitions: IndexMap<(StateId, StateId), BTreeSet<Symbol>>,
    index: TransitionIndex,
    observers: Vec<Observer>,
}

impl AutomatonModel {
    pub fn new(mode: Mode) -> Self {
        Self {
            mode,
            next_id: 0,
            states: IndexSet::new(),
            initial: None,
            finals: StateSet::new(),
            transitions: IndexMap::new(),
            index: TransitionIndex::default(),
            observers: Vec::new(),
        }
    }

    /// Editor mode. In DFA mode transition edits go through the determinism
    /// validator.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Change the editor mode. Existing transitions are not re-validated.
    pub fn set_mode(&mut self, mode: Mode) {
        debug!("editor mode set to {mode}");
        self.mode = mode;
    }

    /// Register an observer called after every applied change.
    pub fn subscribe(&mut self, observer: impl FnMut(&ModelEvent) + 'static) {
        self.observers.push(Box::new(observer));
    }

    fn emit(&mut self, event: ModelEvent) {
        for observer in &mut self.observers {
            observer(&event);
        }
    }

    fn rebuild_index(&mut self) {
        self.index = TransitionIndex::build(
            self.transitions
                .iter()
                .map(|(&(source, target), symbols)| (source, target, symbols)),
        );
    }

    fn require_state(&self, state: StateId) -> Result<(), EditError> {
        if self.states.contains(&state) {
            Ok(())
        } else {
            Err(EditError::UnknownState(state))
        }
    }

    /// Allocate a fresh state.
    pub fn add_state(&mut self) -> StateId {
        let id = StateId::new(self.next_id);
        self.next_id += 1;
        self.states.insert(id);
        debug!("added state {id}");
        self.emit(ModelEvent::StateAdded(id));
        id
    }

    /// Remove a state with its designations and every transition touching it.
    /// Unknown states are ignored.
    pub fn remove_state(&mut self, state: StateId) {
        if !self.states.shift_remove(&state) {
            return;
        }
        if self.initial == Some(state) {
            self.initial = None;
            self.emit(ModelEvent::InitialChanged(None));
        }
        self.finals.remove(state);

        let dropped: Vec<(StateId, StateId)> = self
            .transitions
            .keys()
            .filter(|&&(source, target)| source == state || target == state)
            .copied()
            .collect();
        for key in &dropped {
            self.transitions.shift_remove(key);
        }
        self.rebuild_index();

        debug!("removed state {state} and {} transition(s)", dropped.len());
        for (source, target) in dropped {
            self.emit(ModelEvent::TransitionRemoved { source, target });
        }
        self.emit(ModelEvent::StateRemoved(state));
    }

    /// Make `state` the initial state, or clear the designation if it already
    /// is. Unknown states are ignored.
    pub fn toggle_initial(&mut self, state: StateId) {
        if !self.states.contains(&state) {
            return;
        }
        self.initial = if self.initial == Some(state) {
            None
        } else {
            Some(state)
        };
        debug!("initial state is now {:?}", self.initial);
        self.emit(ModelEvent::InitialChanged(self.initial));
    }

    /// Flip whether `state` is final. Unknown states are ignored.
    pub fn toggle_final(&mut self, state: StateId) {
        if !self.states.contains(&state) {
            return;
        }
        let is_final = !self.finals.contains(state);
        if is_final {
            self.finals.insert(state);
        } else {
            self.finals.remove(state);
        }
        debug!("state {state} final: {is_final}");
        self.emit(ModelEvent::FinalChanged { state, is_final });
    }

    /// Add `symbols` to the `source -> target` edge, creating it if needed.
    ///
    /// In DFA mode the merged label is validated first; on failure nothing
    /// changes.
    pub fn add_or_merge_transition(
        &mut self,
        source: StateId,
        target: StateId,
        symbols: &BTreeSet<Symbol>,
    ) -> Result<(), EditError> {
        let mut merged = self
            .transitions
            .get(&(source, target))
            .cloned()
            .unwrap_or_default();
        merged.extend(symbols.iter().copied());
        self.commit(source, target, merged)
    }

    /// Replace the label of the `source -> target` edge, creating it if needed.
    ///
    /// In DFA mode the new label is validated first; on failure nothing
    /// changes.
    pub fn replace_transition_symbols(
        &mut self,
        source: StateId,
        target: StateId,
        symbols: &BTreeSet<Symbol>,
    ) -> Result<(), EditError> {
        self.commit(source, target, symbols.clone())
    }

    fn commit(
        &mut self,
        source: StateId,
        target: StateId,
        symbols: BTreeSet<Symbol>,
    ) -> Result<(), EditError> {
        self.require_state(source)?;
        self.require_state(target)?;
        if symbols.is_empty() {
            return Err(EditError::EmptyLabel);
        }
        if self.mode == Mode::Dfa {
            validator::check_edit(self.records(), source, target, &symbols).inspect_err(|err| {
                warn!("rejected edit {source} -> {target}: {err}");
            })?;
        }

        self.transitions.insert((source, target), symbols.clone());
        self.rebuild_index();
        debug!("transition {source} -> {target} labelled {symbols:?}");
        self.emit(ModelEvent::TransitionChanged {
            source,
            target,
            symbols,
        });
        Ok(())
    }

    /// Delete the `source -> target` edge. Missing edges are ignored.
    pub fn remove_transition(&mut self, source: StateId, target: StateId) {
        if self.transitions.shift_remove(&(source, target)).is_none() {
            return;
        }
        self.rebuild_index();
        debug!("removed transition {source} -> {target}");
        self.emit(ModelEvent::TransitionRemoved { source, target });
    }

    /// Freeze the model into an [`Automaton`] with the given semantics.
    pub fn snapshot(&self, mode: Mode) -> Result<Automaton, ValidationError> {
        let Some(initial) = self.initial else {
            warn!("cannot snapshot: {}", ValidationError::MissingInitialState);
            return Err(ValidationError::MissingInitialState);
        };
        if self.finals.is_empty() {
            warn!("cannot snapshot: {}", ValidationError::MissingFinalState);
            return Err(ValidationError::MissingFinalState);
        }
        Ok(Automaton::from_parts(
            self.states.iter().copied().collect(),
            initial,
            self.finals.clone(),
            self.index.clone(),
            mode,
        ))
    }

    pub fn contains_state(&self, state: StateId) -> bool {
        self.states.contains(&state)
    }

    /// States in creation order.
    pub fn states(&self) -> impl Iterator<Item = StateId> + '_ {
        self.states.iter().copied()
    }

    pub fn initial(&self) -> Option<StateId> {
        self.initial
    }

    pub fn finals(&self) -> &StateSet {
        &self.finals
    }

    /// Label of the `source -> target` edge.
    pub fn transition(&self, source: StateId, target: StateId) -> Option<&BTreeSet<Symbol>> {
        self.transitions.get(&(source, target))
    }

    /// Transition records in creation order.
    pub fn records(&self) -> impl Iterator<Item = (StateId, StateId, &BTreeSet<Symbol>)> + '_ {
        self.transitions
            .iter()
            .map(|(&(source, target), symbols)| (source, target, symbols))
    }

    pub fn index(&self) -> &TransitionIndex {
        &self.index
    }
}

impl Default for AutomatonModel {
    fn default() -> Self {
        Self::new(Mode::default())
    }
}

impl fmt::Debug for AutomatonModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AutomatonModel")
            .field("mode", &self.mode)
            .field("states", &self.states)
            .field("initial", &self.initial)
            .field("finals", &self.finals)
            .field("transitions", &self.transitions)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn label(text: &str) -> BTreeSet<Symbol> {
        text.chars().map(Symbol::from).collect()
    }

    #[test]
    fn test_add_state_allocates_fresh_ids() {
        let mut model = AutomatonModel::default();
        let q0 = model.add_state();
        let q1 = model.add_state();
        model.remove_state(q1);
        let q2 = model.add_state();
        assert_ne!(q0, q1);
        assert_ne!(q1, q2);
        assert_eq!(model.states().collect::<Vec<_>>(), vec![q0, q2]);
    }

    #[test]
    fn test_merge_unions_labels() {
        let mut model = AutomatonModel::default();
        let q0 = model.add_state();
        let q1 = model.add_state();
        model.add_or_merge_transition(q0, q1, &label("a")).unwrap();
        model.add_or_merge_transition(q0, q1, &label("bε")).unwrap();
        assert_eq!(model.transition(q0, q1), Some(&label("abε")));
        assert_eq!(model.records().count(), 1);
        assert!(model.index().targets(q0, Symbol::Epsilon).is_some());
    }

    #[test]
    fn test_replace_overwrites_labels() {
        let mut model = AutomatonModel::default();
        let q0 = model.add_state();
        let q1 = model.add_state();
        model.add_or_merge_transition(q0, q1, &label("ab")).unwrap();
        model.replace_transition_symbols(q0, q1, &label("c")).unwrap();
        assert_eq!(model.transition(q0, q1), Some(&label("c")));
        assert!(model.index().targets(q0, Symbol::Char('a')).is_none());
    }

    #[test]
    fn test_empty_label_rejected() {
        let mut model = AutomatonModel::default();
        let q0 = model.add_state();
        assert_eq!(
            model.replace_transition_symbols(q0, q0, &BTreeSet::new()),
            Err(EditError::EmptyLabel)
        );
        assert!(model.transition(q0, q0).is_none());
    }

    #[test]
    fn test_unknown_state_rejected() {
        let mut model = AutomatonModel::default();
        let q0 = model.add_state();
        let ghost = StateId::new(99);
        assert_eq!(
            model.add_or_merge_transition(q0, ghost, &label("a")),
            Err(EditError::UnknownState(ghost))
        );
    }

    #[test]
    fn test_remove_state_drops_transitions() {
        let mut model = AutomatonModel::default();
        let q0 = model.add_state();
        let q1 = model.add_state();
        let q2 = model.add_state();
        model.add_or_merge_transition(q0, q1, &label("a")).unwrap();
        model.add_or_merge_transition(q1, q2, &label("b")).unwrap();
        model.add_or_merge_transition(q2, q0, &label("c")).unwrap();
        model.toggle_initial(q1);
        model.toggle_final(q1);

        model.remove_state(q1);

        assert!(!model.contains_state(q1));
        assert_eq!(model.initial(), None);
        assert!(!model.finals().contains(q1));
        assert_eq!(model.records().count(), 1);
        assert!(!model.index().mentions(q1));

        // removing again is a no-op
        model.remove_state(q1);
        assert_eq!(model.states().count(), 2);
    }

    #[test]
    fn test_toggle_initial() {
        let mut model = AutomatonModel::default();
        let q0 = model.add_state();
        let q1 = model.add_state();
        model.toggle_initial(q0);
        assert_eq!(model.initial(), Some(q0));
        model.toggle_initial(q1);
        assert_eq!(model.initial(), Some(q1));
        model.toggle_initial(q1);
        assert_eq!(model.initial(), None);
        model.toggle_initial(StateId::new(42));
        assert_eq!(model.initial(), None);
    }

    #[test]
    fn test_toggle_final() {
        let mut model = AutomatonModel::default();
        let q0 = model.add_state();
        model.toggle_final(q0);
        assert!(model.finals().contains(q0));
        model.toggle_final(q0);
        assert!(model.finals().is_empty());
    }

    #[test]
    fn test_snapshot_validation() {
        let mut model = AutomatonModel::default();
        let q0 = model.add_state();
        assert_eq!(
            model.snapshot(Mode::Nfa).unwrap_err(),
            ValidationError::MissingInitialState
        );
        model.toggle_initial(q0);
        assert_eq!(
            model.snapshot(Mode::Nfa).unwrap_err(),
            ValidationError::MissingFinalState
        );
        model.toggle_final(q0);
        let automaton = model.snapshot(Mode::Dfa).unwrap();
        assert_eq!(automaton.initial(), q0);
        assert_eq!(automaton.mode(), Mode::Dfa);
        assert!(automaton.accepts(""));
    }

    #[test]
    fn test_dfa_conflict_leaves_model_unchanged() {
        let mut model = AutomatonModel::new(Mode::Dfa);
        let q0 = model.add_state();
        let q1 = model.add_state();
        let q2 = model.add_state();
        model.add_or_merge_transition(q0, q1, &label("a")).unwrap();

        let err = model.add_or_merge_transition(q0, q2, &label("ab")).unwrap_err();
        assert_eq!(
            err,
            EditError::DeterminismConflict {
                state: q0,
                symbol: Symbol::Char('a'),
            }
        );
        assert_eq!(err.to_string(), "DFA conflict at q0 on symbol 'a'");
        assert_eq!(model.records().count(), 1);
        assert_eq!(model.transition(q0, q1), Some(&label("a")));
        assert!(model.index().targets(q0, Symbol::Char('b')).is_none());
    }

    #[test]
    fn test_dfa_relabel_same_symbols() {
        let mut model = AutomatonModel::new(Mode::Dfa);
        let q0 = model.add_state();
        let q1 = model.add_state();
        model.add_or_merge_transition(q0, q1, &label("ab")).unwrap();
        model.replace_transition_symbols(q0, q1, &label("ab")).unwrap();
        model.add_or_merge_transition(q0, q1, &label("a")).unwrap();
        assert_eq!(
            model.replace_transition_symbols(q0, q1, &label("ε")),
            Err(EditError::EpsilonNotAllowedInDfa)
        );
        assert_eq!(model.transition(q0, q1), Some(&label("ab")));
    }

    #[test]
    fn test_nfa_mode_allows_branching() {
        let mut model = AutomatonModel::new(Mode::Nfa);
        let q0 = model.add_state();
        let q1 = model.add_state();
        let q2 = model.add_state();
        model.add_or_merge_transition(q0, q1, &label("a")).unwrap();
        model.add_or_merge_transition(q0, q2, &label("aε")).unwrap();
        let targets = model.index().targets(q0, Symbol::Char('a')).unwrap();
        assert_eq!(targets.len(), 2);
    }

    #[test]
    fn test_remove_transition() {
        let mut model = AutomatonModel::default();
        let q0 = model.add_state();
        let q1 = model.add_state();
        model.add_or_merge_transition(q0, q1, &label("a")).unwrap();
        model.remove_transition(q0, q1);
        model.remove_transition(q0, q1);
        assert!(model.index().is_empty());
        assert_eq!(model.records().count(), 0);
    }

    #[test]
    fn test_observers_see_changes() {
        let events = Rc::new(RefCell::new(Vec::new()));
        let mut model = AutomatonModel::default();
        let sink = Rc::clone(&events);
        model.subscribe(move |event| sink.borrow_mut().push(event.clone()));

        let q0 = model.add_state();
        let q1 = model.add_state();
        model.add_or_merge_transition(q0, q1, &label("a")).unwrap();
        model.toggle_initial(q0);
        model.remove_state(q1);

        assert_eq!(
            *events.borrow(),
            vec![
                ModelEvent::StateAdded(q0),
                ModelEvent::StateAdded(q1),
                ModelEvent::TransitionChanged {
                    source: q0,
                    target: q1,
                    symbols: label("a"),
                },
                ModelEvent::InitialChanged(Some(q0)),
                ModelEvent::TransitionRemoved {
                    source: q0,
                    target: q1,
                },
                ModelEvent::StateRemoved(q1),
            ]
        );
    }
}
