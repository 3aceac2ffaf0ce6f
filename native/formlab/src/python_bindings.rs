//! PyO3 bindings for the editor session and the grammar tester.
//!
//! States cross the boundary as their raw integer identifiers.

use crate::automaton::{Mode, StateId, format_label};
use crate::config::EditorConfig;
use crate::execution::{Configuration, StepOutcome};
use crate::grammar::GrammarSession;
use crate::session::EditorSession;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PySet};

fn value_error(err: impl std::fmt::Display) -> PyErr {
    PyValueError::new_err(err.to_string())
}

fn parse_mode(mode: &str) -> PyResult<Mode> {
    match mode {
        "nfa" => Ok(Mode::Nfa),
        "dfa" => Ok(Mode::Dfa),
        other => Err(PyValueError::new_err(format!(
            "mode must be 'nfa' or 'dfa', not {other:?}"
        ))),
    }
}

/// An automaton editor with its current run.
#[pyclass(name = "Editor", module = "formlab.automaton", unsendable)]
pub struct PyEditor {
    session: EditorSession,
}

#[pymethods]
impl PyEditor {
    #[new]
    #[pyo3(signature = (mode = "nfa"))]
    fn new(mode: &str) -> PyResult<Self> {
        Ok(Self {
            session: EditorSession::new(EditorConfig::new(parse_mode(mode)?)),
        })
    }

    #[getter]
    fn mode(&self) -> String {
        self.session.config().mode.to_string()
    }

    #[setter]
    fn set_mode(&mut self, mode: &str) -> PyResult<()> {
        self.session.set_mode(parse_mode(mode)?);
        Ok(())
    }

    fn add_state(&mut self) -> u32 {
        self.session.add_state().raw()
    }

    fn remove_state(&mut self, state: u32) {
        self.session.remove_state(StateId::new(state));
    }

    fn toggle_initial(&mut self, state: u32) {
        self.session.toggle_initial(StateId::new(state));
    }

    fn toggle_final(&mut self, state: u32) {
        self.session.toggle_final(StateId::new(state));
    }

    /// Add symbols (comma separated, `ε` for epsilon) to an edge.
    fn connect(&mut self, source: u32, target: u32, label: &str) -> PyResult<()> {
        self.session
            .connect(StateId::new(source), StateId::new(target), label)
            .map_err(value_error)
    }

    /// Replace the label of an edge.
    fn edit_label(&mut self, source: u32, target: u32, label: &str) -> PyResult<()> {
        self.session
            .edit_label(StateId::new(source), StateId::new(target), label)
            .map_err(value_error)
    }

    fn remove_transition(&mut self, source: u32, target: u32) {
        self.session
            .remove_transition(StateId::new(source), StateId::new(target));
    }

    /// Edge labels keyed by `(source, target)`.
    fn transitions<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PyDict>> {
        let edges = PyDict::new(py);
        for (source, target, symbols) in self.session.model().records() {
            edges.set_item((source.raw(), target.raw()), format_label(symbols))?;
        }
        Ok(edges)
    }

    /// Run a word to the end; returns whether it was accepted.
    fn run(&mut self, word: &str) -> PyResult<bool> {
        self.session
            .run(word)
            .map(|verdict| verdict.is_accept())
            .map_err(value_error)
    }

    /// Step the current run, starting one on `word` if needed.
    ///
    /// Returns `None` while symbols remain, else the verdict.
    fn step(&mut self, word: &str) -> PyResult<Option<bool>> {
        match self.session.step(word).map_err(value_error)? {
            StepOutcome::Finished(verdict) => Ok(Some(verdict.is_accept())),
            StepOutcome::Advanced(_) | StepOutcome::Inactive => Ok(None),
        }
    }

    /// States of the current configuration.
    fn current_states<'py>(&self, py: Python<'py>) -> PyResult<Bound<'py, PySet>> {
        let set = PySet::empty(py)?;
        if let Some(run) = self.session.current_run() {
            let states = match run.configuration() {
                Configuration::Deterministic(state) => vec![*state],
                Configuration::Nondeterministic(states) => states.to_vec(),
            };
            for state in states {
                set.add(state.raw())?;
            }
        }
        Ok(set)
    }

    fn clear(&mut self) {
        self.session.clear();
    }
}

/// A right-linear grammar tester.
#[pyclass(name = "Grammar", module = "formlab.grammar")]
pub struct PyGrammar {
    session: GrammarSession,
}

#[pymethods]
impl PyGrammar {
    #[new]
    #[pyo3(signature = (text = ""))]
    fn new(text: &str) -> PyResult<Self> {
        let mut session = GrammarSession::new();
        session.update(text).map_err(value_error)?;
        Ok(Self { session })
    }

    /// Replace the grammar. On error the previous grammar is kept.
    fn update(&mut self, text: &str) -> PyResult<()> {
        self.session.update(text).map(|_| ()).map_err(value_error)
    }

    fn accepts(&self, word: &str) -> bool {
        self.session.test(word).unwrap_or(false)
    }

    fn __repr__(&self) -> String {
        match self.session.compiled() {
            Some(compiled) => format!("Grammar({:?})", compiled.grammar().to_string()),
            None => "Grammar(None)".to_owned(),
        }
    }
}

/// Register the automaton submodule.
pub fn automaton(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyEditor>()?;
    Ok(())
}

/// Register the grammar submodule.
pub fn grammar(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyGrammar>()?;
    Ok(())
}
