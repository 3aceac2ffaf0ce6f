//! Stepwise execution of an automaton over an input word.

use crate::automaton::closure::{deterministic_step, epsilon_closure, initial_configuration, step};
use crate::automaton::{Automaton, AutomatonModel, Mode, StateId, StateSet, Symbol};
use crate::error::ValidationError;
use log::{debug, trace};
use std::fmt;

/// Outcome of running a word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verdict {
    Accept,
    Reject,
}

impl Verdict {
    pub fn is_accept(self) -> bool {
        self == Verdict::Accept
    }
}

impl From<bool> for Verdict {
    fn from(accepted: bool) -> Self {
        if accepted {
            Verdict::Accept
        } else {
            Verdict::Reject
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Verdict::Accept => "accepted",
            Verdict::Reject => "rejected",
        })
    }
}

/// Where the automaton currently is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Configuration {
    /// DFA mode: one current state.
    Deterministic(StateId),
    /// NFA mode: every state the automaton may be in. An empty set is a
    /// configuration that can only reject.
    Nondeterministic(StateSet),
}

impl Configuration {
    /// Current states as a set, for highlighting.
    pub fn states(&self) -> StateSet {
        match self {
            Configuration::Deterministic(state) => StateSet::singleton(*state),
            Configuration::Nondeterministic(states) => states.clone(),
        }
    }
}

/// One consumed input symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub symbol: char,
    /// `(source, target)` edges taken on `symbol`, before epsilon closure.
    pub fired: Vec<(StateId, StateId)>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// No run is active.
    Inactive,
    Advanced(Step),
    /// The run is over: the word was consumed, or a DFA had no single
    /// transition to take. Repeated calls keep returning the same verdict.
    Finished(Verdict),
}

/// An active run.
#[derive(Debug, Clone)]
pub struct Run {
    automaton: Automaton,
    word: Vec<char>,
    position: usize,
    configuration: Configuration,
    verdict: Option<Verdict>,
}

impl Run {
    fn new(automaton: Automaton, word: &str) -> Self {
        let configuration = match automaton.mode() {
            Mode::Dfa => Configuration::Deterministic(automaton.initial()),
            Mode::Nfa => Configuration::Nondeterministic(initial_configuration(&automaton)),
        };
        Self {
            automaton,
            word: word.chars().collect(),
            position: 0,
            configuration,
            verdict: None,
        }
    }

    pub fn automaton(&self) -> &Automaton {
        &self.automaton
    }

    pub fn word(&self) -> String {
        self.word.iter().collect()
    }

    /// Number of symbols consumed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn remaining(&self) -> &[char] {
        &self.word[self.position..]
    }

    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Final verdict, once the run is over.
    pub fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    pub fn is_finished(&self) -> bool {
        self.verdict.is_some()
    }

    fn finish(&mut self, verdict: Verdict) -> StepOutcome {
        debug!("run of {:?} {verdict}", self.word());
        self.verdict = Some(verdict);
        StepOutcome::Finished(verdict)
    }

    fn advance(&mut self) -> StepOutcome {
        if let Some(verdict) = self.verdict {
            return StepOutcome::Finished(verdict);
        }

        let index = self.automaton.index();
        let Some(&symbol) = self.word.get(self.position) else {
            let accepted = match &self.configuration {
                Configuration::Deterministic(state) => self.automaton.is_final(*state),
                Configuration::Nondeterministic(states) => {
                    states.intersects(self.automaton.finals())
                }
            };
            return self.finish(Verdict::from(accepted));
        };

        let fired = match &self.configuration {
            Configuration::Deterministic(state) => {
                let Some(next) = deterministic_step(index, *state, symbol) else {
                    trace!("no single transition from {state} on '{symbol}'");
                    return self.finish(Verdict::Reject);
                };
                let fired = vec![(*state, next)];
                self.configuration = Configuration::Deterministic(next);
                fired
            }
            Configuration::Nondeterministic(states) => {
                let fired: Vec<(StateId, StateId)> = states
                    .iter()
                    .flat_map(|from| {
                        index
                            .targets(from, Symbol::Char(symbol))
                            .into_iter()
                            .flat_map(move |targets| targets.iter().map(move |to| (from, to)))
                    })
                    .collect();
                let next = epsilon_closure(index, &step(index, states, symbol));
                self.configuration = Configuration::Nondeterministic(next);
                fired
            }
        };

        self.position += 1;
        trace!(
            "consumed '{symbol}' at {}, now {:?}",
            self.position,
            self.configuration
        );
        StepOutcome::Advanced(Step { symbol, fired })
    }
}

/// Drives single-step or batch execution.
///
/// Idle until [`start`](Self::start) succeeds; [`clear`](Self::clear) returns
/// it to idle from any state.
#[derive(Debug, Clone, Default)]
pub struct ExecutionController {
    run: Option<Run>,
}

impl ExecutionController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a fresh run of `word` on a snapshot of `model` in the model's
    /// mode. On a validation error the controller is left as it was.
    pub fn start(&mut self, model: &AutomatonModel, word: &str) -> Result<&Run, ValidationError> {
        let automaton = model.snapshot(model.mode())?;
        Ok(self.start_with(automaton, word))
    }

    /// Start a fresh run on an existing snapshot.
    pub fn start_with(&mut self, automaton: Automaton, word: &str) -> &Run {
        debug!("starting {} run on {word:?}", automaton.mode());
        self.run.insert(Run::new(automaton, word))
    }

    pub fn step(&mut self) -> StepOutcome {
        match &mut self.run {
            Some(run) => run.advance(),
            None => StepOutcome::Inactive,
        }
    }

    /// Step until the run is over. `None` if no run is active.
    pub fn run_to_completion(&mut self) -> Option<Verdict> {
        let run = self.run.as_mut()?;
        loop {
            if let StepOutcome::Finished(verdict) = run.advance() {
                return Some(verdict);
            }
        }
    }

    pub fn clear(&mut self) {
        if self.run.take().is_some() {
            debug!("execution cleared");
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }
}
