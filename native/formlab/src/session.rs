//! The editing session: the model, its settings and the current run.

use crate::automaton::{AutomatonModel, Mode, StateId, parse_label};
use crate::config::EditorConfig;
use crate::error::Result;
use crate::execution::{ExecutionController, Run, StepOutcome, Verdict};

/// Everything an automaton editor front end talks to.
///
/// Labels arrive in the comma-separated edit notation. Runs work on a snapshot
/// taken when they start, so later edits only affect the next run.
#[derive(Debug, Default)]
pub struct EditorSession {
    model: AutomatonModel,
    controller: ExecutionController,
}

impl EditorSession {
    pub fn new(config: EditorConfig) -> Self {
        Self {
            model: AutomatonModel::new(config.mode),
            controller: ExecutionController::new(),
        }
    }

    pub fn config(&self) -> EditorConfig {
        EditorConfig::new(self.model.mode())
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.model.set_mode(mode);
    }

    pub fn model(&self) -> &AutomatonModel {
        &self.model
    }

    pub fn model_mut(&mut self) -> &mut AutomatonModel {
        &mut self.model
    }

    pub fn add_state(&mut self) -> StateId {
        self.model.add_state()
    }

    pub fn remove_state(&mut self, state: StateId) {
        self.model.remove_state(state);
    }

    pub fn toggle_initial(&mut self, state: StateId) {
        self.model.toggle_initial(state);
    }

    pub fn toggle_final(&mut self, state: StateId) {
        self.model.toggle_final(state);
    }

    /// Add the symbols of `label` to the `source -> target` edge.
    pub fn connect(&mut self, source: StateId, target: StateId, label: &str) -> Result<()> {
        let symbols = parse_label(label)?;
        self.model.add_or_merge_transition(source, target, &symbols)?;
        Ok(())
    }

    /// Replace the label of the `source -> target` edge.
    pub fn edit_label(&mut self, source: StateId, target: StateId, label: &str) -> Result<()> {
        let symbols = parse_label(label)?;
        self.model.replace_transition_symbols(source, target, &symbols)?;
        Ok(())
    }

    pub fn remove_transition(&mut self, source: StateId, target: StateId) {
        self.model.remove_transition(source, target);
    }

    /// Start a fresh run of `word` and run it to the end.
    pub fn run(&mut self, word: &str) -> Result<Verdict> {
        self.controller.start(&self.model, word)?;
        let verdict = self.controller.run_to_completion();
        Ok(verdict.unwrap_or(Verdict::Reject))
    }

    /// Advance the current run by one symbol, starting a run of `word` first
    /// if none is active.
    pub fn step(&mut self, word: &str) -> Result<StepOutcome> {
        if !self.controller.is_running() {
            self.controller.start(&self.model, word)?;
        }
        Ok(self.controller.step())
    }

    pub fn clear(&mut self) {
        self.controller.clear();
    }

    pub fn current_run(&self) -> Option<&Run> {
        self.controller.run()
    }
}
