//! Finite-automaton and right-linear grammar engine behind the formal-language
//! teaching tools.

pub mod automaton;
pub mod config;
pub mod error;
pub mod execution;
pub mod grammar;
#[cfg(feature = "python")]
pub mod python_bindings;
pub mod session;

pub use automaton::{Automaton, AutomatonModel, Mode, StateId, StateSet, Symbol};
pub use config::EditorConfig;
pub use error::{EditError, Error, GrammarError, Result, ValidationError};
pub use execution::{Configuration, ExecutionController, StepOutcome, Verdict};
pub use grammar::{CompiledGrammar, Grammar, GrammarSession};
pub use session::EditorSession;

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
fn import_submodule<'py>(
    py: Python<'py>,
    m: &Bound<'py, PyModule>,
    package: &str,
    name: &str,
    import_func: impl FnOnce(&Bound<'py, PyModule>) -> PyResult<()>,
) -> PyResult<()> {
    let submodule = PyModule::new(py, name)?;
    import_func(&submodule)?;

    // Add the submodule to sys.modules
    let sys_modules = PyModule::import(py, "sys")?.getattr("modules")?;
    sys_modules.set_item(format!("{}.{}", package, name), submodule.clone())?;

    m.add_submodule(&submodule)?;
    Ok(())
}

#[cfg(feature = "python")]
#[pymodule]
fn formlab(m: &Bound<'_, PyModule>) -> PyResult<()> {
    import_submodule(
        m.py(),
        m,
        "formlab",
        "automaton",
        python_bindings::automaton,
    )?;
    import_submodule(m.py(), m, "formlab", "grammar", python_bindings::grammar)?;
    Ok(())
}
