//! Determinism checks applied to edits while the editor is in DFA mode.

use crate::automaton::state::StateId;
use crate::automaton::symbol::Symbol;
use crate::error::EditError;
use std::collections::{BTreeSet, HashMap};

/// Check that giving the `source -> target` edge the label `proposed` keeps
/// `source` deterministic.
///
/// `records` are the current transition records. The record for the edited
/// edge itself is skipped, so relabelling an edge with the symbols it already
/// carries never conflicts with itself.
pub fn check_edit<'a, I>(
    records: I,
    source: StateId,
    target: StateId,
    proposed: &BTreeSet<Symbol>,
) -> Result<(), EditError>
where
    I: IntoIterator<Item = (StateId, StateId, &'a BTreeSet<Symbol>)>,
{
    if proposed.iter().any(|symbol| symbol.is_epsilon()) {
        return Err(EditError::EpsilonNotAllowedInDfa);
    }

    let mut claimed: HashMap<Symbol, StateId> = HashMap::new();
    let mut claim = |to: StateId, symbols: &BTreeSet<Symbol>| {
        for &symbol in symbols {
            if symbol.is_epsilon() {
                return Err(EditError::EpsilonNotAllowedInDfa);
            }
            match claimed.insert(symbol, to) {
                Some(previous) if previous != to => {
                    return Err(EditError::DeterminismConflict {
                        state: source,
                        symbol,
                    });
                }
                _ => {}
            }
        }
        Ok(())
    };

    for (from, to, symbols) in records {
        if from == source && to != target {
            claim(to, symbols)?;
        }
    }
    claim(target, proposed)?;

    Ok(())
}
