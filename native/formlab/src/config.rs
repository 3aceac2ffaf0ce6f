//! Editor configuration.

use crate::automaton::Mode;
use serde::{Deserialize, Serialize};

/// Settings of an editing session.
///
/// `mode` selects how strictly transition edits are validated and which
/// acceptance semantics runs use.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EditorConfig {
    pub mode: Mode,
}

impl EditorConfig {
    pub fn new(mode: Mode) -> Self {
        Self { mode }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config: EditorConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, EditorConfig::new(Mode::Nfa));
    }

    #[test]
    fn test_dfa_mode() {
        let config: EditorConfig = serde_json::from_str(r#"{"mode": "dfa"}"#).unwrap();
        assert_eq!(config.mode, Mode::Dfa);
        assert_eq!(
            serde_json::to_string(&config).unwrap(),
            r#"{"mode":"dfa"}"#
        );
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(serde_json::from_str::<EditorConfig>(r#"{"mode": "nfa", "x": 1}"#).is_err());
        assert!(serde_json::from_str::<EditorConfig>(r#"{"mode": "pda"}"#).is_err());
    }
}
