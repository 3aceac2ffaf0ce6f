use formlab::automaton::{epsilon_closure, parse_label, step};
use formlab::grammar::{GrammarSession, compile, parse};
use formlab::{
    Automaton, AutomatonModel, EditError, ExecutionController, Mode, StateId, StateSet, Symbol,
    Verdict,
};

/// Build a model from `(source, target, label)` edges over states `0..n`.
fn model(n: u32, edges: &[(u32, u32, &str)], initial: u32, finals: &[u32], mode: Mode) -> AutomatonModel {
    let mut model = AutomatonModel::new(mode);
    let states: Vec<StateId> = (0..n).map(|_| model.add_state()).collect();
    for &(source, target, label) in edges {
        model
            .add_or_merge_transition(
                states[source as usize],
                states[target as usize],
                &parse_label(label).unwrap(),
            )
            .unwrap();
    }
    model.toggle_initial(states[initial as usize]);
    for &f in finals {
        model.toggle_final(states[f as usize]);
    }
    model
}

fn words(alphabet: &[char], max_len: usize) -> Vec<String> {
    let mut all = vec![String::new()];
    let mut frontier = vec![String::new()];
    for _ in 0..max_len {
        frontier = frontier
            .iter()
            .flat_map(|w| alphabet.iter().map(move |c| format!("{w}{c}")))
            .collect();
        all.extend(frontier.iter().cloned());
    }
    all
}

fn sample_nfas() -> Vec<Automaton> {
    vec![
        model(
            4,
            &[(0, 1, "ε"), (1, 1, "a"), (1, 2, "b"), (2, 3, "ε"), (3, 0, "a,ε")],
            0,
            &[3],
            Mode::Nfa,
        )
        .snapshot(Mode::Nfa)
        .unwrap(),
        model(3, &[(0, 0, "a,b"), (0, 1, "a"), (1, 2, "b")], 0, &[2], Mode::Nfa)
            .snapshot(Mode::Nfa)
            .unwrap(),
        model(2, &[(0, 1, "ε"), (1, 0, "ε")], 1, &[0], Mode::Nfa)
            .snapshot(Mode::Nfa)
            .unwrap(),
    ]
}

#[test]
fn test_closure_is_reflexive_and_idempotent() {
    for automaton in sample_nfas() {
        let index = automaton.index();
        for state in automaton.states().iter() {
            let once = epsilon_closure(index, &StateSet::singleton(state));
            assert!(once.contains(state));
            assert_eq!(epsilon_closure(index, &once), once);
        }
        let all = automaton.states().clone();
        assert_eq!(epsilon_closure(index, &all), all);
    }
}

#[test]
fn test_step_without_epsilon_is_closed() {
    let automaton = model(
        3,
        &[(0, 0, "a,b"), (0, 1, "a"), (1, 2, "b"), (2, 0, "a")],
        0,
        &[2],
        Mode::Nfa,
    )
    .snapshot(Mode::Nfa)
    .unwrap();
    let index = automaton.index();
    assert!(!index.has_epsilon_transitions());
    for seed in [vec![0], vec![1], vec![0, 2], vec![0, 1, 2]] {
        let seed: StateSet = seed.into_iter().map(StateId::new).collect();
        for symbol in ['a', 'b', 'c'] {
            let stepped = step(index, &seed, symbol);
            assert_eq!(epsilon_closure(index, &stepped), stepped);
        }
    }
}

#[test]
fn test_dfa_and_nfa_semantics_agree_on_dfas() {
    // binary numbers divisible by three
    let dfa = model(
        3,
        &[(0, 0, "0"), (0, 1, "1"), (1, 2, "0"), (1, 0, "1"), (2, 1, "0"), (2, 2, "1")],
        0,
        &[0],
        Mode::Dfa,
    );
    // partial DFA: a b* with no transition out of the sink on 'a'
    let partial = model(2, &[(0, 1, "a"), (1, 1, "b")], 0, &[1], Mode::Dfa);

    for (model, alphabet) in [(dfa, ['0', '1']), (partial, ['a', 'b'])] {
        let as_dfa = model.snapshot(Mode::Dfa).unwrap();
        let as_nfa = model.snapshot(Mode::Nfa).unwrap();
        for word in words(&alphabet, 6) {
            assert_eq!(as_dfa.accepts(&word), as_nfa.accepts(&word), "{word:?}");
        }
    }
}

#[test]
fn test_divisible_by_three() {
    let automaton = model(
        3,
        &[(0, 0, "0"), (0, 1, "1"), (1, 2, "0"), (1, 0, "1"), (2, 1, "0"), (2, 2, "1")],
        0,
        &[0],
        Mode::Dfa,
    )
    .snapshot(Mode::Dfa)
    .unwrap();
    for n in 0u32..64 {
        let word = format!("{n:b}");
        assert_eq!(automaton.accepts(&word), n % 3 == 0, "{word}");
    }
}

#[test]
fn test_grammar_a_star_b() {
    let compiled = compile(&parse("S -> aS | b").unwrap());
    assert!(compiled.accepts("aab"));
    assert!(!compiled.accepts("aa"));
    assert!(!compiled.accepts(""));
}

#[test]
fn test_grammar_epsilon() {
    let mut session = GrammarSession::new();
    session.update("S -> aS | epsilon").unwrap();
    assert_eq!(session.test(""), Some(true));
    assert_eq!(session.test("aaaa"), Some(true));
}

#[test]
fn test_dfa_conflict_keeps_model() {
    let mut model = AutomatonModel::new(Mode::Dfa);
    let q0 = model.add_state();
    let q1 = model.add_state();
    let q2 = model.add_state();
    model
        .add_or_merge_transition(q0, q1, &parse_label("a").unwrap())
        .unwrap();

    let err = model
        .add_or_merge_transition(q0, q2, &parse_label("a").unwrap())
        .unwrap_err();
    assert_eq!(
        err,
        EditError::DeterminismConflict {
            state: q0,
            symbol: Symbol::Char('a'),
        }
    );
    assert_eq!(err.to_string(), "DFA conflict at q0 on symbol 'a'");

    let records: Vec<_> = model
        .records()
        .map(|(source, target, symbols)| (source, target, symbols.clone()))
        .collect();
    assert_eq!(records, vec![(q0, q1, parse_label("a").unwrap())]);
    assert_eq!(
        model.index().targets(q0, Symbol::Char('a')),
        Some(&StateSet::singleton(q1))
    );
}

#[test]
fn test_stepwise_matches_batch() {
    for automaton in sample_nfas() {
        for word in words(&['a', 'b'], 4) {
            let mut controller = ExecutionController::new();
            controller.start_with(automaton.clone(), &word);
            let mut verdict = None;
            for _ in 0..=word.chars().count() + 1 {
                if let formlab::StepOutcome::Finished(v) = controller.step() {
                    verdict = Some(v);
                }
            }
            assert_eq!(verdict, Some(Verdict::from(automaton.accepts(&word))), "{word:?}");
        }
    }

    let mut controller = ExecutionController::new();
    let automaton = sample_nfas().remove(0);
    controller.start_with(automaton.clone(), "ab");
    assert_eq!(
        controller.run_to_completion(),
        Some(Verdict::from(formlab::automaton::accepts_nfa(&automaton, "ab")))
    );
}

#[test]
fn test_remove_state_purges_index() {
    let mut model = model(
        3,
        &[(0, 1, "a"), (1, 2, "b,ε"), (2, 1, "a"), (1, 1, "c"), (0, 2, "b")],
        0,
        &[2],
        Mode::Nfa,
    );
    let removed = StateId::new(1);
    model.remove_state(removed);

    assert!(model.records().all(|(source, target, _)| source != removed && target != removed));
    assert!(!model.index().mentions(removed));
    assert!(model.index().iter().all(|(_, _, target)| target != removed));
    assert_eq!(model.records().count(), 1);
}
