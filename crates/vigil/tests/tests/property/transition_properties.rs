//! Property tests: the transition registry is total, case-exact, and never
//! lets a label escape its own lifecycle.

use proptest::prelude::*;
use vigil_lifecycle::StateMachineRegistry;
use vigil_types::WorkflowType;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_workflow() -> impl Strategy<Value = WorkflowType> {
    prop_oneof![
        Just(WorkflowType::Visit),
        Just(WorkflowType::Sos),
        Just(WorkflowType::Verification),
    ]
}

/// Arbitrary label-shaped strings, most of them garbage
fn arb_label() -> impl Strategy<Value = String> {
    "[A-Za-z_ ]{0,16}"
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// Unknown labels never validate in either position and never
    /// produce transitions; the registry reports rather than fails.
    #[test]
    fn unknown_labels_never_validate(workflow in arb_workflow(), label in arb_label()) {
        let registry = StateMachineRegistry::new();
        prop_assume!(!registry.is_known_state(workflow, &label));

        prop_assert!(registry.allowed_transitions(workflow, &label).is_empty());
        for state in registry.states(workflow) {
            prop_assert!(!registry.is_valid_transition(workflow, &label, state));
            prop_assert!(!registry.is_valid_transition(workflow, state, &label));
        }
    }

    /// Every transition target is itself a known state of the same type.
    #[test]
    fn transitions_never_leave_the_vocabulary(workflow in arb_workflow()) {
        let registry = StateMachineRegistry::new();
        for state in registry.states(workflow) {
            for target in registry.allowed_transitions(workflow, state) {
                prop_assert!(registry.is_known_state(workflow, target));
            }
        }
    }

    /// No lifecycle configures a self-loop.
    #[test]
    fn no_state_allows_a_self_loop(workflow in arb_workflow()) {
        let registry = StateMachineRegistry::new();
        for state in registry.states(workflow) {
            prop_assert!(!registry.allowed_transitions(workflow, state).contains(&state));
        }
    }

    /// Terminal exactly means no way out; everything else can progress.
    #[test]
    fn terminal_exactly_means_no_way_out(workflow in arb_workflow()) {
        let registry = StateMachineRegistry::new();
        for state in registry.states(workflow) {
            let out = registry.allowed_transitions(workflow, state);
            prop_assert_eq!(registry.is_terminal(workflow, state), out.is_empty());
        }
    }

    /// Lookup is case-exact: a case-mangled known label behaves like an
    /// unknown one.
    #[test]
    fn labels_are_case_exact(workflow in arb_workflow()) {
        let registry = StateMachineRegistry::new();
        for state in registry.states(workflow) {
            let lowered = state.to_lowercase();
            if lowered.as_str() == state {
                continue;
            }
            prop_assert!(registry.allowed_transitions(workflow, &lowered).is_empty());
            for target in registry.allowed_transitions(workflow, state) {
                prop_assert!(!registry.is_valid_transition(workflow, &lowered, target));
                prop_assert!(!registry.is_valid_transition(workflow, state, &target.to_lowercase()));
            }
        }
    }

    /// One lifecycle's labels mean nothing to another lifecycle.
    #[test]
    fn vocabularies_do_not_cross_types(a in arb_workflow(), b in arb_workflow()) {
        prop_assume!(a != b);
        let registry = StateMachineRegistry::new();
        for state in registry.states(b) {
            if !registry.is_known_state(a, state) {
                prop_assert!(registry.allowed_transitions(a, state).is_empty());
                for target in registry.allowed_transitions(b, state) {
                    prop_assert!(!registry.is_valid_transition(a, state, target));
                }
            }
        }
    }
}
