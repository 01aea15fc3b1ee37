//! Recursion depth and call budget.

use stemple_expand::{ExpandConfig, ExpandError, Expander};

fn guarded(max_depth: usize, call_budget: usize) -> Expander {
    Expander::with_config(
        ExpandConfig::default()
            .with_max_depth(Some(max_depth))
            .with_call_budget(Some(call_budget)),
    )
}

#[test]
fn self_referencing_macro_exhausts_budget() {
    let mut expander = guarded(512, 1000);
    let err = expander.expand("$(A=$(A))$(A)").unwrap_err();
    assert!(matches!(err, ExpandError::BudgetExceeded { budget: 1000, .. }));
    assert!(err.to_string().contains("1000"));
}

#[test]
fn mutual_recursion_exhausts_budget() {
    let mut expander = guarded(512, 1000);
    let err = expander.expand("$(A=$(B))$(B=$(A))$(A)").unwrap_err();
    assert!(matches!(err, ExpandError::BudgetExceeded { .. }));
}

#[test]
fn recursion_through_arguments_hits_depth_limit() {
    let mut expander = guarded(24, 1_000_000);
    let err = expander.expand("$(R=$(R $(R)))$(R)").unwrap_err();
    assert!(matches!(err, ExpandError::RecursionLimit { limit: 24, .. }));
}

#[test]
fn recursion_through_eager_assignment_hits_depth_limit() {
    let mut expander = guarded(24, 1_000_000);
    let err = expander.expand("$(E=$(X:=$(E)))$(E)").unwrap_err();
    assert!(matches!(err, ExpandError::RecursionLimit { .. }));
}

#[test]
fn deep_legitimate_nesting_succeeds() {
    let mut expander = Expander::new();
    let depth = 100;
    let input = format!("{}x{}", "$(if 1,".repeat(depth), ")".repeat(depth));
    assert_eq!(expander.expand(&input).unwrap(), "x");
}

#[test]
fn expander_recovers_after_guard_trips() {
    let mut expander = guarded(512, 50);
    assert!(expander.expand("$(A=$(A))$(A)").is_err());
    expander.set_macro("A", "fine", false).unwrap();
    assert_eq!(expander.expand("$(A)").unwrap(), "fine");
}
