//! Builtin directives.

use pretty_assertions::assert_eq;

use crate::common::{expand, expand_with};

// -- Logic --

#[test]
fn and_truth_table() {
    assert_eq!(expand("$(and 0,0)$(and 0,1)$(and 1,0)$(and 1,1)"), "0001");
}

#[test]
fn or_truth_table() {
    assert_eq!(expand("$(or 0,0)$(or 0,1)$(or 1,0)$(or 1,1)"), "0111");
}

#[test]
fn not_truth_table() {
    assert_eq!(expand("$(not 0)$(not 1)"), "10");
}

#[test]
fn falsy_spellings() {
    let out = expand("$(not false)$(not FALSE)$(not no)$(not No)$(not 0)$(not yes)$(not x)");
    assert_eq!(out, "1111100");
}

#[test]
fn empty_argument_is_false() {
    assert_eq!(expand_with(&[("E", "")], "$(or $(E),0)"), "0");
}

#[test]
fn and_or_fold_over_all_arguments() {
    assert_eq!(expand("$(and 1,1,0)$(or 0,0,1)"), "01");
}

// -- Comparison --

#[test]
fn equal_and_notequal() {
    assert_eq!(expand("$(equal a,a)$(equal a,b)$(notequal a,b)$(notequal a,a)"), "1010");
}

#[test]
fn comparison_trims_arguments() {
    assert_eq!(expand("$(equal  a ,a  )"), "1");
    assert_eq!(expand("$(equal:n  a ,a)"), "0");
}

#[test]
fn i_modifier_ignores_case() {
    assert_eq!(expand("$(equal ABC,abc)$(equal:i ABC,abc)$(notequal:i ABC,abc)"), "010");
}

#[test]
fn equal_on_macro_values() {
    assert_eq!(expand_with(&[("A", "x"), ("B", "x")], "$(equal $(A),$(B))"), "1");
}

// -- match --

#[test]
fn match_searches() {
    assert_eq!(expand("$(match hello123,[0-9]+)$(match hello,[0-9])"), "10");
}

#[test]
fn match_ignores_case_with_i() {
    assert_eq!(expand("$(match HELLO,^hel)$(match:i HELLO,^hel)"), "01");
}

#[test]
fn match_pattern_groups_nest() {
    assert_eq!(expand("$(match abc,(b|x))"), "1");
}

#[test]
fn malformed_pattern_is_false() {
    assert_eq!(expand("$(match abc,[)"), "0");
}

// -- defined --

#[test]
fn defined_macro() {
    assert_eq!(expand("$(A=1)$(defined A)$(defined Z)"), "10");
}

#[test]
fn defined_argument_index() {
    let out = expand_with(&[("chk", "$(defined 2)")], "$(chk a,b)$(chk a)");
    assert_eq!(out, "10");
}

#[test]
fn empty_macro_is_defined() {
    assert_eq!(expand("$(E=)$(defined E)"), "1");
}

// -- env --

#[test]
fn env_reads_process_environment() {
    let expected = std::env::var("CARGO_PKG_NAME").unwrap_or_default();
    assert_eq!(expand("$(env CARGO_PKG_NAME)"), expected);
}

#[test]
fn env_unset_is_empty() {
    assert_eq!(expand("[$(env STEMPLE_TEST_SURELY_UNSET_VARIABLE)]"), "[]");
}

// -- Arity --

#[test]
fn too_few_arguments_yield_zero() {
    assert_eq!(expand("$(equal a)$(and)$(not)$(match x)$(defined)"), "00000");
}

#[test]
fn builtin_names_are_case_sensitive() {
    assert_eq!(expand_with(&[("AND", "upper")], "$(AND 1,1)"), "upper");
}
