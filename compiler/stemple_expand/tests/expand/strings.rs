//! String expansion: macros, arguments, escapes, assignment and line shaping.

use pretty_assertions::assert_eq;
use stemple_expand::{Expander, SpecialChars};

use crate::common::{expand, expand_with, with_macros};

// -- Plain text and escapes --

#[test]
fn text_without_directives_passes_unaltered() {
    assert_eq!(expand("Abc $def"), "Abc $def");
    assert_eq!(expand("trailing $"), "trailing $");
    assert_eq!(expand(""), "");
}

#[test]
fn doubled_intro_is_a_literal_intro() {
    assert_eq!(expand("$$(A)"), "$(A)");
    assert_eq!(expand("cost: $$5"), "cost: $5");
}

#[test]
fn blank_lines_pass_through() {
    assert_eq!(expand("\n \n\t \n  Hello\n"), "\n \n\t \n  Hello\n");
}

// -- Macros --

#[test]
fn simplest_macro() {
    assert_eq!(expand_with(&[("A", "aaa")], "$(A)"), "aaa");
}

#[test]
fn macro_bodies_expand_recursively() {
    assert_eq!(expand_with(&[("A", "$(B)"), ("B", "bbb")], "$(A)"), "bbb");
}

#[test]
fn macros_and_escapes() {
    let out = expand_with(
        &[("A", "aaa"), ("B", "$(C)"), ("C", "ccc")],
        "This is $$(A): (\"$(A)\")\n\tand $$(B): ('$(B)')\n",
    );
    assert_eq!(out, "This is $(A): (\"aaa\")\n\tand $(B): ('ccc')\n");
}

#[test]
fn eager_set_macro_captures_current_value() {
    let mut expander = with_macros(&[("A", "aaa")]);
    expander.set_macro("B", "$(A)", true).unwrap();
    expander.set_macro("A", "ccc", false).unwrap();
    let out = expander
        .expand("This is $$(A): (\"$(A)\")\n\tand $$(B): ('$(B)')\n")
        .unwrap();
    assert_eq!(out, "This is $(A): (\"ccc\")\n\tand $(B): ('aaa')\n");
    assert_eq!(expander.macro_body("B"), Some("aaa"));
}

#[test]
fn undefined_macro_expands_to_nothing() {
    assert_eq!(expand("[$(nope)]"), "[]");
}

#[test]
fn computed_name() {
    assert_eq!(expand_with(&[("N", "B"), ("AB", "yes")], "$(A$(N))"), "yes");
}

// -- Arguments --

#[test]
fn positional_arguments() {
    let out = expand_with(&[("list", "[$(1), $(2), $(3)]")], "List: $(list one,two,three).");
    assert_eq!(out, "List: [one, two, three].");
}

#[test]
fn arguments_are_trimmed_by_default() {
    let list = [("list", "<$(1)|$(2)>")];
    assert_eq!(expand_with(&list, "$(list   a ,\tb  )"), "<a|b>");
}

#[test]
fn n_modifier_keeps_whitespace() {
    let list = [("list", "<$(1)|$(2)>")];
    assert_eq!(expand_with(&list, "$(list:n  a , b)"), "< a | b>");
}

#[test]
fn escaped_space_protects_leading_whitespace() {
    let list = [("list", "<$(1)|$(2)>")];
    assert_eq!(expand_with(&list, "$(list $ a,b)"), "< a|b>");
}

#[test]
fn missing_arguments_expand_to_nothing() {
    assert_eq!(expand_with(&[("two", "$(1)-$(2)")], "$(two x)"), "x-");
    assert_eq!(expand("$(1)"), "");
}

#[test]
fn parentheses_nest_inside_arguments() {
    let out = expand_with(&[("first", "$(1)")], "$(first f(a,b),c)");
    assert_eq!(out, "f(a,b)");
}

#[test]
fn escaped_separator_stays_in_argument() {
    let out = expand_with(&[("first", "[$(1)]")], "$(first a$,b)");
    assert_eq!(out, "[a,b]");
}

#[test]
fn arguments_resolve_against_nearest_invocation() {
    let out = expand_with(
        &[("outer", "$(inner $(2))"), ("inner", "<$(1)>")],
        "$(outer a,b)",
    );
    assert_eq!(out, "<b>");
}

#[test]
fn call_at_end_of_body_sees_invoking_arguments() {
    assert_eq!(expand("$(A=$(B))$(B=[$(1)])$(A x)"), "[x]");
    assert_eq!(expand("$(A=$(B).)$(B=[$(1)])$(A x)"), "[x].");
}

#[test]
fn eager_assignment_at_end_of_body_sees_arguments() {
    assert_eq!(expand("$(M=$(V:=$(1)))$(M hello)[$(V)]"), "[hello]");
    assert_eq!(expand("$(M=$(V:=$(1)) )$(M hello)[$(V)]"), " [hello]");
}

#[test]
fn deferred_if_branch_at_end_of_body_sees_arguments() {
    assert_eq!(expand("$(M=$(if:x 1,$(1)))[$(M hi)]"), "[hi]");
}

#[test]
fn defined_index_at_end_of_body() {
    assert_eq!(expand("$(M=$(N))$(N=$(defined 1))$(M a)"), "1");
    assert_eq!(expand("$(M=$(N))$(N=$(defined 1))$(M)"), "0");
}

#[test]
fn inner_arguments_shadow_outer() {
    assert_eq!(expand("$(A=$(B y))$(B=[$(1)])$(A x)"), "[y]");
}

#[test]
fn arguments_end_with_their_invocation() {
    assert_eq!(expand("$(B=[$(1)])$(B x)$(B)"), "[x][]");
}

#[test]
fn x_modifier_defers_argument_expansion() {
    let twice = [("twice", "$(1)$(B=2)$(1)")];
    assert_eq!(expand_with(&twice, "$(B=1)$(twice:x $(B))"), "12");
    assert_eq!(expand_with(&twice, "$(B=1)$(twice $(B))"), "11");
}

#[test]
fn q_modifier_quotes_body() {
    let macros = [("A", "$(B)"), ("B", "bbb")];
    assert_eq!(expand_with(&macros, "$(A:q)"), "$(B)");
    assert_eq!(expand_with(&macros, "$(A)"), "bbb");
}

#[test]
fn q_modifier_quotes_argument() {
    let macros = [("show", "$(1:q)"), ("B", "bbb")];
    assert_eq!(expand_with(&macros, "$(show:x $(B))"), "$(B)");
}

#[test]
fn modifier_words_combine() {
    let macros = [("A", "$(B)"), ("B", "bbb")];
    assert_eq!(expand_with(&macros, "$(A:qn)"), "$(B)");
    assert_eq!(expand_with(&macros, "$(A:n:q)"), "$(B)");
}

// -- Assignment --

#[test]
fn assignment() {
    assert_eq!(expand("$(A=aaa)$(A)"), "aaa");
}

#[test]
fn assignment_keeps_nested_directives_verbatim() {
    let mut expander = Expander::new();
    expander.expand("$(A=$(B))").unwrap();
    assert_eq!(expander.macro_body("A"), Some("$(B)"));
    assert!(expander.is_defined("A"));
    assert!(!expander.is_defined("B"));
}

#[test]
fn eager_and_deferred_capture() {
    let out = expand("$(A:=$(B))$(B=b)$(A2:=$(B))$(B=x)$(A)$(A2)");
    assert_eq!(out, "b");
}

#[test]
fn deferred_sees_later_redefinition() {
    assert_eq!(expand("$(B=1)$(D=$(B))$(E:=$(B))$(B=2)$(D)$(E)"), "21");
}

#[test]
fn deferred_append() {
    assert_eq!(expand("$(A=x)$(A+=$(B))$(B=y)$(A)"), "xy");
}

#[test]
fn eager_append() {
    assert_eq!(expand("$(B=1)$(A:=a)$(A:+=$(B))$(B=2)$(A)"), "a1");
}

#[test]
fn append_to_undefined_defines() {
    assert_eq!(expand("$(A+=z)$(A)"), "z");
}

#[test]
fn macros_persist_across_calls() {
    let mut expander = Expander::new();
    expander.expand("$(A=kept)").unwrap();
    assert_eq!(expander.expand("$(A)").unwrap(), "kept");
    assert_eq!(expander.macro_names(), vec!["A"]);
}

// -- Malformed directives --

#[test]
fn malformed_directives_expand_to_nothing() {
    assert_eq!(expand("x$(A+b)y"), "xy");
    assert_eq!(expand("x$(A:z)y"), "xy");
    assert_eq!(expand("x$(A:nz)y"), "xy");
    assert_eq!(expand("x$(A:n(b))y"), "xy");
    assert_eq!(expand("x$()y"), "xy");
}

#[test]
fn unterminated_directive_expands_to_nothing() {
    assert_eq!(expand("abc $(A"), "abc ");
    assert_eq!(expand("abc $(A=1"), "abc ");
}

// -- Line shaping --

#[test]
fn skip_non_printing_directive_lines() {
    let out = expand("$(A=aaa)\n\t  $(B=bbb) \n$(C=ccc) \n $(A)\n");
    assert_eq!(out, " aaa\n");
}

#[test]
fn escaped_newline_prevents_line_skipping() {
    let out = expand("$(A=aaa)$\n\t  $(B=bbb)$ \n$(C=ccc) $\n $(A)\n");
    assert_eq!(out, "\n\t  $ \n \n aaa\n");
}

#[test]
fn empty_macro_line_is_swallowed() {
    let out = expand_with(&[("E", "")], "a\n  $(E)\nb\n");
    assert_eq!(out, "a\nb\n");
}

#[test]
fn printing_directive_line_is_kept() {
    let out = expand_with(&[("E", ""), ("A", "x")], "$(E)=$(A)\n");
    assert_eq!(out, "=x\n");
}

#[test]
fn multi_line_body_shapes_its_own_lines() {
    let out = expand_with(&[("M", "one\n$(B=1)\ntwo")], "$(M)\n");
    assert_eq!(out, "one\ntwo\n");
}

// -- Special characters --

#[test]
fn reconfigured_special_chars() {
    let mut expander = Expander::new();
    expander.set_special_chars(SpecialChars::new('\\', '%', '{', ';', '}').unwrap());
    expander
        .set_macro("list", "[%{1}, %{2}, $(3)]", false)
        .unwrap();
    let out = expander
        .expand("%{A=aaa}\n\\%{A}: %{A}\nList: %{list one;two;three}.\nOld-style: $(list one,two,three).")
        .unwrap();
    assert_eq!(
        out,
        "%{A}: aaa\nList: [one, two, $(3)].\nOld-style: $(list one,two,three)."
    );
}

#[test]
fn special_chars_read_back() {
    let mut expander = Expander::new();
    expander.set_special_chars(SpecialChars::parse("\\%{;}").unwrap());
    let chars = expander.special_chars();
    assert_eq!(
        [chars.escape(), chars.intro(), chars.open(), chars.arg_sep(), chars.close()],
        ['\\', '%', '{', ';', '}']
    );
    assert_eq!(SpecialChars::default().intro(), '$');
}

#[test]
fn shared_escape_and_intro() {
    let mut expander = Expander::new();
    expander.set_special_chars(SpecialChars::parse("%%{;}").unwrap());
    expander
        .set_macro("list", "[%{1}, %{2}, $(3)]", false)
        .unwrap();
    let out = expander
        .expand("%{A=aaa}\n%%{A}: %{A}\nList: %{list one;two;three}.\nOld-style: $(list one,two,three).")
        .unwrap();
    assert_eq!(
        out,
        "%{A}: aaa\nList: [one, two, $(3)].\nOld-style: $(list one,two,three)."
    );
}
