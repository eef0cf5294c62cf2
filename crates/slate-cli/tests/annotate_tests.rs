//! End-to-end tests for the annotation driver.
//!
//! Tests the full pipeline from raw source to rendered lines:
//! - suppression and visibility of bindings
//! - auto-invocation and block-body annotation
//! - sample cycling over a whole sheet
//! - parse-failure recovery line by line
//! - the per-call evaluation budget

use slate_cli::{annotate, annotate_with_gas};

// ══════════════════════════════════════════════════════════════════════════════
// Core rendering
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn trivial_binding_renders_nothing() {
    assert_eq!(annotate("val x = 5"), vec![""]);
}

#[test]
fn computed_binding_renders_its_value() {
    assert_eq!(annotate("val x = 2 + 3"), vec!["x = 5"]);
}

#[test]
fn function_definition_is_auto_invoked() {
    assert_eq!(
        annotate("def double(x: Int): Int = x * 2"),
        vec!["double(x = 3) => 6"]
    );
}

#[test]
fn block_bodies_annotate_every_inner_line() {
    let source = r#"def verify(x: Int): Int = {
  val tripled = x * 3
  tripled + x
}"#;
    assert_eq!(
        annotate(source),
        vec!["verify(x = 3) => 12", "tripled = 9", "12", ""]
    );
}

#[test]
fn list_samples_cycle_with_an_empty_draw() {
    let source = r#"def a(xs: List[Int]): Int = xs.length
def b(xs: List[Int]): Int = xs.length
def c(xs: List[Int]): Int = xs.length"#;
    assert_eq!(
        annotate(source),
        vec![
            "a(xs = List(3, 5, 7)) => 3",
            "b(xs = List()) => 0",
            "c(xs = List(11)) => 1",
        ]
    );
}

#[test]
fn blank_lines_stay_blank() {
    let source = "val x = 2 + 3\n\nval y = x * 2";
    assert_eq!(annotate(source), vec!["x = 5", "", "y = 10"]);
}

#[test]
fn empty_input_produces_no_lines() {
    assert_eq!(annotate(""), Vec::<String>::new());
}

#[test]
fn output_always_matches_the_input_line_count() {
    let source = "val x = 1 + 1\nval y = x + x\n\n\nval z = y * y";
    assert_eq!(annotate(source).len(), 5);
}

// ══════════════════════════════════════════════════════════════════════════════
// Parse-failure recovery
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn bad_first_line_reports_and_the_rest_renders() {
    let lines = annotate("val = 3\nval y = 2 + 2");
    assert_eq!(lines.len(), 2);
    assert!(
        lines[0].starts_with('['),
        "expected a diagnostic, got {:?}",
        lines[0]
    );
    assert_eq!(lines[1], "y = 4");
}

#[test]
fn later_parse_failure_costs_earlier_lines() {
    // Recovery always evicts the leading line, so a bad line 2 takes the
    // valid line 1 with it and both slots carry diagnostics.
    let lines = annotate("val y = 2 + 2\nval = 3");
    assert_eq!(lines.len(), 2);
    assert!(lines[0].starts_with('['));
    assert!(lines[1].starts_with('['));
}

#[test]
fn fully_unparseable_input_reports_every_line() {
    let lines = annotate("val = 1\nval = 2\nval = 3");
    assert_eq!(lines.len(), 3);
    for line in &lines {
        assert!(line.starts_with('['), "expected a diagnostic, got {line:?}");
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Evaluation budget
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn runaway_recursion_trips_the_gas_limit() {
    let lines = annotate_with_gas("def spin(n: Int): Int = spin(n + 1)", 100);
    assert_eq!(
        lines,
        vec!["spin(n = 3) => throws evaluation budget exhausted"]
    );
}

#[test]
fn deep_recursion_trips_the_depth_limit_before_default_gas() {
    let lines = annotate("def spin(n: Int): Int = spin(n + 1)");
    assert_eq!(
        lines,
        vec!["spin(n = 3) => throws maximum call depth exceeded"]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Determinism
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn annotation_is_idempotent() {
    let source = r#"def f(x: Int, s: String): String = s + x
def g(o: Option[Int]): Int = o.getOrElse(0)
val total = 1 + 2 + 3"#;
    let first = annotate(source);
    assert_eq!(annotate(source), first);
    assert_eq!(annotate(source), first);
}
