//! Integration tests for the worksheet walker, backed by the real
//! interpreter through the oracle seam.
//!
//! Tests key annotation behavior:
//! - binding suppression and `name = value` rendering
//! - function auto-invocation with sampled arguments
//! - sample cycling across a whole fragment
//! - class instantiation headers and body wrapping
//! - anonymous refinements for traits and sampling failures
//! - failure containment across lines

use slate_eval::{Interpreter, Value};
use slate_lexer::Lexer;
use slate_parser::Parser;
use slate_sheet::{Evaluated, Oracle, OracleError, Walker};
use slate_types::ast::{Expr, Fragment, Stmt};
use slate_types::SourceFile;

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

/// Parses Slate source into a Fragment (panics on diagnostics).
fn parse(source: &str) -> Fragment {
    let sf = SourceFile::new("sheet.slate", source);
    let lex = Lexer::new(&sf).lex();
    let result = Parser::new(lex.tokens, &sf).parse();
    if !result.diags.is_empty() {
        panic!(
            "parse diagnostics:\n{}",
            result
                .diags
                .diags
                .iter()
                .map(|d| format!("  [{}] {}", d.code, d.message))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
    result.fragment.expect("no fragment after clean parse")
}

/// Evaluates through a fresh interpreter per call, the way the driver does.
struct EvalOracle;

impl Oracle for EvalOracle {
    fn evaluate(&mut self, context: &[Stmt], expr: &Expr) -> Result<Evaluated, OracleError> {
        let mut interp = Interpreter::new();
        match interp.eval_with_context(context, expr) {
            Ok(Value::Unit) => Ok(Evaluated::Unit),
            Ok(value) => Ok(Evaluated::Value(value.render())),
            Err(err) => Err(OracleError::new(err.to_string())),
        }
    }
}

fn annotate(source: &str) -> Vec<String> {
    let fragment = parse(source);
    let mut oracle = EvalOracle;
    let mut walker = Walker::new(&mut oracle);
    walker
        .annotate_fragment(&fragment, source.lines().count())
        .into_lines()
}

// ══════════════════════════════════════════════════════════════════════════════
// Bindings & bare expressions
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn trivial_binding_is_suppressed() {
    assert_eq!(annotate("val x = 5"), vec![""]);
}

#[test]
fn computed_binding_shows_its_value() {
    assert_eq!(annotate("val x = 2 + 3"), vec!["x = 5"]);
}

#[test]
fn declared_type_is_echoed_on_the_binding() {
    assert_eq!(annotate("val x: Int = 2 + 3"), vec!["x: Int = 5"]);
}

#[test]
fn unimplemented_binding_is_suppressed() {
    assert_eq!(annotate("val x = ???"), vec![""]);
}

#[test]
fn constructor_application_over_literals_is_suppressed() {
    let source = r#"case class Point(x: Int, y: Int)
val p = Point(1, 2)"#;
    assert_eq!(annotate(source), vec!["", ""]);
}

#[test]
fn binding_through_a_call_is_visible() {
    let source = r#"def double(x: Int): Int = x * 2
val n = double(5)"#;
    assert_eq!(annotate(source), vec!["double(x = 3) => 6", "n = 10"]);
}

#[test]
fn bare_expression_shows_its_value() {
    assert_eq!(annotate("1 + 2"), vec!["3"]);
}

#[test]
fn bare_literal_constructor_is_suppressed() {
    assert_eq!(annotate("List(1, 2)"), vec![""]);
}

#[test]
fn bare_name_shows_the_bound_value() {
    let source = "val x = 5\nx";
    assert_eq!(annotate(source), vec!["", "5"]);
}

#[test]
fn unit_expression_renders_as_nothing() {
    assert_eq!(annotate("if (false) 1"), vec![""]);
}

#[test]
fn statements_on_one_line_join_with_a_separator() {
    assert_eq!(
        annotate("val x = 1 + 1; val y = x + 1"),
        vec!["x = 2; y = 3"]
    );
}

#[test]
fn bare_block_annotates_inner_lines_only() {
    let source = r#"{
  val a = 2 + 3
  a * 2
}"#;
    assert_eq!(annotate(source), vec!["", "a = 5", "10", ""]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Function auto-invocation
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn function_is_invoked_with_sampled_arguments() {
    assert_eq!(
        annotate("def double(x: Int): Int = x * 2"),
        vec!["double(x = 3) => 6"]
    );
}

#[test]
fn curried_function_samples_every_group() {
    assert_eq!(
        annotate("def add(a: Int)(b: Int): Int = a + b"),
        vec!["add(a = 3)(b = 5) => 8"]
    );
}

#[test]
fn declared_defaults_pass_through_unsampled() {
    assert_eq!(
        annotate("def f(x: Int, y: Int = 10): Int = x + y"),
        vec!["f(x = 3, y = 10) => 13"]
    );
}

#[test]
fn string_arguments_are_quoted_in_the_signature() {
    assert_eq!(
        annotate("def shout(s: String): String = s + \"!\""),
        vec!["shout(s = \"foo\") => foo!"]
    );
}

#[test]
fn unimplemented_body_renders_unevaluated() {
    assert_eq!(
        annotate("def todo(x: Int): Int = ???"),
        vec!["todo(x = 3) => ???"]
    );
}

#[test]
fn parameterless_unimplemented_function_is_suppressed() {
    assert_eq!(annotate("def todo: Int = ???"), vec![""]);
}

#[test]
fn literal_bodied_function_is_suppressed() {
    assert_eq!(annotate("def answer: Int = 42"), vec![""]);
}

#[test]
fn unsampleable_parameter_suppresses_the_function() {
    assert_eq!(annotate("def apply(f: Int => Int): Int = f(1)"), vec![""]);
}

#[test]
fn failing_body_reports_the_trap() {
    assert_eq!(
        annotate("def boom(x: Int): Int = x / 0"),
        vec!["boom(x = 3) => throws arithmetic error: / by zero"]
    );
}

#[test]
fn block_body_annotates_its_inner_lines() {
    let source = r#"def calc(x: Int): Int = {
  val doubled = x * 2
  doubled + 1
}"#;
    assert_eq!(
        annotate(source),
        vec!["calc(x = 3) => 7", "doubled = 6", "7", ""]
    );
}

#[test]
fn recursive_function_sees_itself() {
    let source = "def fact(n: Int): Int = if (n <= 1) 1 else n * fact(n - 1)";
    assert_eq!(annotate(source), vec!["fact(n = 3) => 6"]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Sample cycling across a fragment
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn int_samples_advance_across_definitions() {
    let source = r#"def f(x: Int): Int = x + 1
def g(x: Int): Int = x + 1"#;
    assert_eq!(
        annotate(source),
        vec!["f(x = 3) => 4", "g(x = 5) => 6"]
    );
}

#[test]
fn list_lengths_cycle_with_an_empty_draw() {
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
fn option_presence_alternates_across_definitions() {
    let source = r#"def f(o: Option[Int]): Int = o.getOrElse(0)
def g(o: Option[Int]): Int = o.getOrElse(0)"#;
    assert_eq!(
        annotate(source),
        vec!["f(o = Some(3)) => 3", "g(o = None) => 0"]
    );
}

#[test]
fn any_draws_a_mixed_sample() {
    assert_eq!(
        annotate("def show(a: Any): String = \"got \" + a"),
        vec!["show(a = 3) => got 3"]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Classes & objects
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn class_body_is_wrapped_with_a_sampled_header() {
    let source = r#"class Dog(name: String, age: Int) {
  val info = name + " is " + age
}"#;
    assert_eq!(
        annotate(source),
        vec![
            "Dog(name = \"foo\", age = 3) {",
            "info = foo is 3",
            "}",
        ]
    );
}

#[test]
fn class_with_no_visible_body_is_suppressed() {
    let source = r#"class Silent(x: Int) {
  val y = 3
}"#;
    assert_eq!(annotate(source), vec!["", "", ""]);
}

#[test]
fn class_methods_are_invoked_with_fields_in_scope() {
    let source = r#"class Counter(start: Int) {
  def bump(by: Int): Int = start + by
}"#;
    assert_eq!(
        annotate(source),
        vec!["Counter(start = 3) {", "bump(by = 5) => 8", "}"]
    );
}

#[test]
fn single_line_class_joins_header_and_body() {
    assert_eq!(
        annotate("class Boxy(x: Int) { val y = x + 1 }"),
        vec!["Boxy(x = 3) {; y = 4"]
    );
}

#[test]
fn object_body_is_wrapped_without_arguments() {
    let source = r#"object Config {
  val retries = 3
  val label = "retry " + retries
}"#;
    assert_eq!(
        annotate(source),
        vec!["Config {", "", "label = retry 3", "}"]
    );
}

#[test]
fn object_with_only_trivial_members_is_suppressed() {
    let source = r#"object Empty {
  val a = 1
}"#;
    assert_eq!(annotate(source), vec!["", "", ""]);
}

#[test]
fn trait_declaration_produces_no_output() {
    let source = r#"trait Animal {
  val legs = 4
}"#;
    assert_eq!(annotate(source), vec!["", "", ""]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Abstract types & synthesis edge cases
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn case_class_parameter_samples_positionally() {
    // The invisible class declaration on line 1 already draws 3 and 5 for
    // its own constructor walk, so the synthesized Point starts at 7.
    let source = r#"case class Point(x: Int, y: Int)
def dist(p: Point): Int = p.x + p.y"#;
    assert_eq!(
        annotate(source),
        vec!["", "dist(p = Point(7, 11)) => 18"]
    );
}

#[test]
fn trait_parameter_gets_an_anonymous_refinement() {
    let source = r#"trait Greeter {
  def greet(name: String): String
}
def welcome(g: Greeter): String = g.greet("sam")"#;
    assert_eq!(
        annotate(source),
        vec![
            "",
            "",
            "",
            "welcome(g = new Greeter { def greet(name: String): String = \"foo\" }) => foo",
        ]
    );
}

#[test]
fn concrete_subclass_stands_in_for_its_parent() {
    // Dog's own declaration walk consumes "foo"; the stand-in gets "bar".
    let source = r#"trait Pet
class Dog(name: String) extends Pet
def describe(p: Pet): String = "a " + p.name"#;
    assert_eq!(
        annotate(source),
        vec!["", "", "describe(p = new Dog(\"bar\")) => a bar"]
    );
}

#[test]
fn bounded_parameter_samples_its_bound() {
    let source = r#"trait Animal {
  def legs: Int
}
def count(a: _ <: Animal): Int = a.legs + 1"#;
    assert_eq!(
        annotate(source),
        vec![
            "",
            "",
            "",
            "count(a = new Animal { def legs: Int = 3 }) => 4",
        ]
    );
}

#[test]
fn abstract_class_with_constructor_parameters_fails_sampling() {
    let source = r#"abstract class Shape(sides: Int)
def area(s: Shape): Int = 1 + 2"#;
    assert_eq!(annotate(source), vec!["", ""]);
}

#[test]
fn unknown_type_suppresses_the_definition() {
    assert_eq!(annotate("def f(m: Mystery): Int = 1 + 1"), vec![""]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Failure containment
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn failing_binding_reports_and_later_lines_continue() {
    let source = r#"val x = 1 / 0
val y = 2 + 3"#;
    assert_eq!(
        annotate(source),
        vec!["x = throws arithmetic error: / by zero", "y = 5"]
    );
}

#[test]
fn lines_depending_on_a_failed_binding_fail_on_their_own() {
    let source = r#"val x = 1 / 0
val y = x + 1"#;
    assert_eq!(
        annotate(source),
        vec![
            "x = throws arithmetic error: / by zero",
            "y = throws not found: value x",
        ]
    );
}

#[test]
fn bare_failing_expression_reports_the_trap() {
    assert_eq!(
        annotate("2147483647 + 1"),
        vec!["throws arithmetic error: integer overflow"]
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Determinism
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn annotation_is_deterministic_across_runs() {
    let source = r#"def f(x: Int, s: String): String = s + x
def g(xs: List[Int]): Int = xs.length
class Pair(a: Int, b: Int) {
  def sum: Int = a + b
}"#;
    let first = annotate(source);
    for _ in 0..3 {
        assert_eq!(annotate(source), first);
    }
}
