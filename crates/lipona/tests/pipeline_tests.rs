//! End-to-end pipeline tests.
//!
//! Programs go through the full pipeline: source → lex → parse → evaluate,
//! with a `Vec<String>` capturing everything `toki` prints.

use lipona::{
    execute, execute_file_source, execute_with_config, run_to_lines, EvalConfig, ErrorCode,
    LiponaError, Pakala,
};

// ══════════════════════════════════════════════════════════════════════════════
// Helpers
// ══════════════════════════════════════════════════════════════════════════════

fn run_ok(source: &str) -> Vec<String> {
    let (lines, result) = run_to_lines(source);
    if let Err(err) = result {
        panic!("program failed:\n{err}\noutput so far: {lines:?}");
    }
    lines
}

fn structural_codes(source: &str) -> Vec<ErrorCode> {
    let (lines, result) = run_to_lines(source);
    assert!(lines.is_empty(), "a program with structural faults must not run");
    result.expect_err("expected structural faults").codes()
}

// ══════════════════════════════════════════════════════════════════════════════
// Sample programs
// ══════════════════════════════════════════════════════════════════════════════

const FIZZBUZZ: &str = r#"
// counts up, replacing multiples
ilo is_multiple (n, d) open
  i jo 0
  wile i lili n la open
    i jo i + d
  pini
  pana i sama n
pini

n jo 1
wile n lili_sama 15 la open
  is_multiple(n, 15) la open
    toki("FizzBuzz")
  pini taso open
    is_multiple(n, 3) la open
      toki("Fizz")
    pini taso open
      is_multiple(n, 5) la open
        toki("Buzz")
      pini taso open
        toki(n)
      pini
    pini
  pini
  n jo n + 1
pini
"#;

const WORD_COUNT: &str = r#"
words jo kulupu_sin("telo", "moku", "telo", "tomo", "telo", "moku")
counts jo nasin_sin()
i jo 0
wile i lili kulupu_len(words) la open
  w jo kulupu_ken(words, i)
  seen jo nasin_ken(counts, w)
  seen sama ala la open
    seen jo 0
  pini
  counts jo nasin_lon(counts, w, seen + 1)
  i jo i + 1
pini
toki(counts)
"#;

const REVERSE: &str = r#"
ilo reverse (xs) open
  out jo kulupu_sin()
  i jo kulupu_len(xs) - 1
  wile i suli_sama 0 la open
    out jo kulupu_aksen(out, kulupu_ken(xs, i))
    i jo i - 1
  pini
  pana out
pini

original jo kulupu_sin(1, 2, 3)
toki(reverse(original))
toki(original)
"#;

#[test]
fn test_fizzbuzz() {
    let lines = run_ok(FIZZBUZZ);
    assert_eq!(lines.len(), 15);
    assert_eq!(lines[0], "1");
    assert_eq!(lines[2], "Fizz");
    assert_eq!(lines[4], "Buzz");
    assert_eq!(lines[14], "FizzBuzz");
}

#[test]
fn test_word_count() {
    assert_eq!(run_ok(WORD_COUNT), vec!["{moku: 2, telo: 3, tomo: 1}"]);
}

#[test]
fn test_reverse_leaves_input_untouched() {
    assert_eq!(run_ok(REVERSE), vec!["[3, 2, 1]", "[1, 2, 3]"]);
}

// ══════════════════════════════════════════════════════════════════════════════
// Language properties
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_arithmetic_precedence() {
    assert_eq!(run_ok("toki(2 + 3 * 4)\ntoki(10 - 3 - 2)"), vec!["14", "5"]);
}

#[test]
fn test_sum_program() {
    let lines = run_ok("ilo sum (a, b) open\n pana a + b\npini\nx jo sum(10, 20)\ntoki(x)");
    assert_eq!(lines, vec!["30"]);
}

#[test]
fn test_greeting_interpolation() {
    let lines = run_ok("name jo \"jan\"\ntoki(\"toki, {name}!\")\ntoki(\"\\{name\\}\")");
    assert_eq!(lines, vec!["toki, jan!", "{name}"]);
}

#[test]
fn test_persistence() {
    let lines = run_ok(
        r#"
a jo kulupu_sin(1, 2, 3)
b jo kulupu_lon(a, 0, 99)
toki(kulupu_ken(a, 0) sama 1)
toki(kulupu_ken(b, 0) sama 99)
"#,
    );
    assert_eq!(lines, vec!["lon", "lon"]);
}

#[test]
fn test_live_closure_capture() {
    let lines = run_ok(
        r#"
greeting jo "toki"
ilo greet (who) open
  pana "{greeting}, {who}"
pini
toki(greet("jan"))
greeting jo "pona"
toki(greet("jan"))
"#,
    );
    assert_eq!(lines, vec!["toki, jan", "pona, jan"]);
}

#[test]
fn test_multiple_print_arguments() {
    assert_eq!(
        run_ok(r#"toki("x", 1, lon, kulupu_sin(1))"#),
        vec!["x 1 lon [1]"]
    );
}

#[test]
fn test_empty_program() {
    assert!(run_ok("").is_empty());
    assert!(run_ok("// only a comment\n").is_empty());
}

// ══════════════════════════════════════════════════════════════════════════════
// Faults
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_runtime_fault_stops_output() {
    let (lines, result) = run_to_lines("toki(\"wan\")\ntoki(nope)\ntoki(\"tu\")");
    assert_eq!(lines, vec!["wan"]);
    assert_eq!(
        result,
        Err(LiponaError::Runtime(Pakala::UnboundVariable("nope".into())))
    );
}

#[test]
fn test_list_write_fault() {
    let (_, result) = run_to_lines("xs jo kulupu_lon(kulupu_sin(1, 2), 5, 9)");
    assert!(matches!(
        result,
        Err(LiponaError::Runtime(Pakala::IndexOutOfRange { .. }))
    ));
}

#[test]
fn test_structural_fault_codes() {
    assert_eq!(structural_codes("x jo @"), vec![ErrorCode::UNEXPECTED_CHARACTER]);
    assert_eq!(
        structural_codes("x jo \"open"),
        vec![ErrorCode::UNTERMINATED_STRING]
    );
    assert_eq!(
        structural_codes("lon la open\n  toki(1)\n"),
        vec![ErrorCode::UNCLOSED_BLOCK]
    );
    assert_eq!(
        structural_codes("x jo 1 lili 2 lili 3"),
        vec![ErrorCode::CHAINED_COMPARISON]
    );
    assert_eq!(
        structural_codes("toki(\"{1 +}\")"),
        vec![ErrorCode::INVALID_INTERPOLATION]
    );
}

#[test]
fn test_structural_faults_collected_across_program() {
    let codes = structural_codes("a jo (1\nb jo 2\npini jo 3\nc jo )");
    assert!(codes.len() >= 2, "got {codes:?}");
}

#[test]
fn test_runtime_faults_are_not_structural() {
    let mut out: Vec<String> = Vec::new();
    let err = execute("x jo 1 / 0", &mut out).unwrap_err();
    assert!(err.is_runtime());
    assert!(err.diagnostics().is_none());
    assert_eq!(err.to_string(), "pakala: division by zero");
}

#[test]
fn test_configured_limits() {
    let mut out: Vec<String> = Vec::new();
    let config = EvalConfig::default().with_max_loop_iterations(10);
    let err = execute_with_config("loop.lipo", "wile lon la open\npini", &mut out, config)
        .unwrap_err();
    assert_eq!(err, LiponaError::Runtime(Pakala::LoopLimit(10)));

    let config = EvalConfig::default().with_max_call_depth(3);
    let err = execute_with_config(
        "deep.lipo",
        "ilo f () open\n  pana f()\npini\nf()",
        &mut out,
        config,
    )
    .unwrap_err();
    assert_eq!(err, LiponaError::Runtime(Pakala::StackOverflow(3)));
}

// ══════════════════════════════════════════════════════════════════════════════
// Diagnostics as JSON
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_diagnostics_serialize_to_json() {
    let mut out: Vec<String> = Vec::new();
    let err = execute_file_source("main.lipo", "x jo\ny jo 2 $", &mut out).unwrap_err();
    let diagnostics = err.diagnostics().expect("structural fault");
    let json = serde_json::to_value(diagnostics).unwrap();

    let first = &json["errors"][0];
    assert_eq!(first["file"], "main.lipo");
    assert_eq!(first["code"], 100);
    assert_eq!(first["category"], "lex");
    assert_eq!(first["line"], 2);
    assert_eq!(first["column"], 8);
    assert_eq!(json["total_errors"], 1);
}

#[test]
fn test_diagnostics_json_round_trip() {
    let mut out: Vec<String> = Vec::new();
    let err = execute_file_source("main.lipo", "ilo f (a, a) open\npini", &mut out).unwrap_err();
    let diagnostics = err.diagnostics().expect("structural fault");
    let text = serde_json::to_string(diagnostics).unwrap();
    let back: lipona::Diagnostics = serde_json::from_str(&text).unwrap();
    assert_eq!(&back, diagnostics);
    assert_eq!(back.errors[0].code, ErrorCode::DUPLICATE_PARAMETER);
}

// ══════════════════════════════════════════════════════════════════════════════
// Determinism
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn test_output_is_deterministic() {
    let first = run_ok(WORD_COUNT);
    for _ in 0..100 {
        assert_eq!(run_ok(WORD_COUNT), first);
    }
}

#[test]
fn test_diagnostics_are_deterministic() {
    let source = "a jo (1\nb jo 1 lili 2 lili 3\nilo f (x, x) open\n";
    let first = run_to_lines(source).1;
    for _ in 0..100 {
        assert_eq!(run_to_lines(source).1, first);
    }
}
