//! Line-oriented driver for the Slate worksheet annotator.
//!
//! [`annotate`] takes raw worksheet text and returns one rendered
//! annotation per physical line. A fragment that fails to parse recovers
//! line by line: the first diagnostic is attributed to the current leading
//! line, that line is dropped, and the remainder is retried, so a single
//! bad line costs its own annotation but never the rest of the sheet.

mod oracle;

use slate_lexer::Lexer;
use slate_parser::Parser;
use slate_sheet::Walker;
use slate_types::SourceFile;

pub use oracle::EvalOracle;

/// Annotates `source` with the default evaluation budget.
pub fn annotate(source: &str) -> Vec<String> {
    annotate_with_gas(source, slate_eval::DEFAULT_GAS_LIMIT)
}

/// Annotates `source`, giving each node evaluation `gas_limit` ticks.
///
/// Always returns exactly one string per input line. Lines consumed by
/// parse-failure recovery carry the diagnostic that evicted them; lines
/// with nothing to show come back empty.
pub fn annotate_with_gas(source: &str, gas_limit: u64) -> Vec<String> {
    let all_lines: Vec<&str> = source.lines().collect();
    let total = all_lines.len();
    let mut out: Vec<String> = Vec::new();

    let mut start = 0;
    while start < total {
        let rest = all_lines[start..].join("\n");
        match try_annotate(&rest, gas_limit) {
            Ok(annotated) => {
                out.extend(annotated);
                return sized(out, total);
            }
            Err(message) => {
                out.push(message);
                start += 1;
            }
        }
    }
    sized(out, total)
}

/// One full pipeline pass over a fragment. A parse diagnostic aborts the
/// pass and comes back as the recovery message for the leading line.
fn try_annotate(source: &str, gas_limit: u64) -> Result<Vec<String>, String> {
    let sf = SourceFile::new("worksheet.slate", source);
    let lex = Lexer::new(&sf).lex();
    let result = Parser::new(lex.tokens, &sf).parse();
    if let Some(diag) = result.diags.first() {
        return Err(format!("[{}] {}", diag.code, diag.message));
    }
    let Some(fragment) = result.fragment else {
        return Err("empty fragment".to_string());
    };

    let mut oracle = EvalOracle::new(gas_limit);
    let mut walker = Walker::new(&mut oracle);
    Ok(walker
        .annotate_fragment(&fragment, source.lines().count())
        .into_lines())
}

fn sized(mut lines: Vec<String>, total: usize) -> Vec<String> {
    lines.resize(total, String::new());
    lines
}
