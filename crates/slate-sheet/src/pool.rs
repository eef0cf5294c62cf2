//! Deterministic sample literals for synthesized invocation arguments.

use slate_types::ast::{Expr, ExprKind};
use slate_types::Span;

/// Primes handed out for numeric samples, cycled in order.
const PRIMES: [i64; 16] = [3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59];

/// Words handed out for string samples, cycled in order.
const WORDS: [&str; 7] = ["foo", "bar", "baz", "qux", "quux", "corge", "grault"];

/// Lengths drawn for `List`/`Seq` samples, cycled in order.
const LENGTHS: [usize; 4] = [3, 0, 1, 2];

/// A deterministic source of sample literal expressions, keyed by type name.
///
/// Every built-in type name owns an independent cursor into a fixed literal
/// cycle, so drawing an `Int` never disturbs the next `Double`. Two pools
/// constructed fresh hand out identical sequences, which is what makes
/// worksheet output reproducible run over run.
pub struct SamplePool {
    entries: Vec<PoolEntry>,
    length_cursor: usize,
    presence_cursor: usize,
}

struct PoolEntry {
    name: &'static str,
    literals: Vec<Expr>,
    cursor: usize,
}

impl PoolEntry {
    fn new(name: &'static str, literals: Vec<Expr>) -> Self {
        Self {
            name,
            literals,
            cursor: 0,
        }
    }
}

impl SamplePool {
    pub fn new() -> Self {
        let ints: Vec<Expr> = PRIMES
            .iter()
            .map(|&p| lit(ExprKind::IntLit(p as i32)))
            .collect();
        let longs = PRIMES.iter().map(|&p| lit(ExprKind::LongLit(p))).collect();
        let doubles = PRIMES
            .iter()
            .map(|&p| lit(ExprKind::DoubleLit(p as f64 - 0.5)))
            .collect();
        let floats = PRIMES
            .iter()
            .map(|&p| lit(ExprKind::FloatLit(p as f32 - 0.5)))
            .collect();
        let strings = WORDS
            .iter()
            .map(|&w| lit(ExprKind::StrLit(w.to_string())))
            .collect();
        let chars = ('a'..='z').map(|c| lit(ExprKind::CharLit(c))).collect();
        let booleans = vec![lit(ExprKind::BoolLit(true)), lit(ExprKind::BoolLit(false))];
        let any_val = vec![
            lit(ExprKind::IntLit(3)),
            lit(ExprKind::CharLit('f')),
            lit(ExprKind::BoolLit(true)),
        ];
        let any = vec![
            lit(ExprKind::IntLit(3)),
            lit(ExprKind::StrLit("foo".to_string())),
            lit(ExprKind::BoolLit(true)),
        ];
        let any_ref = vec![
            lit(ExprKind::StrLit("foo".to_string())),
            ctor(
                "List",
                vec![
                    lit(ExprKind::IntLit(3)),
                    lit(ExprKind::IntLit(5)),
                    lit(ExprKind::IntLit(7)),
                ],
            ),
            ctor("Some", vec![lit(ExprKind::IntLit(5))]),
        ];

        let entries = vec![
            PoolEntry::new("Int", ints.clone()),
            PoolEntry::new("Long", longs),
            PoolEntry::new("Byte", ints.clone()),
            PoolEntry::new("Short", ints),
            PoolEntry::new("Double", doubles),
            PoolEntry::new("Float", floats),
            PoolEntry::new("String", strings),
            PoolEntry::new("Char", chars),
            PoolEntry::new("Boolean", booleans),
            PoolEntry::new("AnyVal", any_val),
            PoolEntry::new("Any", any),
            PoolEntry::new("AnyRef", any_ref),
        ];

        Self {
            entries,
            length_cursor: 0,
            presence_cursor: 0,
        }
    }

    /// Draws the next sample literal for `type_name`, advancing that type's
    /// cursor. Returns `None` for names the pool does not know about.
    pub fn get(&mut self, type_name: &str) -> Option<Expr> {
        let entry = self.entries.iter_mut().find(|e| e.name == type_name)?;
        let literal = entry.literals[entry.cursor % entry.literals.len()].clone();
        entry.cursor += 1;
        Some(literal)
    }

    /// Draws the next element count for a collection sample.
    pub fn next_collection_length(&mut self) -> usize {
        let length = LENGTHS[self.length_cursor % LENGTHS.len()];
        self.length_cursor += 1;
        length
    }

    /// Draws the next presence flag for an `Option` sample.
    pub fn next_option_present(&mut self) -> bool {
        let present = self.presence_cursor % 2 == 0;
        self.presence_cursor += 1;
        present
    }
}

impl Default for SamplePool {
    fn default() -> Self {
        Self::new()
    }
}

fn lit(kind: ExprKind) -> Expr {
    Expr::new(kind, Span::synthetic())
}

fn ctor(name: &str, args: Vec<Expr>) -> Expr {
    lit(ExprKind::Call {
        callee: Box::new(lit(ExprKind::Name(name.to_string()))),
        args,
    })
}
