//! Shared types for the Slate worksheet pipeline.
//!
//! This crate defines the AST node types, source spans, diagnostics,
//! and the source-form `Display` impls used across all pipeline stages.

mod diag;
mod fmt;
mod span;
pub mod ast;

pub use diag::{DiagCategory, DiagCode, Diagnostic, Diagnostics, MAX_DIAGS};
pub use span::{SourceFile, Span};
