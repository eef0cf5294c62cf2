//! slate: annotate a worksheet fragment with per-line runtime values.
//!
//! ```bash
//! # Annotate a worksheet file
//! slate sheet.slate
//!
//! # Annotate stdin, emitting a JSON array
//! echo 'val x = 2 + 3' | slate - --json
//! ```

use std::io::Read;

use anyhow::{Context, Result};
use clap::Parser;

use slate_cli::annotate_with_gas;
use slate_eval::DEFAULT_GAS_LIMIT;

#[derive(Parser)]
#[command(
    name = "slate",
    version,
    about = "Annotates a Slate worksheet with per-line runtime values"
)]
struct Cli {
    /// Worksheet file to annotate, or `-` for stdin
    file: String,

    /// Emit the annotation lines as a JSON array
    #[arg(long)]
    json: bool,

    /// Evaluation budget for each line's evaluation
    #[arg(long, default_value_t = DEFAULT_GAS_LIMIT)]
    gas: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let source = if cli.file == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(&cli.file).with_context(|| format!("reading {}", cli.file))?
    };

    let lines = annotate_with_gas(&source, cli.gas);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&lines)?);
    } else {
        for line in &lines {
            println!("{line}");
        }
    }
    Ok(())
}
