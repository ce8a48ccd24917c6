//! A MapReduce-compatible implementation of `grep`.
//!

use crate::*;
use anyhow::Result;
use clap::Parser;

#[derive(Parser, Debug)]
#[clap(no_binary_name = true)]
struct Args {
    #[clap(short, long, value_parser)]
    term: String,
}

/// Emits `(filename, "<line>:<text>")` for every line containing `--term`.
pub fn map(filename: &str, contents: &str, aux: &[String]) -> Result<Vec<KeyValue>> {
    let args = Args::try_parse_from(aux)?;
    let kvs = contents
        .lines()
        .enumerate()
        .filter(|(_, line)| line.contains(&args.term))
        .map(|(i, line)| KeyValue::new(filename, format!("{}:{}", i + 1, line)))
        .collect();
    Ok(kvs)
}

/// Lists the matching lines of a file in line order.
pub fn reduce(key: &str, values: &[String]) -> String {
    let mut lines: Vec<(u64, &str)> = values
        .iter()
        .map(|value| match value.split_once(':') {
            Some((no, line)) => (no.parse().unwrap_or(u64::MAX), line),
            None => (u64::MAX, value.as_str()),
        })
        .collect();
    lines.sort_by_key(|(no, _)| *no);
    lines
        .into_iter()
        .map(|(no, line)| format!("{}:{}: {}", key, no, line))
        .collect::<Vec<_>>()
        .join("\n")
}
