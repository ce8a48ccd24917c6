//! A MapReduce-compatible implementation of word count.
//!

use crate::*;

pub fn map(_filename: &str, contents: &str, _aux: &[String]) -> anyhow::Result<Vec<KeyValue>> {
    let kvs = contents
        .split(|c: char| !c.is_alphabetic())
        .filter(|s| !s.is_empty())
        .map(|word| KeyValue::new(word.to_lowercase(), "1"))
        .collect();
    Ok(kvs)
}

pub fn reduce(_key: &str, values: &[String]) -> String {
    values.len().to_string()
}
