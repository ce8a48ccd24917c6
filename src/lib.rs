//! The reduce stage of a MapReduce (lite) system.
//!
//! Given the intermediate files written by every map task for one reduce
//! partition, the [`reduce`] module gathers all key-value pairs, groups them
//! by key, applies an application reduce function once per distinct key and
//! writes a single output file sorted by key. Scheduling, retries and the
//! final cross-partition merge belong to the caller.

use serde::{Deserialize, Serialize};
use std::hash::Hasher;

pub mod codec;
pub mod error;
pub mod naming;
pub mod reduce;
pub mod standalone;
pub mod workload;

pub use error::{ReduceError, Result};
pub use naming::{MrTmpNaming, Naming};
pub use reduce::{IngestMode, ReduceSummary, ReduceTask};

/////////////////////////////////////////////////////////////////////////////
// MapReduce application types
/////////////////////////////////////////////////////////////////////////////

/// A map function takes an input file name, its contents and auxiliary
/// arguments. It returns the key-value pairs emitted for that file.
pub type MapFn = fn(filename: &str, contents: &str, aux: &[String]) -> anyhow::Result<Vec<KeyValue>>;

/// A reduce function takes a key and every value emitted for that key,
/// and returns a single output value.
pub type ReduceFn = fn(key: &str, values: &[String]) -> String;

/// A map reduce application.
#[derive(Copy, Clone)]
pub struct Workload {
    pub map_fn: MapFn,
    pub reduce_fn: ReduceFn,
}

/// The aggregation capability applied once per distinct key.
///
/// Implemented for every `Fn(&str, &[String]) -> String`, so plain functions,
/// [`ReduceFn`] pointers and closures can all be passed where a `Reducer` is
/// expected.
pub trait Reducer {
    fn reduce(&self, key: &str, values: &[String]) -> String;
}

impl<F> Reducer for F
where
    F: Fn(&str, &[String]) -> String + ?Sized,
{
    #[inline]
    fn reduce(&self, key: &str, values: &[String]) -> String {
        self(key, values)
    }
}

/////////////////////////////////////////////////////////////////////////////
// Key-value pairs
/////////////////////////////////////////////////////////////////////////////

/// A single key-value pair.
///
/// Serialized as `{"Key": ..., "Value": ...}`, the record layout shared with
/// the map-side writers and the downstream merge stage.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct KeyValue {
    /// The key.
    #[serde(rename = "Key")]
    pub key: String,
    /// The value.
    #[serde(rename = "Value")]
    pub value: String,
}

impl KeyValue {
    /// Construct a new key-value pair from the given key and value.
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// Get the key of this key-value pair.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the value of this key-value pair.
    #[inline]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Consumes the key-value pair and returns the value.
    #[inline]
    pub fn into_value(self) -> String {
        self.value
    }
}

/// Hashes an intermediate key. Compute a reduce bucket for a given key
/// by calculating `ihash(key) % n_reduce`.
pub fn ihash(key: &[u8]) -> u32 {
    let mut hasher = fnv::FnvHasher::with_key(0);
    hasher.write(key);
    (hasher.finish() & 0x7fff_ffff) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_and_fn_pointers_are_reducers() {
        let count: ReduceFn = |_, values| values.len().to_string();
        let values = vec!["x".to_string(), "y".to_string()];
        assert_eq!(count.reduce("k", &values), "2");

        let prefix = String::from("k=");
        let join = |key: &str, values: &[String]| format!("{}{}:{}", prefix, key, values.join("+"));
        assert_eq!(join.reduce("a", &values), "k=a:x+y");
    }

    #[test]
    fn ihash_is_stable_and_non_negative() {
        assert_eq!(ihash(b"hello"), ihash(b"hello"));
        assert!(ihash(b"hello") <= 0x7fff_ffff);
        assert!(ihash(b"") <= 0x7fff_ffff);
    }
}
