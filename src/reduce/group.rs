use crate::{KeyValue, Reducer};
use itertools::Itertools;

/// Sorts `records` by key and reduces each run of equal keys to one record.
///
/// The sort is stable, so the values handed to `reducer` for a key keep the
/// order in which they were ingested. Keys compare byte-wise. An empty input
/// produces no records and never calls `reducer`.
pub fn group_reduce<R: Reducer + ?Sized>(mut records: Vec<KeyValue>, reducer: &R) -> Vec<KeyValue> {
    records.sort_by(|a, b| a.key.cmp(&b.key));

    let mut out = Vec::new();
    for (key, group) in &records.into_iter().chunk_by(|kv| kv.key.clone()) {
        let values: Vec<String> = group.map(KeyValue::into_value).collect();
        let value = reducer.reduce(&key, &values);
        out.push(KeyValue { key, value });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn kvs(pairs: &[(&str, &str)]) -> Vec<KeyValue> {
        pairs.iter().map(|(k, v)| KeyValue::new(*k, *v)).collect()
    }

    fn join(_key: &str, values: &[String]) -> String {
        values.join(",")
    }

    #[test]
    fn empty_input_never_calls_the_reducer() {
        let calls = RefCell::new(0);
        let out = group_reduce(Vec::new(), &|_: &str, _: &[String]| {
            *calls.borrow_mut() += 1;
            String::new()
        });
        assert!(out.is_empty());
        assert_eq!(*calls.borrow(), 0);
    }

    #[test]
    fn reduces_the_trailing_group() {
        let out = group_reduce(kvs(&[("a", "1"), ("b", "2"), ("b", "3")]), &join);
        assert_eq!(out, kvs(&[("a", "1"), ("b", "2,3")]));
    }

    #[test]
    fn single_key_gives_single_record() {
        let out = group_reduce(kvs(&[("k", "1"), ("k", "2"), ("k", "3")]), &join);
        assert_eq!(out, kvs(&[("k", "1,2,3")]));
    }

    #[test]
    fn equal_keys_keep_ingestion_order() {
        let out = group_reduce(kvs(&[("b", "x"), ("a", "3"), ("b", "y"), ("a", "1"), ("a", "2")]), &join);
        assert_eq!(out, kvs(&[("a", "3,1,2"), ("b", "x,y")]));
    }

    #[test]
    fn keys_compare_bytewise() {
        let out = group_reduce(kvs(&[("ab", "1"), ("a", "2"), ("B", "3"), ("é", "4"), ("", "5")]), &join);
        let keys: Vec<&str> = out.iter().map(KeyValue::key).collect();
        assert_eq!(keys, vec!["", "B", "a", "ab", "é"]);
    }

    #[test]
    fn reducer_runs_once_per_key_with_all_its_values() {
        let calls = RefCell::new(Vec::new());
        let out = group_reduce(
            kvs(&[("x", "1"), ("y", "2"), ("x", "3"), ("z", "4")]),
            &|key: &str, values: &[String]| {
                calls.borrow_mut().push((key.to_string(), values.to_vec()));
                values.len().to_string()
            },
        );
        assert_eq!(out, kvs(&[("x", "2"), ("y", "1"), ("z", "1")]));
        assert_eq!(
            calls.into_inner(),
            vec![
                ("x".to_string(), vec!["1".to_string(), "3".to_string()]),
                ("y".to_string(), vec!["2".to_string()]),
                ("z".to_string(), vec!["4".to_string()]),
            ]
        );
    }
}
