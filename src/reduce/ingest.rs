use crate::codec::RecordReader;
use crate::error::{ReduceError, Result};
use crate::naming::Naming;
use crate::KeyValue;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tracing::debug;

/// How the intermediate files of a partition are read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IngestMode {
    /// One file after another on the calling thread.
    #[default]
    Sequential,
    /// All files at once on the rayon pool. Produces the same sequence as
    /// `Sequential`.
    Parallel,
}

/// Reads every record map tasks `0..n_map` wrote for `reduce_task`.
///
/// Records come back in map-task order, and in file order within a map task.
/// Any source that is missing or corrupt fails the whole call.
pub fn ingest<N: Naming + ?Sized>(
    naming: &N,
    job: &str,
    reduce_task: usize,
    n_map: usize,
    mode: IngestMode,
) -> Result<Vec<KeyValue>> {
    let read = |map_task: usize| {
        let path = naming.intermediate(job, map_task, reduce_task);
        read_source(map_task, &path)
    };

    match mode {
        IngestMode::Sequential => {
            let mut records = Vec::new();
            for map_task in 0..n_map {
                records.append(&mut read(map_task)?);
            }
            Ok(records)
        }
        IngestMode::Parallel => {
            let per_source = (0..n_map)
                .into_par_iter()
                .map(read)
                .collect::<Result<Vec<Vec<KeyValue>>>>()?;
            Ok(per_source.into_iter().flatten().collect())
        }
    }
}

/// Decodes one intermediate file. The file is closed on return, whether or
/// not decoding succeeded.
pub fn read_source(map_task: usize, path: &Path) -> Result<Vec<KeyValue>> {
    let file = File::open(path).map_err(|source| ReduceError::SourceUnavailable {
        map_task,
        path: path.to_path_buf(),
        source,
    })?;

    let mut records = Vec::new();
    for (record, item) in RecordReader::new(BufReader::new(file)).enumerate() {
        let kv = item.map_err(|source| ReduceError::DecodeCorruption {
            map_task,
            path: path.to_path_buf(),
            record,
            source,
        })?;
        records.push(kv);
    }
    debug!(map_task, path = %path.display(), records = records.len(), "ingested intermediate file");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::write_records;
    use crate::naming::MrTmpNaming;
    use std::fs;
    use tempfile::TempDir;

    fn write_source(naming: &MrTmpNaming, map_task: usize, records: &[KeyValue]) {
        let file = File::create(naming.intermediate("job", map_task, 0)).unwrap();
        write_records(file, records).unwrap();
    }

    fn fixture() -> (TempDir, MrTmpNaming) {
        let dir = TempDir::new().unwrap();
        let naming = MrTmpNaming::new(dir.path());
        write_source(&naming, 0, &[KeyValue::new("z", "0a"), KeyValue::new("a", "0b")]);
        write_source(&naming, 1, &[]);
        write_source(&naming, 2, &[KeyValue::new("m", "2a")]);
        (dir, naming)
    }

    #[test]
    fn keeps_map_task_then_file_order() {
        let (_dir, naming) = fixture();
        let records = ingest(&naming, "job", 0, 3, IngestMode::Sequential).unwrap();
        assert_eq!(
            records,
            vec![
                KeyValue::new("z", "0a"),
                KeyValue::new("a", "0b"),
                KeyValue::new("m", "2a"),
            ]
        );
    }

    #[test]
    fn parallel_matches_sequential() {
        let (_dir, naming) = fixture();
        let sequential = ingest(&naming, "job", 0, 3, IngestMode::Sequential).unwrap();
        let parallel = ingest(&naming, "job", 0, 3, IngestMode::Parallel).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn no_map_tasks_means_no_records() {
        let dir = TempDir::new().unwrap();
        let naming = MrTmpNaming::new(dir.path());
        assert!(ingest(&naming, "job", 0, 0, IngestMode::Sequential)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn missing_source_names_the_map_task() {
        let (_dir, naming) = fixture();
        for mode in [IngestMode::Sequential, IngestMode::Parallel] {
            match ingest(&naming, "job", 0, 4, mode) {
                Err(ReduceError::SourceUnavailable { map_task, path, .. }) => {
                    assert_eq!(map_task, 3);
                    assert_eq!(path, naming.intermediate("job", 3, 0));
                }
                other => panic!("expected SourceUnavailable, got {:?}", other),
            }
        }
    }

    #[test]
    fn corrupt_source_reports_the_failing_record() {
        let (_dir, naming) = fixture();
        fs::write(
            naming.intermediate("job", 2, 0),
            "{\"Key\":\"m\",\"Value\":\"2a\"}\n{\"Key\":\"n\",",
        )
        .unwrap();
        match ingest(&naming, "job", 0, 3, IngestMode::Sequential) {
            Err(ReduceError::DecodeCorruption {
                map_task, record, ..
            }) => {
                assert_eq!(map_task, 2);
                assert_eq!(record, 1);
            }
            other => panic!("expected DecodeCorruption, got {:?}", other),
        }
    }
}
