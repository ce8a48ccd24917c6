use anyhow::{bail, Context, Result};
use glob::glob;
use rayon::prelude::*;
use std::fs::{self, File};
use tracing::{debug, info};

use crate::codec::write_records;
use crate::naming::Naming;
use crate::reduce::{self, IngestMode, ReduceSummary, ReduceTask};
use crate::standalone::Job;
use crate::*;

/// Runs one map task per input file and writes an intermediate file for
/// every (map task, reduce partition) pair, empty ones included.
///
/// Input files are taken in sorted path order; map task `m` reads the `m`-th.
/// Returns the number of map tasks.
pub fn perform_map<N: Naming + ?Sized>(
    job: &Job,
    engine: &Workload,
    naming: &N,
    n_reduce: usize,
) -> Result<usize> {
    if n_reduce == 0 {
        bail!("n_reduce must be at least 1");
    }
    let mut inputs = glob(&job.input)
        .with_context(|| format!("bad input pattern `{}`", job.input))?
        .collect::<Result<Vec<_>, _>>()?;
    inputs.sort();

    for (map_task, pathspec) in inputs.iter().enumerate() {
        let contents = fs::read_to_string(pathspec)
            .with_context(|| format!("reading input {}", pathspec.display()))?;
        let filename = pathspec.to_string_lossy();

        let mut buckets: Vec<Vec<KeyValue>> = vec![Vec::new(); n_reduce];
        for kv in (engine.map_fn)(&filename, &contents, &job.args)? {
            let bucket_no = ihash(kv.key.as_bytes()) as usize % n_reduce;
            buckets[bucket_no].push(kv);
        }

        for (reduce_task, bucket) in buckets.iter().enumerate() {
            let path = naming.intermediate(&job.name, map_task, reduce_task);
            let file = File::create(&path)
                .with_context(|| format!("creating intermediate file {}", path.display()))?;
            write_records(file, bucket)
                .with_context(|| format!("writing intermediate file {}", path.display()))?;
        }
        debug!(map_task, input = %pathspec.display(), "map task done");
    }

    info!(job = %job.name, n_map = inputs.len(), n_reduce, "map phase done");
    Ok(inputs.len())
}

/// Runs every reduce task of the job. Partitions are independent, so they
/// run concurrently.
pub fn perform_reduce<N: Naming + ?Sized>(
    job: &Job,
    engine: &Workload,
    naming: &N,
    n_map: usize,
    n_reduce: usize,
    ingest: IngestMode,
) -> Result<Vec<ReduceSummary>> {
    let reduce_fn = engine.reduce_fn;
    (0..n_reduce)
        .into_par_iter()
        .map(|reduce_task| {
            let task = ReduceTask::new(job.name.as_str(), reduce_task, n_map).with_ingest(ingest);
            reduce::run(&task, naming, &reduce_fn)
                .with_context(|| format!("reduce task {} of job `{}`", reduce_task, job.name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::MrTmpNaming;
    use crate::workload;
    use tempfile::TempDir;

    #[test]
    fn map_writes_every_partition_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("a.txt"), "one two").unwrap();
        let naming = MrTmpNaming::new(dir.path().join("work"));
        fs::create_dir(&naming.dir).unwrap();
        let job = Job {
            name: "wc".into(),
            input: format!("{}/*.txt", dir.path().display()),
            args: vec![],
        };

        let n_map = perform_map(&job, &workload::named("wc").unwrap(), &naming, 3).unwrap();
        assert_eq!(n_map, 1);
        for r in 0..3 {
            assert!(naming.intermediate("wc", 0, r).exists());
        }
    }

    #[test]
    fn zero_partitions_is_rejected() {
        let dir = TempDir::new().unwrap();
        let naming = MrTmpNaming::new(dir.path());
        let job = Job {
            name: "wc".into(),
            input: format!("{}/*.txt", dir.path().display()),
            args: vec![],
        };
        assert!(perform_map(&job, &workload::named("wc").unwrap(), &naming, 0).is_err());
    }
}
