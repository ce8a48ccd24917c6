//! One reduce task, start to finish.
//!
//! [`run`] reads the intermediate files of every map task for a partition
//! ([`ingest`]), sorts and reduces them per key ([`group_reduce`]) and writes
//! the sorted result ([`emit`]). A failure in any step ends the task with an
//! error and leaves no output file behind.

use crate::error::Result;
use crate::naming::Naming;
use crate::Reducer;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::{error, info};

mod emit;
mod group;
mod ingest;

pub use emit::{discard, emit};
pub use group::group_reduce;
pub use ingest::{ingest, read_source, IngestMode};

/// Parameters of a single reduce task, as handed out by a scheduler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReduceTask {
    /// Name of the whole MapReduce job.
    pub job: String,
    /// Which partition this task reduces.
    pub reduce_task: usize,
    /// Number of map tasks that ran for the job.
    pub n_map: usize,
    /// Where to write the output. Defaults to [`Naming::output`].
    #[serde(default)]
    pub out_file: Option<PathBuf>,
    #[serde(default)]
    pub ingest: IngestMode,
}

impl ReduceTask {
    pub fn new(job: impl Into<String>, reduce_task: usize, n_map: usize) -> Self {
        Self {
            job: job.into(),
            reduce_task,
            n_map,
            out_file: None,
            ingest: IngestMode::default(),
        }
    }

    pub fn with_out_file(mut self, out_file: impl Into<PathBuf>) -> Self {
        self.out_file = Some(out_file.into());
        self
    }

    pub fn with_ingest(mut self, ingest: IngestMode) -> Self {
        self.ingest = ingest;
        self
    }

    /// The file this task writes.
    pub fn destination<N: Naming + ?Sized>(&self, naming: &N) -> PathBuf {
        self.out_file
            .clone()
            .unwrap_or_else(|| naming.output(&self.job, self.reduce_task))
    }
}

/// What a finished reduce task produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReduceSummary {
    pub output: PathBuf,
    /// Records read across all intermediate files.
    pub records_in: usize,
    /// Distinct keys written.
    pub keys_out: usize,
}

/// Runs a reduce task: ingest, group and reduce, then emit.
pub fn run<N, R>(task: &ReduceTask, naming: &N, reducer: &R) -> Result<ReduceSummary>
where
    N: Naming + ?Sized,
    R: Reducer + ?Sized,
{
    let output = task.destination(naming);
    info!(
        job = %task.job,
        reduce_task = task.reduce_task,
        n_map = task.n_map,
        output = %output.display(),
        "starting reduce task"
    );

    let summary = execute(task, naming, reducer, output).inspect_err(|e| {
        error!(job = %task.job, reduce_task = task.reduce_task, "reduce task failed: {}", e);
    })?;

    info!(
        job = %task.job,
        reduce_task = task.reduce_task,
        records_in = summary.records_in,
        keys_out = summary.keys_out,
        "reduce task done"
    );
    Ok(summary)
}

fn execute<N, R>(task: &ReduceTask, naming: &N, reducer: &R, output: PathBuf) -> Result<ReduceSummary>
where
    N: Naming + ?Sized,
    R: Reducer + ?Sized,
{
    // A leftover from an earlier attempt must not outlive a failure of this one.
    discard(&output)?;

    let records = ingest(naming, &task.job, task.reduce_task, task.n_map, task.ingest)?;
    let records_in = records.len();

    let reduced = group_reduce(records, reducer);
    emit(&output, &reduced)?;

    Ok(ReduceSummary {
        output,
        records_in,
        keys_out: reduced.len(),
    })
}
