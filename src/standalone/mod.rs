//! A local driver that plays the scheduler's part: it runs the map phase
//! over files on disk, then every reduce task.

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

pub mod engine;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[clap(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the map phase and write intermediate files
    Map {
        #[command(flatten)]
        job: JobArgs,

        /// Number of reduce partitions
        #[arg(short = 'r', long, default_value_t = 10)]
        n_reduce: usize,
    },
    /// Reduce a single partition from existing intermediate files
    Reduce {
        /// Name of the job
        #[arg(short, long)]
        job: String,

        /// Name of the workload
        #[arg(short, long)]
        workload: String,

        /// Partition to reduce
        #[arg(long)]
        reduce_task: usize,

        /// Number of map tasks that ran
        #[arg(long)]
        n_map: usize,

        /// Directory holding intermediate and output files
        #[arg(short, long, default_value = ".")]
        dir: PathBuf,

        /// Write the output here instead of the default output name
        #[arg(long)]
        out_file: Option<PathBuf>,

        /// Read intermediate files in parallel
        #[arg(long)]
        parallel_ingest: bool,
    },
    /// Run the map phase followed by every reduce task
    Run {
        #[command(flatten)]
        job: JobArgs,

        /// Number of reduce partitions
        #[arg(short = 'r', long, default_value_t = 10)]
        n_reduce: usize,

        /// Read intermediate files in parallel
        #[arg(long)]
        parallel_ingest: bool,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct JobArgs {
    /// Glob spec for the input files
    #[arg(short, long)]
    pub input: String,

    /// Name of the workload
    #[arg(short, long)]
    pub workload: String,

    /// Name of the job
    #[arg(short, long, default_value = "mr")]
    pub job: String,

    /// Directory for intermediate and output files
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// Auxiliary arguments to pass to the MapReduce application.
    #[clap(value_parser, last = true)]
    pub args: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Job {
    pub name: String,
    pub input: String,
    pub args: Vec<String>,
}

impl From<&JobArgs> for Job {
    fn from(a: &JobArgs) -> Self {
        Job {
            name: a.job.clone(),
            input: a.input.clone(),
            args: a.args.clone(),
        }
    }
}
