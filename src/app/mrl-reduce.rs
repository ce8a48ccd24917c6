use anyhow::Result;
use clap::Parser;
use mrlite_reduce::standalone::{Args, Commands, Job};
use mrlite_reduce::*;
use standalone::engine::{perform_map, perform_reduce};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(verbose >= 2)
        .init();
}

fn ingest_mode(parallel: bool) -> IngestMode {
    if parallel {
        IngestMode::Parallel
    } else {
        IngestMode::Sequential
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    match args.command {
        Commands::Map { job, n_reduce } => {
            let engine = workload::named(&job.workload)?;
            let naming = MrTmpNaming::new(&job.dir);
            let n_map = perform_map(&Job::from(&job), &engine, &naming, n_reduce)?;
            println!("{}", n_map);
        }
        Commands::Reduce {
            job,
            workload: name,
            reduce_task,
            n_map,
            dir,
            out_file,
            parallel_ingest,
        } => {
            let engine = workload::named(&name)?;
            let naming = MrTmpNaming::new(dir);
            let mut task = ReduceTask::new(job, reduce_task, n_map).with_ingest(ingest_mode(parallel_ingest));
            task.out_file = out_file;
            let summary = reduce::run(&task, &naming, &engine.reduce_fn)?;
            println!("{}", summary.output.display());
        }
        Commands::Run {
            job,
            n_reduce,
            parallel_ingest,
        } => {
            let engine = workload::named(&job.workload)?;
            let naming = MrTmpNaming::new(&job.dir);
            let run_job = Job::from(&job);
            let n_map = perform_map(&run_job, &engine, &naming, n_reduce)?;
            let summaries = perform_reduce(&run_job, &engine, &naming, n_map, n_reduce, ingest_mode(parallel_ingest))?;
            let keys: usize = summaries.iter().map(|s| s.keys_out).sum();
            info!(job = %run_job.name, n_map, n_reduce, keys, "job done");
            for s in summaries {
                println!("{}", s.output.display());
            }
        }
    }
    Ok(())
}
