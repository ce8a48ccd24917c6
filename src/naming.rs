//! File addressing for intermediate and output files.

use std::path::PathBuf;

/// Maps task coordinates to file paths.
///
/// Supplied by whoever runs the map phase. The reduce stage only resolves
/// paths through it and never lists directories.
pub trait Naming: Send + Sync {
    /// The file map task `map_task` wrote for reduce partition `reduce_task`.
    fn intermediate(&self, job: &str, map_task: usize, reduce_task: usize) -> PathBuf;

    /// The output file of reduce partition `reduce_task`.
    fn output(&self, job: &str, reduce_task: usize) -> PathBuf;
}

/// `mrtmp.<job>-<m>-<r>` for intermediate files and `mrtmp.<job>-res-<r>`
/// for outputs, all under `dir`.
#[derive(Debug, Clone)]
pub struct MrTmpNaming {
    pub dir: PathBuf,
}

impl MrTmpNaming {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

impl Naming for MrTmpNaming {
    fn intermediate(&self, job: &str, map_task: usize, reduce_task: usize) -> PathBuf {
        self.dir
            .join(format!("mrtmp.{}-{}-{}", job, map_task, reduce_task))
    }

    fn output(&self, job: &str, reduce_task: usize) -> PathBuf {
        self.dir.join(format!("mrtmp.{}-res-{}", job, reduce_task))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intermediate_and_output_namespaces_differ() {
        let naming = MrTmpNaming::new("/work");
        assert_eq!(
            naming.intermediate("wc", 2, 5),
            PathBuf::from("/work/mrtmp.wc-2-5")
        );
        assert_eq!(naming.output("wc", 5), PathBuf::from("/work/mrtmp.wc-res-5"));
        for m in 0..4 {
            assert_ne!(naming.intermediate("wc", m, 5), naming.output("wc", 5));
        }
    }
}
