//! Benchmark: create / write / read / delete timings per worker count.

use std::sync::Arc;
use std::time::{Duration, Instant};

use memfs_core::ports::NoopSink;
use memfs_core::{BuildError, MemFs, MemfsConfig};
use rand::Rng;
use rand::distributions::Alphanumeric;
use tracing::info;

const CONTENT_LEN: usize = 10;

#[derive(Debug, Clone)]
pub struct BenchOptions {
    pub threads: Vec<usize>,
    pub files: usize,
    pub config: MemfsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PhaseTimings {
    pub threads: usize,
    pub files: usize,
    pub create: Duration,
    pub write: Duration,
    pub read: Duration,
    pub delete: Duration,
}

fn random_content<R: Rng>(rng: &mut R) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(CONTENT_LEN)
        .map(char::from)
        .collect()
}

fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

/// Run every worker count against a fresh session. Blocking.
pub fn run(options: &BenchOptions) -> Result<Vec<PhaseTimings>, BuildError> {
    let mut rng = rand::thread_rng();
    let names: Vec<String> = (0..options.files).map(|i| format!("file{i}.txt")).collect();
    let contents: Vec<String> = (0..options.files)
        .map(|_| random_content(&mut rng))
        .collect();

    let mut results = Vec::with_capacity(options.threads.len());
    for &threads in &options.threads {
        let fs = MemFs::builder()
            .config(options.config.clone().with_workers(threads))
            .sink(Arc::new(NoopSink))
            .build()?;

        // a failed batch shows up as a short phase; timings are what we report
        let (_, create) = timed(|| fs.create_many(&names));
        let (_, write) = timed(|| fs.write_many(&names, &contents));
        let (_, read) = timed(|| {
            for name in &names {
                let _ = fs.read(name);
            }
        });
        let (_, delete) = timed(|| fs.delete_many(&names));
        fs.shutdown();

        info!(threads, files = options.files, ?create, ?write, ?read, ?delete, "bench round done");
        results.push(PhaseTimings {
            threads,
            files: options.files,
            create,
            write,
            read,
            delete,
        });
    }
    Ok(results)
}

pub fn render(results: &[PhaseTimings]) -> String {
    let mut out = String::new();
    for r in results {
        out.push_str(&format!(
            "Benchmarking with {} threads and {} files\n\
             Create: {}ms\nWrite: {}ms\nRead: {}ms\nDelete: {}ms\n\n",
            r.threads,
            r.files,
            r.create.as_millis(),
            r.write.as_millis(),
            r.read.as_millis(),
            r.delete.as_millis(),
        ));
    }
    out
}
