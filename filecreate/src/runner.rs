use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use bytes::Bytes;
use futures_util::future::join_all;
use log::info;
use tokio::task;

use crate::buffer::BufferFactory;
use crate::writer::{create_file, create_file_async};
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Blocking write per file, one after the other
    Sequential,
    /// Suspending write per file, each awaited before the next starts
    SequentialAsync,
    /// Suspending write per file, all launched before a single join
    ConcurrentAsync,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Sequential, Mode::SequentialAsync, Mode::ConcurrentAsync];

    pub fn label(&self) -> &'static str {
        match self {
            Mode::Sequential => "SequentialFileCreation",
            Mode::SequentialAsync => "AsyncFileCreationInALoop",
            Mode::ConcurrentAsync => "AsyncFileCreationWithJoinAll",
        }
    }
}

/// Where the concurrent mode starts its timer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchTiming {
    /// After every write is launched, right before the join
    Excluded,
    /// Before the first launch, like the sequential modes
    Included,
}

impl Default for LaunchTiming {
    fn default() -> LaunchTiming {
        LaunchTiming::Excluded
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BenchmarkResult {
    pub mode: Mode,
    pub elapsed: Duration,
}

impl BenchmarkResult {
    pub fn millis(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

impl fmt::Display for BenchmarkResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} finished in {} milliseconds.", self.mode.label(), self.millis())
    }
}

pub struct Benchmark {
    buffers: BufferFactory,
    file_size: usize,
    launch_timing: LaunchTiming,
    produced: Vec<PathBuf>,
}

impl Benchmark {
    pub fn new(buffers: BufferFactory, file_size: usize, launch_timing: LaunchTiming) -> Benchmark {
        Benchmark {
            buffers,
            file_size,
            launch_timing,
            produced: Vec::new(),
        }
    }

    pub fn file_size(&self) -> usize {
        self.file_size
    }

    /// Runs `mode` over `names`. Blocking writes of the sequential mode happen on
    /// the calling thread.
    pub async fn run(&mut self, mode: Mode, names: &[PathBuf]) -> Result<BenchmarkResult, Error> {
        match mode {
            Mode::Sequential => self.sequential(names),
            Mode::SequentialAsync => self.sequential_async(names).await,
            Mode::ConcurrentAsync => self.concurrent_async(names).await,
        }
    }

    pub fn sequential(&mut self, names: &[PathBuf]) -> Result<BenchmarkResult, Error> {
        let buffer = self.start(Mode::Sequential, names);

        let start = Instant::now();
        for name in names {
            let written = create_file(&buffer, name);
            self.record(name, &written);
            written?;
        }

        Ok(BenchmarkResult {
            mode: Mode::Sequential,
            elapsed: start.elapsed(),
        })
    }

    pub async fn sequential_async(&mut self, names: &[PathBuf]) -> Result<BenchmarkResult, Error> {
        let buffer = self.start(Mode::SequentialAsync, names);

        let start = Instant::now();
        for name in names {
            let written = create_file_async(&buffer, name).await;
            self.record(name, &written);
            written?;
        }

        Ok(BenchmarkResult {
            mode: Mode::SequentialAsync,
            elapsed: start.elapsed(),
        })
    }

    /// Spawns every write, then waits for all of them. A failure is reported only
    /// after the whole set has completed; the first one in launch order wins.
    pub async fn concurrent_async(&mut self, names: &[PathBuf]) -> Result<BenchmarkResult, Error> {
        let buffer = self.start(Mode::ConcurrentAsync, names);

        let launched = Instant::now();
        let handles: Vec<_> = names
            .iter()
            .cloned()
            .map(|name| {
                let buffer = buffer.clone();
                task::spawn(async move { create_file_async(&buffer, &name).await })
            })
            .collect();

        let start = match self.launch_timing {
            LaunchTiming::Included => launched,
            LaunchTiming::Excluded => Instant::now(),
        };
        let outcomes = join_all(handles).await;
        let elapsed = start.elapsed();

        let mut first_error = None;
        for (name, outcome) in names.iter().zip(outcomes) {
            let written = outcome.map_err(Error::from).and_then(|written| written);
            self.record(name, &written);
            if let Err(e) = written {
                first_error.get_or_insert(e);
            }
        }

        if let Some(e) = first_error {
            return Err(e);
        }

        Ok(BenchmarkResult {
            mode: Mode::ConcurrentAsync,
            elapsed,
        })
    }

    /// Paths the last run may have left on disk: every attempted write except
    /// those that found their path already taken
    pub fn take_produced(&mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.produced)
    }

    fn record(&mut self, name: &Path, written: &Result<(), Error>) {
        match written {
            Err(e) if e.is_already_exists() => (),
            _ => self.produced.push(name.to_owned()),
        }
    }

    fn start(&mut self, mode: Mode, names: &[PathBuf]) -> Bytes {
        self.produced.clear();
        info!("{}: {} files of {} bytes", mode.label(), names.len(), self.file_size);
        self.buffers.buffer(self.file_size)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::fs;

    fn names(dir: &Path, count: usize) -> Vec<PathBuf> {
        (0..count).map(|i| dir.join(format!("f{}.tmp", i))).collect()
    }

    fn benchmark(file_size: usize) -> Benchmark {
        Benchmark::new(BufferFactory::seeded(1), file_size, LaunchTiming::default())
    }

    fn sizes(paths: &[PathBuf]) -> Vec<Option<u64>> {
        paths.iter().map(|p| fs::metadata(p).ok().map(|m| m.len())).collect()
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn every_mode_writes_every_file() {
        for mode in Mode::ALL.iter() {
            let dir = tempfile::tempdir().unwrap();
            let paths = names(dir.path(), 5);
            let result = benchmark(1024).run(*mode, &paths).await.unwrap();

            assert_eq!(result.mode, *mode);
            assert_eq!(sizes(&paths), vec![Some(1024); 5]);
        }
    }

    #[tokio::test]
    async fn files_share_one_buffer_per_run() {
        let dir = tempfile::tempdir().unwrap();
        let paths = names(dir.path(), 3);
        benchmark(512).concurrent_async(&paths).await.unwrap();

        let first = fs::read(&paths[0]).unwrap();
        for path in &paths[1..] {
            assert_eq!(fs::read(path).unwrap(), first);
        }
    }

    #[tokio::test]
    async fn empty_run_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = names(dir.path(), 0);
        for mode in Mode::ALL.iter() {
            let mut benchmark = benchmark(1024);
            let result = benchmark.run(*mode, &paths).await.unwrap();
            assert!(result.millis() < 50);
            assert!(benchmark.take_produced().is_empty());
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn sequential_modes_stop_at_collision() {
        for mode in [Mode::Sequential, Mode::SequentialAsync].iter() {
            let dir = tempfile::tempdir().unwrap();
            let paths = names(dir.path(), 5);
            fs::write(&paths[2], b"taken").unwrap();

            let mut benchmark = benchmark(64);
            let error = benchmark.run(*mode, &paths).await.unwrap_err();
            assert!(error.is_already_exists());
            assert_eq!(sizes(&paths), vec![Some(64), Some(64), Some(5), None, None]);
            assert_eq!(benchmark.take_produced(), paths[..2].to_vec());
        }
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_mode_finishes_other_writes_before_failing() {
        let dir = tempfile::tempdir().unwrap();
        let paths = names(dir.path(), 5);
        fs::write(&paths[2], b"taken").unwrap();

        let mut benchmark = benchmark(64);
        let error = benchmark.concurrent_async(&paths).await.unwrap_err();
        assert!(error.is_already_exists());
        assert_eq!(sizes(&paths), vec![Some(64), Some(64), Some(5), Some(64), Some(64)]);

        let produced = benchmark.take_produced();
        assert_eq!(produced, vec![paths[0].clone(), paths[1].clone(), paths[3].clone(), paths[4].clone()]);
        assert!(benchmark.take_produced().is_empty());
    }

    #[tokio::test]
    async fn unwritable_directory_fails_every_mode() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing");
        let paths = names(&missing, 3);
        for mode in Mode::ALL.iter() {
            match benchmark(64).run(*mode, &paths).await {
                Err(Error::Write { path, .. }) => assert_eq!(path, paths[0]),
                other => panic!("unexpected {:?}", other),
            }
        }
        assert!(!missing.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn read_only_directory_fails_every_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let locked = dir.path().join("locked");
        fs::create_dir(&locked).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o555)).unwrap();

        // permission bits don't bind root
        if fs::write(locked.join("check"), b"x").is_ok() {
            return;
        }

        let paths = names(&locked, 3);
        for mode in Mode::ALL.iter() {
            match benchmark(64).run(*mode, &paths).await {
                Err(Error::Write { path, source }) => {
                    assert_eq!(path, paths[0]);
                    assert_eq!(source.kind(), std::io::ErrorKind::PermissionDenied);
                }
                other => panic!("unexpected {:?}", other),
            }
        }

        assert_eq!(fs::read_dir(&locked).unwrap().count(), 0);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
    }

    #[test]
    fn result_line_names_mode_and_millis() {
        let result = BenchmarkResult {
            mode: Mode::ConcurrentAsync,
            elapsed: Duration::from_micros(12_700),
        };
        assert_eq!(result.to_string(), "AsyncFileCreationWithJoinAll finished in 12 milliseconds.");
    }
}
