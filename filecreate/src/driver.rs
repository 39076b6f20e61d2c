use std::io::Write;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use log::{debug, info};
use tokio::runtime::{Builder, Runtime};

use crate::buffer::BufferFactory;
use crate::cleaner::cleanup;
use crate::names::{resolve_dir, NameGenerator, NameStrategy, UuidNames};
use crate::runner::{Benchmark, BenchmarkResult, LaunchTiming, Mode};
use crate::Error;

#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Files written per run
    pub count: usize,
    /// Bytes per file
    pub file_size: usize,
    /// Target directory, resolved from the environment when `None`
    pub dir: Option<PathBuf>,
    pub extension: String,
    /// Pause between runs
    pub settle: Duration,
    pub launch_timing: LaunchTiming,
    /// Runtime worker threads, tokio's default when `None`
    pub worker_threads: Option<usize>,
}

impl Default for DriverConfig {
    fn default() -> DriverConfig {
        DriverConfig {
            count: 1000,
            file_size: 10 * 1024,
            dir: None,
            extension: "tmp".to_owned(),
            settle: Duration::from_millis(100),
            launch_timing: LaunchTiming::Excluded,
            worker_threads: None,
        }
    }
}

pub struct Driver {
    count: usize,
    settle: Duration,
    names: NameGenerator,
    benchmark: Benchmark,
    runtime: Runtime,
}

impl Driver {
    pub fn new(config: DriverConfig) -> Result<Driver, Error> {
        Driver::with_sources(config, Box::new(UuidNames), BufferFactory::from_entropy())
    }

    /// Driver with explicit name and payload sources
    pub fn with_sources(
        config: DriverConfig,
        strategy: Box<dyn NameStrategy>,
        buffers: BufferFactory,
    ) -> Result<Driver, Error> {
        let dir = resolve_dir(config.dir)?;

        let mut builder = Builder::new_multi_thread();
        if let Some(threads) = config.worker_threads {
            if threads == 0 {
                return Err(Error::NoWorkerThreads);
            }
            builder.worker_threads(threads);
        }
        let runtime = builder.enable_all().build().map_err(Error::Runtime)?;

        Ok(Driver {
            count: config.count,
            settle: config.settle,
            names: NameGenerator::new(dir, &config.extension, strategy),
            benchmark: Benchmark::new(buffers, config.file_size, config.launch_timing),
            runtime,
        })
    }

    /// Runs every mode once on a fresh set of names, writing one line per run to `out`
    pub fn run<W: Write>(&mut self, out: &mut W) -> Result<Vec<BenchmarkResult>, Error> {
        info!(
            "creating {} files of {} bytes in {}",
            self.count,
            self.benchmark.file_size(),
            self.names.dir().display()
        );

        let mut results = Vec::with_capacity(Mode::ALL.len());
        for (i, mode) in Mode::ALL.iter().enumerate() {
            if i > 0 {
                self.settle();
            }

            let result = self.run_once(*mode)?;
            writeln!(out, "{}", result).map_err(Error::Report)?;
            results.push(result);
        }

        Ok(results)
    }

    fn run_once(&mut self, mode: Mode) -> Result<BenchmarkResult, Error> {
        let names = self.names.generate(self.count);
        let result = self.runtime.block_on(self.benchmark.run(mode, &names));

        let report = cleanup(&self.benchmark.take_produced());
        debug!(
            "{}: removed {}, missing {}, failed {}",
            mode.label(),
            report.removed,
            report.missing,
            report.failed
        );

        result
    }

    fn settle(&self) {
        debug!("settling for {:?}", self.settle);
        thread::sleep(self.settle);
    }
}
