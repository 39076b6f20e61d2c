use std::error::Error;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use argh::FromArgs;
use filecreate::{Driver, DriverConfig, LaunchTiming};

#[derive(FromArgs)]
/// Time sequential, awaited and concurrent creation of small files.
struct Config {
    /// number of files per run
    #[argh(option, short = 'n', default = "1000")]
    count: usize,

    /// size of each file in bytes
    #[argh(option, short = 'p', default = "10240")]
    payload_size: usize,

    /// target directory, defaults to the temporary directory
    #[argh(option, short = 'd')]
    dir: Option<PathBuf>,

    /// file extension
    #[argh(option, short = 'e', default = "String::from(\"tmp\")")]
    extension: String,

    /// pause between runs in milliseconds
    #[argh(option, short = 's', default = "100")]
    settle_ms: u64,

    /// runtime worker threads
    #[argh(option, short = 't')]
    threads: Option<usize>,

    /// start the concurrent timer before launching the writes
    #[argh(switch)]
    include_launch: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let config: Config = argh::from_env();
    let launch_timing = if config.include_launch {
        LaunchTiming::Included
    } else {
        LaunchTiming::Excluded
    };

    let mut driver = Driver::new(DriverConfig {
        count: config.count,
        file_size: config.payload_size,
        dir: config.dir,
        extension: config.extension,
        settle: Duration::from_millis(config.settle_ms),
        launch_timing,
        worker_threads: config.threads,
    })?;

    driver.run(&mut io::stdout())?;
    Ok(())
}
