//! Compares three ways of creating many small files: blocking writes in a loop,
//! awaited async writes in a loop and async writes launched together and joined once.

pub mod buffer;
pub mod cleaner;
pub mod driver;
mod error;
pub mod names;
pub mod runner;
pub mod writer;

pub use buffer::BufferFactory;
pub use cleaner::{cleanup, CleanupReport};
pub use driver::{Driver, DriverConfig};
pub use error::Error;
pub use names::{resolve_dir, CountingNames, NameGenerator, NameStrategy, UuidNames};
pub use runner::{Benchmark, BenchmarkResult, LaunchTiming, Mode};
pub use writer::{create_file, create_file_async};
