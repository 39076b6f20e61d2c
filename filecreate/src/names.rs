use std::env;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::Error;

const TEMP_VARS: [&str; 3] = ["TMPDIR", "TEMP", "TMP"];

/// Produces the unique stem of each generated file name
pub trait NameStrategy: Send {
    fn next_name(&mut self) -> String;
}

/// Random v4 uuid in its 32 character simple form
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidNames;

impl NameStrategy for UuidNames {
    fn next_name(&mut self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// `<prefix><n>` with a counter that never repeats for the lifetime of the strategy
#[derive(Debug, Clone)]
pub struct CountingNames {
    prefix: String,
    next: u64,
}

impl CountingNames {
    pub fn new(prefix: &str) -> CountingNames {
        CountingNames {
            prefix: prefix.to_owned(),
            next: 0,
        }
    }
}

impl NameStrategy for CountingNames {
    fn next_name(&mut self) -> String {
        let name = format!("{}{}", self.prefix, self.next);
        self.next += 1;
        name
    }
}

/// Resolves the target directory. An explicit directory wins, otherwise the
/// first of `TMPDIR`, `TEMP` and `TMP` that is set, otherwise the platform default.
pub fn resolve_dir(dir: Option<PathBuf>) -> Result<PathBuf, Error> {
    let dir = dir
        .or_else(|| TEMP_VARS.iter().find_map(|var| env::var_os(var)).map(PathBuf::from))
        .unwrap_or_else(env::temp_dir);

    if !dir.is_dir() {
        return Err(Error::TempDir(dir));
    }

    Ok(dir)
}

pub struct NameGenerator {
    dir: PathBuf,
    extension: String,
    strategy: Box<dyn NameStrategy>,
}

impl NameGenerator {
    pub fn new(dir: PathBuf, extension: &str, strategy: Box<dyn NameStrategy>) -> NameGenerator {
        NameGenerator {
            dir,
            extension: extension.trim_start_matches('.').to_owned(),
            strategy,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `count` paths under the configured directory, in generation order
    pub fn generate(&mut self, count: usize) -> Vec<PathBuf> {
        (0..count)
            .map(|_| {
                let mut name = self.strategy.next_name();
                if !self.extension.is_empty() {
                    name.push('.');
                    name.push_str(&self.extension);
                }
                self.dir.join(name)
            })
            .collect()
    }
}
