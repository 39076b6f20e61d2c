use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("temporary directory `{0}` is unavailable")]
    TempDir(PathBuf),
    #[error("failed to create `{path}`: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write task did not complete `{0}`")]
    Join(#[from] tokio::task::JoinError),
    #[error("runtime needs at least one worker thread")]
    NoWorkerThreads,
    #[error("failed to start runtime `{0}`")]
    Runtime(#[source] io::Error),
    #[error("failed to report result `{0}`")]
    Report(#[source] io::Error),
}

impl Error {
    pub(crate) fn write(path: &Path) -> impl FnOnce(io::Error) -> Error + '_ {
        move |source| Error::Write {
            path: path.to_owned(),
            source,
        }
    }

    /// True when a write failed because its target path was already taken
    pub fn is_already_exists(&self) -> bool {
        match self {
            Error::Write { source, .. } => source.kind() == io::ErrorKind::AlreadyExists,
            _ => false,
        }
    }
}
