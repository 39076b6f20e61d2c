use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;

use tokio::io::AsyncWriteExt;

use crate::Error;

/// Creates `path`, writes all of `buffer` and syncs it to storage, blocking the
/// calling thread. Fails if `path` already exists.
pub fn create_file(buffer: &[u8], path: &Path) -> Result<(), Error> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(Error::write(path))?;

    file.write_all(buffer).map_err(Error::write(path))?;
    file.flush().map_err(Error::write(path))?;
    file.sync_data().map_err(Error::write(path))?;
    Ok(())
}

/// Same effect as [`create_file`] but yields to the runtime while the write is in flight
pub async fn create_file_async(buffer: &[u8], path: &Path) -> Result<(), Error> {
    let mut file = tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
        .map_err(Error::write(path))?;

    file.write_all(buffer).await.map_err(Error::write(path))?;
    file.flush().await.map_err(Error::write(path))?;
    file.sync_data().await.map_err(Error::write(path))?;
    Ok(())
}
