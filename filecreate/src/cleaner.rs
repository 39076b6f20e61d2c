use std::fs;
use std::io;
use std::path::PathBuf;

use log::{debug, warn};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct CleanupReport {
    pub removed: usize,
    pub missing: usize,
    pub failed: usize,
}

/// Best effort removal of every path. Failures are logged and counted, never returned.
pub fn cleanup(paths: &[PathBuf]) -> CleanupReport {
    let mut report = CleanupReport::default();
    for path in paths {
        match fs::remove_file(path) {
            Ok(()) => report.removed += 1,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("{} already gone", path.display());
                report.missing += 1;
            }
            Err(e) => {
                warn!("failed to remove {}: {}", path.display(), e);
                report.failed += 1;
            }
        }
    }

    report
}
