use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while expanding root paths into the flat file list.
///
/// Any of these aborts the whole enumeration; no partial path set is returned.
#[derive(Error, Debug)]
pub enum TraversalError {
    /// A root or directory entry could not be stat'ed.
    #[error("{path}: {source}")]
    Stat {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A directory was given while recursion is disabled.
    #[error("{0}: is a directory")]
    IsDirectory(PathBuf),
}

impl TraversalError {
    pub fn stat(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Stat {
            path: path.into(),
            source,
        }
    }

    pub fn is_directory(path: impl Into<PathBuf>) -> Self {
        Self::IsDirectory(path.into())
    }
}

/// Errors raised by the per-file scan-and-report primitive.
///
/// End of stream is not an error; a scan that finds no matches succeeds.
#[derive(Error, Debug)]
pub enum ScanError {
    /// The file could not be opened.
    #[error("{path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Reading a line failed mid-stream.
    #[error("{path}: read failed: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Emitting a matched line failed.
    #[error("failed to write match output: {0}")]
    Write(#[source] io::Error),
}

impl ScanError {
    pub fn open(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Open {
            path: path.into(),
            source,
        }
    }

    pub fn read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    pub fn write(source: io::Error) -> Self {
        Self::Write(source)
    }
}

/// Errors raised by one dispatch call.
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The path set contained no entries; no worker was spawned.
    #[error("no files to search")]
    EmptyPathSet,

    /// A worker thread could not be spawned. Work already claimed by earlier
    /// workers may or may not have run; callers must treat the result as
    /// "zero matches processed".
    #[error("failed to spawn worker thread: {0}")]
    SpawnFailed(#[source] io::Error),

    /// At least one worker recorded a scan failure. The failing paths are
    /// reported through the scanner's own diagnostics, not here.
    #[error("one or more files could not be searched")]
    ReportFailed,
}
