use std::io;
use std::path::PathBuf;
use std::process::ExitStatus;

/// Errors surfaced for a single input line. The shell reports them and keeps going.
#[derive(Debug, thiserror::Error)]
pub enum ShellError {
    #[error("cat: {path}: No such file or directory")]
    NoSuchFile { path: String },
    #[error("{name}: command not found")]
    CommandNotFound { name: String },
    #[error("{name}: {source}")]
    Spawn {
        name: String,
        #[source]
        source: io::Error,
    },
    #[error("{name}: {status}")]
    Exited { name: String, status: ExitStatus },
    #[error("{}: {source}", path.display())]
    Redirect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("write error: {0}")]
    Stdout(#[source] io::Error),
    #[error("{0}")]
    Usage(&'static str),
}

pub type ShellResult<T> = Result<T, ShellError>;
