use std::ffi::OsStr;
use std::fs::Metadata;
use std::path::{Component, Path, PathBuf};

/// Ordered list of directories consulted to locate external programs.
#[derive(Debug, Clone, Default)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(dirs: Vec<PathBuf>) -> Self {
        Self { dirs }
    }

    /// Splits a `PATH`-style value with the platform separator, skipping empty entries.
    pub fn parse(value: &OsStr) -> Self {
        Self::new(
            std::env::split_paths(value)
                .filter(|dir| !dir.as_os_str().is_empty())
                .collect(),
        )
    }

    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Finds the first executable regular file called `command`, trying
    /// directories in order. Relative directories are taken from `cwd`.
    pub fn resolve(&self, command: &str, cwd: &Path) -> Option<PathBuf> {
        if command.is_empty() || command.contains('/') {
            return None;
        }

        let found = self.dirs.iter().map(|dir| dir.join(command)).find(|candidate| {
            std::fs::metadata(cwd.join(candidate))
                .map(|m| is_executable(&m))
                .unwrap_or(false)
        });
        log::trace!("resolve {command:?} -> {found:?}");
        found
    }
}

/// A regular file with at least one execute bit set.
pub fn is_executable(metadata: &Metadata) -> bool {
    #[cfg(unix)]
    use std::os::unix::fs::PermissionsExt;

    metadata.is_file() && {
        #[cfg(unix)]
        {
            metadata.permissions().mode() & 0o111 != 0
        }
        #[cfg(not(unix))]
        {
            true
        }
    }
}

/// Removes `.` and `..` components without touching the filesystem.
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() && !out.has_root() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    if out.as_os_str().is_empty() {
        out.push(".");
    }
    out
}
