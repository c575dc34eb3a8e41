//! Destination checks for the files `diff` and `apply` write.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A file a command reads, labelled by the part it plays.
#[derive(Debug, Clone, Copy)]
pub struct Input<'a> {
    pub role: &'static str,
    pub path: &'a Path,
}

impl<'a> Input<'a> {
    pub fn new(role: &'static str, path: &'a Path) -> Self {
        Self { role, path }
    }
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("output {} is the {role} file; pick another destination", output.display())]
    Clobbers { output: PathBuf, role: &'static str },
    #[error("cannot resolve {}: {source}", path.display())]
    Resolve { path: PathBuf, source: io::Error },
}

/// Fail when `output` names the same file as one of `inputs`.
pub fn guard_output(output: &Path, inputs: &[Input<'_>]) -> Result<(), OutputError> {
    let target = resolve(output)?;
    for input in inputs {
        if resolve(input.path)? == target {
            return Err(OutputError::Clobbers {
                output: output.to_path_buf(),
                role: input.role,
            });
        }
    }
    Ok(())
}

// A file that does not exist yet resolves through its parent directory.
fn resolve(path: &Path) -> Result<PathBuf, OutputError> {
    let failed = |source: io::Error| OutputError::Resolve {
        path: path.to_path_buf(),
        source,
    };

    if path.exists() {
        return fs::canonicalize(path).map_err(failed);
    }

    let parent = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };
    let name = path
        .file_name()
        .ok_or_else(|| failed(io::Error::new(io::ErrorKind::InvalidInput, "no file name")))?;
    Ok(fs::canonicalize(parent).map_err(failed)?.join(name))
}
