//! Filesystem adapter for reading report text and writing exports
//!
//! Keeps all file and stdin/stdout handling out of the core pipeline: the
//! services only ever see strings.

use std::io::Read;
use std::path::Path;
use tracing::debug;

use crate::{Error, Result};

/// Read report text from a file, or from stdin when no path is given
pub fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "reading input file");
            std::fs::read_to_string(path)
                .map_err(|e| Error::io(format!("Failed to read {}", path.display()), e))
        }
        None => {
            debug!("reading input from stdin");
            let mut text = String::new();
            std::io::stdin()
                .read_to_string(&mut text)
                .map_err(|e| Error::io("Failed to read from stdin", e))?;
            Ok(text)
        }
    }
}

/// Write exported text to a file, or to stdout when no path is given.
///
/// Parent directories are created as needed.
pub fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() && !parent.exists() {
                    std::fs::create_dir_all(parent).map_err(|e| {
                        Error::io(format!("Failed to create {}", parent.display()), e)
                    })?;
                }
            }
            debug!(path = %path.display(), bytes = content.len(), "writing output file");
            std::fs::write(path, content)
                .map_err(|e| Error::io(format!("Failed to write {}", path.display()), e))
        }
        None => {
            use std::io::Write;
            let mut stdout = std::io::stdout();
            stdout
                .write_all(content.as_bytes())
                .and_then(|_| stdout.write_all(b"\n"))
                .map_err(|e| Error::io("Failed to write to stdout", e))
        }
    }
}
