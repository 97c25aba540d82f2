//! Filesystem helpers for writing results back in place.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

/// Overwrite an existing regular file with `contents`.
///
/// Symlinks are followed, so a link argument rewrites its target. The file is
/// truncated and rewritten through the existing inode, so its permissions and
/// ownership stay as they were. Refuses a path that no longer exists or no
/// longer resolves to a regular file.
pub(crate) fn write_in_place(path: &Path, contents: &[u8]) -> io::Result<()> {
    let meta = fs::metadata(path)?;
    if !meta.is_file() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "not a regular file",
        ));
    }
    let mut file = OpenOptions::new().write(true).truncate(true).open(path)?;
    file.write_all(contents)?;
    file.flush()
}
