use crate::{EnvTokenError, Result};
use std::fs;
use std::path::Path;

/// Overwrite `path` with `content`, keeping the file's permission bits.
///
/// Not atomic: the file is truncated and rewritten in place, with no
/// backup of the previous content.
pub fn write_in_place(path: &Path, content: &[u8]) -> Result<()> {
    let write_error = |source| EnvTokenError::FileWrite {
        path: path.to_path_buf(),
        source,
    };

    let permissions = fs::metadata(path).map_err(write_error)?.permissions();
    fs::write(path, content).map_err(write_error)?;
    fs::set_permissions(path, permissions).map_err(write_error)?;
    Ok(())
}

/// Read the whole of `path` as raw bytes
pub fn read(path: &Path) -> Result<Vec<u8>> {
    fs::read(path).map_err(|source| EnvTokenError::FileRead {
        path: path.to_path_buf(),
        source,
    })
}
