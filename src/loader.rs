use crate::error::VmError;
use crate::memory::{Memory, MEMORY_SIZE_BYTES};
use log::info;
use std::fs;
use std::path::Path;

/// Copies the passed bytes into memory starting at the specified offset and returns the new
/// write cursor (the offset one past the last byte written).  Fails with
/// [VmError::LoadOutOfBounds] if the copy would extend beyond the memory space, in which
/// case memory is left unchanged.
///
/// # Arguments
///
/// * `memory` - the memory image to load into
/// * `offset` - the memory address at which the first byte lands
/// * `source` - the bytes to load
pub fn load_bytes(memory: &mut Memory, offset: usize, source: &[u8]) -> Result<usize, VmError> {
    if offset + source.len() > MEMORY_SIZE_BYTES {
        return Err(VmError::LoadOutOfBounds {
            offset,
            length: source.len(),
        });
    }
    if !source.is_empty() {
        memory.write_bytes(offset, source)?;
    }
    Ok(offset + source.len())
}

/// Reads the entire file at the specified path and loads it into memory starting at the
/// specified offset, returning the new write cursor.  I/O failures map to [VmError::RomIo];
/// oversized files map to [VmError::LoadOutOfBounds].
///
/// # Arguments
///
/// * `path` - the file to read
/// * `memory` - the memory image to load into
/// * `offset` - the memory address at which the first byte lands
pub fn load_file(path: &Path, memory: &mut Memory, offset: usize) -> Result<usize, VmError> {
    let bytes = fs::read(path).map_err(|e| VmError::RomIo {
        file_path: path.display().to_string(),
        message: e.to_string(),
    })?;
    info!(
        "loading {} bytes from {} at {:#05X}",
        bytes.len(),
        path.display(),
        offset
    );
    load_bytes(memory, offset, &bytes)
}
