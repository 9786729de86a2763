#![forbid(unsafe_code)]

use std::fs;
use std::io;
use std::path::Path;

/// Decode little-endian `f32` values from raw bytes. Fails when the byte
/// count is not a multiple of four.
pub fn f32_from_le_bytes(buf: &[u8]) -> io::Result<Vec<f32>> {
    if buf.len() % 4 != 0 {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} bytes is not a whole number of f32 values", buf.len()),
        ));
    }
    Ok(buf
        .chunks_exact(4)
        .filter_map(|b| <[u8; 4]>::try_from(b).ok())
        .map(f32::from_le_bytes)
        .collect())
}

/// Load a file of little-endian `f32` values.
pub fn load_f32_file(path: &Path) -> io::Result<Vec<f32>> {
    let buf = fs::read(path)?;
    f32_from_le_bytes(&buf)
}
