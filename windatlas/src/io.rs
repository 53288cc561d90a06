//! File helpers shared by the record, boundary and catalog loaders.
//!
//! Inputs may be plain or gzip-compressed (detected by a `.gz`
//! extension). Outputs are written whole and identified by the SHA-256 of
//! their bytes so reruns can be compared.

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use sha2::{Digest, Sha256};

/// Open a file for reading, transparently decompressing `.gz`.
pub fn open_input(path: &Path) -> io::Result<Box<dyn Read>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    if is_gzip(path) {
        Ok(Box::new(GzDecoder::new(reader)))
    } else {
        Ok(Box::new(reader))
    }
}

/// Read a whole input (gzip-aware) into memory.
pub fn read_input(path: &Path) -> io::Result<Vec<u8>> {
    let mut reader = open_input(path)?;
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    Ok(bytes)
}

/// Write bytes, creating parent directories. Returns the hex digest.
pub fn write_output(path: &Path, bytes: &[u8]) -> io::Result<String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    std::fs::write(path, bytes)?;
    Ok(digest(bytes))
}

/// Lowercase hex SHA-256.
pub fn digest(bytes: &[u8]) -> String {
    let hash = Sha256::digest(bytes);
    hash.iter().map(|b| format!("{:02x}", b)).collect()
}

fn is_gzip(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.eq_ignore_ascii_case("gz"))
        .unwrap_or(false)
}
