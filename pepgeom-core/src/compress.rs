//! Compression utilities with algorithm auto-detection.
//!
//! Structure archives are distributed gzip-compressed, some mirrors re-pack
//! them with zstd, and local working copies are often plain text. [`read_maybe_compressed`]
//! accepts all three.

use std::io::{Read, Write};
use std::path::Path;

use crate::{PepgeomError, Result};

/// Supported compression algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Zstd,
    Gzip,
}

/// Compress data using zstd at the given level (1–22).
pub fn zstd_compress(data: &[u8], level: i32) -> Result<Vec<u8>> {
    zstd::encode_all(data, level).map_err(|e| PepgeomError::Compression(e.to_string()))
}

/// Decompress zstd data.
pub fn zstd_decompress(data: &[u8]) -> Result<Vec<u8>> {
    zstd::decode_all(data).map_err(|e| PepgeomError::Compression(e.to_string()))
}

/// Compress data using gzip at the given level (0–9).
pub fn gzip_compress(data: &[u8], level: u32) -> Result<Vec<u8>> {
    use flate2::write::GzEncoder;
    use flate2::Compression;

    let mut encoder = GzEncoder::new(Vec::new(), Compression::new(level));
    encoder
        .write_all(data)
        .map_err(|e| PepgeomError::Compression(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| PepgeomError::Compression(e.to_string()))
}

/// Decompress gzip data. Multi-member archives are read to the end.
pub fn gzip_decompress(data: &[u8]) -> Result<Vec<u8>> {
    use flate2::read::MultiGzDecoder;

    let mut decoder = MultiGzDecoder::new(data);
    let mut decompressed = Vec::new();
    decoder
        .read_to_end(&mut decompressed)
        .map_err(|e| PepgeomError::Compression(e.to_string()))?;
    Ok(decompressed)
}

/// Detect the compression algorithm from the magic bytes of `data`.
///
/// Returns `None` if the data does not match a known format.
pub fn detect_algorithm(data: &[u8]) -> Option<Algorithm> {
    if data.len() >= 4 && data[..4] == [0x28, 0xB5, 0x2F, 0xFD] {
        Some(Algorithm::Zstd)
    } else if data.len() >= 2 && data[..2] == [0x1F, 0x8B] {
        Some(Algorithm::Gzip)
    } else {
        None
    }
}

/// Decompress data if it carries a known magic number, otherwise hand it back
/// unchanged.
pub fn decompress_or_passthrough(data: Vec<u8>) -> Result<Vec<u8>> {
    match detect_algorithm(&data) {
        Some(Algorithm::Zstd) => zstd_decompress(&data),
        Some(Algorithm::Gzip) => gzip_decompress(&data),
        None => Ok(data),
    }
}

/// Read a file from disk, transparently decompressing gzip or zstd content.
pub fn read_maybe_compressed(path: impl AsRef<Path>) -> Result<Vec<u8>> {
    let path = path.as_ref();
    let raw = std::fs::read(path).map_err(|e| PepgeomError::io_at(path, e))?;
    decompress_or_passthrough(raw).map_err(|e| match e {
        PepgeomError::Compression(msg) => {
            PepgeomError::Compression(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_zstd() {
        let compressed = zstd_compress(b"test", 3).unwrap();
        assert_eq!(detect_algorithm(&compressed), Some(Algorithm::Zstd));
    }

    #[test]
    fn test_detect_gzip() {
        let compressed = gzip_compress(b"test", 6).unwrap();
        assert_eq!(detect_algorithm(&compressed), Some(Algorithm::Gzip));
    }

    #[test]
    fn test_detect_plain_pdb_text() {
        assert_eq!(detect_algorithm(b"HEADER    HYDROLASE"), None);
    }

    #[test]
    fn test_passthrough_plain() {
        let text = b"ATOM      1  N   ALA A   1".to_vec();
        assert_eq!(decompress_or_passthrough(text.clone()).unwrap(), text);
    }

    #[test]
    fn test_passthrough_decodes_both_formats() {
        let original = b"ATOM      2  CA  ALA A   1".to_vec();
        let gz = gzip_compress(&original, 6).unwrap();
        let zs = zstd_compress(&original, 3).unwrap();
        assert_eq!(decompress_or_passthrough(gz).unwrap(), original);
        assert_eq!(decompress_or_passthrough(zs).unwrap(), original);
    }

    #[test]
    fn test_truncated_gzip_is_error() {
        let mut gz = gzip_compress(b"some structure text that is long enough", 6).unwrap();
        gz.truncate(gz.len() / 2);
        assert!(matches!(
            decompress_or_passthrough(gz),
            Err(PepgeomError::Compression(_))
        ));
    }

    #[test]
    fn test_read_maybe_compressed_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pdb1abc.ent.gz");
        std::fs::write(&path, gzip_compress(b"END\n", 6).unwrap()).unwrap();
        assert_eq!(read_maybe_compressed(&path).unwrap(), b"END\n".to_vec());
    }

    #[test]
    fn test_read_missing_file_names_path() {
        let err = read_maybe_compressed("/nonexistent/pdb9zzz.ent.gz").unwrap_err();
        assert!(err.to_string().contains("pdb9zzz.ent.gz"));
    }
}
