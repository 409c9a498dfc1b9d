//! MD5 content digests for upload verification
//!
//! The object store reports the MD5 of a stored object through its ETag
//! header, so MD5 is the digest compared on both sides.

use crate::error::Result;
use std::io::Read;
use std::path::Path;

/// Compute the MD5 digest of a byte slice as lowercase hex
pub fn compute_checksum(data: &[u8]) -> String {
    hex::encode(md5::compute(data).0)
}

/// Compute the MD5 digest of a file as lowercase hex
///
/// Reads the file in 8 KiB chunks so large files never have to fit in memory.
pub fn compute_file_checksum(path: impl AsRef<Path>) -> Result<String> {
    let mut file = std::fs::File::open(path.as_ref())?;
    let mut context = md5::Context::new();
    let mut buffer = [0u8; 8192];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        context.consume(&buffer[..bytes_read]);
    }

    Ok(hex::encode(context.compute().0))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_compute_checksum() {
        let checksum = compute_checksum(b"hello world");
        // MD5 of "hello world"
        assert_eq!(checksum, "5eb63bbbe01eeed093cb22bb8f5acdc3");
    }

    #[test]
    fn test_compute_checksum_empty() {
        let checksum = compute_checksum(b"");
        // MD5 of the empty string
        assert_eq!(checksum, "d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn test_compute_file_checksum() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"test data").unwrap();
        temp_file.flush().unwrap();

        let checksum = compute_file_checksum(temp_file.path()).unwrap();
        assert_eq!(checksum, "eb733a00c0c9d336e65691a37ab54293");
    }

    #[test]
    fn test_compute_file_checksum_missing_file() {
        let result = compute_file_checksum("/nonexistent/path/to/file");
        assert!(result.is_err());
    }

    #[test]
    fn test_checksum_is_deterministic() {
        let mut temp_file = NamedTempFile::new().unwrap();
        let data = vec![42u8; 1024 * 1024];
        temp_file.write_all(&data).unwrap();
        temp_file.flush().unwrap();

        let first = compute_file_checksum(temp_file.path()).unwrap();
        let second = compute_file_checksum(temp_file.path()).unwrap();
        assert_eq!(first, second);

        // Digest of the same bytes matches regardless of how they were read
        assert_eq!(first, compute_checksum(&data));
        assert_eq!(first.len(), 32);
    }
}
