//! Input handling: read the report payload and verify it is a PDF.
//!
//! Validating the `%PDF` magic bytes up front means callers get a precise
//! decode error instead of a confusing parser failure several stages later.

use crate::error::AuditError;
use std::path::Path;
use tracing::debug;

/// Read a local PDF file, validating existence, permission, and magic bytes.
pub fn read_pdf(path: impl AsRef<Path>) -> Result<Vec<u8>, AuditError> {
    let path = path.as_ref();

    let bytes = match std::fs::read(path) {
        Ok(b) => b,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AuditError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(AuditError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        Err(e) => {
            return Err(AuditError::Internal(format!(
                "Failed to read '{}': {e}",
                path.display()
            )));
        }
    };

    check_magic(&bytes, path)?;
    debug!("Read {} bytes from {}", bytes.len(), path.display());
    Ok(bytes)
}

/// Verify the payload starts with the PDF magic bytes.
pub fn check_magic(bytes: &[u8], path: &Path) -> Result<(), AuditError> {
    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        let n = bytes.len().min(4);
        magic[..n].copy_from_slice(&bytes[..n]);
        return Err(AuditError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }
    Ok(())
}
