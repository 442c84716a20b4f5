//! Common utilities for lokafit
//!
//! Provides shared functionality for the CLI and the HTTP layer.

use std::path::Path;

/// Read a file fully into memory with consistent error handling
pub fn read_file_bytes<P: AsRef<Path>>(path: P) -> Result<Vec<u8>, String> {
    let path = path.as_ref();
    ensure_file_exists(path)?;
    std::fs::read(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))
}

/// Check if a path exists and is a file
pub fn ensure_file_exists<P: AsRef<Path>>(path: P) -> Result<(), String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(format!("File not found: {}", path.display()));
    }
    if !path.is_file() {
        return Err(format!("Path is not a file: {}", path.display()));
    }
    Ok(())
}

/// Strip any directory components from a client-supplied filename
pub fn sanitize_filename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty())
        .unwrap_or("upload")
        .to_string()
}

/// Portion of a filename before its first `.`
///
/// `shirt.final.jpg` yields `shirt`, unlike [`Path::file_stem`].
pub fn file_stem(filename: &str) -> &str {
    filename.split('.').next().unwrap_or(filename)
}

/// Format file size in human-readable format
pub fn format_file_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.2} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Format duration in human-readable format
pub fn format_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    let millis = duration.subsec_millis();

    if secs >= 60 {
        format!("{}m {}s", secs / 60, secs % 60)
    } else if secs > 0 {
        format!("{}.{:03}s", secs, millis)
    } else {
        format!("{}ms", millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_file_exists_nonexistent() {
        let result = ensure_file_exists("/nonexistent/file.png");
        assert!(result.is_err());
        assert!(result.unwrap_err().starts_with("File not found"));
    }

    #[test]
    fn test_ensure_file_exists_directory() {
        let dir = tempfile::tempdir().unwrap();
        let result = ensure_file_exists(dir.path());
        assert!(result.unwrap_err().starts_with("Path is not a file"));
    }

    #[test]
    fn test_read_file_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("a.bin");
        std::fs::write(&path, [1u8, 2, 3]).unwrap();
        assert_eq!(read_file_bytes(&path).unwrap(), vec![1, 2, 3]);
        assert!(read_file_bytes(dir.path().join("missing.bin")).is_err());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("shirt.jpg"), "shirt.jpg");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("/tmp/photos/face.png"), "face.png");
        assert_eq!(sanitize_filename(""), "upload");
        assert_eq!(sanitize_filename(".."), "upload");
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(file_stem("shirt.jpg"), "shirt");
        assert_eq!(file_stem("shirt.final.jpg"), "shirt");
        assert_eq!(file_stem("noext"), "noext");
        assert_eq!(file_stem(".hidden"), "");
    }

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 B");
        assert_eq!(format_file_size(500), "500 B");
        assert_eq!(format_file_size(1536), "1.50 KB");
        assert_eq!(format_file_size(10 * 1024 * 1024), "10.00 MB");
        assert_eq!(format_file_size(1073741824), "1.00 GB");
    }

    #[test]
    fn test_format_duration() {
        use std::time::Duration;

        assert_eq!(format_duration(Duration::from_millis(500)), "500ms");
        assert_eq!(format_duration(Duration::from_secs(5)), "5.000s");
        assert_eq!(format_duration(Duration::from_secs(65)), "1m 5s");
    }
}
