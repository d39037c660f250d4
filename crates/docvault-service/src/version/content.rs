//! Content hashing and MIME detection.

use sha2::{Digest, Sha256};

/// SHA-256 hex digest of content.
pub fn sha256_hex(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Detect MIME type from the path's file extension.
pub fn detect_mime_type(path: &str) -> &'static str {
    let extension = path
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_ascii_lowercase();

    match extension.as_str() {
        "pdf" => "application/pdf",
        "txt" => "text/plain",
        "md" => "text/markdown",
        "html" => "text/html",
        "doc" => "application/msword",
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "json" => "application/json",
        "xml" => "application/xml",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sha256_hex_is_deterministic() {
        let a = sha256_hex("same content");
        let b = sha256_hex("same content");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, sha256_hex("other content"));
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            sha256_hex(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_detect_mime_type_known_extensions() {
        assert_eq!(detect_mime_type("policy.pdf"), "application/pdf");
        assert_eq!(detect_mime_type("notes/README.MD"), "text/markdown");
        assert!(detect_mime_type("contract.docx").starts_with("application/vnd"));
    }

    #[test]
    fn test_detect_mime_type_unknown_falls_back() {
        assert_eq!(detect_mime_type("archive.tar.zst"), "application/octet-stream");
        assert_eq!(detect_mime_type("no-extension"), "application/octet-stream");
    }
}
