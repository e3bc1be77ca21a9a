//! Document backends behind the viewer's opener traits

#[cfg(feature = "pdf")]
mod pdf;
mod raster;

#[cfg(feature = "pdf")]
pub use self::pdf::{MupdfDocument, MupdfOpener, MupdfPage};

/// Local filesystem path for a document URL.
///
/// Plain paths pass through; `file://` URLs are stripped to their path.
/// Other schemes are rejected.
pub fn local_path(url: &str) -> Result<&str, String> {
    if let Some(path) = url.strip_prefix("file://") {
        return Ok(path);
    }
    match url.split_once("://") {
        Some((scheme, _)) => Err(format!("unsupported URL scheme '{scheme}'")),
        None => Ok(url),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_path_accepts_paths_and_file_urls() {
        assert_eq!(local_path("/tmp/a.pdf"), Ok("/tmp/a.pdf"));
        assert_eq!(local_path("notes/b.pdf"), Ok("notes/b.pdf"));
        assert_eq!(local_path("file:///tmp/a.pdf"), Ok("/tmp/a.pdf"));
    }

    #[test]
    fn local_path_rejects_remote_schemes() {
        assert!(local_path("https://example.com/a.pdf").is_err());
    }
}
