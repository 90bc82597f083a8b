//! Files served straight from the output directory.

use std::path::{Path, PathBuf};

use path_clean::PathClean;

/// MIME type for a file, by extension. Unknown extensions are served as
/// `application/octet-stream`.
pub fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "html" | "htm" => "text/html; charset=utf-8",
        "js" | "mjs" => "application/javascript",
        "css" => "text/css",
        "json" | "map" => "application/json",
        "webmanifest" => "application/manifest+json",
        "txt" => "text/plain; charset=utf-8",
        "xml" => "application/xml",
        "wasm" => "application/wasm",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "ttf" => "font/ttf",
        "otf" => "font/otf",
        "mp4" => "video/mp4",
        "webm" => "video/webm",
        "m3u8" => "application/vnd.apple.mpegurl",
        _ => "application/octet-stream",
    }
}

/// Join a request path onto `out_dir`, refusing anything that lexically
/// escapes it. The directory itself is never a candidate.
pub fn candidate_path(out_dir: &Path, request_path: &str) -> Option<PathBuf> {
    if request_path.contains('\0') || request_path.contains('\\') {
        return None;
    }

    let relative = request_path.trim_start_matches('/');
    if relative.is_empty() {
        return None;
    }

    let base = out_dir.to_path_buf().clean();
    let joined = base.join(relative).clean();
    (joined.starts_with(&base) && joined != base).then_some(joined)
}

/// Existing regular file under `out_dir` for `request_path`.
///
/// Symlinks are followed, but their target must still live inside
/// `out_dir`.
pub async fn resolve(out_dir: &Path, request_path: &str) -> Option<PathBuf> {
    let candidate = candidate_path(out_dir, request_path)?;

    let metadata = tokio::fs::metadata(&candidate).await.ok()?;
    if !metadata.is_file() {
        return None;
    }

    let real = tokio::fs::canonicalize(&candidate).await.ok()?;
    let real_base = tokio::fs::canonicalize(out_dir).await.ok()?;
    if !real.starts_with(&real_base) {
        tracing::warn!(
            path = %candidate.display(),
            "refusing to serve file outside the output directory"
        );
        return None;
    }

    Some(candidate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("a/index-1a2b.js")), "application/javascript");
        assert_eq!(content_type(Path::new("styles.css")), "text/css");
        assert_eq!(content_type(Path::new("logo.SVG")), "image/svg+xml");
        assert_eq!(content_type(Path::new("font.woff2")), "font/woff2");
        assert_eq!(content_type(Path::new("blob.xyz")), "application/octet-stream");
        assert_eq!(content_type(Path::new("LICENSE")), "application/octet-stream");
    }

    #[test]
    fn test_candidate_path_rejects_traversal() {
        let out = Path::new("/srv/dist");
        assert_eq!(
            candidate_path(out, "/assets/app.js"),
            Some(PathBuf::from("/srv/dist/assets/app.js"))
        );
        assert_eq!(candidate_path(out, "/../secret.txt"), None);
        assert_eq!(candidate_path(out, "/assets/../../secret.txt"), None);
        assert_eq!(candidate_path(out, "/"), None);
        assert_eq!(candidate_path(out, "/a\0b"), None);
    }

    #[test]
    fn test_candidate_path_normalizes_inside() {
        let out = Path::new("/srv/dist");
        assert_eq!(
            candidate_path(out, "/assets/../logo.svg"),
            Some(PathBuf::from("/srv/dist/logo.svg"))
        );
    }

    #[tokio::test]
    async fn test_resolve_only_regular_files() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("assets")).unwrap();
        std::fs::write(temp.path().join("assets/app.js"), "x").unwrap();

        assert!(resolve(temp.path(), "/assets/app.js").await.is_some());
        assert!(resolve(temp.path(), "/assets").await.is_none());
        assert!(resolve(temp.path(), "/missing.js").await.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_resolve_rejects_escaping_symlink() {
        let outside = TempDir::new().unwrap();
        std::fs::write(outside.path().join("secret.txt"), "s").unwrap();
        let out = TempDir::new().unwrap();
        std::os::unix::fs::symlink(outside.path().join("secret.txt"), out.path().join("link.txt"))
            .unwrap();

        assert!(resolve(out.path(), "/link.txt").await.is_none());
    }
}
