//! URL to filesystem path resolution.

use std::path::{Path, PathBuf};

use percent_encoding::percent_decode_str;

/// Resolve a request URL to a file under `serve_root`.
///
/// Directories resolve to their `index.html`. Anything missing, or
/// resolving outside the root (through `..` or symlinks), is `None`.
pub fn resolve_path(url: &str, serve_root: &Path) -> Option<PathBuf> {
    let clean = normalize_url(url)?;

    if clean.split('/').any(|segment| segment == "..") {
        return None;
    }

    let local = serve_root.join(&clean);

    let canonical = local.canonicalize().ok()?;
    let root_canonical = serve_root.canonicalize().ok()?;
    if !canonical.starts_with(&root_canonical) {
        return None;
    }

    if canonical.is_file() {
        return Some(canonical);
    }

    if canonical.is_dir() {
        let index = canonical.join("index.html");
        if index.is_file() {
            return Some(index);
        }
    }

    None
}

/// Strip query and fragment, percent-decode, trim slashes.
///
/// `None` when the decoded path is not UTF-8 or contains NUL.
fn normalize_url(url: &str) -> Option<String> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let decoded = percent_decode_str(path).decode_utf8().ok()?;
    if decoded.contains('\0') {
        return None;
    }
    let decoded = decoded.replace('\\', "/");
    Some(decoded.trim_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("public/css")).unwrap();
        fs::write(dir.path().join("public/index.html"), "<html>").unwrap();
        fs::write(dir.path().join("public/css/hal.css"), ".a{}").unwrap();
        fs::write(dir.path().join("public/my file.txt"), "x").unwrap();
        fs::write(dir.path().join("secret.txt"), "secret").unwrap();
        dir
    }

    #[test]
    fn test_normalize_url() {
        assert_eq!(normalize_url("/css/hal.css?v=1").as_deref(), Some("css/hal.css"));
        assert_eq!(normalize_url("/a%20b/#top").as_deref(), Some("a b"));
        assert_eq!(normalize_url("/").as_deref(), Some(""));
        assert!(normalize_url("/%FF").is_none());
        assert!(normalize_url("/a%00b").is_none());
    }

    #[test]
    fn test_resolve_file_and_index() {
        let dir = site();
        let root = dir.path().join("public");
        let canonical = root.canonicalize().unwrap();

        assert_eq!(resolve_path("/css/hal.css", &root), Some(canonical.join("css/hal.css")));
        assert_eq!(resolve_path("/", &root), Some(canonical.join("index.html")));
        assert_eq!(resolve_path("/my%20file.txt", &root), Some(canonical.join("my file.txt")));
        assert_eq!(resolve_path("/css", &root), None);
        assert_eq!(resolve_path("/missing.js", &root), None);
    }

    #[test]
    fn test_traversal_rejected() {
        let dir = site();
        let root = dir.path().join("public");

        assert_eq!(resolve_path("/../secret.txt", &root), None);
        assert_eq!(resolve_path("/%2e%2e/secret.txt", &root), None);
        assert_eq!(resolve_path("/css/..%2f..%2fsecret.txt", &root), None);
        assert_eq!(resolve_path("/..%5csecret.txt", &root), None);
    }
}
