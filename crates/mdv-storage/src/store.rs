//! Document discovery and reference resolution.
//!
//! The store walks the root directory on every call. There is no cache and
//! no shared mutable state, so calls are safe from concurrent requests; the
//! only shared resource is the read-only filesystem subtree.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{StoreError, StoreErrorKind};

/// Recognized markdown extensions (compared case-insensitively, without dot).
///
/// A file qualifies as a document if and only if its extension is in this
/// list. The list is a compile-time constant, not runtime-configurable.
pub const DOC_EXTENSIONS: &[&str] = &[
    "md", "markdown", "mdown", "mkd", "mkdn", "mdwn", "mdtxt", "mdtext",
];

/// Check whether a filename carries a recognized markdown extension.
#[must_use]
pub fn is_document(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| DOC_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Strip a recognized markdown extension from a reference or filename.
///
/// Unrecognized extensions are left alone, so `"archive.tar"` stays
/// `"archive.tar"` while `"notes.MD"` becomes `"notes"`.
#[must_use]
pub fn strip_doc_extension(reference: &str) -> &str {
    match reference.rsplit_once('.') {
        Some((stem, ext)) if DOC_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)) => stem,
        _ => reference,
    }
}

/// Reduce a reference or relative path to its bare key: extension stripped,
/// lower-cased. Two paths with the same bare key identify the same document.
fn bare_key(reference: &str) -> String {
    strip_doc_extension(reference).to_lowercase()
}

/// Filesystem document store.
///
/// Holds the root directory, fixed at construction. The caller validates
/// that the root exists before constructing the store; the store does not
/// re-validate it per call.
#[derive(Debug, Clone)]
pub struct DocStore {
    root: PathBuf,
}

impl DocStore {
    /// Create a new store over `root`.
    #[must_use]
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The configured root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// List the relative path of every document beneath the root.
    ///
    /// Paths use forward-slash separators. Order follows directory
    /// iteration order, deterministic for a fixed snapshot but otherwise
    /// unspecified; callers needing a display order must sort.
    ///
    /// # Errors
    ///
    /// Returns a `Traversal` error if any part of the tree cannot be
    /// walked. A partial listing is never returned.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut paths = Vec::new();
        self.walk(&self.root, "", &mut |_, rel| {
            paths.push(rel);
            false
        })?;
        Ok(paths)
    }

    /// Resolve a reference to the full path of exactly one document.
    ///
    /// The reference's recognized extension (if any) is stripped and the
    /// remainder lower-cased; the first document in walk order whose
    /// reduced relative path matches wins and the walk stops. When several
    /// files reduce to the same key (case or extension variants), which
    /// one wins depends on directory iteration order, a documented
    /// limitation, not a tie-breaking guarantee.
    ///
    /// # Errors
    ///
    /// - `NotFound` if no document reduces to the reference's key, or the
    ///   matched file vanished between the walk and the existence re-check
    /// - `InvalidPath` if the reference contains `..` segments
    /// - `Traversal` if the walk itself fails
    pub fn resolve(&self, reference: &str) -> Result<PathBuf, StoreError> {
        validate_reference(reference)?;
        let key = bare_key(reference);

        let mut found = None;
        self.walk(&self.root, "", &mut |abs, rel| {
            if bare_key(&rel) == key {
                found = Some(abs);
                true
            } else {
                false
            }
        })?;

        let path = found.ok_or_else(|| StoreError::not_found(reference))?;

        // The file may have vanished between the walk and use.
        if !path.exists() {
            tracing::debug!(reference, path = %path.display(), "resolved file vanished");
            return Err(StoreError::not_found(reference));
        }

        Ok(path)
    }

    /// Resolve a reference and read the document's content.
    ///
    /// # Errors
    ///
    /// Propagates [`resolve`](Self::resolve) errors; a file that resolves
    /// but cannot be read yields a `Read` error.
    pub fn read(&self, reference: &str) -> Result<String, StoreError> {
        let path = self.resolve(reference)?;
        fs::read_to_string(&path).map_err(|e| StoreError::read(e, path))
    }

    /// Walk `dir`, calling `visit` with (full path, relative path) for every
    /// document. `visit` returns `true` to stop the walk early; the return
    /// value reports whether it did.
    ///
    /// Symlinked entries are skipped outright, so the walk can never select
    /// a file outside the root.
    fn walk(
        &self,
        dir: &Path,
        prefix: &str,
        visit: &mut impl FnMut(PathBuf, String) -> bool,
    ) -> Result<bool, StoreError> {
        let entries = fs::read_dir(dir).map_err(|e| StoreError::traversal(e, dir))?;

        for entry in entries {
            let entry = entry.map_err(|e| StoreError::traversal(e, dir))?;
            let file_type = entry
                .file_type()
                .map_err(|e| StoreError::traversal(e, entry.path()))?;

            if file_type.is_symlink() {
                continue;
            }

            let name = entry.file_name().to_string_lossy().into_owned();

            if file_type.is_dir() {
                let child_prefix = join_rel(prefix, &name);
                if self.walk(&entry.path(), &child_prefix, visit)? {
                    return Ok(true);
                }
            } else if is_document(&name) {
                let rel = join_rel(prefix, &name);
                if visit(entry.path(), rel) {
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }
}

/// Join a relative prefix and a name with a forward slash.
fn join_rel(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_owned()
    } else {
        format!("{prefix}/{name}")
    }
}

/// Reject references with `..` path segments.
///
/// A `..` segment could never match a bare key (keys are derived from
/// walk-relative paths), so this is defense in depth rather than the only
/// containment mechanism.
fn validate_reference(reference: &str) -> Result<(), StoreError> {
    if reference.split(['/', '\\']).any(|seg| seg == "..") {
        return Err(StoreError::new(StoreErrorKind::InvalidPath).with_path(reference));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn create_test_dir() -> tempfile::TempDir {
        tempfile::tempdir().unwrap()
    }

    #[test]
    fn test_is_document() {
        assert!(is_document("notes.md"));
        assert!(is_document("NOTES.MD"));
        assert!(is_document("readme.markdown"));
        assert!(is_document("a.mdown"));
        assert!(is_document("a.mkd"));
        assert!(is_document("a.mkdn"));
        assert!(is_document("a.mdwn"));
        assert!(is_document("a.mdtxt"));
        assert!(is_document("a.mdtext"));

        assert!(!is_document("notes.txt"));
        assert!(!is_document("notes"));
        assert!(!is_document("archive.tar"));
        assert!(!is_document("md"));
    }

    #[test]
    fn test_strip_doc_extension() {
        assert_eq!(strip_doc_extension("notes.md"), "notes");
        assert_eq!(strip_doc_extension("NOTES.MD"), "NOTES");
        assert_eq!(strip_doc_extension("guide.markdown"), "guide");
        assert_eq!(strip_doc_extension("notes"), "notes");
        assert_eq!(strip_doc_extension("archive.tar"), "archive.tar");
        assert_eq!(strip_doc_extension("a/b/notes.md"), "a/b/notes");
        // Dots in directory names are not extensions
        assert_eq!(strip_doc_extension("v1.2/notes"), "v1.2/notes");
    }

    #[test]
    fn test_list_completeness() {
        let dir = create_test_dir();
        fs::write(dir.path().join("guide.md"), "# Guide").unwrap();
        fs::write(dir.path().join("api.markdown"), "# API").unwrap();
        fs::write(dir.path().join("notes.txt"), "not a doc").unwrap();
        fs::write(dir.path().join("image.png"), [0u8; 4]).unwrap();

        let store = DocStore::new(dir.path().to_path_buf());
        let mut paths = store.list().unwrap();
        paths.sort();

        assert_eq!(paths, vec!["api.markdown", "guide.md"]);
    }

    #[test]
    fn test_list_nested() {
        let dir = create_test_dir();
        fs::write(dir.path().join("top.md"), "# Top").unwrap();
        let sub = dir.path().join("guides");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("setup.md"), "# Setup").unwrap();
        let deep = sub.join("advanced");
        fs::create_dir(&deep).unwrap();
        fs::write(deep.join("tuning.mkd"), "# Tuning").unwrap();

        let store = DocStore::new(dir.path().to_path_buf());
        let mut paths = store.list().unwrap();
        paths.sort();

        assert_eq!(
            paths,
            vec!["guides/advanced/tuning.mkd", "guides/setup.md", "top.md"]
        );
    }

    #[test]
    fn test_list_empty_dir() {
        let dir = create_test_dir();

        let store = DocStore::new(dir.path().to_path_buf());

        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_list_missing_root_is_traversal_error() {
        let store = DocStore::new(PathBuf::from("/nonexistent-mdv-root"));

        let err = store.list().unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::Traversal);
    }

    #[test]
    fn test_resolve_extension_agnostic() {
        let dir = create_test_dir();
        fs::write(dir.path().join("notes.md"), "# Notes").unwrap();

        let store = DocStore::new(dir.path().to_path_buf());
        let expected = store.resolve("notes").unwrap();

        for reference in ["notes", "Notes", "NOTES.MD", "notes.md", "NOTES.markdown"] {
            let resolved = store.resolve(reference).unwrap();
            assert_eq!(resolved, expected, "reference: {reference}");
        }
        assert!(expected.ends_with("notes.md"));
    }

    #[test]
    fn test_resolve_nested() {
        let dir = create_test_dir();
        let sub = dir.path().join("Guides");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("Setup.md"), "# Setup").unwrap();

        let store = DocStore::new(dir.path().to_path_buf());

        let resolved = store.resolve("guides/setup").unwrap();
        assert!(resolved.ends_with("Guides/Setup.md"));
    }

    #[test]
    fn test_resolve_no_spurious_match() {
        let dir = create_test_dir();
        fs::write(dir.path().join("guide.md"), "# Guide").unwrap();

        let store = DocStore::new(dir.path().to_path_buf());

        let err = store.resolve("other").unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::NotFound);
        assert_eq!(err.path.as_deref(), Some(Path::new("other")));
    }

    #[test]
    fn test_resolve_does_not_match_non_documents() {
        let dir = create_test_dir();
        fs::write(dir.path().join("notes.txt"), "plain text").unwrap();

        let store = DocStore::new(dir.path().to_path_buf());

        let err = store.resolve("notes").unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::NotFound);
    }

    #[test]
    fn test_resolve_rejects_traversal_references() {
        let dir = create_test_dir();
        fs::write(dir.path().join("guide.md"), "# Guide").unwrap();

        let store = DocStore::new(dir.path().to_path_buf());

        for reference in ["../etc/passwd", "a/../../etc/passwd", "..\\secrets"] {
            let err = store.resolve(reference).unwrap_err();
            assert_eq!(err.kind, StoreErrorKind::InvalidPath, "{reference}");
            assert!(err.is_not_found());
        }
    }

    #[test]
    fn test_resolve_stays_under_root() {
        let dir = create_test_dir();
        let sub = dir.path().join("docs");
        fs::create_dir(&sub).unwrap();
        fs::write(sub.join("inside.md"), "# Inside").unwrap();
        fs::write(dir.path().join("outside.md"), "# Outside").unwrap();

        let store = DocStore::new(sub.clone());

        let resolved = store.resolve("inside").unwrap();
        assert!(resolved.starts_with(&sub));

        // The sibling of the root is invisible
        let err = store.resolve("outside").unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::NotFound);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_are_skipped() {
        let dir = create_test_dir();
        let root = dir.path().join("docs");
        fs::create_dir(&root).unwrap();
        fs::write(root.join("real.md"), "# Real").unwrap();

        // Symlinked file and directory pointing outside the root
        let outside = dir.path().join("outside");
        fs::create_dir(&outside).unwrap();
        fs::write(outside.join("secret.md"), "# Secret").unwrap();
        std::os::unix::fs::symlink(outside.join("secret.md"), root.join("link.md")).unwrap();
        std::os::unix::fs::symlink(&outside, root.join("linked-dir")).unwrap();

        let store = DocStore::new(root);
        let paths = store.list().unwrap();

        assert_eq!(paths, vec!["real.md"]);
        assert!(store.resolve("link").is_err());
        assert!(store.resolve("secret").is_err());
    }

    #[test]
    fn test_read_existing() {
        let dir = create_test_dir();
        fs::write(dir.path().join("guide.md"), "# Guide\n\nContent here.").unwrap();

        let store = DocStore::new(dir.path().to_path_buf());

        assert_eq!(store.read("GUIDE").unwrap(), "# Guide\n\nContent here.");
    }

    #[test]
    fn test_read_missing() {
        let dir = create_test_dir();

        let store = DocStore::new(dir.path().to_path_buf());

        let err = store.read("nonexistent").unwrap_err();
        assert_eq!(err.kind, StoreErrorKind::NotFound);
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DocStore>();
    }
}
