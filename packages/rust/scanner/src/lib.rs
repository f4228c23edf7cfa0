//! Working-directory scanning and article indexing.
//!
//! The scanner looks exactly one level deep: CSV link lists sit directly in the
//! working directory, and every immediate subdirectory is an article folder
//! whose `.md` files are indexed by name. File contents are never read here.

use std::ffi::OsStr;
use std::path::Path;

use tracing::{debug, instrument};

use menuforge_shared::{ArticleIndex, ListingOrder, MenuforgeError, Result};

/// Suffix identifying link list files.
pub const CSV_SUFFIX: &str = ".csv";

/// Suffix identifying article files.
pub const MARKDOWN_SUFFIX: &str = ".md";

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

/// Everything the pipeline needs to know about a working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Listing {
    /// CSV file names directly inside the working directory.
    pub csv_files: Vec<String>,
    /// Names of immediate child directories.
    pub subdirectories: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EntryKind {
    File,
    Dir,
    Other,
}

#[derive(Debug)]
struct Entry {
    name: String,
    kind: EntryKind,
}

/// Scan `working_dir` once for both CSV files and subdirectories.
#[instrument(skip_all, fields(dir = %working_dir.display()))]
pub fn scan(working_dir: &Path, order: ListingOrder) -> Result<Listing> {
    let entries = read_entries(working_dir, order, |name, kind| {
        kind == EntryKind::Dir || (kind == EntryKind::File && has_suffix(name, CSV_SUFFIX))
    })?;

    let mut listing = Listing::default();
    for entry in entries {
        match entry.kind {
            EntryKind::File if entry.name.ends_with(CSV_SUFFIX) => {
                listing.csv_files.push(entry.name)
            }
            EntryKind::Dir => listing.subdirectories.push(entry.name),
            _ => {}
        }
    }

    debug!(
        csv_files = listing.csv_files.len(),
        subdirectories = listing.subdirectories.len(),
        "working directory scanned"
    );
    Ok(listing)
}

/// List the CSV files directly inside `working_dir`.
pub fn list_csv_files(working_dir: &Path, order: ListingOrder) -> Result<Vec<String>> {
    Ok(scan(working_dir, order)?.csv_files)
}

/// List the immediate subdirectories of `working_dir` (non-recursive).
pub fn list_subdirectories(working_dir: &Path, order: ListingOrder) -> Result<Vec<String>> {
    Ok(scan(working_dir, order)?.subdirectories)
}

/// Index the Markdown files directly inside `<working_dir>/<subdirectory>`.
///
/// Keys follow listing order starting at `article_0`. Nested folders and
/// non-Markdown files are ignored.
#[instrument(skip(working_dir, order))]
pub fn index_articles(
    subdirectory: &str,
    working_dir: &Path,
    order: ListingOrder,
) -> Result<ArticleIndex> {
    let folder = working_dir.join(subdirectory);
    let index: ArticleIndex = read_entries(&folder, order, |name, kind| {
        kind == EntryKind::File && has_suffix(name, MARKDOWN_SUFFIX)
    })?
    .into_iter()
    .map(|e| e.name)
    .collect();

    debug!(articles = index.len(), "article folder indexed");
    Ok(index)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read one directory level, classifying entries by what they point at.
///
/// `keep` sees the raw name before decoding, so entries it rejects never need
/// a UTF-8 name. A kept entry whose name is not UTF-8 is a validation error.
fn read_entries(
    dir: &Path,
    order: ListingOrder,
    keep: impl Fn(&OsStr, EntryKind) -> bool,
) -> Result<Vec<Entry>> {
    let reader = std::fs::read_dir(dir).map_err(|e| MenuforgeError::io(dir, e))?;

    let mut entries = Vec::new();
    for entry in reader {
        let entry = entry.map_err(|e| MenuforgeError::io(dir, e))?;
        let path = entry.path();
        let kind = classify(&path);
        let raw = entry.file_name();
        if !keep(&raw, kind) {
            continue;
        }

        let name = raw.into_string().map_err(|_| non_utf8_name(&path))?;
        entries.push(Entry { name, kind });
    }

    if order == ListingOrder::Name {
        entries.sort_by(|a, b| a.name.cmp(&b.name));
    }

    Ok(entries)
}

/// Follow symlinks; dangling links count as neither file nor directory.
fn classify(path: &Path) -> EntryKind {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_dir() => EntryKind::Dir,
        Ok(meta) if meta.is_file() => EntryKind::File,
        _ => EntryKind::Other,
    }
}

fn has_suffix(name: &OsStr, suffix: &str) -> bool {
    name.as_encoded_bytes().ends_with(suffix.as_bytes())
}

fn non_utf8_name(path: &Path) -> MenuforgeError {
    MenuforgeError::validation(format!(
        "entry name is not valid UTF-8: {}",
        path.display()
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    use menuforge_shared::ArticleKey;

    fn touch(path: &Path) {
        std::fs::write(path, "").unwrap();
    }

    fn fixture() -> tempfile::TempDir {
        let tmp = tempfile::tempdir().unwrap();
        let root = tmp.path();

        touch(&root.join("friends.csv"));
        touch(&root.join("tools.csv"));
        touch(&root.join("notes.txt"));
        touch(&root.join("archive.csv.bak"));

        std::fs::create_dir(root.join("blog")).unwrap();
        touch(&root.join("blog/first.md"));
        touch(&root.join("blog/second.md"));
        touch(&root.join("blog/cover.png"));
        std::fs::create_dir(root.join("blog/drafts")).unwrap();
        touch(&root.join("blog/drafts/hidden.md"));

        std::fs::create_dir(root.join("projects")).unwrap();
        tmp
    }

    #[test]
    fn scan_separates_csv_files_and_folders() {
        let tmp = fixture();
        let listing = scan(tmp.path(), ListingOrder::Name).unwrap();

        assert_eq!(listing.csv_files, ["friends.csv", "tools.csv"]);
        assert_eq!(listing.subdirectories, ["blog", "projects"]);
    }

    #[test]
    fn scan_is_not_recursive() {
        let tmp = fixture();
        let subdirs = list_subdirectories(tmp.path(), ListingOrder::Name).unwrap();
        assert!(!subdirs.iter().any(|d| d == "drafts"));
    }

    #[test]
    fn directory_named_like_csv_is_a_folder() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("odd.csv")).unwrap();

        let listing = scan(tmp.path(), ListingOrder::Filesystem).unwrap();
        assert!(listing.csv_files.is_empty());
        assert_eq!(listing.subdirectories, ["odd.csv"]);
    }

    #[test]
    fn filesystem_order_returns_every_entry() {
        let tmp = fixture();
        let mut csv = list_csv_files(tmp.path(), ListingOrder::Filesystem).unwrap();
        csv.sort();
        assert_eq!(csv, ["friends.csv", "tools.csv"]);
    }

    #[test]
    fn missing_working_dir_is_path_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let err = scan(&tmp.path().join("nope"), ListingOrder::Filesystem).unwrap_err();
        assert!(matches!(err, MenuforgeError::PathNotFound { .. }));
    }

    #[test]
    fn index_articles_keeps_only_markdown() {
        let tmp = fixture();
        let index = index_articles("blog", tmp.path(), ListingOrder::Name).unwrap();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get(ArticleKey(0)), Some("first.md"));
        assert_eq!(index.get(ArticleKey(1)), Some("second.md"));
    }

    #[test]
    fn index_articles_empty_folder() {
        let tmp = fixture();
        let index = index_articles("projects", tmp.path(), ListingOrder::Filesystem).unwrap();
        assert!(index.is_empty());
        assert_eq!(serde_json::to_string(&index).unwrap(), "{}");
    }

    #[test]
    fn index_articles_one_key_per_markdown_file() {
        let tmp = tempfile::tempdir().unwrap();
        let folder = tmp.path().join("notes");
        std::fs::create_dir(&folder).unwrap();
        for i in 0..12 {
            touch(&folder.join(format!("note-{i}.md")));
        }
        touch(&folder.join("README.txt"));

        let index = index_articles("notes", tmp.path(), ListingOrder::Filesystem).unwrap();
        assert_eq!(index.len(), 12);
        let keys: Vec<usize> = index.iter().map(|(k, _)| k.index()).collect();
        assert_eq!(keys, (0..12).collect::<Vec<_>>());
        assert!(index.iter().all(|(_, f)| f.ends_with(".md")));
    }

    #[test]
    fn index_articles_missing_folder() {
        let tmp = tempfile::tempdir().unwrap();
        let err = index_articles("gone", tmp.path(), ListingOrder::Filesystem).unwrap_err();
        assert!(matches!(err, MenuforgeError::PathNotFound { .. }));
    }

    #[cfg(unix)]
    fn raw_name(bytes: &[u8]) -> &OsStr {
        use std::os::unix::ffi::OsStrExt;
        OsStr::from_bytes(bytes)
    }

    #[cfg(unix)]
    #[test]
    fn undecodable_names_are_ignored_when_filtered_out() {
        let tmp = fixture();
        touch(&tmp.path().join(raw_name(b"cover\xff.png")));
        touch(&tmp.path().join("blog").join(raw_name(b"cover\xff.png")));

        let listing = scan(tmp.path(), ListingOrder::Name).unwrap();
        assert_eq!(listing.csv_files, ["friends.csv", "tools.csv"]);

        let index = index_articles("blog", tmp.path(), ListingOrder::Name).unwrap();
        assert_eq!(index.len(), 2);
    }

    #[cfg(unix)]
    #[test]
    fn undecodable_markdown_name_is_validation_error() {
        let tmp = fixture();
        touch(&tmp.path().join("blog").join(raw_name(b"caf\xe9.md")));

        let err = index_articles("blog", tmp.path(), ListingOrder::Name).unwrap_err();
        assert!(matches!(err, MenuforgeError::Validation { .. }));
        assert!(err.to_string().contains("not valid UTF-8"));
    }

    #[cfg(unix)]
    #[test]
    fn undecodable_csv_name_is_validation_error() {
        let tmp = fixture();
        touch(&tmp.path().join(raw_name(b"links\xff.csv")));

        let err = scan(tmp.path(), ListingOrder::Filesystem).unwrap_err();
        assert!(matches!(err, MenuforgeError::Validation { .. }));
    }
}
