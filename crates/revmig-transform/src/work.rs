//! Working context for one pipeline run
//!
//! Provides [`WorkTree`], the in-memory snapshot of the migrated files, and
//! [`TransformWork`], the mutable state handed to every step's `apply`.

use crate::console::{Console, CountingConsole};
use crate::error::TransformError;
use once_cell::sync::Lazy;
use regex::Regex;
use revmig_changes::Changes;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

static LABEL_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([\w-]+)(=|: )(.*)$").expect("label pattern is valid"));

/// In-memory working tree: relative path to file content
///
/// Files that aren't valid UTF-8 are carried as raw bytes. Steps only see
/// text files through [`read`](Self::read) and
/// [`contents_mut`](Self::contents_mut), but moves and deletions apply to
/// both kinds. A path is held by at most one of the two maps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkTree {
    files: BTreeMap<PathBuf, String>,
    binary: BTreeMap<PathBuf, Vec<u8>>,
}

impl WorkTree {
    /// Create empty tree
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create tree from `(path, content)` pairs
    #[must_use]
    pub fn from_files<P, C>(files: impl IntoIterator<Item = (P, C)>) -> Self
    where
        P: Into<PathBuf>,
        C: Into<String>,
    {
        Self {
            files: files
                .into_iter()
                .map(|(path, content)| (path.into(), content.into()))
                .collect(),
            binary: BTreeMap::new(),
        }
    }

    /// Load every file under `root`
    ///
    /// Symbolic links are skipped, so link cycles can't recurse.
    ///
    /// # Errors
    /// Returns error if a directory can't be listed or a file can't be read
    pub fn load_dir(root: impl AsRef<Path>) -> io::Result<Self> {
        let root = root.as_ref();
        let mut tree = Self::new();
        let mut pending = vec![root.to_path_buf()];

        while let Some(dir) = pending.pop() {
            for entry in fs::read_dir(&dir)? {
                let entry = entry?;
                let path = entry.path();
                let file_type = entry.file_type()?;
                if file_type.is_symlink() {
                    tracing::debug!(path = %path.display(), "skipping symlink");
                    continue;
                }
                if file_type.is_dir() {
                    pending.push(path);
                    continue;
                }
                let relative = path
                    .strip_prefix(root)
                    .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?
                    .to_path_buf();
                match String::from_utf8(fs::read(&path)?) {
                    Ok(content) => {
                        tree.files.insert(relative, content);
                    }
                    Err(e) => {
                        tracing::debug!(path = %relative.display(), "carrying binary file");
                        tree.binary.insert(relative, e.into_bytes());
                    }
                }
            }
        }

        Ok(tree)
    }

    /// Write the tree under `root`, deleting files present in `base` but not here
    ///
    /// Directories left empty by a deletion are removed too, up to `root`.
    ///
    /// # Errors
    /// Returns error if a file can't be written or removed
    pub fn store_dir(&self, root: impl AsRef<Path>, base: &WorkTree) -> io::Result<()> {
        let root = root.as_ref();

        for path in base.paths().filter(|p| !self.contains(p)) {
            let target = root.join(path);
            fs::remove_file(&target)?;
            prune_empty_parents(root, &target)?;
        }

        let text = self.files.iter().map(|(p, c)| (p, c.as_bytes()));
        let binary = self.binary.iter().map(|(p, c)| (p, c.as_slice()));
        for (path, content) in text.chain(binary) {
            let target = root.join(path);
            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(target, content)?;
        }

        Ok(())
    }

    /// Content of a file
    #[inline]
    #[must_use]
    pub fn read(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }

    /// Raw bytes of a file, text or binary
    #[must_use]
    pub fn read_bytes(&self, path: impl AsRef<Path>) -> Option<&[u8]> {
        let path = path.as_ref();
        self.files
            .get(path)
            .map(String::as_bytes)
            .or_else(|| self.binary.get(path).map(Vec::as_slice))
    }

    /// Create or overwrite a file, returning the previous text content
    pub fn write(&mut self, path: impl Into<PathBuf>, content: impl Into<String>) -> Option<String> {
        let path = path.into();
        self.binary.remove(&path);
        self.files.insert(path, content.into())
    }

    /// Delete a file of either kind, returning its content if it was text
    pub fn remove(&mut self, path: impl AsRef<Path>) -> Option<String> {
        let path = path.as_ref();
        self.binary.remove(path);
        self.files.remove(path)
    }

    /// Move a file
    ///
    /// # Errors
    /// - `FileNotFound` if `from` is missing
    /// - `FileExists` if `to` is already taken
    pub fn rename(&mut self, from: &Path, to: &Path) -> Result<(), TransformError> {
        if self.contains(to) {
            return Err(TransformError::FileExists(to.to_path_buf()));
        }
        if let Some(content) = self.files.remove(from) {
            self.files.insert(to.to_path_buf(), content);
        } else if let Some(content) = self.binary.remove(from) {
            self.binary.insert(to.to_path_buf(), content);
        } else {
            return Err(TransformError::FileNotFound(from.to_path_buf()));
        }
        Ok(())
    }

    /// Check if a file exists
    #[inline]
    #[must_use]
    pub fn contains(&self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        self.files.contains_key(path) || self.binary.contains_key(path)
    }

    /// Paths of both kinds in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &Path> {
        let mut paths: Vec<&Path> = self
            .files
            .keys()
            .chain(self.binary.keys())
            .map(PathBuf::as_path)
            .collect();
        paths.sort_unstable();
        paths.into_iter()
    }

    /// Mutable access to every text file's content
    #[inline]
    pub fn contents_mut(&mut self) -> impl Iterator<Item = (&Path, &mut String)> {
        self.files.iter_mut().map(|(p, c)| (p.as_path(), c))
    }

    /// Number of files
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len() + self.binary.len()
    }

    /// Check if tree has no files
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.binary.is_empty()
    }
}

fn prune_empty_parents(root: &Path, file: &Path) -> io::Result<()> {
    let mut dir = file.parent();
    while let Some(current) = dir {
        if current == root || !current.starts_with(root) {
            break;
        }
        if fs::read_dir(current)?.next().is_some() {
            break;
        }
        fs::remove_dir(current)?;
        dir = current.parent();
    }
    Ok(())
}

/// Mutable state a step is applied to
///
/// Borrowed from the executor for one run; steps must not keep any part of
/// it past their `apply` call.
#[derive(Debug)]
pub struct TransformWork<'a> {
    tree: &'a mut WorkTree,
    message: String,
    changes: &'a Changes,
    console: CountingConsole<'a>,
}

impl<'a> TransformWork<'a> {
    /// Create context over a tree
    #[must_use]
    pub fn new(
        tree: &'a mut WorkTree,
        message: impl Into<String>,
        changes: &'a Changes,
        console: &'a dyn Console,
    ) -> Self {
        Self {
            tree,
            message: message.into(),
            changes,
            console: CountingConsole::new(console),
        }
    }

    /// Working tree
    #[inline]
    #[must_use]
    pub fn tree(&self) -> &WorkTree {
        &*self.tree
    }

    /// Mutable working tree
    #[inline]
    pub fn tree_mut(&mut self) -> &mut WorkTree {
        &mut *self.tree
    }

    /// Destination change message
    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Replace the destination change message
    #[inline]
    pub fn set_message(&mut self, message: impl Into<String>) {
        self.message = message.into();
    }

    /// Consume the context, returning the final message
    #[inline]
    #[must_use]
    pub fn into_message(self) -> String {
        self.message
    }

    /// Changes being migrated
    #[inline]
    #[must_use]
    pub fn changes(&self) -> &Changes {
        self.changes
    }

    /// Diagnostic sink
    #[inline]
    #[must_use]
    pub fn console(&self) -> &CountingConsole<'a> {
        &self.console
    }

    /// Value of the last `NAME=value` or `NAME: value` line in the message
    #[must_use]
    pub fn label(&self, name: &str) -> Option<&str> {
        self.message
            .split_inclusive('\n')
            .rev()
            .filter_map(|line| LABEL_LINE.captures(split_line_ending(line).0))
            .find(|caps| &caps[1] == name)
            .and_then(|caps| caps.get(3))
            .map(|value| value.as_str())
    }

    /// Rewrite the value of every `name` label line, returning how many changed
    ///
    /// Line endings (`\n` or `\r\n`) are kept as they were.
    pub fn map_label(&mut self, name: &str, mut f: impl FnMut(String) -> String) -> usize {
        let mut mapped = 0;
        let mut message = String::with_capacity(self.message.len());
        for line in self.message.split_inclusive('\n') {
            let (body, ending) = split_line_ending(line);
            match LABEL_LINE.captures(body) {
                Some(caps) if &caps[1] == name => {
                    let old = caps[3].to_string();
                    let new = f(old.clone());
                    if new != old {
                        mapped += 1;
                    }
                    message.push_str(&caps[1]);
                    message.push_str(&caps[2]);
                    message.push_str(&new);
                    message.push_str(ending);
                }
                _ => message.push_str(line),
            }
        }
        self.message = message;
        mapped
    }
}

/// Split a line into its body and its `\n` / `\r\n` ending
fn split_line_ending(line: &str) -> (&str, &str) {
    let body = line.strip_suffix('\n').unwrap_or(line);
    let body = body.strip_suffix('\r').unwrap_or(body);
    line.split_at(body.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::console::TracingConsole;

    #[test]
    fn tree_read_write_remove() {
        let mut tree = WorkTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.write("a.txt", "one"), None);
        assert_eq!(tree.write("a.txt", "two"), Some("one".to_string()));
        assert_eq!(tree.read("a.txt"), Some("two"));
        assert_eq!(tree.remove("a.txt"), Some("two".to_string()));
        assert!(!tree.contains("a.txt"));
    }

    #[test]
    fn tree_rename() {
        let mut tree = WorkTree::from_files([("a.txt", "x"), ("b.txt", "y")]);

        assert!(matches!(
            tree.rename(Path::new("a.txt"), Path::new("b.txt")),
            Err(TransformError::FileExists(_))
        ));
        assert!(matches!(
            tree.rename(Path::new("missing"), Path::new("c.txt")),
            Err(TransformError::FileNotFound(_))
        ));

        tree.rename(Path::new("a.txt"), Path::new("c.txt")).unwrap();
        assert_eq!(tree.read("c.txt"), Some("x"));
        assert!(!tree.contains("a.txt"));
    }

    #[test]
    fn tree_dir_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let base = WorkTree::from_files([("src/lib.rs", "fn a() {}"), ("old.txt", "gone")]);
        base.store_dir(dir.path(), &WorkTree::new()).unwrap();

        let mut tree = WorkTree::load_dir(dir.path()).unwrap();
        assert_eq!(tree, base);

        tree.remove("old.txt");
        tree.write("new.txt", "here");
        tree.store_dir(dir.path(), &base).unwrap();

        assert!(!dir.path().join("old.txt").exists());
        assert_eq!(WorkTree::load_dir(dir.path()).unwrap(), tree);
    }

    #[test]
    fn binary_files_survive_load_and_store() {
        let dir = tempfile::tempdir().unwrap();
        let bytes = [0xff_u8, 0xfe, 0x00, 0x80];
        fs::write(dir.path().join("logo.bin"), bytes).unwrap();
        fs::write(dir.path().join("notes.txt"), "text").unwrap();

        let mut tree = WorkTree::load_dir(dir.path()).unwrap();
        assert_eq!(tree.len(), 2);
        assert_eq!(tree.read("logo.bin"), None);
        assert_eq!(tree.read_bytes("logo.bin"), Some(&bytes[..]));
        assert_eq!(tree.contents_mut().count(), 1);

        let base = tree.clone();
        tree.rename(Path::new("logo.bin"), Path::new("img/logo.bin"))
            .unwrap();
        tree.store_dir(dir.path(), &base).unwrap();

        assert!(!dir.path().join("logo.bin").exists());
        assert_eq!(fs::read(dir.path().join("img/logo.bin")).unwrap(), bytes);
        assert_eq!(WorkTree::load_dir(dir.path()).unwrap(), tree);
    }

    #[cfg(unix)]
    #[test]
    fn load_skips_symlinks() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/lib.rs"), "fn a() {}").unwrap();
        std::os::unix::fs::symlink(dir.path(), dir.path().join("src/loop")).unwrap();
        std::os::unix::fs::symlink("lib.rs", dir.path().join("src/alias.rs")).unwrap();

        let tree = WorkTree::load_dir(dir.path()).unwrap();
        assert_eq!(tree, WorkTree::from_files([("src/lib.rs", "fn a() {}")]));
    }

    #[test]
    fn store_removes_emptied_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let base = WorkTree::from_files([
            ("old/deep/lib.rs", "fn a() {}"),
            ("keep/a.txt", "a"),
            ("keep/b.txt", "b"),
        ]);
        base.store_dir(dir.path(), &WorkTree::new()).unwrap();

        let mut tree = base.clone();
        tree.rename(Path::new("old/deep/lib.rs"), Path::new("new/lib.rs"))
            .unwrap();
        tree.remove("keep/a.txt");
        tree.store_dir(dir.path(), &base).unwrap();

        assert!(!dir.path().join("old").exists());
        assert!(dir.path().join("new/lib.rs").is_file());
        assert!(dir.path().join("keep/b.txt").is_file());
        assert!(dir.path().exists());
    }

    #[test]
    fn work_labels() {
        let mut tree = WorkTree::new();
        let console = TracingConsole;
        let mut work = TransformWork::new(
            &mut tree,
            "Fix parser\n\nBUG=12\nReviewed-by: bob\nBUG=34",
            Changes::empty(),
            &console,
        );

        assert_eq!(work.label("BUG"), Some("34"));
        assert_eq!(work.label("Reviewed-by"), Some("bob"));
        assert_eq!(work.label("MISSING"), None);

        let mapped = work.map_label("Reviewed-by", |v| v.to_uppercase());
        assert_eq!(mapped, 1);
        assert_eq!(work.message(), "Fix parser\n\nBUG=12\nReviewed-by: BOB\nBUG=34");
    }

    #[test]
    fn crlf_label_lines_keep_their_endings() {
        let mut tree = WorkTree::new();
        let console = TracingConsole;
        let mut work = TransformWork::new(
            &mut tree,
            "Export\r\n\r\nTeam=infra\r\nOwner: ops\r\n",
            Changes::empty(),
            &console,
        );

        assert_eq!(work.label("Team"), Some("infra"));
        assert_eq!(work.label("Owner"), Some("ops"));

        let mapped = work.map_label("Team", |v| {
            assert_eq!(v, "infra");
            "platform".to_string()
        });
        assert_eq!(mapped, 1);
        assert_eq!(work.message(), "Export\r\n\r\nTeam=platform\r\nOwner: ops\r\n");
    }

    #[test]
    fn work_exposes_changes_and_console() {
        let mut tree = WorkTree::new();
        let console = TracingConsole;
        let work = TransformWork::new(&mut tree, "", Changes::empty(), &console);

        assert!(work.changes().current().is_empty());
        work.console().error("boom");
        assert_eq!(work.console().error_count(), 1);
    }
}
