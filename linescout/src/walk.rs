use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::TraversalError;

/// Pseudo-path standing in for the process standard input stream.
///
/// [`enumerate`] maps the `-` sentinel to this value. The scanner recognizes
/// it and reads the process stdin handle; the path is never opened as a file.
pub const STDIN_PATH: &str = "/dev/stdin";

/// Flat, ordered collection of file paths produced by [`enumerate`].
///
/// Every entry refers to a regular file (or the stdin pseudo-path);
/// directories never appear. Duplicates in the input stay duplicated. The set
/// is never mutated during dispatch, since consumption is tracked by a
/// separate cursor, so the same set can be scanned again for another pattern.
#[derive(Debug, Clone, Default)]
pub struct PathSet {
    paths: Vec<PathBuf>,
}

impl PathSet {
    /// Number of entries in the set.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// The entries as an immutable slice, in enumeration order.
    pub fn as_slice(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathBuf> {
        self.paths.iter()
    }

    fn push(&mut self, path: PathBuf) {
        self.paths.push(path);
    }
}

impl From<Vec<PathBuf>> for PathSet {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self { paths }
    }
}

impl<'a> IntoIterator for &'a PathSet {
    type Item = &'a PathBuf;
    type IntoIter = std::slice::Iter<'a, PathBuf>;

    fn into_iter(self) -> Self::IntoIter {
        self.paths.iter()
    }
}

/// Expands `roots` into the flat set of files to scan.
///
/// Each root is classified by `fs::metadata`: regular files (and the `-`
/// stdin sentinel) are kept, directories are expanded when `recursive` is set
/// and rejected with [`TraversalError::IsDirectory`] otherwise. A stat failure
/// anywhere aborts the whole enumeration with no partial result.
///
/// With no roots at all, the scan target defaults to standard input, or to
/// the current working directory when `recursive` is set.
///
/// Symbolic links are classified by their target's status; a cyclic link tree
/// recurses without bound.
pub fn enumerate<P: AsRef<Path>>(roots: &[P], recursive: bool) -> Result<PathSet, TraversalError> {
    let mut set = PathSet::default();

    if roots.is_empty() {
        if recursive {
            let cwd = std::env::current_dir().map_err(|e| TraversalError::stat(".", e))?;
            add_path(&mut set, &cwd, recursive)?;
        } else {
            set.push(PathBuf::from(STDIN_PATH));
        }
    } else {
        for root in roots {
            add_path(&mut set, root.as_ref(), recursive)?;
        }
    }

    debug!("enumerated {} file(s)", set.len());
    Ok(set)
}

fn add_path(set: &mut PathSet, path: &Path, recursive: bool) -> Result<(), TraversalError> {
    if path == Path::new("-") {
        set.push(PathBuf::from(STDIN_PATH));
        return Ok(());
    }

    let metadata = fs::metadata(path).map_err(|e| TraversalError::stat(path, e))?;

    if !metadata.is_dir() {
        set.push(path.to_path_buf());
        return Ok(());
    }

    if !recursive {
        return Err(TraversalError::is_directory(path));
    }

    // Directory entry order is filesystem-defined; callers must not rely on
    // the ordering of the resulting set.
    let entries = fs::read_dir(path).map_err(|e| TraversalError::stat(path, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| TraversalError::stat(path, e))?;
        add_path(set, &entry.path(), recursive)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use std::collections::HashSet;
    use std::fs::File;
    use tempfile::tempdir;

    const NO_ROOTS: &[&Path] = &[];

    #[test]
    fn test_single_file() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("a.txt");
        File::create(&file)?;

        let set = enumerate(&[&file], false)?;
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0], file);
        Ok(())
    }

    #[test]
    fn test_directory_without_recursion_fails() -> Result<()> {
        let dir = tempdir()?;
        let err = enumerate(&[dir.path()], false).unwrap_err();
        assert!(matches!(err, TraversalError::IsDirectory(_)));
        Ok(())
    }

    #[test]
    fn test_recursive_collects_every_file_once() -> Result<()> {
        let dir = tempdir()?;
        let sub = dir.path().join("sub");
        let deeper = sub.join("deeper");
        std::fs::create_dir_all(&deeper)?;

        let expected: HashSet<PathBuf> = [
            dir.path().join("a.txt"),
            sub.join("b.txt"),
            deeper.join("c.txt"),
        ]
        .into_iter()
        .collect();
        for path in &expected {
            File::create(path)?;
        }

        let set = enumerate(&[dir.path()], true)?;
        assert_eq!(set.len(), expected.len());
        let found: HashSet<PathBuf> = set.iter().cloned().collect();
        assert_eq!(found, expected);
        Ok(())
    }

    #[test]
    fn test_missing_root_fails_with_stat() {
        let err = enumerate(&[Path::new("/no/such/path/exists")], false).unwrap_err();
        assert!(matches!(err, TraversalError::Stat { .. }));
    }

    #[test]
    fn test_error_aborts_whole_enumeration() -> Result<()> {
        let dir = tempdir()?;
        let good = dir.path().join("good.txt");
        File::create(&good)?;

        let roots = [good.as_path(), Path::new("/no/such/path/exists")];
        assert!(enumerate(&roots, false).is_err());
        Ok(())
    }

    #[test]
    fn test_stdin_sentinel_maps_to_pseudo_path() -> Result<()> {
        let set = enumerate(&[Path::new("-")], false)?;
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0], PathBuf::from(STDIN_PATH));
        Ok(())
    }

    #[test]
    fn test_no_roots_defaults_to_stdin() -> Result<()> {
        let set = enumerate(NO_ROOTS, false)?;
        assert_eq!(set.len(), 1);
        assert_eq!(set.as_slice()[0], PathBuf::from(STDIN_PATH));
        Ok(())
    }

    #[test]
    fn test_duplicates_are_preserved() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("a.txt");
        File::create(&file)?;

        let set = enumerate(&[&file, &file], false)?;
        assert_eq!(set.len(), 2);
        Ok(())
    }

    #[test]
    fn test_mixed_roots() -> Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("top.txt");
        File::create(&file)?;
        let sub = dir.path().join("nested");
        std::fs::create_dir(&sub)?;
        File::create(sub.join("inner.txt"))?;

        let set = enumerate(&[file.as_path(), sub.as_path()], true)?;
        assert_eq!(set.len(), 2);
        Ok(())
    }
}
