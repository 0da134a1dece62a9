//! Version control access.
//!
//! The detector needs two things from history: the files that changed since
//! a base revision, and the content of a file at that revision. Both are
//! behind the [`VersionControl`] trait so tests can substitute a mock.
//!
//! [`GitRepository`] implements the trait with `git2` against a local
//! repository. [`Detached`] is used when no repository is found: it reports
//! no changes and no history.

use crate::error::{BumpwatchError, Result};
use std::path::{Path, PathBuf};

/// Access to changed files and historical file content.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl: Send + Sync {
    /// Files that differ between `base_ref` and the working tree.
    ///
    /// # Errors
    ///
    /// Returns an error if the revision cannot be resolved or the diff fails.
    fn changed_files(&self, base_ref: &str) -> Result<Vec<PathBuf>>;

    /// Content of `path` at `revision`, or `None` if the file did not exist
    /// there or is not valid UTF-8.
    ///
    /// # Errors
    ///
    /// Returns an error if the repository or revision cannot be read.
    fn file_at_revision(&self, path: &Path, revision: &str) -> Result<Option<String>>;
}

/// A local git repository.
///
/// `git2::Repository` is not `Sync`, so the repository is reopened per call.
#[derive(Debug, Clone)]
pub struct GitRepository {
    workdir: PathBuf,
}

impl GitRepository {
    /// Find the repository containing `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if `path` is not inside a non-bare repository.
    pub fn discover(path: impl AsRef<Path>) -> Result<Self> {
        let repo = git2::Repository::discover(path.as_ref()).map_err(|e| {
            crate::err!(Git {
                message: format!(
                    "No git repository found at '{}': {}",
                    path.as_ref().display(),
                    e.message()
                ),
            })
        })?;

        let workdir = repo.workdir().map(Path::to_path_buf).ok_or_else(|| {
            crate::err!(Git {
                message: "Bare repositories are not supported".to_string(),
            })
        })?;

        tracing::debug!(workdir = %workdir.display(), "Discovered git repository");
        Ok(Self { workdir })
    }

    fn open(&self) -> Result<git2::Repository> {
        git2::Repository::open(&self.workdir).map_err(|e| {
            BumpwatchError::git(
                format!("Failed to open repository: {}", e.message()),
                file!(),
                line!(),
            )
        })
    }

    fn tree_at<'r>(repo: &'r git2::Repository, revision: &str) -> Result<git2::Tree<'r>> {
        repo.revparse_single(revision)
            .and_then(|object| object.peel_to_tree())
            .map_err(|e| {
                crate::err!(UnknownRevision {
                    revision: revision.to_string(),
                    message: e.message().to_string(),
                })
            })
    }

    /// Express `path` relative to the working tree root.
    fn relative_path(&self, path: &Path) -> Option<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().ok()?.join(path)
        };

        if let Ok(relative) = absolute.strip_prefix(&self.workdir) {
            return Some(relative.to_path_buf());
        }

        // Symlinked temp dirs and the like
        let workdir = self.workdir.canonicalize().ok()?;
        let absolute = absolute
            .canonicalize()
            .or_else(|_| {
                absolute
                    .parent()
                    .and_then(|parent| parent.canonicalize().ok())
                    .zip(absolute.file_name())
                    .map(|(parent, name)| parent.join(name))
                    .ok_or(())
            })
            .ok()?;
        absolute.strip_prefix(workdir).ok().map(Path::to_path_buf)
    }
}

impl VersionControl for GitRepository {
    fn changed_files(&self, base_ref: &str) -> Result<Vec<PathBuf>> {
        let repo = self.open()?;
        let tree = Self::tree_at(&repo, base_ref)?;

        let diff = repo
            .diff_tree_to_workdir_with_index(Some(&tree), None)
            .map_err(|e| {
                BumpwatchError::git(
                    format!("Failed to diff against '{base_ref}': {}", e.message()),
                    file!(),
                    line!(),
                )
            })?;

        let mut files: Vec<PathBuf> = diff
            .deltas()
            .filter_map(|delta| delta.new_file().path().map(|p| self.workdir.join(p)))
            .filter(|path| path.is_file())
            .collect();
        files.sort();
        files.dedup();

        tracing::debug!(base_ref, count = files.len(), "Listed changed files");
        Ok(files)
    }

    fn file_at_revision(&self, path: &Path, revision: &str) -> Result<Option<String>> {
        let Some(relative) = self.relative_path(path) else {
            tracing::debug!(path = %path.display(), "Path is outside the repository");
            return Ok(None);
        };

        let repo = self.open()?;
        let tree = Self::tree_at(&repo, revision)?;

        let entry = match tree.get_path(&relative) {
            Ok(entry) => entry,
            Err(e) if e.code() == git2::ErrorCode::NotFound => return Ok(None),
            Err(e) => {
                return Err(crate::err!(Git {
                    message: format!(
                        "Failed to look up '{}' at '{revision}': {}",
                        relative.display(),
                        e.message()
                    ),
                }))
            }
        };

        let object = entry.to_object(&repo).map_err(|e| {
            BumpwatchError::git(e.message().to_string(), file!(), line!())
        })?;
        let Some(blob) = object.as_blob() else {
            return Ok(None);
        };

        Ok(std::str::from_utf8(blob.content()).ok().map(String::from))
    }
}

/// Stand-in used outside of a repository: nothing changed, no history.
#[derive(Debug, Clone, Copy, Default)]
pub struct Detached;

impl VersionControl for Detached {
    fn changed_files(&self, _base_ref: &str) -> Result<Vec<PathBuf>> {
        Ok(Vec::new())
    }

    fn file_at_revision(&self, _path: &Path, _revision: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn commit_all(repo: &git2::Repository, message: &str) {
        let mut index = repo.index().unwrap();
        index
            .add_all(["*"].iter(), git2::IndexAddOption::DEFAULT, None)
            .unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = repo.find_tree(tree_id).unwrap();
        let signature = git2::Signature::now("Test", "test@example.com").unwrap();
        let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit<'_>> = parent.iter().collect();
        repo.commit(Some("HEAD"), &signature, &signature, message, &tree, &parents)
            .unwrap();
    }

    fn setup() -> (TempDir, GitRepository) {
        let dir = TempDir::new().unwrap();
        let repo = git2::Repository::init(dir.path()).unwrap();
        fs::write(dir.path().join("versions.tf"), "# v1\n").unwrap();
        fs::write(dir.path().join("README.md"), "readme\n").unwrap();
        commit_all(&repo, "initial");
        let git = GitRepository::discover(dir.path()).unwrap();
        (dir, git)
    }

    #[test]
    fn test_changed_files_lists_modified_paths() {
        let (dir, git) = setup();
        fs::write(dir.path().join("versions.tf"), "# v2\n").unwrap();

        let files = git.changed_files("HEAD").unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("versions.tf"));
    }

    #[test]
    fn test_changed_files_skips_deleted_paths() {
        let (dir, git) = setup();
        fs::remove_file(dir.path().join("README.md")).unwrap();

        assert!(git.changed_files("HEAD").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_revision() {
        let (_dir, git) = setup();
        let result = git.changed_files("no-such-branch");
        assert!(matches!(result, Err(BumpwatchError::UnknownRevision { .. })));
    }

    #[test]
    fn test_file_at_revision() {
        let (dir, git) = setup();
        fs::write(dir.path().join("versions.tf"), "# v2\n").unwrap();

        let content = git
            .file_at_revision(&dir.path().join("versions.tf"), "HEAD")
            .unwrap();
        assert_eq!(content.as_deref(), Some("# v1\n"));
    }

    #[test]
    fn test_file_at_revision_missing_file() {
        let (dir, git) = setup();
        fs::write(dir.path().join("main.tf"), "# new\n").unwrap();

        let content = git
            .file_at_revision(&dir.path().join("main.tf"), "HEAD")
            .unwrap();
        assert!(content.is_none());
    }

    #[test]
    fn test_discover_outside_repository() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("not-a-repo");
        fs::create_dir(&nested).unwrap();
        // A parent directory of the temp dir could itself be a repository
        if git2::Repository::discover(&nested).is_err() {
            assert!(GitRepository::discover(&nested).is_err());
        }
    }

    #[test]
    fn test_detached_reports_nothing() {
        let detached = Detached;
        assert!(detached.changed_files("HEAD~1").unwrap().is_empty());
        assert!(detached
            .file_at_revision(Path::new("main.tf"), "HEAD~1")
            .unwrap()
            .is_none());
    }
}
