use std::{io, path::Path};

use compio::{fs, runtime::spawn_blocking};
use futures::future::try_join_all;
use snafu::prelude::*;
use tracing::debug;

use crate::ext::PathDisplayExt;

use super::{
    EntryKind, FsError, Stat,
    error::{AlreadyExistsSnafu, NormalizeIoExt, NotFoundSnafu, is_not_found_io},
    names::normalize_os_name,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Create the file (and its missing parents) when it does not exist yet.
    pub create: bool,
    /// Replace the contents of an existing file.
    pub overwrite: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeleteOptions {
    pub recursive: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenameOptions {
    /// Remove an existing target before renaming onto it.
    pub overwrite: bool,
}

/// Async access to the local filesystem with normalized errors.
///
/// Stateless; every call goes to the OS.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileAccess;

impl FileAccess {
    pub fn new() -> Self {
        Self
    }

    /// Metadata for `path`, following symbolic links.
    ///
    /// A dangling link is still reported, with kind [`EntryKind::SymbolicLink`].
    pub async fn stat(&self, path: &Path) -> Result<Stat, FsError> {
        match fs::metadata(path).await {
            Ok(metadata) => Ok(Stat::from_metadata(&metadata)),
            Err(error) if is_not_found_io(&error) => {
                let link = fs::symlink_metadata(path)
                    .await
                    .map_err(|_| FsError::from_io(error, path))?;
                Ok(Stat::from_metadata(&link))
            }
            Err(error) => Err(FsError::from_io(error, path)),
        }
    }

    /// Names of the entries of the directory at `path`, in the order the OS returns them.
    pub async fn list_directory(&self, path: &Path) -> Result<Vec<String>, FsError> {
        let directory = path.to_path_buf();
        let names = spawn_blocking(move || read_directory_names(&directory))
            .await
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            .normalize_for(path)?;
        debug!("Listed {} entries in {}", names.len(), path.lexical_display());
        Ok(names)
    }

    /// Directory listing paired with the kind of each entry.
    pub async fn read_directory(&self, path: &Path) -> Result<Vec<(String, EntryKind)>, FsError> {
        let names = self.list_directory(path).await?;
        try_join_all(names.into_iter().map(|name| async move {
            let stat = self.stat(&path.join(&name)).await?;
            Ok::<_, FsError>((name, stat.kind))
        }))
        .await
    }

    pub async fn read_file(&self, path: &Path) -> Result<Vec<u8>, FsError> {
        fs::read(path).await.normalize_for(path)
    }

    pub async fn write_file(
        &self,
        path: &Path,
        content: Vec<u8>,
        options: WriteOptions,
    ) -> Result<(), FsError> {
        if self.path_exists(path).await {
            // Only an explicit create refuses to clobber an existing file.
            ensure!(
                !options.create || options.overwrite,
                AlreadyExistsSnafu {
                    path: path.lexical_display()
                }
            );
        } else {
            ensure!(
                options.create,
                NotFoundSnafu {
                    path: path.lexical_display()
                }
            );
            if let Some(parent) = non_empty_parent(path) {
                self.create_directory(parent).await?;
            }
        }

        debug!("Writing {} bytes to {}", content.len(), path.lexical_display());
        fs::write(path, content).await.0.normalize_for(path)
    }

    /// Creates `path` and every missing ancestor. Succeeds if it already is a directory.
    pub async fn create_directory(&self, path: &Path) -> Result<(), FsError> {
        fs::create_dir_all(path).await.normalize_for(path)
    }

    /// Removes a file, a symbolic link, or a whole directory tree.
    pub async fn remove_recursive(&self, path: &Path) -> Result<(), FsError> {
        let target = path.to_path_buf();
        spawn_blocking(move || remove_tree(&target))
            .await
            .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            .normalize_for(path)
    }

    pub async fn remove_file(&self, path: &Path) -> Result<(), FsError> {
        fs::remove_file(path).await.normalize_for(path)
    }

    pub async fn delete(&self, path: &Path, options: DeleteOptions) -> Result<(), FsError> {
        debug!(
            "Deleting {} (recursive: {})",
            path.lexical_display(),
            options.recursive
        );
        if options.recursive {
            self.remove_recursive(path).await
        } else {
            self.remove_file(path).await
        }
    }

    pub async fn rename(
        &self,
        old_path: &Path,
        new_path: &Path,
        options: RenameOptions,
    ) -> Result<(), FsError> {
        fs::symlink_metadata(old_path).await.normalize_for(old_path)?;

        if self.path_exists(new_path).await {
            ensure!(
                options.overwrite,
                AlreadyExistsSnafu {
                    path: new_path.lexical_display()
                }
            );
            self.remove_recursive(new_path).await?;
        }

        if let Some(parent) = non_empty_parent(new_path) {
            self.create_directory(parent).await?;
        }

        debug!(
            "Renaming {} to {}",
            old_path.lexical_display(),
            new_path.lexical_display()
        );
        fs::rename(old_path, new_path).await.normalize_for(old_path)
    }

    /// True when `path` itself is a symbolic link, whatever it points at.
    pub async fn is_symbolic_link(&self, path: &Path) -> bool {
        fs::symlink_metadata(path)
            .await
            .is_ok_and(|metadata| metadata.is_symlink())
    }

    /// Never fails: only a recognized not-found condition reports `false`.
    pub async fn path_exists(&self, path: &Path) -> bool {
        match fs::metadata(path).await {
            Ok(_) => true,
            Err(error) => !is_not_found_io(&error),
        }
    }
}

fn non_empty_parent(path: &Path) -> Option<&Path> {
    path.parent().filter(|parent| !parent.as_os_str().is_empty())
}

fn read_directory_names(path: &Path) -> io::Result<Vec<String>> {
    std::fs::read_dir(path)?
        .map(|entry| entry.map(|entry| normalize_os_name(&entry.file_name().to_string_lossy())))
        .collect()
}

fn remove_tree(path: &Path) -> io::Result<()> {
    let metadata = std::fs::symlink_metadata(path)?;
    if metadata.is_dir() {
        std::fs::remove_dir_all(path)
    } else {
        std::fs::remove_file(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn scratch() -> TempDir {
        TempDir::new().expect("Failed to create temp directory")
    }

    #[compio::test]
    async fn stat_reports_kind_and_size() {
        let dir = scratch();
        let file = dir.path().join("notes.txt");
        std::fs::write(&file, "hello").expect("Failed to write file");

        let fs = FileAccess::new();
        let file_stat = fs.stat(&file).await.expect("Failed to stat file");
        assert_eq!(file_stat.kind, EntryKind::File);
        assert_eq!(file_stat.size, 5);
        assert!(file_stat.modified.is_some());

        let dir_stat = fs.stat(dir.path()).await.expect("Failed to stat directory");
        assert!(dir_stat.is_directory());
    }

    #[compio::test]
    async fn stat_of_missing_path_is_not_found() {
        let dir = scratch();
        let result = FileAccess::new().stat(&dir.path().join("missing")).await;
        assert!(matches!(result, Err(FsError::NotFound { .. })));
    }

    #[cfg(unix)]
    #[compio::test]
    async fn stat_reports_dangling_links_as_symlinks() {
        let dir = scratch();
        let link = dir.path().join("dangling");
        std::os::unix::fs::symlink(dir.path().join("nowhere"), &link)
            .expect("Failed to create symlink");

        let stat = FileAccess::new().stat(&link).await.expect("Failed to stat link");
        assert_eq!(stat.kind, EntryKind::SymbolicLink);
    }

    #[compio::test]
    async fn list_directory_returns_every_name() {
        let dir = scratch();
        std::fs::write(dir.path().join("b.txt"), "").expect("Failed to write file");
        std::fs::create_dir(dir.path().join("A")).expect("Failed to create dir");
        std::fs::create_dir(dir.path().join(".git")).expect("Failed to create dir");

        let mut names = FileAccess::new()
            .list_directory(dir.path())
            .await
            .expect("Failed to list directory");
        names.sort();
        assert_eq!(names, vec![".git", "A", "b.txt"]);
    }

    #[compio::test]
    async fn listing_a_file_is_not_found() {
        let dir = scratch();
        let file = dir.path().join("plain.txt");
        std::fs::write(&file, "").expect("Failed to write file");

        let result = FileAccess::new().list_directory(&file).await;
        assert!(matches!(result, Err(FsError::NotFound { .. })));
    }

    #[compio::test]
    async fn read_directory_pairs_names_with_kinds() {
        let dir = scratch();
        std::fs::write(dir.path().join("f"), "").expect("Failed to write file");
        std::fs::create_dir(dir.path().join("d")).expect("Failed to create dir");

        let mut entries = FileAccess::new()
            .read_directory(dir.path())
            .await
            .expect("Failed to read directory");
        entries.sort();
        assert_eq!(
            entries,
            vec![
                ("d".to_string(), EntryKind::Directory),
                ("f".to_string(), EntryKind::File)
            ]
        );
    }

    #[compio::test]
    async fn write_without_create_requires_existing_file() {
        let dir = scratch();
        let file = dir.path().join("absent.txt");

        let result = FileAccess::new()
            .write_file(&file, b"data".to_vec(), WriteOptions::default())
            .await;
        assert!(matches!(result, Err(FsError::NotFound { .. })));
        assert!(!file.exists());
    }

    #[compio::test]
    async fn write_with_create_makes_missing_parents() {
        let dir = scratch();
        let file = dir.path().join("nested/deeper/new.txt");
        let fs = FileAccess::new();

        fs.write_file(
            &file,
            b"data".to_vec(),
            WriteOptions {
                create: true,
                overwrite: false,
            },
        )
        .await
        .expect("Failed to write file");

        let content = fs.read_file(&file).await.expect("Failed to read file");
        assert_eq!(content, b"data");
    }

    #[compio::test]
    async fn write_refuses_to_overwrite_unless_asked() {
        let dir = scratch();
        let file = dir.path().join("existing.txt");
        std::fs::write(&file, "old").expect("Failed to write file");
        let fs = FileAccess::new();

        let refused = fs
            .write_file(
                &file,
                b"new".to_vec(),
                WriteOptions {
                    create: true,
                    overwrite: false,
                },
            )
            .await;
        assert!(matches!(refused, Err(FsError::AlreadyExists { .. })));

        fs.write_file(
            &file,
            b"new".to_vec(),
            WriteOptions {
                create: false,
                overwrite: true,
            },
        )
        .await
        .expect("Failed to overwrite file");
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "new");
    }

    #[compio::test]
    async fn write_without_flags_rewrites_an_existing_file() {
        let dir = scratch();
        let file = dir.path().join("existing.txt");
        std::fs::write(&file, "old").expect("Failed to write file");

        FileAccess::new()
            .write_file(&file, b"new".to_vec(), WriteOptions::default())
            .await
            .expect("Failed to rewrite file");
        assert_eq!(std::fs::read_to_string(&file).unwrap(), "new");
    }

    #[compio::test]
    async fn create_directory_is_idempotent() {
        let dir = scratch();
        let nested = dir.path().join("a/b/c");
        let fs = FileAccess::new();

        fs.create_directory(&nested).await.expect("First create failed");
        fs.create_directory(&nested).await.expect("Second create failed");
        assert!(nested.is_dir());
    }

    #[compio::test]
    async fn delete_dispatches_on_recursive_flag() {
        let dir = scratch();
        let tree = dir.path().join("tree");
        std::fs::create_dir_all(tree.join("inner")).expect("Failed to create dirs");
        std::fs::write(tree.join("inner/leaf.txt"), "").expect("Failed to write file");
        let fs = FileAccess::new();

        let refused = fs.delete(&tree, DeleteOptions { recursive: false }).await;
        assert!(refused.is_err());
        assert!(tree.exists());

        fs.delete(&tree, DeleteOptions { recursive: true })
            .await
            .expect("Failed to delete tree");
        assert!(!tree.exists());
    }

    #[compio::test]
    async fn remove_recursive_handles_plain_files() {
        let dir = scratch();
        let file = dir.path().join("single.txt");
        std::fs::write(&file, "").expect("Failed to write file");

        FileAccess::new()
            .remove_recursive(&file)
            .await
            .expect("Failed to remove file");
        assert!(!file.exists());
    }

    #[compio::test]
    async fn rename_moves_the_entry() {
        let dir = scratch();
        let from = dir.path().join("a.txt");
        let to = dir.path().join("b.txt");
        std::fs::write(&from, "content").expect("Failed to write file");
        let fs = FileAccess::new();

        fs.rename(&from, &to, RenameOptions::default())
            .await
            .expect("Failed to rename");

        assert!(fs.stat(&to).await.is_ok());
        assert!(matches!(fs.stat(&from).await, Err(FsError::NotFound { .. })));
    }

    #[compio::test]
    async fn rename_onto_existing_target_needs_overwrite() {
        let dir = scratch();
        let from = dir.path().join("from.txt");
        let to = dir.path().join("to");
        std::fs::write(&from, "fresh").expect("Failed to write file");
        std::fs::create_dir_all(to.join("old")).expect("Failed to create dir");
        let fs = FileAccess::new();

        let refused = fs.rename(&from, &to, RenameOptions::default()).await;
        assert!(matches!(refused, Err(FsError::AlreadyExists { .. })));

        fs.rename(&from, &to, RenameOptions { overwrite: true })
            .await
            .expect("Failed to rename with overwrite");
        assert_eq!(std::fs::read_to_string(&to).unwrap(), "fresh");
    }

    #[compio::test]
    async fn rename_of_missing_source_leaves_target_intact() {
        let dir = scratch();
        let from = dir.path().join("missing.txt");
        let to = dir.path().join("precious.txt");
        std::fs::write(&to, "keep me").expect("Failed to write file");

        let result = FileAccess::new()
            .rename(&from, &to, RenameOptions { overwrite: true })
            .await;
        assert!(matches!(result, Err(FsError::NotFound { .. })));
        assert_eq!(std::fs::read_to_string(&to).unwrap(), "keep me");
    }

    #[compio::test]
    async fn rename_creates_missing_target_parent() {
        let dir = scratch();
        let from = dir.path().join("loose.txt");
        let to = dir.path().join("sorted/into/place.txt");
        std::fs::write(&from, "").expect("Failed to write file");

        FileAccess::new()
            .rename(&from, &to, RenameOptions::default())
            .await
            .expect("Failed to rename");
        assert!(to.is_file());
    }

    #[cfg(unix)]
    #[compio::test]
    async fn symbolic_links_are_detected_without_following() {
        let dir = scratch();
        let link = dir.path().join("loop");
        std::os::unix::fs::symlink(dir.path(), &link).expect("Failed to create symlink");
        let fs = FileAccess::new();

        assert!(fs.is_symbolic_link(&link).await);
        assert!(!fs.is_symbolic_link(dir.path()).await);
        assert!(!fs.is_symbolic_link(&dir.path().join("missing")).await);
    }

    #[compio::test]
    async fn path_exists_only_reports_false_when_missing() {
        let dir = scratch();
        let fs = FileAccess::new();

        assert!(fs.path_exists(dir.path()).await);
        assert!(!fs.path_exists(&dir.path().join("missing")).await);

        let file = dir.path().join("file");
        std::fs::write(&file, "").expect("Failed to write file");
        // A path "below" a file does not exist either.
        assert!(!fs.path_exists(&file.join("child")).await);
    }
}
