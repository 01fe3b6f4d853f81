use std::path::{Component, Path, PathBuf};

/// Absolute, lexically normalized rendering of `path` for logs and error messages.
///
/// Symbolic links are deliberately not resolved: an entry must be reported under the
/// path it was reached by, and the path may not exist anymore.
pub fn lexical_display(path: &Path) -> String {
    let absolute_path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match std::env::current_dir() {
            Ok(current_dir) => current_dir.join(path),
            Err(_) => path.to_path_buf(),
        }
    };

    normalize_path(&absolute_path).display().to_string()
}

fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !components.is_empty() && !matches!(components.last(), Some(Component::RootDir))
                {
                    components.pop();
                }
            }
            _ => components.push(component),
        }
    }

    components.iter().collect()
}

pub trait PathDisplayExt {
    fn lexical_display(&self) -> String;

    /// Final component as a string, or an empty string for roots.
    fn base_name(&self) -> String;
}

impl PathDisplayExt for Path {
    fn lexical_display(&self) -> String {
        lexical_display(self)
    }

    fn base_name(&self) -> String {
        self.file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

impl PathDisplayExt for PathBuf {
    fn lexical_display(&self) -> String {
        lexical_display(self)
    }

    fn base_name(&self) -> String {
        self.as_path().base_name()
    }
}
