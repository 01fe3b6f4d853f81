use std::{io, path::Path};

use snafu::Snafu;

use crate::ext::PathDisplayExt;

/// Closed set of failures surfaced by every filesystem operation.
///
/// OS errors are folded into these variants by [`FsError::from_io`]; nothing else
/// constructs them from raw `io::Error`s.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum FsError {
    #[snafu(display("No such file or directory: {path}"))]
    NotFound { path: String },
    #[snafu(display("Is a directory: {path}"))]
    IsADirectory { path: String },
    #[snafu(display("Already exists: {path}"))]
    AlreadyExists { path: String },
    #[snafu(display("Permission denied: {path}"))]
    PermissionDenied { path: String },
    #[snafu(display("Filesystem operation on {path} failed (os code {code:?})"))]
    Unknown {
        path: String,
        code: Option<i32>,
        source: io::Error,
    },
    #[snafu(display("Operation cancelled"))]
    Cancelled,
}

impl FsError {
    /// The single normalization rule table from OS errors to [`FsError`].
    pub fn from_io(error: io::Error, path: &Path) -> Self {
        let path = path.lexical_display();
        match error.kind() {
            // Listing a file is reported as a missing directory.
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => FsError::NotFound { path },
            io::ErrorKind::IsADirectory => FsError::IsADirectory { path },
            io::ErrorKind::AlreadyExists => FsError::AlreadyExists { path },
            io::ErrorKind::PermissionDenied => FsError::PermissionDenied { path },
            _ => FsError::Unknown {
                path,
                code: error.raw_os_error(),
                source: error,
            },
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, FsError::NotFound { .. })
    }
}

/// Returns true for OS errors that mean "nothing lives at this path".
pub(crate) fn is_not_found_io(error: &io::Error) -> bool {
    matches!(
        error.kind(),
        io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
    )
}

pub(crate) trait NormalizeIoExt<T> {
    fn normalize_for(self, path: &Path) -> Result<T, FsError>;
}

impl<T> NormalizeIoExt<T> for io::Result<T> {
    fn normalize_for(self, path: &Path) -> Result<T, FsError> {
        self.map_err(|error| FsError::from_io(error, path))
    }
}
