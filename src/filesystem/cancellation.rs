pub use tokio_util::sync::CancellationToken;

use super::FsError;

/// Cooperative cancellation check for multi-step filesystem operations.
///
/// Checked only between filesystem calls; an operation already handed to the OS
/// always runs to completion.
pub trait CancellationExt {
    fn ensure_active(&self) -> Result<(), FsError>;
}

impl CancellationExt for CancellationToken {
    fn ensure_active(&self) -> Result<(), FsError> {
        if self.is_cancelled() {
            Err(FsError::Cancelled)
        } else {
            Ok(())
        }
    }
}
