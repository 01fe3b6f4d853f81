//! Configuration overlay: per-name annotations read from the sidecar document.

mod annotations;
mod overlay;

pub use annotations::{
    AnnotationParseError, AnnotationRecord, AnnotationTable, RichText, SIDECAR_FILE_NAME,
    get_sidecar_path,
};
pub use overlay::{AnnotationSnapshot, ConfigStatus, ConfigurationOverlay};
