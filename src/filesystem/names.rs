use unicode_normalization::{UnicodeNormalization, is_nfc};

/// Canonically composed (NFC) form of `name`.
pub fn to_composed(name: &str) -> String {
    if is_nfc(name) {
        name.to_owned()
    } else {
        name.nfc().collect()
    }
}

/// Normalizes a name handed out by the OS (directory listings, watch callbacks).
///
/// Only filesystems that store decomposed names need rewriting; elsewhere the name
/// must stay byte-identical so it still resolves when joined back onto its parent.
pub fn normalize_os_name(name: &str) -> String {
    if cfg!(target_os = "macos") {
        to_composed(name)
    } else {
        name.to_owned()
    }
}
