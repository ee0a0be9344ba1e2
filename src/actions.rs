//! Thin wrappers over the desktop: open, reveal, copy.

use std::path::Path;

use log::warn;

use crate::error::ScourError;

/// Open `path` with the platform's default handler.
pub fn open_default(path: &Path) -> Result<(), ScourError> {
    if !path.exists() {
        return Err(ScourError::NotFound(path.to_path_buf()));
    }
    opener::open(path).map_err(|source| ScourError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Show `path` selected in the platform's file manager.
pub fn reveal_in_folder(path: &Path) -> Result<(), ScourError> {
    if !path.exists() {
        return Err(ScourError::NotFound(path.to_path_buf()));
    }
    opener::reveal(path).map_err(|source| ScourError::Reveal {
        path: path.to_path_buf(),
        source,
    })
}

/// Put `text` on the system clipboard. Best effort: failures are only logged.
///
/// Returns whether the copy went through.
pub fn copy_to_clipboard(text: &str) -> bool {
    let copied = arboard::Clipboard::new().and_then(|mut clipboard| clipboard.set_text(text));
    match copied {
        Ok(()) => true,
        Err(err) => {
            warn!("clipboard unavailable: {}", err);
            false
        }
    }
}
