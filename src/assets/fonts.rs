//! Process-lifetime font cache.
//!
//! Two typefaces ship with the deployment's static asset bundle: a display
//! face for the card title and a body face for everything else (including the
//! wheel's planet glyphs). They are read from the first candidate directory
//! that contains both files and then never reloaded; the deployment is assumed
//! static for the process lifetime.

use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use crate::foundation::error::{VoidwireError, VoidwireResult};

pub const DISPLAY_FONT_FILE: &str = "display.ttf";
pub const BODY_FONT_FILE: &str = "body.ttf";

/// The two loaded typeface payloads.
#[derive(Clone, Debug)]
pub struct FontAssets {
    pub display: Arc<Vec<u8>>,
    pub body: Arc<Vec<u8>>,
}

/// Write-once, read-many font cache, injected into the render pipeline.
///
/// The first call to [`FontStore::get`] performs the directory probe and file
/// reads; every later call returns the cached buffers with no I/O. Concurrent
/// first calls may both read the files; whichever finishes second just drops
/// its copy, since the contents are identical.
#[derive(Clone, Debug)]
pub struct FontStore {
    candidates: Arc<Vec<PathBuf>>,
    cell: Arc<OnceLock<Arc<FontAssets>>>,
}

impl FontStore {
    pub fn new(candidate_dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            candidates: Arc::new(candidate_dirs.into_iter().collect()),
            cell: Arc::new(OnceLock::new()),
        }
    }

    /// The candidate directories for the supported deployment layouts,
    /// relative to the working directory.
    pub fn default_candidates() -> Vec<PathBuf> {
        vec![
            PathBuf::from("assets/fonts"),
            PathBuf::from("public/fonts"),
            PathBuf::from("dist/client/fonts"),
        ]
    }

    /// Load-or-return the cached typefaces.
    ///
    /// Errors only when no candidate directory contains both files, which is
    /// a deployment misconfiguration rather than a per-request condition.
    pub fn get(&self) -> VoidwireResult<Arc<FontAssets>> {
        if let Some(assets) = self.cell.get() {
            return Ok(assets.clone());
        }
        let loaded = self.load()?;
        Ok(self.cell.get_or_init(|| Arc::new(loaded)).clone())
    }

    /// Whether the cache has been populated (test hook; no side effects).
    pub fn is_loaded(&self) -> bool {
        self.cell.get().is_some()
    }

    fn load(&self) -> VoidwireResult<FontAssets> {
        for dir in self.candidates.iter() {
            let display = dir.join(DISPLAY_FONT_FILE);
            let body = dir.join(BODY_FONT_FILE);
            if display.is_file() && body.is_file() {
                tracing::debug!(dir = %dir.display(), "loading font assets");
                return Ok(FontAssets {
                    display: Arc::new(read_font(&display)?),
                    body: Arc::new(read_font(&body)?),
                });
            }
        }
        Err(VoidwireError::assets(format!(
            "font assets not found in any candidate directory: {}",
            self.candidates
                .iter()
                .map(|p| p.display().to_string())
                .collect::<Vec<_>>()
                .join(", ")
        )))
    }
}

fn read_font(path: &Path) -> VoidwireResult<Vec<u8>> {
    std::fs::read(path)
        .map_err(|e| VoidwireError::assets(format!("read font '{}': {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_candidates_error_mentions_paths() {
        let store = FontStore::new([PathBuf::from("definitely/not/here")]);
        let err = store.get().unwrap_err();
        assert!(err.to_string().contains("definitely/not/here"));
        assert!(!store.is_loaded());
    }

    #[test]
    fn load_is_idempotent_and_cached() {
        let store = FontStore::new([PathBuf::from("assets/fonts")]);
        let first = store.get().expect("bundled fonts present");
        assert!(store.is_loaded());
        let second = store.get().unwrap();
        assert_eq!(first.display, second.display);
        assert_eq!(first.body, second.body);
        // same allocation, not a re-read
        assert!(Arc::ptr_eq(&first.display, &second.display));
    }

    #[test]
    fn first_matching_candidate_wins() {
        let store = FontStore::new([PathBuf::from("no/such/dir"), PathBuf::from("assets/fonts")]);
        assert!(store.get().is_ok());
    }
}
