//! Application state for Axum handlers.

use shopfront_core::Storefront;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; the store is shared behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Store every handler reads from and writes to
    pub store: Arc<dyn Storefront>,
    /// Directory CSV exports are written to
    pub export_dir: PathBuf,
}

impl AppState {
    /// Create a new application state.
    pub fn new(store: Arc<dyn Storefront>, export_dir: impl AsRef<Path>) -> Self {
        Self {
            store,
            export_dir: export_dir.as_ref().to_path_buf(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_is_clone() {
        // Axum requires Clone state
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }
}
