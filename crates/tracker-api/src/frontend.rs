//! Static front-end.
//!
//! Files under the configured directory are served as-is. Any other path
//! that no API route claims gets `index.html`, so client-side routes load
//! the single-page app.

use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

/// Service that serves `dir`, falling back to `dir/index.html`.
pub fn service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")))
}
