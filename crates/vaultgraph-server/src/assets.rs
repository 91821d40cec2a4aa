//! Static file serving for the web client

use std::path::Path;

use tower_http::services::{ServeDir, ServeFile};

const INDEX_FILE: &str = "index.html";

/// Serve files from `dir`; unknown paths get `index.html` so the client
/// can route them.
pub fn static_service(dir: &Path) -> ServeDir<ServeFile> {
    ServeDir::new(dir).fallback(ServeFile::new(dir.join(INDEX_FILE)))
}
