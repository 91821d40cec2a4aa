//! Filesystem watching that keeps the graph index current

pub mod watcher;

pub use watcher::{is_relevant, VaultWatcher, WatchEvent, WatcherService};
