//! Test utilities for vault fixtures

use std::fs;
use tempfile::TempDir;

/// Create a temporary vault with the given `(relative path, body)` files
pub fn create_vault(structure: &[(&str, &str)]) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();

    for (path, content) in structure {
        let full_path = root.join(path);

        // Create parent directories if needed
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }

        fs::write(&full_path, content).unwrap();
    }

    temp_dir
}

/// The two-document vault used throughout the index tests
pub fn create_sample_vault() -> TempDir {
    create_vault(&[
        ("a.md", "see [[b]] and [[folder/]]"),
        ("folder/c.md", "[[a|Home]]"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_sample_vault() {
        let temp_dir = create_sample_vault();
        let root = temp_dir.path();

        assert!(root.join("a.md").exists());
        assert!(root.join("folder/c.md").exists());
    }
}
