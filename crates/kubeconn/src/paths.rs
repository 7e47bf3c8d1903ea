//! Home-directory expansion for user-supplied paths.

use std::path::{Path, PathBuf};

/// Expand a leading `~` to the home directory.
///
/// Paths without a leading `~`, and `~user` forms, are returned unchanged.
pub fn expand_path(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if let Some(s) = path.to_str() {
        if s == "~" {
            if let Some(home) = dirs::home_dir() {
                return home;
            }
        } else if let Some(rest) = s.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
    }
    path.to_path_buf()
}

/// Expand `~` and check that the result is a regular file.
pub fn existing_file(path: impl AsRef<Path>) -> Option<PathBuf> {
    let expanded = expand_path(path);
    expanded.is_file().then_some(expanded)
}
