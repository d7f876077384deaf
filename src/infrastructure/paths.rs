//! Filesystem locations and tilde expansion.
//!
//! The pure `*_from` variants take the environment explicitly; the plain
//! versions read it from the process.

use std::env;
use std::path::{Path, PathBuf};

const APP_DIR: &str = "iftaar-finder";

/// The user's home directory from `HOME`, if set and non-empty.
#[must_use]
pub fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME").filter(|h| !h.is_empty()).map(PathBuf::from)
}

/// Expands a leading `~` to the home directory.
///
/// Paths without a leading `~` are returned unchanged, as is `~user` syntax.
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_from(path, home_dir().as_deref())
}

/// [`expand_tilde`] with an explicit home directory.
///
/// ```
/// use iftaar_finder::infrastructure::paths::expand_tilde_from;
/// use std::path::{Path, PathBuf};
///
/// let home = Some(Path::new("/home/rahim"));
/// assert_eq!(expand_tilde_from("~/data/listings.json", home), PathBuf::from("/home/rahim/data/listings.json"));
/// assert_eq!(expand_tilde_from("~", home), PathBuf::from("/home/rahim"));
/// assert_eq!(expand_tilde_from("/srv/listings.json", home), PathBuf::from("/srv/listings.json"));
/// ```
#[must_use]
pub fn expand_tilde_from(path: &str, home: Option<&Path>) -> PathBuf {
    let Some(home) = home else {
        return PathBuf::from(path);
    };

    if path == "~" {
        home.to_path_buf()
    } else if let Some(rest) = path.strip_prefix("~/") {
        home.join(rest)
    } else {
        PathBuf::from(path)
    }
}

/// Per-user data directory: `$XDG_DATA_HOME/iftaar-finder`, falling back to
/// `~/.local/share/iftaar-finder`, then the working directory.
#[must_use]
pub fn default_data_dir() -> PathBuf {
    let xdg = env::var_os("XDG_DATA_HOME").map(PathBuf::from);
    default_data_dir_from(xdg.as_deref(), home_dir().as_deref())
}

#[must_use]
pub fn default_data_dir_from(xdg_data_home: Option<&Path>, home: Option<&Path>) -> PathBuf {
    match (xdg_data_home, home) {
        (Some(xdg), _) if xdg.is_absolute() => xdg.join(APP_DIR),
        (_, Some(home)) => home.join(".local").join("share").join(APP_DIR),
        _ => PathBuf::from(".").join(APP_DIR),
    }
}

/// Resolves a configured file path: `~` is expanded and relative paths are
/// placed under [`default_data_dir`].
#[must_use]
pub fn resolve_data_path(raw: &str) -> PathBuf {
    let expanded = expand_tilde(raw.trim());
    if expanded.is_absolute() {
        expanded
    } else {
        default_data_dir().join(expanded)
    }
}
