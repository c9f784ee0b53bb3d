//! Path helpers for config and input files

use std::path::{Path, PathBuf};

/// Resolve a user-supplied path to an absolute one.
///
/// A leading `~` is replaced with the home directory and relative paths are
/// joined onto the current directory. An empty string resolves to the
/// current directory.
///
/// ```text
/// expand_path("~/.telefilter/telefilter.json") // -> /home/user/.telefilter/telefilter.json
/// expand_path("records.jsonl")                 // -> /current/dir/records.jsonl
/// expand_path("/var/log/requests.jsonl")       // -> unchanged
/// ```
pub fn expand_path(path: &str) -> PathBuf {
    let path = path.trim();
    let expanded = expand_home(path);

    if expanded.is_relative() {
        std::env::current_dir()
            .map(|cwd| cwd.join(&expanded))
            .unwrap_or(expanded)
    } else {
        expanded
    }
}

fn expand_home(path: &str) -> PathBuf {
    let rest = match path {
        "~" => Some(""),
        _ => path
            .strip_prefix("~/")
            .or_else(|| path.strip_prefix("~\\")),
    };

    match (rest, dirs::home_dir()) {
        (Some(""), Some(home)) => home,
        (Some(rest), Some(home)) => home.join(rest),
        _ => Path::new(path).to_path_buf(),
    }
}
