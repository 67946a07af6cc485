//! Shell scripts for the remote folder vocabulary.
//!
//! Builders are pure: they return a script for `sh`. Every path or
//! user-derived value is wrapped with [`shell_quote`].

/// Printed by [`exists`] when the directory is present.
pub const EXISTS_MARKER: &str = "present";

/// Printed by [`exists`] when the directory is absent.
pub const MISSING_MARKER: &str = "absent";

/// Quote `value` as a single POSIX shell word.
pub fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Immediate subdirectory names of `root`, one per line. Empty when
/// `root` does not exist.
pub fn list_dirs(root: &str) -> String {
    let root = shell_quote(root);
    format!(
        "if [ -d {root} ]; then find {root} -mindepth 1 -maxdepth 1 -type d -printf '%f\\n'; fi"
    )
}

/// Prints [`EXISTS_MARKER`] or [`MISSING_MARKER`].
pub fn exists(path: &str) -> String {
    format!(
        "if [ -d {} ]; then echo {EXISTS_MARKER}; else echo {MISSING_MARKER}; fi",
        shell_quote(path)
    )
}

/// Recursive count of regular files; `0` for a missing directory.
pub fn file_count(path: &str) -> String {
    let path = shell_quote(path);
    format!("if [ -d {path} ]; then find {path} -type f | wc -l; else echo 0; fi")
}

/// Recursive disk usage in bytes.
pub fn size_bytes(path: &str) -> String {
    format!("du -sb {} | cut -f1", shell_quote(path))
}

/// Recursive `chmod`, plus `chown` when `ownership` is set.
pub fn set_permissions(path: &str, mode: &str, ownership: Option<&str>) -> String {
    let path = shell_quote(path);
    let mut script = format!("chmod -R {} {path}", shell_quote(mode));
    if let Some(owner) = ownership {
        script.push_str(&format!(" && chown -R {} {path}", shell_quote(owner)));
    }
    script
}

/// Create `root` and its reserved subdirectories, then normalize permissions.
pub fn ensure_structure(
    root: &str,
    reserved: &[String],
    mode: &str,
    ownership: Option<&str>,
) -> String {
    let mut dirs = vec![shell_quote(root)];
    let base = root.trim_end_matches('/');
    dirs.extend(reserved.iter().map(|r| shell_quote(&format!("{base}/{r}"))));
    format!(
        "mkdir -p {} && {}",
        dirs.join(" "),
        set_permissions(root, mode, ownership)
    )
}

/// Create one directory (and parents), then normalize permissions.
pub fn create_dir(path: &str, mode: &str, ownership: Option<&str>) -> String {
    format!(
        "mkdir -p {} && {}",
        shell_quote(path),
        set_permissions(path, mode, ownership)
    )
}

/// Rename `from` to `to`; refuses to move into an existing `to`.
pub fn move_dir(from: &str, to: &str) -> String {
    let to = shell_quote(to);
    format!(
        "if [ -e {to} ]; then echo 'destination exists' >&2; exit 1; fi; mv {} {to}",
        shell_quote(from)
    )
}

/// Remove an empty directory. Fails when it is not empty.
pub fn delete_empty(path: &str) -> String {
    format!("rmdir {}", shell_quote(path))
}

/// Delete zero-length files and files matching `patterns`, printing each.
pub fn cleanup_transient(path: &str, patterns: &[String]) -> String {
    let mut predicates: Vec<String> = patterns
        .iter()
        .map(|p| format!("-name {}", shell_quote(p)))
        .collect();
    predicates.push("-size 0".to_string());
    format!(
        "find {} -type f \\( {} \\) -print -delete",
        shell_quote(path),
        predicates.join(" -o ")
    )
}
